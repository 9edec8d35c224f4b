//! # Tutorial Site
//!
//! Builds the Node.js and Express.js tutorial pages. Markdown sources become
//! complete HTML pages sharing one header, breadcrumb, navigation and footer;
//! HTML pages made without that shell can have it injected after the fact.
//!
//! # Two Passes
//!
//! ```text
//! convert   page.md   →  render  →  template  →  page.html
//! update    page.html →  inject  →  page.html   (in place)
//! ```
//!
//! Both passes run once per configured page. Pages share nothing, so a batch
//! runs in parallel and one failing page never stops the others.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`escape`] | HTML text and attribute escaping |
//! | [`slug`] | Heading ids, Japanese-aware |
//! | [`render`] | pulldown-cmark driver plus the per-construct override set |
//! | [`shell`] | Header, breadcrumb, buttons, footer, embedded CSS/JS |
//! | [`template`] | Full page around a rendered fragment |
//! | [`inject`] | Anchor-based splicing of the shell into existing HTML |
//! | [`convert`] | Batch drivers and per-page status |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`types`] | `PageKind`, `PageEntry` |
//! | [`output`] | CLI status lines |
//!
//! # Design Decisions
//!
//! ## Configuration Is a Value
//!
//! Rendering options are an immutable [`config::RenderConfig`] passed into
//! [`render::render_markdown`]. There is no global renderer to set up, so two
//! renders with different options can run side by side.
//!
//! ## One Escape Point for Code
//!
//! Code payloads travel as [`render::CodeText`], either raw or already
//! escaped. Only [`render::CodeText::to_html`] escapes, so a payload cannot
//! be escaped twice by accident.
//!
//! ## Text Splicing, Not a DOM
//!
//! The injector edits pages as strings around known anchors. The pages it
//! targets come from this project's own older converter, so their structure
//! is known; each step reports whether its anchor was found rather than
//! failing silently.

pub mod config;
pub mod convert;
pub mod escape;
pub mod inject;
pub mod output;
pub mod render;
pub mod shell;
pub mod slug;
pub mod template;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
