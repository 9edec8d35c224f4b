//! Retrofit the site shell onto an existing HTML page.
//!
//! Pages produced by older converters have bare `<body><div class="container">`
//! markup. [`inject_shell`] rewrites such a page as text: every step finds the
//! first occurrence of an anchor substring, splits there and splices new
//! markup in. No DOM is built. Each anchor is expected to occur at most once;
//! later occurrences are never looked at.
//!
//! ## Steps
//!
//! Applied in this order:
//!
//! | Step          | Anchor                        | Action                               |
//! |---------------|-------------------------------|--------------------------------------|
//! | `FontAwesome` | Bootstrap stylesheet link     | icon stylesheet after it             |
//! | `Styles`      | `</head>`                     | site stylesheet + style block before |
//! | `Header`      | `<body>`                      | header and breadcrumb after          |
//! | `MainWrap`    | `<div class="container">`     | `<main>` before it, `</main>` before `</body>` |
//! | `Footer`      | `</body>`                     | buttons, footer, scripts before      |
//! | `Metadata`    | `<meta name="viewport" ...>`  | replaced with viewport + description |
//!
//! ## Guards
//!
//! A step whose result is already present is skipped: the icon stylesheet
//! (any `font-awesome` mention), the header, `<main>`, the footer and the
//! description meta tag. The style block is guarded by its `id` unless
//! [`InjectConfig::guard_styles`] is off, in which case every run appends
//! another copy.
//!
//! ## Missing anchors
//!
//! A step whose anchor is absent leaves the page unchanged. The step is
//! listed in [`InjectReport::missing`] and a warning is logged; the remaining
//! steps still run.

use crate::config::InjectConfig;
use crate::shell::{self, SHELL_STYLES_ID};
use crate::types::PageKind;
use maud::html;
use regex::{NoExpand, Regex};
use std::fmt;
use std::sync::LazyLock;
use tracing::{debug, warn};

const HEAD_CLOSE: &str = "</head>";
const BODY_OPEN: &str = "<body>";
const BODY_CLOSE: &str = "</body>";
const CONTAINER: &str = r#"<div class="container">"#;
const BREADCRUMB_NAV: &str = r#"<nav class="breadcrumb-nav">"#;

static VIEWPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<meta name="viewport"[^>]*>"#).expect("valid viewport regex"));

/// One splice of the injection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectStep {
    FontAwesome,
    Styles,
    Header,
    MainWrap,
    Footer,
    Metadata,
}

impl InjectStep {
    /// Anchor the step looks for, as shown in diagnostics.
    pub fn anchor(self) -> &'static str {
        match self {
            InjectStep::FontAwesome => "bootstrap stylesheet link",
            InjectStep::Styles => HEAD_CLOSE,
            InjectStep::Header => BODY_OPEN,
            InjectStep::MainWrap => CONTAINER,
            InjectStep::Footer => BODY_CLOSE,
            InjectStep::Metadata => r#"<meta name="viewport">"#,
        }
    }
}

impl fmt::Display for InjectStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InjectStep::FontAwesome => "font-awesome",
            InjectStep::Styles => "styles",
            InjectStep::Header => "header",
            InjectStep::MainWrap => "main",
            InjectStep::Footer => "footer",
            InjectStep::Metadata => "metadata",
        };
        f.write_str(name)
    }
}

/// What a run of [`inject_shell`] did, step by step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectReport {
    pub applied: Vec<InjectStep>,
    /// Steps whose markup was already on the page.
    pub skipped: Vec<InjectStep>,
    /// Steps whose anchor was not found.
    pub missing: Vec<InjectStep>,
}

impl InjectReport {
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Rewritten page plus the per-step report.
#[derive(Debug, Clone)]
pub struct Injected {
    pub html: String,
    pub report: InjectReport,
}

enum Outcome {
    Applied(String),
    Skipped,
    Missing,
}

/// Insert `insert` right after the first `anchor`.
fn splice_after(html: &str, anchor: &str, insert: &str) -> Option<String> {
    let at = html.find(anchor)? + anchor.len();
    Some(splice_at(html, at, insert))
}

/// Insert `insert` right before the first `anchor`.
fn splice_before(html: &str, anchor: &str, insert: &str) -> Option<String> {
    let at = html.find(anchor)?;
    Some(splice_at(html, at, insert))
}

fn splice_at(html: &str, at: usize, insert: &str) -> String {
    let mut out = String::with_capacity(html.len() + insert.len());
    out.push_str(&html[..at]);
    out.push_str(insert);
    out.push_str(&html[at..]);
    out
}

fn bootstrap_link() -> String {
    shell::stylesheet(shell::BOOTSTRAP_CSS).into_string()
}

fn font_awesome(html: &str) -> Outcome {
    if html.contains("font-awesome") {
        return Outcome::Skipped;
    }
    let insert = format!("\n{}", shell::stylesheet(shell::FONT_AWESOME_CSS).into_string());
    match splice_after(html, &bootstrap_link(), &insert) {
        Some(out) => Outcome::Applied(out),
        None => Outcome::Missing,
    }
}

fn styles(html: &str, guard: bool) -> Outcome {
    if guard && html.contains(&format!(r#"id="{SHELL_STYLES_ID}""#)) {
        return Outcome::Skipped;
    }
    let insert = format!("{}\n", shell::shell_styles().into_string());
    match splice_before(html, HEAD_CLOSE, &insert) {
        Some(out) => Outcome::Applied(out),
        None => Outcome::Missing,
    }
}

fn header(html: &str, title: &str) -> Outcome {
    if html.contains(r#"<header class="header">"#) {
        return Outcome::Skipped;
    }
    let block = html! {
        (shell::site_header())
        (shell::breadcrumb(title))
    };
    let insert = format!("\n{}\n", block.into_string());
    match splice_after(html, BODY_OPEN, &insert) {
        Some(out) => Outcome::Applied(out),
        None => Outcome::Missing,
    }
}

/// Wrap everything from the content container up to `</body>` in `<main>`.
///
/// The container is searched after the header (and its breadcrumb, which
/// has a container of its own).
fn main_wrap(html: &str) -> Outcome {
    if html.contains("<main>") {
        return Outcome::Skipped;
    }
    let search_from = match html.find(BREADCRUMB_NAV) {
        Some(start) => breadcrumb_end(html, start),
        None => html.find(BODY_OPEN).map_or(0, |at| at + BODY_OPEN.len()),
    };

    let Some(open) = html[search_from..].find(CONTAINER).map(|at| at + search_from) else {
        return Outcome::Missing;
    };
    let Some(close) = html[open..].find(BODY_CLOSE).map(|at| at + open) else {
        return Outcome::Missing;
    };

    let mut out = String::with_capacity(html.len() + 16);
    out.push_str(&html[..open]);
    out.push_str("<main>\n");
    out.push_str(&html[open..close]);
    out.push_str("</main>\n");
    out.push_str(&html[close..]);
    Outcome::Applied(out)
}

/// Byte offset just past the breadcrumb block starting at `start`.
fn breadcrumb_end(html: &str, start: usize) -> usize {
    html[start..]
        .find("</nav>")
        .map_or(start, |at| start + at + "</nav>".len())
}

fn footer(html: &str, kind: PageKind) -> Outcome {
    if html.contains(r#"<footer class="footer">"#) {
        return Outcome::Skipped;
    }
    let block = html! {
        (shell::navigation_buttons(kind))
        (shell::site_footer())
        (shell::back_to_top())
    };
    let insert = format!(
        "{}\n{}\n",
        block.into_string(),
        shell::shell_scripts().into_string()
    );
    match splice_before(html, BODY_CLOSE, &insert) {
        Some(out) => Outcome::Applied(out),
        None => Outcome::Missing,
    }
}

fn metadata(html: &str, kind: PageKind) -> Outcome {
    if html.contains(r#"<meta name="description""#) {
        return Outcome::Skipped;
    }
    if !VIEWPORT.is_match(html) {
        return Outcome::Missing;
    }
    let replacement = shell::head_meta(kind).into_string();
    Outcome::Applied(VIEWPORT.replace(html, NoExpand(&replacement)).into_owned())
}

/// Add the site shell to an existing page.
///
/// `title` becomes the breadcrumb label; `kind` picks the navigation buttons
/// and the meta description.
pub fn inject_shell(html: &str, title: &str, kind: PageKind, config: &InjectConfig) -> Injected {
    let mut page = html.to_string();
    let mut report = InjectReport::default();

    let steps = [
        InjectStep::FontAwesome,
        InjectStep::Styles,
        InjectStep::Header,
        InjectStep::MainWrap,
        InjectStep::Footer,
        InjectStep::Metadata,
    ];

    for step in steps {
        let outcome = match step {
            InjectStep::FontAwesome => font_awesome(&page),
            InjectStep::Styles => styles(&page, config.guard_styles),
            InjectStep::Header => header(&page, title),
            InjectStep::MainWrap => main_wrap(&page),
            InjectStep::Footer => footer(&page, kind),
            InjectStep::Metadata => metadata(&page, kind),
        };
        match outcome {
            Outcome::Applied(out) => {
                debug!(%step, "applied");
                page = out;
                report.applied.push(step);
            }
            Outcome::Skipped => {
                debug!(%step, "already present, skipped");
                report.skipped.push(step);
            }
            Outcome::Missing => {
                warn!(%step, anchor = step.anchor(), "anchor not found, step left page unchanged");
                report.missing.push(step);
            }
        }
    }

    Injected { html: page, report }
}
