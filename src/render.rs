//! Markdown → HTML fragment rendering.
//!
//! Parsing is delegated to `pulldown-cmark`. Its event stream is folded
//! bottom-up: each construct that needs project-specific markup (headings,
//! code blocks, code spans, tables, lists, links) collects its inner HTML in
//! a frame on a stack, and when the construct closes the finished fragment is
//! handed to a [`RenderOverrides`] implementation. Everything else (paragraphs,
//! emphasis, blockquotes, images, rules) is written directly.
//!
//! ```text
//! "## Install `npm`"
//!   Start(Heading) → push Frame::Heading
//!   Text("Install ")  → html "Install ",  plain "Install "
//!   Code("npm")       → html "<code>npm</code>", plain "npm"
//!   End(Heading)   → pop, slug "install-npm", overrides.heading(2, id, html)
//! ```
//!
//! ## Escaping
//!
//! The parser hands over raw text. Inline text is escaped once, as it is
//! pushed into a frame. Code payloads travel as [`CodeText::Raw`] and are
//! escaped by [`CodeText::to_html`] inside the override, which is the only
//! escape point for code. Heading ids are derived from the unescaped plain
//! text, so entity names never leak into anchors.
//!
//! The plain text of a heading is its literal text and code-span text as
//! written, plus raw inline HTML with the tags removed. A literal `<` in
//! `` `Promise<void>` `` stays in the plain text and only becomes a hyphen
//! when slugged.
//!
//! ## Configuration
//!
//! All knobs live in an immutable [`RenderConfig`] passed to
//! [`render_markdown`]; there is no process-wide renderer state.

use crate::config::RenderConfig;
use crate::escape::{escape_html, escape_value};
use crate::slug::{SlugRegistry, slugify, strip_tags};
use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd};
use std::borrow::Cow;
use std::fmt::Write;

/// A code payload, tagged with whether it still needs escaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeText<'a> {
    /// Literal source text, exactly as written in the document.
    Raw(&'a str),
    /// Text that is already safe HTML (e.g. output of a highlighter).
    PreEscaped(&'a str),
}

impl<'a> CodeText<'a> {
    /// HTML-safe form of the payload. Escapes `Raw` text, passes
    /// `PreEscaped` text through untouched.
    pub fn to_html(self) -> Cow<'a, str> {
        match self {
            CodeText::Raw(text) => Cow::Owned(escape_html(text)),
            CodeText::PreEscaped(html) => Cow::Borrowed(html),
        }
    }
}

/// Per-construct rendering hooks.
///
/// Every method receives finished inner fragments (already HTML) plus the
/// construct's raw attributes, and returns the construct's full HTML.
pub trait RenderOverrides {
    /// `html` is the heading's inline content; `id` is its anchor slug.
    fn heading(&self, level: u8, id: &str, html: &str) -> String;
    /// `info` is the fence info string, `None` for indented blocks.
    fn code_block(&self, code: CodeText<'_>, info: Option<&str>) -> String;
    fn code_span(&self, code: CodeText<'_>) -> String;
    /// `header` holds the header row, `body` the body rows (possibly empty).
    fn table(&self, header: &str, body: &str) -> String;
    /// `body` holds the rendered `<li>` items.
    fn list(&self, body: &str, ordered: bool, start: u64) -> String;
    /// `href` and `title` are raw; `text` is the link's inline HTML.
    fn link(&self, href: &str, title: &str, text: &str) -> String;
}

/// The tutorial site's markup: Bootstrap table classes, language-tagged code
/// blocks, and external links opened in a new tab.
#[derive(Debug, Clone)]
pub struct TutorialOverrides {
    default_language: String,
}

impl TutorialOverrides {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            default_language: config.default_language.clone(),
        }
    }
}

/// Whether `href` points off-site (`http:` or `https:` scheme).
pub fn is_external(href: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        href.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

impl RenderOverrides for TutorialOverrides {
    fn heading(&self, level: u8, id: &str, html: &str) -> String {
        format!(r#"<h{level} id="{id}">{html}</h{level}>"#)
    }

    fn code_block(&self, code: CodeText<'_>, info: Option<&str>) -> String {
        let language = info
            .and_then(|info| info.split_whitespace().next())
            .unwrap_or(&self.default_language);
        format!(
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            escape_html(language),
            code.to_html()
        )
    }

    fn code_span(&self, code: CodeText<'_>) -> String {
        format!("<code>{}</code>", code.to_html())
    }

    fn table(&self, header: &str, body: &str) -> String {
        let mut out = String::from(
            "<div class=\"table-responsive\">\n\
             <table class=\"table table-striped table-hover\">\n",
        );
        write!(out, "<thead class=\"table-dark\">\n{header}</thead>\n").unwrap();
        if !body.is_empty() {
            write!(out, "<tbody>\n{body}</tbody>\n").unwrap();
        }
        out.push_str("</table>\n</div>");
        out
    }

    fn list(&self, body: &str, ordered: bool, start: u64) -> String {
        let tag = if ordered { "ol" } else { "ul" };
        let start_attr = if ordered && start != 1 {
            format!(r#" start="{}""#, escape_value(start))
        } else {
            String::new()
        };
        format!("<{tag}{start_attr}>\n{body}</{tag}>")
    }

    fn link(&self, href: &str, title: &str, text: &str) -> String {
        let mut out = format!(r#"<a href="{}""#, escape_html(href));
        if !title.is_empty() {
            write!(out, r#" title="{}""#, escape_html(title)).unwrap();
        }
        if is_external(href) {
            out.push_str(r#" target="_blank" rel="noopener noreferrer""#);
        }
        write!(out, ">{text}</a>").unwrap();
        out
    }
}

/// A heading emitted into the fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingEntry {
    pub level: u8,
    pub id: String,
    /// Plain text of the heading, tags and markup removed.
    pub text: String,
}

/// Result of rendering one markdown document.
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// HTML fragment for the page body.
    pub html: String,
    /// Headings in document order.
    pub headings: Vec<HeadingEntry>,
}

/// Parser options for a render configuration.
pub fn parser_options(config: &RenderConfig) -> Options {
    let mut options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    if config.smart_punctuation {
        options |= Options::ENABLE_SMART_PUNCTUATION;
    }
    options
}

/// Render markdown with the tutorial site's overrides.
pub fn render_markdown(markdown: &str, config: &RenderConfig) -> RenderResult {
    render_with(markdown, config, &TutorialOverrides::new(config))
}

/// Render markdown with a caller-supplied override set.
pub fn render_with<O: RenderOverrides>(
    markdown: &str,
    config: &RenderConfig,
    overrides: &O,
) -> RenderResult {
    let parser = Parser::new_ext(markdown, parser_options(config));
    MarkdownRenderer::new(config, overrides).render(parser)
}

/// An open construct whose fragment is still being collected.
enum Frame {
    Heading {
        level: u8,
        html: String,
        plain: String,
    },
    CodeBlock {
        info: Option<String>,
        text: String,
    },
    List {
        ordered: bool,
        start: u64,
        body: String,
    },
    Table {
        alignments: Vec<Alignment>,
        header: String,
        body: String,
        row: String,
        in_head: bool,
        cell: usize,
    },
    Link {
        href: String,
        title: String,
        html: String,
    },
    Image {
        src: String,
        title: String,
        alt: String,
    },
}

struct MarkdownRenderer<'r, O: RenderOverrides> {
    config: &'r RenderConfig,
    overrides: &'r O,
    output: String,
    stack: Vec<Frame>,
    headings: Vec<HeadingEntry>,
    slugs: SlugRegistry,
}

impl<'r, O: RenderOverrides> MarkdownRenderer<'r, O> {
    fn new(config: &'r RenderConfig, overrides: &'r O) -> Self {
        Self {
            config,
            overrides,
            output: String::with_capacity(4096),
            stack: Vec::new(),
            headings: Vec::new(),
            slugs: SlugRegistry::new(),
        }
    }

    fn render<'a, I>(mut self, events: I) -> RenderResult
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event);
        }
        RenderResult {
            html: self.output,
            headings: self.headings,
        }
    }

    /// Buffer that inline and block output currently goes to.
    fn buffer(&mut self) -> &mut String {
        match self.stack.last_mut() {
            Some(Frame::Heading { html, .. }) | Some(Frame::Link { html, .. }) => html,
            Some(Frame::CodeBlock { text, .. }) => text,
            Some(Frame::List { body, .. }) => body,
            Some(Frame::Table { row, .. }) => row,
            Some(Frame::Image { alt, .. }) => alt,
            None => &mut self.output,
        }
    }

    fn push(&mut self, html: &str) {
        self.buffer().push_str(html);
    }

    /// Inline formatting tags; dropped where only raw text is collected.
    fn markup(&mut self, html: &str) {
        if !self.collects_raw_text() {
            self.push(html);
        }
    }

    /// Record raw text in the innermost open heading, if any.
    fn push_plain(&mut self, text: &str) {
        let heading = self.stack.iter_mut().rev().find_map(|frame| match frame {
            Frame::Heading { plain, .. } => Some(plain),
            _ => None,
        });
        if let Some(plain) = heading {
            plain.push_str(text);
        }
    }

    /// Whether raw text should be collected verbatim (code, image alt).
    fn collects_raw_text(&self) -> bool {
        matches!(
            self.stack.last(),
            Some(Frame::CodeBlock { .. }) | Some(Frame::Image { .. })
        )
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.raw_html(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.push("<br>\n"),
            Event::Rule => self.push("<hr>\n"),
            Event::TaskListMarker(checked) => {
                let marker = if checked {
                    r#"<input type="checkbox" checked disabled> "#
                } else {
                    r#"<input type="checkbox" disabled> "#
                };
                self.push(marker);
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not enabled in the parser options
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.push("<p>"),
            Tag::Heading { level, .. } => self.stack.push(Frame::Heading {
                level: heading_level_to_num(level),
                html: String::new(),
                plain: String::new(),
            }),
            Tag::BlockQuote(_) => self.push("<blockquote>\n"),
            Tag::CodeBlock(kind) => {
                let info = match kind {
                    CodeBlockKind::Fenced(info) if !info.trim().is_empty() => {
                        Some(info.to_string())
                    }
                    _ => None,
                };
                self.stack.push(Frame::CodeBlock {
                    info,
                    text: String::new(),
                });
            }
            Tag::List(start) => self.stack.push(Frame::List {
                ordered: start.is_some(),
                start: start.unwrap_or(1),
                body: String::new(),
            }),
            Tag::Item => self.push("<li>"),
            Tag::Table(alignments) => self.stack.push(Frame::Table {
                alignments,
                header: String::new(),
                body: String::new(),
                row: String::new(),
                in_head: false,
                cell: 0,
            }),
            Tag::TableHead | Tag::TableRow => {
                if let Some(Frame::Table {
                    row, in_head, cell, ..
                }) = self.stack.last_mut()
                {
                    row.clear();
                    *in_head = matches!(tag, Tag::TableHead);
                    *cell = 0;
                }
            }
            Tag::TableCell => {
                if let Some(Frame::Table {
                    alignments,
                    row,
                    in_head,
                    cell,
                    ..
                }) = self.stack.last_mut()
                {
                    let name = if *in_head { "th" } else { "td" };
                    let align = alignment_style(alignments.get(*cell));
                    write!(row, "<{name}{align}>").unwrap();
                }
            }
            Tag::Emphasis => self.markup("<em>"),
            Tag::Strong => self.markup("<strong>"),
            Tag::Strikethrough => self.markup("<del>"),
            Tag::Superscript => self.markup("<sup>"),
            Tag::Subscript => self.markup("<sub>"),
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                let href = match link_type {
                    LinkType::Email => format!("mailto:{dest_url}"),
                    _ => dest_url.to_string(),
                };
                self.stack.push(Frame::Link {
                    href,
                    title: title.to_string(),
                    html: String::new(),
                });
            }
            Tag::Image {
                dest_url, title, ..
            } => self.stack.push(Frame::Image {
                src: dest_url.to_string(),
                title: title.to_string(),
                alt: String::new(),
            }),
            Tag::HtmlBlock
            | Tag::FootnoteDefinition(_)
            | Tag::MetadataBlock(_)
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.push("</p>\n"),
            TagEnd::Heading(_) => {
                if let Some(Frame::Heading { level, html, plain }) = self.stack.pop() {
                    let id = self.heading_id(&plain);
                    let rendered = self.overrides.heading(level, &id, html.trim());
                    self.push(&rendered);
                    self.push("\n");
                    self.headings.push(HeadingEntry {
                        level,
                        id,
                        text: plain.trim().to_string(),
                    });
                }
            }
            TagEnd::BlockQuote(_) => self.push("</blockquote>\n"),
            TagEnd::CodeBlock => {
                if let Some(Frame::CodeBlock { info, text }) = self.stack.pop() {
                    let code = text.strip_suffix('\n').unwrap_or(&text);
                    let rendered = self
                        .overrides
                        .code_block(CodeText::Raw(code), info.as_deref());
                    self.push(&rendered);
                    self.push("\n");
                }
            }
            TagEnd::List(_) => {
                if let Some(Frame::List {
                    ordered,
                    start,
                    body,
                }) = self.stack.pop()
                {
                    let rendered = self.overrides.list(&body, ordered, start);
                    self.push(&rendered);
                    self.push("\n");
                }
            }
            TagEnd::Item => self.push("</li>\n"),
            TagEnd::Table => {
                if let Some(Frame::Table { header, body, .. }) = self.stack.pop() {
                    let rendered = self.overrides.table(&header, &body);
                    self.push(&rendered);
                    self.push("\n");
                }
            }
            TagEnd::TableHead => {
                if let Some(Frame::Table {
                    header,
                    row,
                    in_head,
                    ..
                }) = self.stack.last_mut()
                {
                    write!(header, "<tr>\n{row}</tr>\n").unwrap();
                    row.clear();
                    *in_head = false;
                }
            }
            TagEnd::TableRow => {
                if let Some(Frame::Table { body, row, .. }) = self.stack.last_mut() {
                    write!(body, "<tr>\n{row}</tr>\n").unwrap();
                    row.clear();
                }
            }
            TagEnd::TableCell => {
                if let Some(Frame::Table {
                    row, in_head, cell, ..
                }) = self.stack.last_mut()
                {
                    row.push_str(if *in_head { "</th>\n" } else { "</td>\n" });
                    *cell += 1;
                }
            }
            TagEnd::Emphasis => self.markup("</em>"),
            TagEnd::Strong => self.markup("</strong>"),
            TagEnd::Strikethrough => self.markup("</del>"),
            TagEnd::Superscript => self.markup("</sup>"),
            TagEnd::Subscript => self.markup("</sub>"),
            TagEnd::Link => {
                if let Some(Frame::Link { href, title, html }) = self.stack.pop() {
                    let rendered = self.overrides.link(&href, &title, &html);
                    self.push(&rendered);
                }
            }
            TagEnd::Image => {
                if let Some(Frame::Image { src, title, alt }) = self.stack.pop() {
                    let mut img = format!(
                        r#"<img src="{}" alt="{}""#,
                        escape_html(&src),
                        escape_html(&alt)
                    );
                    if !title.is_empty() {
                        write!(img, r#" title="{}""#, escape_html(&title)).unwrap();
                    }
                    img.push('>');
                    self.push(&img);
                }
            }
            TagEnd::HtmlBlock
            | TagEnd::FootnoteDefinition
            | TagEnd::MetadataBlock(_)
            | TagEnd::DefinitionList
            | TagEnd::DefinitionListTitle
            | TagEnd::DefinitionListDefinition => {}
        }
    }

    fn heading_id(&mut self, plain: &str) -> String {
        let base = slugify(plain);
        if self.config.unique_heading_ids {
            self.slugs.claim(base)
        } else {
            base
        }
    }

    fn text(&mut self, text: &str) {
        if self.collects_raw_text() {
            self.push(text);
            return;
        }
        self.push_plain(text);
        let escaped = escape_html(text);
        self.push(&escaped);
    }

    fn inline_code(&mut self, code: &str) {
        if self.collects_raw_text() {
            self.push(code);
            return;
        }
        self.push_plain(code);
        let rendered = self.overrides.code_span(CodeText::Raw(code));
        self.push(&rendered);
    }

    fn raw_html(&mut self, html: &str) {
        if matches!(self.stack.last(), Some(Frame::Image { .. })) {
            return;
        }
        self.push_plain(&strip_tags(html));
        self.push(html);
    }

    fn soft_break(&mut self) {
        if self.collects_raw_text() {
            self.push(" ");
        } else if self.config.soft_breaks {
            self.push("<br>\n");
        } else {
            self.push("\n");
        }
    }
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn alignment_style(alignment: Option<&Alignment>) -> &'static str {
    match alignment {
        Some(Alignment::Left) => r#" style="text-align: left""#,
        Some(Alignment::Center) => r#" style="text-align: center""#,
        Some(Alignment::Right) => r#" style="text-align: right""#,
        Some(Alignment::None) | None => "",
    }
}
