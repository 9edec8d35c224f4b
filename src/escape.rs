//! HTML text escaping.
//!
//! Everything the renderer writes into an element body or a quoted attribute
//! goes through [`escape_html`]. The five special characters are replaced
//! with their character references in a single left-to-right pass, so the
//! `&` of an emitted reference is never escaped a second time within one call.
//!
//! Escaping is deliberately *not* idempotent: `escape_html("&lt;")` yields
//! `&amp;lt;`. Callers that already hold escaped text must not call it again;
//! see [`crate::render::CodeText`] for how code payloads keep track of that.

use std::fmt::Display;

/// Escape `&`, `<`, `>`, `"` and `'` for use in HTML text and attributes.
///
/// ```
/// use tutorial_site::escape::escape_html;
///
/// assert_eq!(escape_html("<a href='x'>"), "&lt;a href=&#039;x&#039;&gt;");
/// assert_eq!(escape_html("plain"), "plain");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape any displayable value by first coercing it to its textual form.
///
/// Used for payloads that are not strings to begin with (list start
/// numbers, heading levels).
pub fn escape_value(value: impl Display) -> String {
    escape_html(&value.to_string())
}
