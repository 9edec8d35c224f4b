//! Heading anchor slugs.
//!
//! Tutorial headings are mostly Japanese, so an ASCII-only slug would turn
//! `はじめに` and `インストール` into the same empty id. The allow-set here is
//! ASCII word characters (`[A-Za-z0-9_]`) plus hiragana (U+3040–U+309F),
//! katakana (U+30A0–U+30FF) and CJK ideographs (U+4E00–U+9FAF). Every run of
//! other characters collapses to a single `-`.
//!
//! ```text
//! "Node.js"                 → "node-js"
//! "Promise<void> の扱い"      → "promise-void-の扱い"
//! "  Express.js 入門!  "     → "express-js-入門"
//! ```
//!
//! [`slugify`] takes plain text: callers remove real markup first with
//! [`strip_tags`], so a literal `<` in the text is just another separator.
//!
//! Slugs are not unique per document by default: two headings with the same
//! text share an id. [`SlugRegistry`] adds `-1`, `-2`, ... suffixes when the
//! renderer is configured for unique ids.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Remove anything that looks like an HTML tag.
pub fn strip_tags(text: &str) -> String {
    TAG.replace_all(text, "").into_owned()
}

/// Whether `c` survives slugging unchanged.
fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || ('\u{3040}'..='\u{309F}').contains(&c)
        || ('\u{30A0}'..='\u{30FF}').contains(&c)
        || ('\u{4E00}'..='\u{9FAF}').contains(&c)
}

/// Derive an anchor id from heading text.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut in_gap = false;

    for c in lowered.chars() {
        if is_slug_char(c) {
            slug.push(c);
            in_gap = false;
        } else if !in_gap {
            slug.push('-');
            in_gap = true;
        }
    }

    slug.trim_matches('-').to_string()
}

/// Hands out per-document unique slugs.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    next_suffix: HashMap<String, usize>,
    issued: HashSet<String>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `base` the first time, then `base-1`, `base-2`, ...
    ///
    /// A suffix already handed out (or taken by a heading whose own slug
    /// looks suffixed) is skipped.
    pub fn claim(&mut self, base: String) -> String {
        let mut id = base.clone();
        let mut n = self.next_suffix.get(&base).copied().unwrap_or(0);
        if n > 0 || self.issued.contains(&id) {
            n = n.max(1);
            loop {
                id = format!("{base}-{n}");
                n += 1;
                if !self.issued.contains(&id) {
                    break;
                }
            }
        }
        self.next_suffix.insert(base, n.max(1));
        self.issued.insert(id.clone());
        id
    }
}
