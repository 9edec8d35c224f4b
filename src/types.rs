//! Shared types used by the converter and the shell injector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Which of the two tutorial pages is being produced.
///
/// Drives the breadcrumb label, the meta description/keywords, and which
/// navigation-button block closes the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Nodejs,
    Express,
}

impl PageKind {
    /// Infer the kind from a file path: anything mentioning `nodejs-tutorial`
    /// is the Node.js page, everything else the Express page.
    pub fn detect(path: &Path) -> Self {
        if path.to_string_lossy().contains("nodejs-tutorial") {
            PageKind::Nodejs
        } else {
            PageKind::Express
        }
    }

    /// Breadcrumb label shown for the current page.
    pub fn breadcrumb_label(self) -> &'static str {
        match self {
            PageKind::Nodejs => "Node.js 初心者向けチュートリアル",
            PageKind::Express => "Express.js 初心者向けチュートリアル",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PageKind::Nodejs => {
                "Node.jsの基本概念から実践的な使い方まで、初心者向けに分かりやすく解説します。"
            }
            PageKind::Express => {
                "Express.jsフレームワークを使ったWebアプリケーション開発を基礎から学習できます。"
            }
        }
    }

    pub fn keywords(self) -> &'static str {
        match self {
            PageKind::Nodejs | PageKind::Express => {
                "Node.js, Express.js, JavaScript, チュートリアル, 初心者, 日本語"
            }
        }
    }

    /// File name of the page this kind is rendered to.
    pub fn page_file(self) -> &'static str {
        match self {
            PageKind::Nodejs => "nodejs-tutorial.html",
            PageKind::Express => "express-tutorial.html",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PageKind::Nodejs => "nodejs",
            PageKind::Express => "express",
        })
    }
}

/// One page of the batch: markdown input, HTML output, and page title.
///
/// Paths are relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageEntry {
    pub input: String,
    pub output: String,
    pub title: String,
    /// Explicit page kind; when absent it is detected from `input`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<PageKind>,
}

impl PageEntry {
    pub fn kind(&self) -> PageKind {
        self.kind
            .unwrap_or_else(|| PageKind::detect(Path::new(&self.input)))
    }
}
