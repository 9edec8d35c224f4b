//! Shared page chrome.
//!
//! Both the template composer and the shell injector surround tutorial
//! content with the same pieces: a header with the site navigation, a
//! breadcrumb, the previous/next navigation buttons, a footer and a
//! back-to-top button. Each piece is a small maud component here so the two
//! paths cannot drift apart.
//!
//! ## Static assets
//!
//! Stylesheets and inline scripts are embedded at compile time:
//! - `static/page.css`, `static/page.js`: theme and behaviour of a fully
//!   composed page
//! - `static/shell.css`, `static/shell.js`: the smaller style and
//!   progress-tracking blocks added to an existing page by the injector
//!
//! ## Class contract
//!
//! `assets/js/main.js` and `assets/css/style.css` select on `nav-menu`,
//! `nav-link`, `nav-toggle`, `back-to-top`, `copy-btn`, `navigation-buttons`
//! and `nav-btn`. Renaming any of them breaks the site's scripts.

use crate::types::PageKind;
use maud::{Markup, PreEscaped, html};

pub const PAGE_CSS: &str = include_str!("../static/page.css");
pub const PAGE_JS: &str = include_str!("../static/page.js");
pub const SHELL_CSS: &str = include_str!("../static/shell.css");
pub const SHELL_JS: &str = include_str!("../static/shell.js");

pub const BOOTSTRAP_CSS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css";
pub const FONT_AWESOME_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css";
pub const PRISM_THEME_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/prism/1.29.0/themes/prism-tomorrow.min.css";
pub const BOOTSTRAP_JS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/js/bootstrap.bundle.min.js";
pub const PRISM_CORE_JS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/prism/1.29.0/components/prism-core.min.js";
pub const PRISM_AUTOLOADER_JS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/prism/1.29.0/plugins/autoloader/prism-autoloader.min.js";
pub const SITE_CSS: &str = "assets/css/style.css";
pub const SITE_JS: &str = "assets/js/main.js";

/// `id` carried by the injected style block; its presence means the block
/// is already on the page.
pub const SHELL_STYLES_ID: &str = "tutorial-shell-styles";

const SITE_NAME: &str = "Node.js Tutorial";
const HOME: &str = "index.html";
const NODEJS_ORG: &str = "https://nodejs.org/";

// ============================================================================
// Head
// ============================================================================

/// Viewport plus the page-kind specific description, keywords and author.
pub fn head_meta(kind: PageKind) -> Markup {
    html! {
        meta name="viewport" content="width=device-width, initial-scale=1.0";
        meta name="description" content=(kind.description());
        meta name="keywords" content=(kind.keywords());
        meta name="author" content=(SITE_NAME);
    }
}

pub fn stylesheet(href: &str) -> Markup {
    html! {
        link href=(href) rel="stylesheet";
    }
}

/// Site stylesheet link and the marked shell style block.
pub fn shell_styles() -> Markup {
    html! {
        (stylesheet(SITE_CSS))
        style id=(SHELL_STYLES_ID) { (PreEscaped(SHELL_CSS)) }
    }
}

/// Site script and the reading-progress tracker.
pub fn shell_scripts() -> Markup {
    html! {
        script src=(SITE_JS) {}
        script { (PreEscaped(SHELL_JS)) }
    }
}

// ============================================================================
// Body chrome
// ============================================================================

pub fn site_header() -> Markup {
    html! {
        header.header {
            nav.navbar {
                a.logo href=(HOME) { (SITE_NAME) }
                ul.nav-menu {
                    li { a.nav-link href=(HOME) { "ホーム" } }
                    li { a.nav-link href=(PageKind::Nodejs.page_file()) { "Node.js" } }
                    li { a.nav-link href=(PageKind::Express.page_file()) { "Express.js" } }
                    li { a.nav-link href=(NODEJS_ORG) target="_blank" { "Node.js公式" } }
                }
                button.nav-toggle aria-label="メニューを開く" {
                    i.fas.fa-bars {}
                }
            }
        }
    }
}

/// Breadcrumb trail: home, then the current page's `label`.
pub fn breadcrumb(label: &str) -> Markup {
    html! {
        nav.breadcrumb-nav {
            div.container {
                ol.breadcrumb.mb-0 {
                    li.breadcrumb-item { a href=(HOME) { "ホーム" } }
                    li.breadcrumb-item.active aria-current="page" { (label) }
                }
            }
        }
    }
}

fn home_button() -> Markup {
    html! {
        a.nav-btn href=(HOME) {
            i.fas.fa-home {}
            " ホーム"
        }
    }
}

/// Buttons at the end of a page, pointing at the other tutorial and home.
///
/// The Node.js page leads forward to Express; the Express page leads back.
pub fn navigation_buttons(kind: PageKind) -> Markup {
    html! {
        div.navigation-buttons {
            @match kind {
                PageKind::Nodejs => {
                    (home_button())
                    a.nav-btn href=(PageKind::Express.page_file()) {
                        "Express.js Tutorial "
                        i.fas.fa-arrow-right {}
                    }
                }
                PageKind::Express => {
                    a.nav-btn href=(PageKind::Nodejs.page_file()) {
                        i.fas.fa-arrow-left {}
                        " Node.js Tutorial"
                    }
                    (home_button())
                }
            }
        }
    }
}

pub fn site_footer() -> Markup {
    html! {
        footer.footer {
            div.footer-content {
                div.footer-links {
                    a.footer-link href=(HOME) { "ホーム" }
                    a.footer-link href=(PageKind::Nodejs.page_file()) { "Node.js Tutorial" }
                    a.footer-link href=(PageKind::Express.page_file()) { "Express.js Tutorial" }
                    a.footer-link href=(NODEJS_ORG) target="_blank" { "Node.js 公式" }
                    a.footer-link href="https://expressjs.com/" target="_blank" { "Express.js 公式" }
                    a.footer-link href="https://github.com/nodejs/node" target="_blank" { "GitHub" }
                }
                div.footer-bottom {
                    p { "© 2024 Node.js Tutorial. このチュートリアルは学習目的で作成されました。" }
                    p {
                        i.fas.fa-heart style="color: #e74c3c;" {}
                        " Made with Node.js and Express.js"
                    }
                }
            }
        }
    }
}

pub fn back_to_top() -> Markup {
    html! {
        button.back-to-top type="button" aria-label="トップへ戻る" {
            i.fas.fa-arrow-up {}
        }
    }
}
