//! Full-page composition for converted markdown.
//!
//! [`compose_page`] is a pure function of the page title, the rendered
//! content fragment and the page kind. The kind selects the breadcrumb label,
//! the meta description and which navigation buttons close the page.
//!
//! ```text
//! <!DOCTYPE html>
//! html lang="ja"
//! ├── head      charset, head_meta(kind), title, stylesheets, page.css
//! └── body
//!     ├── site_header + breadcrumb(kind label)
//!     ├── main > div.container
//!     │   ├── content (verbatim)
//!     │   └── navigation_buttons(kind)
//!     ├── site_footer + back_to_top
//!     └── CDN scripts, shell_scripts + page.js
//! ```

use crate::shell::{self, PAGE_CSS, PAGE_JS};
use crate::types::PageKind;
use maud::{DOCTYPE, Markup, PreEscaped, html};

/// Wrap a rendered fragment in the complete tutorial page.
pub fn compose_page(title: &str, content: &str, kind: PageKind) -> Markup {
    html! {
        (DOCTYPE)
        html lang="ja" {
            head {
                meta charset="UTF-8";
                (shell::head_meta(kind))
                title { (title) }
                (shell::stylesheet(shell::BOOTSTRAP_CSS))
                (shell::stylesheet(shell::FONT_AWESOME_CSS))
                (shell::stylesheet(shell::PRISM_THEME_CSS))
                (shell::stylesheet(shell::SITE_CSS))
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                (shell::site_header())
                (shell::breadcrumb(kind.breadcrumb_label()))
                main {
                    div.container {
                        (PreEscaped(content))
                        (shell::navigation_buttons(kind))
                    }
                }
                (shell::site_footer())
                (shell::back_to_top())
                script src=(shell::BOOTSTRAP_JS) {}
                script src=(shell::PRISM_CORE_JS) {}
                script src=(shell::PRISM_AUTOLOADER_JS) {}
                (shell::shell_scripts())
                script { (PreEscaped(PAGE_JS)) }
            }
        }
    }
}
