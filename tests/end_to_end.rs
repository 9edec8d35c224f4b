//! End-to-end runs of both passes through the public library API.
//!
//! Each test copies `fixtures/site/` into a temp directory, so the source
//! fixtures are never modified.

use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tutorial_site::config::{self, InjectConfig, RenderConfig, SiteConfig};
use tutorial_site::convert::{self, PageStatus};
use tutorial_site::inject::{InjectStep, inject_shell};
use tutorial_site::output;
use tutorial_site::render::render_markdown;
use tutorial_site::template::compose_page;
use tutorial_site::types::{PageEntry, PageKind};

const NODEJS_TITLE: &str = "Node.js 初心者向けチュートリアル";
const BUTTONS: &str = r#"<div class="navigation-buttons">"#;

// `test_helpers::setup_fixtures` is `#[cfg(test)]` inside the library and
// not visible to integration tests, so the copy lives here as well.
fn fixture_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir(&fixtures, tmp.path());
    tmp
}

fn copy_dir(src: &Path, dst: &Path) {
    for entry in fs::read_dir(src).unwrap() {
        let entry = entry.unwrap();
        let target = dst.join(entry.file_name());
        if entry.path().is_dir() {
            fs::create_dir_all(&target).unwrap();
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), target).unwrap();
        }
    }
}

/// Text between the navigation-button block's start and its end.
fn buttons_block(html: &str) -> &str {
    let start = html.find(BUTTONS).expect("navigation buttons present");
    let end = html[start..].find("</div>").unwrap() + start;
    &html[start..end]
}

// =========================================================================
// Rendering scenarios
// =========================================================================

#[test]
fn heading_and_external_link_in_nodejs_shell() {
    let rendered = render_markdown(
        "# Node.js\n\nSee [docs](https://nodejs.org/).",
        &RenderConfig::default(),
    );
    let page = compose_page(NODEJS_TITLE, &rendered.html, PageKind::Nodejs).into_string();

    assert!(page.contains(r#"<h1 id="node-js">Node.js</h1>"#));
    assert!(page.contains(
        r#"<p>See <a href="https://nodejs.org/" target="_blank" rel="noopener noreferrer">docs</a>.</p>"#
    ));
    let crumb = &page[page.find("breadcrumb-item active").unwrap()..];
    assert!(crumb[..crumb.find("</li>").unwrap()].ends_with(NODEJS_TITLE));
    assert!(buttons_block(&page).contains(r#"href="express-tutorial.html""#));
}

#[test]
fn fenced_script_is_escaped() {
    let rendered = render_markdown("```js\n<script>\n```", &RenderConfig::default());
    assert_eq!(
        rendered.html,
        "<pre><code class=\"language-js\">&lt;script&gt;</code></pre>\n"
    );
}

// =========================================================================
// Convert pass
// =========================================================================

#[test]
fn convert_fixture_site() {
    let site = fixture_site();
    let config = config::load_config(site.path()).unwrap();
    let reports = convert::convert_pages(site.path(), &config);

    assert_eq!(reports.len(), 2);
    assert!(!convert::any_failed(&reports));

    let nodejs = fs::read_to_string(site.path().join("nodejs-tutorial.html")).unwrap();
    assert!(nodejs.contains(r#"<h2 id="インストール">インストール</h2>"#));
    assert!(nodejs.contains(r#"<pre><code class="language-bash">node --version"#));
    assert!(nodejs.contains("&lt;h1&gt;Hello &amp; welcome&lt;/h1&gt;"));
    assert!(nodejs.contains(r#"<thead class="table-dark">"#));
    assert!(nodejs.contains(r#"<th style="text-align: center">説明</th>"#));
    assert!(nodejs.contains(r##"<a href="#インストール">インストール</a>"##));
    assert!(nodejs.contains(r#"<a href="express-tutorial.html">Express.js チュートリアル</a>"#));
    assert!(nodejs.contains("サーバーサイドでJavaScriptを実行するためのランタイムです。<br>"));

    let express = fs::read_to_string(site.path().join("express-tutorial.html")).unwrap();
    assert!(express.contains(r#"<code class="language-javascript">npm install express</code>"#));
    assert!(express.contains(r#"<ol start="3">"#));
    assert!(express.contains(
        r#"<a href="https://expressjs.com/" title="Express" target="_blank" rel="noopener noreferrer">"#
    ));
    assert!(buttons_block(&express).contains(r#"href="nodejs-tutorial.html""#));
    assert!(express.contains(PageKind::Express.breadcrumb_label()));
}

#[test]
fn convert_output_lines() {
    let site = fixture_site();
    fs::remove_file(site.path().join("express-tutorial.md")).unwrap();
    let reports = convert::convert_pages(site.path(), &SiteConfig::default());
    let lines = output::format_convert_output(&reports);

    assert_eq!(lines[0], format!("001 {NODEJS_TITLE} → nodejs-tutorial.html"));
    assert_eq!(lines[3], "002 Express.js 初心者向けチュートリアル (skipped)");
    assert_eq!(lines.last().unwrap(), "Converted 1 page, 1 skipped, 0 failed");
}

#[test]
fn config_file_redirects_pages_and_options() {
    let site = fixture_site();
    fs::write(
        site.path().join("config.toml"),
        r#"
[[pages]]
input = "express-tutorial.md"
output = "public/express.html"
title = "Express"
kind = "express"

[render]
default_language = "shell"
soft_breaks = false
"#,
    )
    .unwrap();

    let config = config::load_config(site.path()).unwrap();
    assert_eq!(config.pages.len(), 1);
    let reports = convert::convert_pages(site.path(), &config);
    assert!(matches!(reports[0].status, PageStatus::Converted { .. }));

    let html = fs::read_to_string(site.path().join("public/express.html")).unwrap();
    assert!(html.contains(r#"<code class="language-shell">npm install express</code>"#));
    assert!(html.contains("<title>Express</title>"));
    assert!(!site.path().join("nodejs-tutorial.html").exists());
}

// =========================================================================
// Update pass
// =========================================================================

fn legacy_site() -> TempDir {
    let site = fixture_site();
    for name in ["nodejs-tutorial.html", "express-tutorial.html"] {
        fs::copy(site.path().join("legacy").join(name), site.path().join(name)).unwrap();
    }
    site
}

#[test]
fn update_retrofits_legacy_pages() {
    let site = legacy_site();
    let reports = convert::update_pages(site.path(), &SiteConfig::default());
    assert!(!convert::any_failed(&reports));

    for report in &reports {
        match &report.status {
            PageStatus::Updated { report, .. } => assert!(report.missing.is_empty()),
            other => panic!("unexpected status {other:?}"),
        }
    }

    let html = fs::read_to_string(site.path().join("nodejs-tutorial.html")).unwrap();
    let main = &html[html.find("<main>").unwrap()..html.find("</main>").unwrap()];
    assert!(main.contains(r#"<div class="table-responsive">"#));
    assert!(main.contains("btn-top"));
    assert!(!main.contains("breadcrumb"));
    assert!(html.contains(PageKind::Nodejs.description()));
    assert!(buttons_block(&html).contains(r#"href="express-tutorial.html""#));

    let express = fs::read_to_string(site.path().join("express-tutorial.html")).unwrap();
    assert!(buttons_block(&express).contains(r#"href="nodejs-tutorial.html""#));
}

#[test]
fn rerunning_update_is_stable() {
    let site = legacy_site();
    let config = SiteConfig::default();
    convert::update_pages(site.path(), &config);
    let first = fs::read_to_string(site.path().join("nodejs-tutorial.html")).unwrap();

    let reports = convert::update_pages(site.path(), &config);
    let second = fs::read_to_string(site.path().join("nodejs-tutorial.html")).unwrap();

    assert_eq!(first, second);
    let lines = output::format_update_output(&reports);
    assert_eq!(lines[1], "    Unchanged");
}

#[test]
fn unguarded_styles_duplicate_on_rerun() {
    let legacy = fs::read_to_string(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site/legacy/nodejs-tutorial.html"),
    )
    .unwrap();
    let config = InjectConfig {
        guard_styles: false,
    };

    let once = inject_shell(&legacy, NODEJS_TITLE, PageKind::Nodejs, &config);
    let twice = inject_shell(&once.html, NODEJS_TITLE, PageKind::Nodejs, &config);

    assert_eq!(once.html.matches("assets/css/style.css").count(), 1);
    assert_eq!(twice.html.matches("assets/css/style.css").count(), 2);
    assert_eq!(twice.report.applied, vec![InjectStep::Styles]);
}

#[test]
fn update_of_converted_page_only_adds_styles() {
    let site = fixture_site();
    let page = PageEntry {
        input: "nodejs-tutorial.md".into(),
        output: "nodejs-tutorial.html".into(),
        title: NODEJS_TITLE.into(),
        kind: None,
    };
    let config = SiteConfig {
        pages: vec![page.clone()],
        ..SiteConfig::default()
    };
    convert::convert_pages(site.path(), &config);

    let (_, report) = convert::update_page(site.path(), &page, &config)
        .unwrap()
        .unwrap();
    assert_eq!(report.applied, vec![InjectStep::Styles]);
    assert!(report.missing.is_empty());
}
