//! Batch drivers over the configured pages.
//!
//! Two passes share the same shape: every [`PageEntry`] is processed
//! independently and yields a [`PageReport`]. Nothing is shared between
//! pages, so the batch runs on the rayon pool; results come back in
//! configuration order.
//!
//! - [`convert_pages`]: markdown input → rendered fragment → composed page →
//!   output file.
//! - [`update_pages`]: existing output file → shell injection → same file.
//!
//! ## Failure isolation
//!
//! A missing source file is [`PageStatus::Skipped`] with a warning. Any other
//! error becomes [`PageStatus::Failed`] for that page only; pages written
//! before or after it are unaffected. There is no rollback across the batch.

use crate::config::SiteConfig;
use crate::inject::{InjectReport, inject_shell};
use crate::render::{HeadingEntry, render_markdown};
use crate::template::compose_page;
use crate::types::PageEntry;
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConvertError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> ConvertError + '_ {
        move |source| ConvertError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Outcome for one page.
#[derive(Debug)]
pub enum PageStatus {
    Converted {
        output: PathBuf,
        headings: Vec<HeadingEntry>,
    },
    Updated {
        output: PathBuf,
        report: InjectReport,
    },
    /// The file this pass reads does not exist.
    Skipped { missing: PathBuf },
    Failed(ConvertError),
}

#[derive(Debug)]
pub struct PageReport {
    pub page: PageEntry,
    pub status: PageStatus,
}

impl PageReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, PageStatus::Failed(_))
    }
}

/// Whether any report in the batch failed.
pub fn any_failed(reports: &[PageReport]) -> bool {
    reports.iter().any(PageReport::is_failure)
}

// ============================================================================
// Convert
// ============================================================================

/// Render one markdown page and write the composed HTML.
///
/// Returns `Ok(None)` when the input does not exist.
pub fn convert_page(
    root: &Path,
    page: &PageEntry,
    config: &SiteConfig,
) -> Result<Option<(PathBuf, Vec<HeadingEntry>)>, ConvertError> {
    let input = root.join(&page.input);
    if !input.exists() {
        return Ok(None);
    }
    let output = root.join(&page.output);
    info!(input = %input.display(), output = %output.display(), "converting");

    let markdown = fs::read_to_string(&input).map_err(ConvertError::io(&input))?;
    let rendered = render_markdown(&markdown, &config.render);
    let document = compose_page(&page.title, &rendered.html, page.kind()).into_string();

    write_output(&output, &document)?;
    Ok(Some((output, rendered.headings)))
}

/// Convert every configured page.
pub fn convert_pages(root: &Path, config: &SiteConfig) -> Vec<PageReport> {
    run_batch(config, |page| match convert_page(root, page, config) {
        Ok(Some((output, headings))) => PageStatus::Converted { output, headings },
        Ok(None) => skipped(root.join(&page.input)),
        Err(e) => failed(page, e),
    })
}

// ============================================================================
// Update
// ============================================================================

/// Inject the site shell into a page's existing output file, in place.
///
/// Returns `Ok(None)` when the output file does not exist.
pub fn update_page(
    root: &Path,
    page: &PageEntry,
    config: &SiteConfig,
) -> Result<Option<(PathBuf, InjectReport)>, ConvertError> {
    let target = root.join(&page.output);
    if !target.exists() {
        return Ok(None);
    }
    info!(file = %target.display(), "updating");

    let html = fs::read_to_string(&target).map_err(ConvertError::io(&target))?;
    let injected = inject_shell(&html, &page.title, page.kind(), &config.inject);
    if !injected.report.missing.is_empty() {
        warn!(
            file = %target.display(),
            missing = injected.report.missing.len(),
            "some shell anchors were not found"
        );
    }
    if injected.report.changed() {
        write_output(&target, &injected.html)?;
    }
    Ok(Some((target, injected.report)))
}

/// Update every configured page.
pub fn update_pages(root: &Path, config: &SiteConfig) -> Vec<PageReport> {
    run_batch(config, |page| match update_page(root, page, config) {
        Ok(Some((output, report))) => PageStatus::Updated { output, report },
        Ok(None) => skipped(root.join(&page.output)),
        Err(e) => failed(page, e),
    })
}

// ============================================================================
// Check
// ============================================================================

/// Which of a page's files are present on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCheck {
    pub page: PageEntry,
    pub input_exists: bool,
    pub output_exists: bool,
}

pub fn check_pages(root: &Path, config: &SiteConfig) -> Vec<PageCheck> {
    config
        .pages
        .iter()
        .map(|page| PageCheck {
            page: page.clone(),
            input_exists: root.join(&page.input).is_file(),
            output_exists: root.join(&page.output).is_file(),
        })
        .collect()
}

// ============================================================================
// Helpers
// ============================================================================

fn run_batch<F>(config: &SiteConfig, process: F) -> Vec<PageReport>
where
    F: Fn(&PageEntry) -> PageStatus + Sync,
{
    config
        .pages
        .par_iter()
        .map(|page| PageReport {
            page: page.clone(),
            status: process(page),
        })
        .collect()
}

fn skipped(missing: PathBuf) -> PageStatus {
    warn!(file = %missing.display(), "not found, skipping");
    PageStatus::Skipped { missing }
}

fn failed(page: &PageEntry, error: ConvertError) -> PageStatus {
    warn!(page = %page.title, error = %error, "page failed");
    PageStatus::Failed(error)
}

fn write_output(path: &Path, contents: &str) -> Result<(), ConvertError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(ConvertError::io(parent))?;
    }
    fs::write(path, contents).map_err(ConvertError::io(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::setup_fixtures;
    use crate::types::PageKind;
    use tempfile::TempDir;

    fn page(input: &str, output: &str) -> PageEntry {
        PageEntry {
            input: input.into(),
            output: output.into(),
            title: "Test Page".into(),
            kind: None,
        }
    }

    fn config_with(pages: Vec<PageEntry>) -> SiteConfig {
        SiteConfig {
            pages,
            ..SiteConfig::default()
        }
    }

    #[test]
    fn convert_writes_composed_page() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("nodejs-tutorial.md"), "# Hello\n\nWorld").unwrap();
        let entry = page("nodejs-tutorial.md", "out/nodejs-tutorial.html");

        let (output, headings) = convert_page(tmp.path(), &entry, &config_with(vec![]))
            .unwrap()
            .unwrap();

        assert_eq!(output, tmp.path().join("out/nodejs-tutorial.html"));
        assert_eq!(headings.len(), 1);
        let html = fs::read_to_string(output).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<h1 id="hello">Hello</h1>"#));
        assert!(html.contains("<title>Test Page</title>"));
        assert!(html.contains(PageKind::Nodejs.breadcrumb_label()));
    }

    #[test]
    fn missing_input_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let config = config_with(vec![page("absent.md", "absent.html")]);
        let reports = convert_pages(tmp.path(), &config);
        assert!(matches!(
            &reports[0].status,
            PageStatus::Skipped { missing } if missing.ends_with("absent.md")
        ));
        assert!(!any_failed(&reports));
        assert!(!tmp.path().join("absent.html").exists());
    }

    #[test]
    fn failure_is_isolated_to_its_page() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), "# A").unwrap();
        fs::write(tmp.path().join("b.md"), "# B").unwrap();
        // A directory where the output file should go makes the write fail.
        fs::create_dir(tmp.path().join("a.html")).unwrap();

        let config = config_with(vec![page("a.md", "a.html"), page("b.md", "b.html")]);
        let reports = convert_pages(tmp.path(), &config);

        assert!(matches!(reports[0].status, PageStatus::Failed(ConvertError::Io { .. })));
        assert!(matches!(reports[1].status, PageStatus::Converted { .. }));
        assert!(tmp.path().join("b.html").is_file());
        assert!(any_failed(&reports));
    }

    #[test]
    fn non_utf8_input_fails() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("bad.md"), [0xff, 0xfe, 0x00]).unwrap();
        let reports = convert_pages(tmp.path(), &config_with(vec![page("bad.md", "bad.html")]));
        assert!(reports[0].is_failure());
    }

    #[test]
    fn reports_keep_configuration_order() {
        let tmp = TempDir::new().unwrap();
        let pages: Vec<_> = (0..8)
            .map(|i| {
                fs::write(tmp.path().join(format!("p{i}.md")), format!("# P{i}")).unwrap();
                page(&format!("p{i}.md"), &format!("p{i}.html"))
            })
            .collect();
        let reports = convert_pages(tmp.path(), &config_with(pages.clone()));
        let order: Vec<_> = reports.iter().map(|r| r.page.input.clone()).collect();
        let expected: Vec<_> = pages.iter().map(|p| p.input.clone()).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn fixture_pages_convert() {
        let tmp = setup_fixtures();
        let reports = convert_pages(tmp.path(), &SiteConfig::default());
        assert_eq!(reports.len(), 2);
        for report in &reports {
            assert!(
                matches!(report.status, PageStatus::Converted { .. }),
                "{:?}",
                report.status
            );
        }
        let express = fs::read_to_string(tmp.path().join("express-tutorial.html")).unwrap();
        assert!(express.contains(PageKind::Express.description()));
    }

    #[test]
    fn update_injects_shell_in_place() {
        let tmp = setup_fixtures();
        fs::copy(
            tmp.path().join("legacy/nodejs-tutorial.html"),
            tmp.path().join("nodejs-tutorial.html"),
        )
        .unwrap();

        let entry = page("nodejs-tutorial.md", "nodejs-tutorial.html");
        let (target, report) = update_page(tmp.path(), &entry, &config_with(vec![]))
            .unwrap()
            .unwrap();

        assert!(report.missing.is_empty());
        let html = fs::read_to_string(target).unwrap();
        assert!(html.contains(r#"<header class="header">"#));
        assert!(html.contains("<main>"));
    }

    #[test]
    fn update_leaves_unchanged_file_alone() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("plain.html");
        fs::write(&path, "<p>no anchors</p>").unwrap();
        let modified = fs::metadata(&path).unwrap().modified().unwrap();

        let entry = page("plain.md", "plain.html");
        let (_, report) = update_page(tmp.path(), &entry, &config_with(vec![]))
            .unwrap()
            .unwrap();

        assert!(!report.changed());
        assert_eq!(report.missing.len(), 6);
        assert_eq!(fs::read_to_string(&path).unwrap(), "<p>no anchors</p>");
        assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), modified);
    }

    #[test]
    fn update_missing_output_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let reports = update_pages(tmp.path(), &config_with(vec![page("x.md", "x.html")]));
        assert!(matches!(reports[0].status, PageStatus::Skipped { .. }));
    }

    #[test]
    fn check_reports_presence() {
        let tmp = setup_fixtures();
        let checks = check_pages(tmp.path(), &SiteConfig::default());
        assert!(checks.iter().all(|c| c.input_exists));
        assert!(checks.iter().all(|c| !c.output_exists));
    }
}
