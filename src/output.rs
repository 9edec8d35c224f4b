//! CLI output formatting for the batch commands.
//!
//! Every page is shown by its configured position and title, with the files
//! involved as indented context lines:
//!
//! ## Convert
//!
//! ```text
//! 001 Node.js 初心者向けチュートリアル → nodejs-tutorial.html
//!     Source: nodejs-tutorial.md
//!     Headings: 14
//! 002 Express.js 初心者向けチュートリアル (skipped)
//!     Missing: express-tutorial.md
//!
//! Converted 1 page, 1 skipped, 0 failed
//! ```
//!
//! ## Update
//!
//! ```text
//! 001 Node.js 初心者向けチュートリアル → nodejs-tutorial.html
//!     Applied: font-awesome, styles, header, main, footer, metadata
//!     Missing anchors: main
//! ```
//!
//! Each command has a `format_*` function returning `Vec<String>` and a
//! `print_*` wrapper that writes to stdout. Format functions do no I/O.

use crate::convert::{PageCheck, PageReport, PageStatus};
use crate::inject::InjectStep;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn join_steps(steps: &[InjectStep]) -> String {
    steps
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Lines shared by every status: the header plus skip/failure context.
///
/// Returns `None` for the success statuses, which each command formats
/// itself.
fn common_lines(index: usize, report: &PageReport) -> Option<Vec<String>> {
    let header = format!("{} {}", format_index(index), report.page.title);
    match &report.status {
        PageStatus::Skipped { .. } => Some(vec![
            format!("{header} (skipped)"),
            format!("{}Missing: {}", indent(1), missing_name(report)),
        ]),
        PageStatus::Failed(error) => Some(vec![
            format!("{header} (failed)"),
            format!("{}Error: {error}", indent(1)),
        ]),
        PageStatus::Converted { .. } | PageStatus::Updated { .. } => None,
    }
}

/// The configured (root-relative) path the page was missing.
fn missing_name(report: &PageReport) -> &str {
    match &report.status {
        PageStatus::Skipped { missing } if missing.ends_with(&report.page.input) => {
            &report.page.input
        }
        _ => &report.page.output,
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Tally {
    done: usize,
    skipped: usize,
    failed: usize,
}

fn tally(reports: &[PageReport]) -> Tally {
    reports.iter().fold(Tally::default(), |mut t, r| {
        match r.status {
            PageStatus::Converted { .. } | PageStatus::Updated { .. } => t.done += 1,
            PageStatus::Skipped { .. } => t.skipped += 1,
            PageStatus::Failed(_) => t.failed += 1,
        }
        t
    })
}

// ============================================================================
// Convert
// ============================================================================

pub fn format_convert_output(reports: &[PageReport]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, report) in reports.iter().enumerate() {
        if let Some(common) = common_lines(i + 1, report) {
            lines.extend(common);
            continue;
        }
        if let PageStatus::Converted { headings, .. } = &report.status {
            lines.push(format!(
                "{} {} → {}",
                format_index(i + 1),
                report.page.title,
                report.page.output
            ));
            lines.push(format!("{}Source: {}", indent(1), report.page.input));
            lines.push(format!("{}Headings: {}", indent(1), headings.len()));
        }
    }
    let t = tally(reports);
    lines.push(String::new());
    lines.push(format!(
        "Converted {}, {} skipped, {} failed",
        plural(t.done, "page"),
        t.skipped,
        t.failed
    ));
    lines
}

pub fn print_convert_output(reports: &[PageReport]) {
    for line in format_convert_output(reports) {
        println!("{}", line);
    }
}

// ============================================================================
// Update
// ============================================================================

pub fn format_update_output(reports: &[PageReport]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, report) in reports.iter().enumerate() {
        if let Some(common) = common_lines(i + 1, report) {
            lines.extend(common);
            continue;
        }
        if let PageStatus::Updated { report: inject, .. } = &report.status {
            lines.push(format!(
                "{} {} → {}",
                format_index(i + 1),
                report.page.title,
                report.page.output
            ));
            if inject.applied.is_empty() {
                lines.push(format!("{}Unchanged", indent(1)));
            } else {
                lines.push(format!("{}Applied: {}", indent(1), join_steps(&inject.applied)));
            }
            if !inject.skipped.is_empty() {
                lines.push(format!(
                    "{}Already present: {}",
                    indent(1),
                    join_steps(&inject.skipped)
                ));
            }
            if !inject.missing.is_empty() {
                lines.push(format!(
                    "{}Missing anchors: {}",
                    indent(1),
                    join_steps(&inject.missing)
                ));
            }
        }
    }
    let t = tally(reports);
    lines.push(String::new());
    lines.push(format!(
        "Updated {}, {} skipped, {} failed",
        plural(t.done, "page"),
        t.skipped,
        t.failed
    ));
    lines
}

pub fn print_update_output(reports: &[PageReport]) {
    for line in format_update_output(reports) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(checks: &[PageCheck]) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    for (i, check) in checks.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            check.page.title,
            check.page.kind()
        ));
        let input_state = if check.input_exists { "" } else { " (missing)" };
        let output_state = if check.output_exists { "" } else { " (not yet built)" };
        lines.push(format!("{}Source: {}{input_state}", indent(1), check.page.input));
        lines.push(format!("{}Output: {}{output_state}", indent(1), check.page.output));
    }
    lines
}

pub fn print_check_output(checks: &[PageCheck]) {
    for line in format_check_output(checks) {
        println!("{}", line);
    }
}
