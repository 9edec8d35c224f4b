//! Project configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults
//! reproduce the site's two tutorial pages, so a project without a config
//! file converts `nodejs-tutorial.md` and `express-tutorial.md` exactly as
//! before.
//!
//! ## Config File Location
//!
//! ```text
//! project/
//! ├── config.toml              # Optional; overrides stock defaults
//! ├── nodejs-tutorial.md
//! ├── express-tutorial.md
//! └── assets/
//!     ├── css/style.css
//!     └── js/main.js
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [[pages]]
//! input = "nodejs-tutorial.md"
//! output = "nodejs-tutorial.html"
//! title = "Node.js 初心者向けチュートリアル"
//!
//! [[pages]]
//! input = "express-tutorial.md"
//! output = "express-tutorial.html"
//! title = "Express.js 初心者向けチュートリアル"
//!
//! [render]
//! default_language = "javascript"  # Fence language when the info string is empty
//! soft_breaks = true               # Single newlines render as <br>
//! smart_punctuation = true         # Curly quotes, dashes, ellipses
//! unique_heading_ids = false       # Suffix duplicate heading ids with -1, -2, ...
//!
//! [inject]
//! guard_styles = true              # Skip the style block if it is already present
//!
//! [processing]
//! max_processes = 4                # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want. A `pages`
//! array replaces the stock page list wholesale; tables merge key-by-key.
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::{PageEntry, PageKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Pages converted (or updated) by one run, in order.
    pub pages: Vec<PageEntry>,
    /// Markdown rendering options.
    pub render: RenderConfig,
    /// Shell injection options.
    pub inject: InjectConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            pages: default_pages(),
            render: RenderConfig::default(),
            inject: InjectConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

fn default_pages() -> Vec<PageEntry> {
    vec![
        PageEntry {
            input: "nodejs-tutorial.md".to_string(),
            output: "nodejs-tutorial.html".to_string(),
            title: PageKind::Nodejs.breadcrumb_label().to_string(),
            kind: None,
        },
        PageEntry {
            input: "express-tutorial.md".to_string(),
            output: "express-tutorial.html".to_string(),
            title: PageKind::Express.breadcrumb_label().to_string(),
            kind: None,
        },
    ]
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.default_language.trim().is_empty() {
            return Err(ConfigError::Validation(
                "render.default_language must not be empty".into(),
            ));
        }
        if self
            .render
            .default_language
            .chars()
            .any(char::is_whitespace)
        {
            return Err(ConfigError::Validation(
                "render.default_language must be a single token".into(),
            ));
        }
        for (i, page) in self.pages.iter().enumerate() {
            if page.input.trim().is_empty() || page.output.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "pages[{i}]: input and output must not be empty"
                )));
            }
            if page.input == page.output {
                return Err(ConfigError::Validation(format!(
                    "pages[{i}]: output would overwrite input {}",
                    page.input
                )));
            }
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Markdown rendering options, fixed for the whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Language class for code fences without an info string.
    pub default_language: String,
    /// Render soft line breaks as `<br>`.
    pub soft_breaks: bool,
    /// Typographic quotes and dashes.
    pub smart_punctuation: bool,
    /// Disambiguate repeated heading ids with numeric suffixes.
    pub unique_heading_ids: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_language: "javascript".to_string(),
            soft_breaks: true,
            smart_punctuation: true,
            unique_heading_ids: false,
        }
    }
}

/// Shell injection options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InjectConfig {
    /// Skip the extra style block when a previous run already inserted it.
    /// When false, every run inserts another copy.
    pub guard_styles: bool,
}

impl Default for InjectConfig {
    fn default() -> Self {
        Self { guard_styles: true }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of pages processed in parallel.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay (including arrays) replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(load_raw_config(root)?)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Tutorial Site Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Pages
# ---------------------------------------------------------------------------
# Each entry converts one markdown file into one HTML page. Paths are
# relative to the project root. Declaring any [[pages]] replaces this list.
# `kind` ("nodejs" or "express") picks the breadcrumb, description and
# navigation buttons; when omitted, inputs containing "nodejs-tutorial"
# are "nodejs" and everything else is "express".

[[pages]]
input = "nodejs-tutorial.md"
output = "nodejs-tutorial.html"
title = "Node.js 初心者向けチュートリアル"

[[pages]]
input = "express-tutorial.md"
output = "express-tutorial.html"
title = "Express.js 初心者向けチュートリアル"

# ---------------------------------------------------------------------------
# Markdown rendering
# ---------------------------------------------------------------------------
[render]
# Language class used for code fences without an info string.
default_language = "javascript"

# Render single newlines inside a paragraph as <br>.
soft_breaks = true

# Convert straight quotes, "--" and "..." to typographic forms.
smart_punctuation = true

# Give repeated headings distinct ids (faq, faq-1, faq-2).
# Off by default: identical headings share an id.
unique_heading_ids = false

# ---------------------------------------------------------------------------
# Shell injection (`update` command)
# ---------------------------------------------------------------------------
[inject]
# Skip the extra <style> block when a previous run already inserted it.
# Set to false to insert it on every run.
guard_styles = true

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum pages processed in parallel.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_lists_both_tutorials() {
        let config = SiteConfig::default();
        assert_eq!(config.pages.len(), 2);
        assert_eq!(config.pages[0].input, "nodejs-tutorial.md");
        assert_eq!(config.pages[0].kind(), PageKind::Nodejs);
        assert_eq!(config.pages[1].output, "express-tutorial.html");
        assert_eq!(config.pages[1].kind(), PageKind::Express);
    }

    #[test]
    fn default_render_config() {
        let config = RenderConfig::default();
        assert_eq!(config.default_language, "javascript");
        assert!(config.soft_breaks);
        assert!(config.smart_punctuation);
        assert!(!config.unique_heading_ids);
    }

    #[test]
    fn default_guards_styles() {
        assert!(InjectConfig::default().guard_styles);
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.pages, SiteConfig::default().pages);
    }

    #[test]
    fn partial_render_override_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[render]\ndefault_language = \"bash\"\n",
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.render.default_language, "bash");
        assert!(config.render.soft_breaks);
        assert_eq!(config.pages.len(), 2);
    }

    #[test]
    fn pages_array_replaces_stock_list() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[[pages]]
input = "guide.md"
output = "guide.html"
title = "Guide"
kind = "nodejs"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.pages.len(), 1);
        assert_eq!(config.pages[0].title, "Guide");
        assert_eq!(config.pages[0].kind(), PageKind::Nodejs);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[render\nbroken").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[render]\nbreaks = true\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[theme]\ncolor = \"red\"\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn unknown_page_kind_rejected() {
        let overlay: toml::Value = toml::from_str(
            r#"
[[pages]]
input = "a.md"
output = "a.html"
title = "A"
kind = "deno"
"#,
        )
        .unwrap();
        assert!(resolve_config(Some(overlay)).is_err());
    }

    #[test]
    fn validation_rejects_multi_token_language() {
        let mut config = SiteConfig::default();
        config.render.default_language = "java script".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validation_rejects_output_overwriting_input() {
        let mut config = SiteConfig::default();
        config.pages[0].output = config.pages[0].input.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_zero_workers() {
        let mut config = SiteConfig::default();
        config.processing.max_processes = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str("[t]\nx = 1\ny = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[t]\ny = 5").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["t"]["x"].as_integer(), Some(1));
        assert_eq!(merged["t"]["y"].as_integer(), Some(5));
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let value: toml::Value = toml::from_str(stock_config_toml()).unwrap();
        let config = resolve_config(Some(value)).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.pages, defaults.pages);
        assert_eq!(
            config.render.default_language,
            defaults.render.default_language
        );
        assert_eq!(config.inject.guard_styles, defaults.inject.guard_styles);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_auto() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }
}
