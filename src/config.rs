//! Project configuration module.
//!
//! Handles loading and validating the project-level `folio.toml`.
//! The file sits at the project root, next to the source directory:
//!
//! ```text
//! my-site/
//! ├── folio.toml               # Project config (optional)
//! ├── site/                    # Source tree (mirrored into _site/)
//! │   ├── index.md
//! │   └── css/style.css
//! └── templates/               # Tera templates named by front matter
//!     └── root.html
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source = "site"           # Input root, relative to the project root
//! target = "_site"          # Output root, relative to the project root
//! templates = "templates"   # Template directory, relative to the project root
//!
//! [markdown]
//! tables = true
//! footnotes = true
//! strikethrough = true
//! tasklists = true
//! smart_punctuation = false
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Validation
//!
//! Unknown keys and malformed TOML are hard errors ([`ConfigError`]). Semantic
//! problems (an empty directory name, two roots sharing a name, ...) are collected
//! into [`SiteConfig::errors`] so the caller can report all of them at once.
//! A config with an empty error list is valid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the project config file, looked up in the project root.
pub const CONFIG_FILE: &str = "folio.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Project configuration loaded from `folio.toml`.
///
/// All fields have defaults; a config file only needs the values it wants to
/// override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Name of the input root directory.
    pub source: String,
    /// Name of the output root directory.
    pub target: String,
    /// Name of the directory holding Tera templates.
    pub templates: String,
    /// Markdown extensions enabled when rendering page bodies.
    pub markdown: MarkdownConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
    /// Validation messages accumulated while resolving this config.
    #[serde(skip)]
    pub errors: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source: "site".to_string(),
            target: "_site".to_string(),
            templates: "templates".to_string(),
            markdown: MarkdownConfig::default(),
            processing: ProcessingConfig::default(),
            errors: Vec::new(),
        }
    }
}

impl SiteConfig {
    /// True when no validation errors were recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Check the directory settings, returning every problem found.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        check_dir_name("source", &self.source, &mut errors);
        check_dir_name("target", &self.target, &mut errors);
        check_dir_name("templates", &self.templates, &mut errors);
        check_distinct(("source", &self.source), ("target", &self.target), &mut errors);
        check_distinct(
            ("templates", &self.templates),
            ("source", &self.source),
            &mut errors,
        );
        check_distinct(
            ("templates", &self.templates),
            ("target", &self.target),
            &mut errors,
        );
        errors
    }
}

fn check_dir_name(key: &str, value: &str, errors: &mut Vec<String>) {
    if value.is_empty() {
        errors.push(format!("{key} must not be empty"));
    } else if value == "." || value == ".." || value.contains(['/', '\\']) {
        errors.push(format!(
            "{key} must be a single directory name, got {value:?}"
        ));
    }
}

/// Two roots may not share a directory name.
fn check_distinct(a: (&str, &str), b: (&str, &str), errors: &mut Vec<String>) {
    let ((a_key, a_value), (b_key, b_value)) = (a, b);
    if !a_value.is_empty() && a_value == b_value {
        errors.push(format!(
            "{a_key} and {b_key} must differ (both are {a_value:?})"
        ));
    }
}

/// Markdown extensions passed to the converter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownConfig {
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
    /// Curly quotes, en/em dashes and ellipses.
    pub smart_punctuation: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            tasklists: true,
            smart_punctuation: false,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel file workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, never below one
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading
// =============================================================================

/// Parse `folio.toml` content and record validation errors on the result.
///
/// Missing keys take their defaults.
pub fn parse_config(content: &str) -> Result<SiteConfig, ConfigError> {
    let mut config: SiteConfig = toml::from_str(content)?;
    config.errors = config.validate();
    Ok(config)
}

/// Load the project config from `folio.toml` in `root`.
///
/// Falls back to stock defaults when the file is absent.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return parse_config("");
    }
    let content = fs::read_to_string(&config_path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `folio.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# folio configuration
# ===================
# All settings are optional. Values shown below are the defaults.
# Unknown keys cause an error.

# Directory holding the source tree. Markdown files (*.md) are rendered to
# HTML, everything else is copied as-is.
source = "site"

# Directory the mirrored output is written to.
target = "_site"

# Directory holding the Tera templates that front matter refers to, e.g.
#   +++
#   template = "root.html"
#   +++
templates = "templates"

[markdown]
tables = true
footnotes = true
strikethrough = true
tasklists = true
# Curly quotes, dashes and ellipses.
smart_punctuation = false

[processing]
# Maximum parallel workers. Omit for one per CPU core.
# max_processes = 4
"##
}
