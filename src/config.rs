//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table and the user's file is merged on top of it, so a
//! config file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── config.toml              # Site config (optional)
//! ├── index.md
//! └── notes/
//!     └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! page_title = "Notes"
//! locale = "en-US"
//! base_url = ""
//!
//! # Folder names that never get a folder page or an explorer entry.
//! reserved_folders = ["tags"]
//!
//! # Directory or file names skipped while scanning.
//! ignore_patterns = ["private", "templates", ".obsidian"]
//!
//! [footer.links]
//! GitHub = "https://github.com/..."
//!
//! [colors.light]
//! background = "#faf8f8"
//! text = "#2b2b2b"
//! text_muted = "#4e4e4e"
//! border = "#e5e5e5"
//! link = "#284b63"
//! link_hover = "#84a59d"
//!
//! [colors.dark]
//! background = "#161618"
//! text = "#ebebec"
//! text_muted = "#d4d4d4"
//! border = "#393639"
//! link = "#7b97aa"
//! link_hover = "#84a59d"
//!
//! [processing]
//! max_processes = 4         # Max parallel page writers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
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

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site name shown by the page-title component and in `<title>`.
    pub page_title: String,
    /// Locale used for generated strings (folder page titles, item counts).
    pub locale: String,
    /// Public base URL, without scheme. Empty when unknown.
    pub base_url: String,
    /// Folder names excluded from folder pages and navigation.
    pub reserved_folders: Vec<String>,
    /// File or directory names skipped by the scanner.
    pub ignore_patterns: Vec<String>,
    /// Footer settings.
    pub footer: FooterConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Parallel emission settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            page_title: "Notes".to_string(),
            locale: "en-US".to_string(),
            base_url: String::new(),
            reserved_folders: vec!["tags".to_string()],
            ignore_patterns: vec![
                "private".to_string(),
                "templates".to_string(),
                ".obsidian".to_string(),
            ],
            footer: FooterConfig::default(),
            colors: ColorConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "page_title must not be empty".into(),
            ));
        }
        if let Some(bad) = self
            .reserved_folders
            .iter()
            .find(|name| name.is_empty() || name.starts_with('/') || name.ends_with('/'))
        {
            return Err(ConfigError::Validation(format!(
                "reserved_folders entries must be bare folder names, got {bad:?}"
            )));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn is_reserved(&self, folder: &str) -> bool {
        self.reserved_folders.iter().any(|r| r == folder)
    }
}

/// Footer settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FooterConfig {
    /// Link label → URL, rendered in label order.
    pub links: BTreeMap<String, String>,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel page writers.
    /// When absent, defaults to the number of CPU cores.
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
    config.max_processes.map_or(cores, |n| n.min(cores))
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Secondary text: breadcrumbs, metadata, explorer entries.
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#faf8f8".to_string(),
            text: "#2b2b2b".to_string(),
            text_muted: "#4e4e4e".to_string(),
            border: "#e5e5e5".to_string(),
            link: "#284b63".to_string(),
            link_hover: "#84a59d".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#161618".to_string(),
            text: "#ebebec".to_string(),
            text_muted: "#d4d4d4".to_string(),
            border: "#393639".to_string(),
            link: "#7b97aa".to_string(),
            link_hover: "#84a59d".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
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
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# sitefold configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Site name, shown in the sidebar and in every page <title>.
page_title = "Notes"

# Locale for generated strings ("Folder: notes", "3 items under this folder.").
locale = "en-US"

# Public base URL without scheme, e.g. "notes.example.com".
base_url = ""

# Folder names that never get a folder page and are hidden from the explorer.
reserved_folders = ["tags"]

# File or directory names skipped while scanning the content directory.
ignore_patterns = ["private", "templates", ".obsidian"]

# ---------------------------------------------------------------------------
# Footer links (label = URL)
# ---------------------------------------------------------------------------
[footer.links]
# GitHub = "https://github.com/you"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#faf8f8"
text = "#2b2b2b"
text_muted = "#4e4e4e"    # Breadcrumbs, metadata, explorer
border = "#e5e5e5"
link = "#284b63"
link_hover = "#84a59d"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#161618"
text = "#ebebec"
text_muted = "#d4d4d4"
border = "#393639"
link = "#7b97aa"
link_hover = "#84a59d"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel page writers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    let vars = |scheme: &ColorScheme, indent: &str| {
        [
            ("--color-bg", &scheme.background),
            ("--color-text", &scheme.text),
            ("--color-text-muted", &scheme.text_muted),
            ("--color-border", &scheme.border),
            ("--color-link", &scheme.link),
            ("--color-link-hover", &scheme.link_hover),
        ]
        .iter()
        .map(|(name, value)| format!("{indent}{name}: {value};"))
        .collect::<Vec<_>>()
        .join("\n")
    };

    format!(
        ":root {{\n{}\n}}\n\n@media (prefers-color-scheme: dark) {{\n    :root {{\n{}\n    }}\n}}",
        vars(&colors.light, "    "),
        vars(&colors.dark, "        "),
    )
}
