//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.scorecard.toml` files.

use crate::models::{SlideCatalog, DEFAULT_SLIDE_NAMES};
use crate::report::ReportOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".scorecard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dataset settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Slide catalog.
    #[serde(default)]
    pub slides: SlidesConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Report output file. Printed to stdout when unset.
    #[serde(default)]
    pub output: Option<String>,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Dataset settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// JSON file or directory to load. Uses the built-in sample when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Refuse datasets with invalid records instead of warning.
    #[serde(default)]
    pub strict: bool,
}

/// Slide catalog settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlidesConfig {
    /// Slide names in presentation order.
    #[serde(default = "default_slide_names")]
    pub names: Vec<String>,
}

impl Default for SlidesConfig {
    fn default() -> Self {
        Self {
            names: default_slide_names(),
        }
    }
}

fn default_slide_names() -> Vec<String> {
    DEFAULT_SLIDE_NAMES.iter().map(|s| s.to_string()).collect()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Maximum characters of a company name on chart labels.
    #[serde(default = "default_company_name_width")]
    pub company_name_width: usize,

    /// Include per-slide view/replay counts.
    #[serde(default = "default_true")]
    pub include_slide_breakdown: bool,

    /// Include the device distribution.
    #[serde(default = "default_true")]
    pub include_devices: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            company_name_width: default_company_name_width(),
            include_slide_breakdown: true,
            include_devices: true,
        }
    }
}

fn default_company_name_width() -> usize {
    15
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load configuration from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.data.path = Some(data.clone());
        }

        if let Some(ref output) = args.output {
            self.general.output = Some(output.display().to_string());
        }

        if args.strict {
            self.data.strict = true;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// The slide catalog described by this configuration.
    pub fn slide_catalog(&self) -> SlideCatalog {
        SlideCatalog::new(self.slides.names.clone())
    }

    /// Report assembly options described by this configuration.
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            company_name_width: self.report.company_name_width,
            include_slide_breakdown: self.report.include_slide_breakdown,
            include_devices: self.report.include_devices,
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
