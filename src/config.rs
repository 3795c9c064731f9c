//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.cdcat-summary.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE: &str = ".cdcat-summary.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Aggregation settings.
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Input discovery settings.
    #[serde(default)]
    pub inputs: InputConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "cdcat_summary.md".to_string()
}

/// Aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Build chart descriptions alongside the tables.
    #[serde(default = "default_true")]
    pub produce_plots: bool,

    /// Label records fitted with zero iterations as "TRUE".
    #[serde(default = "default_true")]
    pub treat_zero_iteration_as_reference: bool,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            produce_plots: true,
            treat_zero_iteration_as_reference: true,
        }
    }
}

/// Settings for discovering record files inside directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// File extensions treated as records.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// File or directory names to skip.
    #[serde(default)]
    pub excludes: Vec<String>,

    /// Maximum record file size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Maximum number of record files per directory.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            excludes: Vec::new(),
            max_file_size: default_max_file_size(),
            max_files: default_max_files(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["json".to_string()]
}

fn default_max_file_size() -> u64 {
    256 * 1024 * 1024 // 256MB
}

fn default_max_files() -> usize {
    100
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Decimal places for rates and statistics.
    #[serde(default = "default_decimals")]
    pub decimals: usize,

    /// Include the per-item exposure rate table.
    #[serde(default)]
    pub include_exposure_rates: bool,

    /// Include the list of figures.
    #[serde(default = "default_true")]
    pub include_figures: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            decimals: default_decimals(),
            include_exposure_rates: false,
            include_figures: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_decimals() -> usize {
    3
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
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// Only explicit CLI values override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if args.no_plots {
            self.summary.produce_plots = false;
        }
        if args.no_true_label {
            self.summary.treat_zero_iteration_as_reference = false;
        }

        if let Some(decimals) = args.decimals {
            self.report.decimals = decimals;
        }
        if args.exposure_rates {
            self.report.include_exposure_rates = true;
        }

        if let Some(ref excludes) = args.exclude {
            self.inputs.excludes = excludes.clone();
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
