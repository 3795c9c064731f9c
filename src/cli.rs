//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// cdcat-summary - summarize CAT simulations for cognitive diagnosis models
///
/// Reads one or more simulation records (JSON), scores classification
/// accuracy against a reference attribute pattern, and reports item
/// exposure and test length statistics. Several records are compared
/// side by side.
///
/// Examples:
///   cdcat-summary run.json
///   cdcat-summary gdina.json dina.json --reference alpha.json --labels GDINA,DINA
///   cdcat-summary runs/ --reference alpha.json --format json -o comparison.json
///   cdcat-summary --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Simulation record files or directories of record files
    ///
    /// A file may hold one record or an array of records.
    #[arg(value_name = "INPUT", required_unless_present = "init_config")]
    pub inputs: Vec<PathBuf>,

    /// Reference (true) attribute patterns, one row per examinee
    ///
    /// Required when more than one record is summarized.
    #[arg(short, long, value_name = "FILE", env = "CDCAT_REFERENCE")]
    pub reference: Option<PathBuf>,

    /// Display labels, one per record (comma-separated)
    ///
    /// Defaults to each record's model identifier.
    #[arg(short, long, value_name = "LABELS", value_delimiter = ',')]
    pub labels: Option<Vec<String>>,

    /// Output file path for the report
    ///
    /// Defaults to the config file setting (cdcat_summary.md).
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .cdcat-summary.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Skip chart construction and report tables only
    #[arg(long)]
    pub no_plots: bool,

    /// Keep the model name for records fitted with zero iterations
    ///
    /// By default such records are labelled "TRUE".
    #[arg(long)]
    pub no_true_label: bool,

    /// Decimal places for rates and statistics
    #[arg(long, value_name = "N")]
    pub decimals: Option<usize>,

    /// Include the per-item exposure rate table in the report
    #[arg(long)]
    pub exposure_rates: bool,

    /// Names to skip when scanning input directories (comma-separated)
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .cdcat-summary.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.inputs.is_empty() {
            return Err("At least one input file or directory is required".to_string());
        }

        for input in &self.inputs {
            if !input.exists() {
                return Err(format!("Input does not exist: {}", input.display()));
            }
        }

        if let Some(ref reference) = self.reference {
            if !reference.is_file() {
                return Err(format!(
                    "Reference pattern file does not exist: {}",
                    reference.display()
                ));
            }
        }

        if let Some(ref labels) = self.labels {
            if labels.iter().any(|l| l.trim().is_empty()) {
                return Err("Labels must not be empty".to_string());
            }
        }

        if let Some(decimals) = self.decimals {
            if decimals > 12 {
                return Err("Decimals must be at most 12".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
