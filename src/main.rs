//! cdcat-summary - CAT simulation summaries for cognitive diagnosis models
//!
//! A CLI tool that reads simulation records, scores classification
//! recovery against a reference attribute pattern, and reports item
//! exposure and test length statistics for one model or a comparison
//! of several.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Error (invalid arguments, unreadable input, failed validation)

mod analysis;
mod charts;
mod cli;
mod config;
mod error;
mod models;
mod report;
mod scanner;
mod summarizer;

use analysis::{summarize, SummaryInput, SummaryOptions};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use report::{Report, ReportMetadata, ReportOptions};
use scanner::{InputScanner, ScanConfig};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args)?;

    info!("cdcat-summary v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_summary(args) {
        error!("Summary failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .cdcat-summary.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// `RUST_LOG` takes precedence over the CLI verbosity flags.
fn init_logging(args: &Args) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(args.log_level()).into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Run the complete summary workflow.
fn run_summary(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Step 1: Load the reference pattern and the records
    let reference = match args.reference {
        Some(ref path) => {
            info!("Loading reference pattern from: {}", path.display());
            Some(scanner::load_reference(path)?)
        }
        None => None,
    };

    let input_scanner = InputScanner::new(ScanConfig::from(&config.inputs));
    let loaded = input_scanner.load(&args.inputs, args.reference.as_deref())?;

    let input_names: Vec<String> = loaded.iter().map(|f| f.path.display().to_string()).collect();
    let records: Vec<_> = loaded.into_iter().flat_map(|f| f.records).collect();
    if records.is_empty() {
        bail!("No simulation records found in the given inputs");
    }

    println!("📥 Loaded {} record(s) from {} file(s)", records.len(), input_names.len());

    // Step 2: Summarize
    let input = SummaryInput::from_records(records);
    let options = SummaryOptions::from(&config.summary);
    let summarized = summarize(&input, reference.as_ref(), args.labels.as_deref(), &options)?;

    for diagnostic in &summarized.diagnostics {
        eprintln!("⚠️  {}", diagnostic);
    }

    // Step 3: Build and write the report
    let report = Report {
        metadata: ReportMetadata {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            inputs: input_names,
            record_count: input.len(),
            mode: summarized.result.mode(),
        },
        result: summarized.result,
        diagnostics: summarized.diagnostics,
    };

    let output_path = output_path(&args, &config);
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => {
            report::generate_markdown_report(&report, &ReportOptions::from(&config.report))
        }
    };

    std::fs::write(&output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    println!("\n📊 Summary:");
    println!("   Records: {}", report.result.labels().join(", "));
    println!("   Mode: {}", report.metadata.mode);
    println!("   Figures: {}", report.result.figures().len());
    if !report.diagnostics.is_empty() {
        println!("   Warnings: {}", report.diagnostics.len());
    }
    println!("\n✅ Report saved to: {}", output_path.display());

    Ok(())
}

/// Resolve the report path; JSON output swaps the default extension.
fn output_path(args: &Args, config: &Config) -> PathBuf {
    let path = PathBuf::from(&config.general.output);
    if args.output.is_none() && args.format == OutputFormat::Json {
        path.with_extension("json")
    } else {
        path
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
