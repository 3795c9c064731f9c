//! Markdown and JSON report generation.
//!
//! This module renders a summary result, its diagnostics and some metadata
//! about the run into a human-readable Markdown report or a JSON document.

use crate::analysis::stats::DescriptiveStats;
use crate::charts::Figure;
use crate::models::{
    AlphaRecovery, ComparisonSummary, Diagnostic, ExposureRateRow, LabeledStats, RecordSummary,
    RecoveryTable, SourceSpecifications, SummaryBody, SummaryResult, TestMode,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Metadata about one summary run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Version of this tool.
    pub tool_version: String,
    /// Record files that were read.
    pub inputs: Vec<String>,
    /// Number of summarized records.
    pub record_count: usize,
    /// Test administration mode.
    pub mode: TestMode,
}

/// The complete report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub result: SummaryResult,
    pub diagnostics: Vec<Diagnostic>,
}

/// Rendering options.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub decimals: usize,
    pub include_exposure_rates: bool,
    pub include_figures: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::from(&crate::config::ReportConfig::default())
    }
}

impl From<&crate::config::ReportConfig> for ReportOptions {
    fn from(config: &crate::config::ReportConfig) -> Self {
        Self {
            decimals: config.decimals,
            include_exposure_rates: config.include_exposure_rates,
            include_figures: config.include_figures,
        }
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, options: &ReportOptions) -> String {
    let mut output = String::new();

    output.push_str("# CAT Simulation Summary\n\n");

    output.push_str(&generate_metadata_section(
        &report.metadata,
        &report.result.specifications,
        &report.result.labels(),
    ));

    if !report.diagnostics.is_empty() {
        output.push_str(&generate_diagnostics_section(&report.diagnostics));
    }

    match &report.result.body {
        SummaryBody::Record { label, summary } => {
            output.push_str(&generate_record_sections(label, summary, options));
        }
        SummaryBody::Comparison(comparison) => {
            output.push_str(&generate_comparison_sections(comparison, options));
        }
    }

    if options.include_figures {
        output.push_str(&generate_figures_section(report.result.figures()));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

fn num(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

/// Generate the metadata section.
fn generate_metadata_section(
    metadata: &ReportMetadata,
    specifications: &SourceSpecifications,
    labels: &[&str],
) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Tool Version:** {}\n", metadata.tool_version));
    if !metadata.inputs.is_empty() {
        section.push_str(&format!("- **Inputs:** {}\n", metadata.inputs.join(", ")));
    }
    section.push_str(&format!("- **Records:** {}\n", metadata.record_count));
    section.push_str(&format!("- **Labels:** {}\n", labels.join(", ")));
    section.push_str(&format!("- **Mode:** {}\n", metadata.mode));

    match specifications {
        SourceSpecifications::Record(specs) => {
            section.push_str(&format!("- **Model:** `{}`\n", specs.model));
            section.push_str(&format!("- **Maximum Items:** {}\n", specs.max_items));
        }
        SourceSpecifications::MultipleInputs => {
            section.push_str("- **Specifications:** multiple inputs (comparison)\n");
        }
    }
    section.push('\n');

    section
}

/// Generate the diagnostics section.
fn generate_diagnostics_section(diagnostics: &[Diagnostic]) -> String {
    let mut section = String::new();

    section.push_str("## Warnings\n\n");
    for diagnostic in diagnostics {
        section.push_str(&format!("> ⚠️ {}\n", diagnostic));
    }
    section.push('\n');

    section
}

/// Sections for a single summarized record.
fn generate_record_sections(label: &str, summary: &RecordSummary, options: &ReportOptions) -> String {
    let d = options.decimals;
    let mut section = String::new();

    section.push_str("## Classification Recovery\n\n");
    match &summary.alpha_recovery {
        None => section.push_str("*No reference pattern supplied; recovery was not computed.*\n\n"),
        Some(AlphaRecovery::ByPosition { positions }) => {
            section.push_str("| Position | PCV | PCA |\n");
            section.push_str("|:---:|:---:|:---:|\n");
            for p in positions {
                section.push_str(&format!(
                    "| {} | {} | {} |\n",
                    p.position,
                    num(p.pcv, d),
                    num(p.pca, d)
                ));
            }
            section.push('\n');
        }
        Some(AlphaRecovery::Final(recovery)) => {
            section.push_str(&format!("- **PCV:** {}\n", num(recovery.pcv, d)));
            section.push_str(&format!("- **PCA (mean):** {}\n\n", num(recovery.pca, d)));
            section.push_str(&attribute_header(recovery.pca_by_attribute.len(), "Label"));
            section.push_str(&attribute_row(label, &recovery.pca_by_attribute, recovery.pca, d));
            section.push('\n');
        }
    }

    section.push_str("## Item Exposure\n\n");
    section.push_str(&stats_table(
        "Label",
        &[LabeledStats {
            label: label.to_string(),
            stats: summary.item_exposure.stats,
        }],
        d,
    ));

    if options.include_exposure_rates {
        let rows: Vec<ExposureRateRow> = summary
            .item_exposure
            .rates
            .iter()
            .enumerate()
            .map(|(i, &rate)| ExposureRateRow {
                item: i + 1,
                rate,
                label: label.to_string(),
            })
            .collect();
        section.push_str(&exposure_rates_table(&rows, d));
    }

    if let Some(stats) = summary.length_stats {
        section.push_str("## Test Length\n\n");
        section.push_str(&stats_table(
            "Label",
            &[LabeledStats {
                label: label.to_string(),
                stats,
            }],
            d,
        ));

        if let Some(lengths) = &summary.lengths {
            section.push_str("| Length | Examinees |\n");
            section.push_str("|:---:|:---:|\n");
            for (length, freq) in &lengths.0 {
                section.push_str(&format!("| {} | {} |\n", length, freq));
            }
            section.push('\n');
        }
    }

    section
}

/// Sections for a comparison of several records.
fn generate_comparison_sections(comparison: &ComparisonSummary, options: &ReportOptions) -> String {
    let d = options.decimals;
    let mut section = String::new();

    section.push_str("## Classification Recovery\n\n");
    match &comparison.recovery {
        RecoveryTable::ByPosition { rows } => {
            section.push_str("| Position | PCV | PCA | Label |\n");
            section.push_str("|:---:|:---:|:---:|:---|\n");
            for row in rows {
                section.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    row.position,
                    num(row.pcv, d),
                    num(row.pca, d),
                    row.label
                ));
            }
            section.push('\n');
        }
        RecoveryTable::Final {
            pattern,
            attributes,
        } => {
            section.push_str("### Pattern Level\n\n");
            section.push_str("| Label | PCV |\n");
            section.push_str("|:---|:---:|\n");
            for row in pattern {
                section.push_str(&format!("| {} | {} |\n", row.label, num(row.pcv, d)));
            }
            section.push('\n');

            section.push_str("### Attribute Level\n\n");
            let width = attributes
                .iter()
                .map(|row| row.by_attribute.len())
                .max()
                .unwrap_or(0);
            section.push_str(&attribute_header(width, "Label"));
            for row in attributes {
                section.push_str(&attribute_row(&row.label, &row.by_attribute, row.mean, d));
            }
            section.push('\n');
        }
    }

    section.push_str("## Item Exposure\n\n");
    section.push_str(&stats_table("Label", &comparison.exposure_stats, d));

    if options.include_exposure_rates {
        section.push_str(&exposure_rates_table(&comparison.exposure_rates, d));
    }

    if let Some(length_stats) = &comparison.length_stats {
        section.push_str("## Test Length\n\n");
        section.push_str(&stats_table("Label", length_stats, d));
    }

    section
}

fn attribute_header(attributes: usize, first: &str) -> String {
    let mut header = format!("| {} |", first);
    let mut rule = String::from("|:---|");
    for k in 1..=attributes {
        header.push_str(&format!(" A{} |", k));
        rule.push_str(":---:|");
    }
    header.push_str(" Mean |\n");
    rule.push_str(":---:|\n");
    header + &rule
}

fn attribute_row(label: &str, by_attribute: &[f64], mean: f64, decimals: usize) -> String {
    let mut row = format!("| {} |", label);
    for &value in by_attribute {
        row.push_str(&format!(" {} |", num(value, decimals)));
    }
    row.push_str(&format!(" {} |\n", num(mean, decimals)));
    row
}

fn stats_table(first: &str, rows: &[LabeledStats], decimals: usize) -> String {
    let mut table = format!("| {} | {} |\n", first, DescriptiveStats::COLUMNS.join(" | "));
    table.push_str("|:---|");
    table.push_str(&":---:|".repeat(DescriptiveStats::COLUMNS.len()));
    table.push('\n');

    for row in rows {
        let values: Vec<String> = row
            .stats
            .as_row()
            .iter()
            .map(|&v| num(v, decimals))
            .collect();
        table.push_str(&format!("| {} | {} |\n", row.label, values.join(" | ")));
    }
    table.push('\n');

    table
}

fn exposure_rates_table(rows: &[ExposureRateRow], decimals: usize) -> String {
    let mut table = String::new();

    table.push_str("### Exposure Rates by Item\n\n");
    table.push_str("| Item | Rate | Label |\n");
    table.push_str("|:---:|:---:|:---|\n");
    for row in rows {
        table.push_str(&format!(
            "| {} | {} | {} |\n",
            row.item,
            num(row.rate, decimals),
            row.label
        ));
    }
    table.push('\n');

    table
}

/// List the figures that were built.
fn generate_figures_section(figures: &[Figure]) -> String {
    if figures.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Figures\n\n");
    for (i, figure) in figures.iter().enumerate() {
        let panels = figure.panel_count();
        section.push_str(&format!(
            "{}. {} ({} panel{})\n",
            i + 1,
            figure.title(),
            panels,
            if panels == 1 { "" } else { "s" }
        ));
    }
    section.push_str("\n*Figure data is available in the JSON report.*\n\n");

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by cdcat-summary v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{summarize, SummaryInput, SummaryOptions};
    use crate::models::{ExamineeTrace, FitConfig, ReferencePattern, SimulationResult, Specifications};

    fn record(model: &str, fixed_length: bool) -> SimulationResult {
        // Fixed-length traces must run the full two items.
        let (items, estimates) = if fixed_length {
            (vec![2, 0], vec![vec![0, 0], vec![0, 0]])
        } else {
            (vec![2], vec![vec![0, 0]])
        };
        SimulationResult {
            specifications: Specifications {
                fixed_length,
                max_items: 2,
                model: model.to_string(),
            },
            fit: FitConfig { iterations: 10 },
            bank_size: 3,
            examinees: vec![
                ExamineeTrace {
                    items: vec![0, 1],
                    estimates: vec![vec![1, 0], vec![1, 1]],
                },
                ExamineeTrace { items, estimates },
            ],
        }
    }

    fn reference() -> ReferencePattern {
        ReferencePattern(vec![vec![1, 1], vec![0, 1]])
    }

    fn build_report(input: SummaryInput, reference: Option<&ReferencePattern>) -> Report {
        let labels: Option<&[String]> = None;
        let out = summarize(&input, reference, labels, &SummaryOptions::default()).unwrap();
        Report {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                tool_version: "test".to_string(),
                inputs: vec!["runs.json".to_string()],
                record_count: input.len(),
                mode: out.result.mode(),
            },
            result: out.result,
            diagnostics: out.diagnostics,
        }
    }

    #[test]
    fn test_single_record_markdown() {
        let report = build_report(SummaryInput::Single(record("GDINA", false)), None);
        let markdown = generate_markdown_report(&report, &ReportOptions::default());

        assert!(markdown.contains("# CAT Simulation Summary"));
        assert!(markdown.contains("- **Model:** `GDINA`"));
        assert!(markdown.contains("recovery was not computed"));
        assert!(markdown.contains("## Item Exposure"));
        assert!(markdown.contains("## Test Length"));
        assert!(markdown.contains("| Min. | 1st Qu. | Median | Mean | 3rd Qu. | Max. |"));
        assert!(!markdown.contains("## Warnings"));
    }

    #[test]
    fn test_comparison_markdown_with_warning() {
        let report = build_report(
            SummaryInput::Many(vec![record("DINA", true), record("DINA", true)]),
            Some(&reference()),
        );
        let markdown = generate_markdown_report(&report, &ReportOptions::default());

        assert!(markdown.contains("multiple inputs (comparison)"));
        assert!(markdown.contains("## Warnings"));
        assert!(markdown.contains("| Position | PCV | PCA | Label |"));
        assert!(markdown.contains("| 2 | 0.500 | 0.750 | DINA |"));
        assert!(markdown.contains("## Figures"));
        assert!(!markdown.contains("## Test Length"));
    }

    #[test]
    fn test_variable_comparison_markdown() {
        let report = build_report(
            SummaryInput::Many(vec![record("GDINA", false), record("DINA", false)]),
            Some(&reference()),
        );
        let options = ReportOptions {
            decimals: 2,
            include_exposure_rates: true,
            include_figures: false,
        };
        let markdown = generate_markdown_report(&report, &options);

        assert!(markdown.contains("### Pattern Level"));
        assert!(markdown.contains("| Label | A1 | A2 | Mean |"));
        assert!(markdown.contains("### Exposure Rates by Item"));
        assert!(markdown.contains("## Test Length"));
        assert!(!markdown.contains("## Figures"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = build_report(
            SummaryInput::Many(vec![record("GDINA", true), record("DINA", true)]),
            Some(&reference()),
        );
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"comparison\""));
        assert!(json.contains("\"multiple_inputs\""));
        assert!(json.contains("\"exposure_stats\""));
    }
}
