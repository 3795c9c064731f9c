//! Summary aggregation across simulation records.
//!
//! A single record is handed to the per-record summarizer as is. Several
//! records are validated, summarized one by one and then aligned into
//! comparison tables and charts keyed by their labels.

use crate::analysis::stats::DescriptiveStats;
use crate::charts::{self, ChartGrid, Figure, Layout, Series};
use crate::error::SummaryError;
use crate::models::{
    AlphaRecovery, AttributeRecoveryRow, ComparisonSummary, Diagnostic, ExposureRateRow,
    LabeledStats, PatternRecoveryRow, PositionRecoveryRow, RecordSummary, RecoveryTable,
    ReferencePattern, SimulationResult, SourceSpecifications, SummaryBody, SummaryResult,
    TestMode,
};
use crate::summarizer::{CatSummarizer, RecordSummarizer};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Label given to records whose model fit ran zero iterations.
pub const REFERENCE_LABEL: &str = "TRUE";

/// What to summarize.
#[derive(Debug, Clone)]
pub enum SummaryInput {
    Single(SimulationResult),
    Many(Vec<SimulationResult>),
}

impl SummaryInput {
    /// Wrap loaded records: one record is `Single`, anything else `Many`.
    pub fn from_records(mut records: Vec<SimulationResult>) -> Self {
        if records.len() == 1 {
            SummaryInput::Single(records.remove(0))
        } else {
            SummaryInput::Many(records)
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SummaryInput::Single(_) => 1,
            SummaryInput::Many(records) => records.len(),
        }
    }
}

/// Knobs for a `summarize` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Build chart descriptions in addition to the tables.
    pub produce_plots: bool,
    /// Label records fitted with zero iterations as `"TRUE"`.
    pub treat_zero_iteration_as_reference: bool,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            produce_plots: true,
            treat_zero_iteration_as_reference: true,
        }
    }
}

impl From<&crate::config::SummaryConfig> for SummaryOptions {
    fn from(config: &crate::config::SummaryConfig) -> Self {
        Self {
            produce_plots: config.produce_plots,
            treat_zero_iteration_as_reference: config.treat_zero_iteration_as_reference,
        }
    }
}

/// A summary together with the non-fatal conditions met while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct Summarized {
    pub result: SummaryResult,
    pub diagnostics: Vec<Diagnostic>,
}

/// Summarize with the default [`CatSummarizer`].
pub fn summarize(
    input: &SummaryInput,
    reference: Option<&ReferencePattern>,
    labels: Option<&[String]>,
    options: &SummaryOptions,
) -> Result<Summarized, SummaryError> {
    summarize_with(&CatSummarizer, input, reference, labels, options)
}

/// Summarize using a custom per-record summarizer.
pub fn summarize_with<S: RecordSummarizer + ?Sized>(
    summarizer: &S,
    input: &SummaryInput,
    reference: Option<&ReferencePattern>,
    labels: Option<&[String]>,
    options: &SummaryOptions,
) -> Result<Summarized, SummaryError> {
    match input {
        SummaryInput::Single(record) => {
            summarize_single(summarizer, record, reference, labels, options)
        }
        SummaryInput::Many(records) => {
            summarize_many(summarizer, records, reference, labels, options)
        }
    }
}

/// Display label derived from a record's specifications.
pub fn derive_label(record: &SimulationResult, options: &SummaryOptions) -> String {
    if options.treat_zero_iteration_as_reference && record.fit.iterations == 0 {
        REFERENCE_LABEL.to_string()
    } else {
        record.specifications.model.clone()
    }
}

/// Labels that occur more than once, in order of first appearance.
pub fn duplicated_labels(labels: &[String]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label.as_str()).or_default() += 1;
    }

    let mut duplicated: Vec<String> = Vec::new();
    for label in labels {
        if counts[label.as_str()] > 1 && !duplicated.contains(label) {
            duplicated.push(label.clone());
        }
    }
    duplicated
}

fn summarize_single<S: RecordSummarizer + ?Sized>(
    summarizer: &S,
    record: &SimulationResult,
    reference: Option<&ReferencePattern>,
    labels: Option<&[String]>,
    options: &SummaryOptions,
) -> Result<Summarized, SummaryError> {
    let mut diagnostics = Vec::new();
    let label = match labels {
        Some([first, rest @ ..]) => {
            if !rest.is_empty() {
                let diagnostic = Diagnostic::ExtraLabels {
                    used: first.clone(),
                    ignored: rest.to_vec(),
                };
                warn!("{}", diagnostic);
                diagnostics.push(diagnostic);
            }
            first.clone()
        }
        _ => derive_label(record, options),
    };
    info!("Summarizing single record '{}'", label);

    let reference = reference.filter(|r| !r.is_empty());
    let summary = summarizer.summarize_record(record, reference, options.produce_plots)?;

    Ok(Summarized {
        result: SummaryResult {
            body: SummaryBody::Record { label, summary },
            specifications: SourceSpecifications::Record(record.specifications.clone()),
        },
        diagnostics,
    })
}

fn summarize_many<S: RecordSummarizer + ?Sized>(
    summarizer: &S,
    records: &[SimulationResult],
    reference: Option<&ReferencePattern>,
    labels: Option<&[String]>,
    options: &SummaryOptions,
) -> Result<Summarized, SummaryError> {
    let reference = reference
        .filter(|r| !r.is_empty())
        .ok_or(SummaryError::MissingReference)?;

    let labels: Vec<String> = match labels {
        Some(given) if given.len() != records.len() => {
            return Err(SummaryError::LabelLengthMismatch {
                labels: given.len(),
                records: records.len(),
            });
        }
        Some(given) => given.to_vec(),
        None => records.iter().map(|r| derive_label(r, options)).collect(),
    };

    let first = records.first().ok_or(SummaryError::EmptyInput)?;
    let mode = first.specifications.mode();
    if records.iter().any(|r| r.specifications.mode() != mode) {
        return Err(SummaryError::InconsistentMode);
    }

    let mut diagnostics = Vec::new();
    let duplicated = duplicated_labels(&labels);
    if !duplicated.is_empty() {
        let diagnostic = Diagnostic::DuplicatedLabels { labels: duplicated };
        warn!("{}", diagnostic);
        diagnostics.push(diagnostic);
    }

    info!(
        "Comparing {} {} records: {}",
        records.len(),
        mode.to_string().to_lowercase(),
        labels.join(", ")
    );

    let summaries = records
        .iter()
        .map(|record| summarizer.summarize_record(record, Some(reference), options.produce_plots))
        .collect::<Result<Vec<_>, _>>()?;

    let comparison = compare(mode, labels, &summaries, options.produce_plots)?;
    debug!(
        "Built {} recovery rows and {} figures",
        comparison.recovery.len(),
        comparison.figures.len()
    );

    Ok(Summarized {
        result: SummaryResult {
            body: SummaryBody::Comparison(comparison),
            specifications: SourceSpecifications::MultipleInputs,
        },
        diagnostics,
    })
}

/// Align per-record summaries into comparison tables.
fn compare(
    mode: TestMode,
    labels: Vec<String>,
    summaries: &[RecordSummary],
    produce_plots: bool,
) -> Result<ComparisonSummary, SummaryError> {
    let mut figures = Vec::new();

    let recovery = match mode {
        TestMode::Fixed => {
            let groups = position_rows(&labels, summaries)?;
            if produce_plots {
                figures.push(Figure::Chart(recovery_comparison_chart(
                    "Pattern-level recovery (PCV)",
                    "PCV",
                    &labels,
                    &groups,
                    |row| row.pcv,
                )));
                figures.push(Figure::Chart(recovery_comparison_chart(
                    "Attribute-level recovery (PCA)",
                    "PCA",
                    &labels,
                    &groups,
                    |row| row.pca,
                )));
            }
            RecoveryTable::ByPosition {
                rows: groups.into_iter().flatten().collect(),
            }
        }
        TestMode::Variable => final_rows(&labels, summaries)?,
    };

    let exposure_stats = labels
        .iter()
        .zip(summaries)
        .map(|(label, summary)| LabeledStats {
            label: label.clone(),
            stats: summary.item_exposure.stats,
        })
        .collect();

    let exposure_rates = labels
        .iter()
        .zip(summaries)
        .flat_map(|(label, summary)| {
            summary
                .item_exposure
                .rates
                .iter()
                .enumerate()
                .map(move |(i, &rate)| ExposureRateRow {
                    item: i + 1,
                    rate,
                    label: label.clone(),
                })
        })
        .collect();

    if produce_plots {
        let panels = labels
            .iter()
            .zip(summaries)
            .map(|(label, summary)| charts::exposure_chart(label.clone(), &summary.item_exposure.rates))
            .collect();
        figures.push(Figure::Grid(ChartGrid::labeled(
            "Item exposure rates",
            Layout::Vertical,
            &labels,
            panels,
        )));
    }

    let length_stats = match mode {
        TestMode::Fixed => None,
        TestMode::Variable => {
            let rows = length_rows(&labels, summaries)?;
            if produce_plots {
                let panels = labels
                    .iter()
                    .zip(summaries)
                    .filter_map(|(label, summary)| {
                        summary
                            .lengths
                            .as_ref()
                            .map(|dist| charts::length_chart(label.clone(), &dist.0))
                    })
                    .collect();
                figures.push(Figure::Grid(ChartGrid::labeled(
                    "Test length distribution",
                    Layout::Horizontal,
                    &labels,
                    panels,
                )));
            }
            Some(rows)
        }
    };

    Ok(ComparisonSummary {
        mode,
        labels,
        recovery,
        exposure_stats,
        exposure_rates,
        length_stats,
        figures,
    })
}

fn contract_violation(label: &str, detail: &str) -> SummaryError {
    SummaryError::InvalidRecord {
        label: label.to_string(),
        detail: detail.to_string(),
    }
}

/// Position-indexed recovery rows, one group per record in input order.
fn position_rows(
    labels: &[String],
    summaries: &[RecordSummary],
) -> Result<Vec<Vec<PositionRecoveryRow>>, SummaryError> {
    let mut groups = Vec::with_capacity(summaries.len());
    for (label, summary) in labels.iter().zip(summaries) {
        match &summary.alpha_recovery {
            Some(AlphaRecovery::ByPosition { positions }) => {
                groups.push(
                    positions
                        .iter()
                        .map(|p| PositionRecoveryRow {
                            position: p.position,
                            pcv: p.pcv,
                            pca: p.pca,
                            label: label.clone(),
                        })
                        .collect(),
                );
            }
            _ => {
                return Err(contract_violation(
                    label,
                    "summary lacks position-indexed recovery",
                ))
            }
        }
    }
    Ok(groups)
}

fn final_rows(
    labels: &[String],
    summaries: &[RecordSummary],
) -> Result<RecoveryTable, SummaryError> {
    let mut pattern = Vec::with_capacity(summaries.len());
    let mut attributes = Vec::with_capacity(summaries.len());

    for (label, summary) in labels.iter().zip(summaries) {
        match &summary.alpha_recovery {
            Some(AlphaRecovery::Final(recovery)) => {
                pattern.push(PatternRecoveryRow {
                    label: label.clone(),
                    pcv: recovery.pcv,
                });
                attributes.push(AttributeRecoveryRow {
                    label: label.clone(),
                    by_attribute: recovery.pca_by_attribute.clone(),
                    mean: recovery.pca,
                });
            }
            _ => return Err(contract_violation(label, "summary lacks final recovery")),
        }
    }

    Ok(RecoveryTable::Final {
        pattern,
        attributes,
    })
}

fn length_rows(
    labels: &[String],
    summaries: &[RecordSummary],
) -> Result<Vec<LabeledStats>, SummaryError> {
    labels
        .iter()
        .zip(summaries)
        .map(|(label, summary)| {
            summary
                .lengths
                .as_ref()
                .and_then(|dist| DescriptiveStats::from_values(&dist.expanded()))
                .map(|stats| LabeledStats {
                    label: label.clone(),
                    stats,
                })
                .ok_or_else(|| contract_violation(label, "summary lacks test lengths"))
        })
        .collect()
}

fn recovery_comparison_chart(
    title: &str,
    y_label: &str,
    labels: &[String],
    groups: &[Vec<PositionRecoveryRow>],
    value: impl Fn(&PositionRecoveryRow) -> f64,
) -> charts::Chart {
    let series = labels
        .iter()
        .zip(groups)
        .map(|(label, rows)| {
            Series::new(
                label.clone(),
                rows.iter().map(|row| (row.position as f64, value(row))).collect(),
            )
        })
        .collect();
    charts::recovery_chart(title, y_label, series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::stats::DescriptiveStats;
    use crate::models::{
        ExamineeTrace, FitConfig, ItemExposure, Specifications,
    };
    use std::cell::Cell;

    fn fixed_record(model: &str, max_items: usize) -> SimulationResult {
        let examinees = (0..3)
            .map(|i| ExamineeTrace {
                items: (0..max_items).map(|j| (i + j) % (max_items + 2)).collect(),
                estimates: (0..max_items).map(|j| vec![(j % 2) as u8, 1]).collect(),
            })
            .collect();
        SimulationResult {
            specifications: Specifications {
                fixed_length: true,
                max_items,
                model: model.to_string(),
            },
            fit: FitConfig { iterations: 50 },
            bank_size: max_items + 2,
            examinees,
        }
    }

    fn variable_record(model: &str, lengths: &[usize]) -> SimulationResult {
        let examinees = lengths
            .iter()
            .map(|&len| ExamineeTrace {
                items: (0..len).collect(),
                estimates: vec![vec![1, 1]; len],
            })
            .collect();
        SimulationResult {
            specifications: Specifications {
                fixed_length: false,
                max_items: 8,
                model: model.to_string(),
            },
            fit: FitConfig { iterations: 50 },
            bank_size: 8,
            examinees,
        }
    }

    fn reference() -> ReferencePattern {
        ReferencePattern(vec![vec![1, 1], vec![0, 1], vec![1, 0]])
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn comparison(summarized: &Summarized) -> &ComparisonSummary {
        match &summarized.result.body {
            SummaryBody::Comparison(c) => c,
            other => panic!("expected comparison, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_reference() {
        let input = SummaryInput::Many(vec![fixed_record("A", 4), fixed_record("B", 4)]);
        let err = summarize(&input, None, None, &SummaryOptions::default()).unwrap_err();
        assert_eq!(err, SummaryError::MissingReference);

        let empty = ReferencePattern::default();
        let err = summarize(&input, Some(&empty), None, &SummaryOptions::default()).unwrap_err();
        assert_eq!(err, SummaryError::MissingReference);
    }

    #[test]
    fn test_label_length_mismatch() {
        let input = SummaryInput::Many(vec![fixed_record("A", 4), fixed_record("B", 4)]);
        let given = labels(&["only-one"]);
        let err = summarize(
            &input,
            Some(&reference()),
            Some(&given),
            &SummaryOptions::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SummaryError::LabelLengthMismatch {
                labels: 1,
                records: 2
            }
        );
    }

    #[test]
    fn test_inconsistent_mode() {
        let input = SummaryInput::Many(vec![
            fixed_record("A", 4),
            variable_record("B", &[2, 3, 4]),
        ]);
        let err = summarize(&input, Some(&reference()), None, &SummaryOptions::default())
            .unwrap_err();
        assert_eq!(err, SummaryError::InconsistentMode);
    }

    #[test]
    fn test_empty_many() {
        let input = SummaryInput::Many(vec![]);
        let err = summarize(&input, Some(&reference()), None, &SummaryOptions::default())
            .unwrap_err();
        assert_eq!(err, SummaryError::EmptyInput);
    }

    #[test]
    fn test_fixed_length_comparison() {
        let input = SummaryInput::Many(vec![fixed_record("GDINA", 10), fixed_record("DINA", 10)]);
        let given = labels(&["M1", "M2"]);
        let out = summarize(
            &input,
            Some(&reference()),
            Some(&given),
            &SummaryOptions::default(),
        )
        .unwrap();

        assert!(out.diagnostics.is_empty());
        assert_eq!(out.result.specifications, SourceSpecifications::MultipleInputs);

        let c = comparison(&out);
        assert_eq!(c.mode, TestMode::Fixed);
        match &c.recovery {
            RecoveryTable::ByPosition { rows } => {
                assert_eq!(rows.len(), 20);
                assert!(rows.iter().all(|r| (1..=10).contains(&r.position)));
                assert!(rows.iter().all(|r| (0.0..=1.0).contains(&r.pcv)));
                assert_eq!(rows[0].label, "M1");
                assert_eq!(rows[19].label, "M2");
            }
            other => panic!("unexpected table: {:?}", other),
        }

        let names: Vec<&str> = c.exposure_stats.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(names, vec!["M1", "M2"]);
        assert_eq!(c.exposure_rates.len(), 2 * 12);
        assert!(c.length_stats.is_none());

        let titles: Vec<&str> = c.figures.iter().map(|f| f.title()).collect();
        assert_eq!(
            titles,
            vec![
                "Pattern-level recovery (PCV)",
                "Attribute-level recovery (PCA)",
                "Item exposure rates (top to bottom: M1, M2)",
            ]
        );
    }

    #[test]
    fn test_recovery_chart_has_one_series_per_label() {
        let input = SummaryInput::Many(vec![fixed_record("A", 3), fixed_record("B", 3)]);
        let out = summarize(&input, Some(&reference()), None, &SummaryOptions::default()).unwrap();
        match &comparison(&out).figures[0] {
            Figure::Chart(charts::Chart::Line { series, .. }) => {
                assert_eq!(series.len(), 2);
                assert_eq!(series[0].name, "A");
                assert_eq!(series[1].points.len(), 3);
            }
            other => panic!("unexpected figure: {:?}", other),
        }
    }

    #[test]
    fn test_variable_length_comparison() {
        let input = SummaryInput::Many(vec![
            variable_record("GDINA", &[2, 4, 4]),
            variable_record("DINA", &[3, 3, 6]),
        ]);
        let out = summarize(&input, Some(&reference()), None, &SummaryOptions::default()).unwrap();
        let c = comparison(&out);

        match &c.recovery {
            RecoveryTable::Final {
                pattern,
                attributes,
            } => {
                assert_eq!(pattern.len(), 2);
                assert_eq!(attributes.len(), 2);
                // Final estimates are all [1, 1]: one exact match of three.
                assert!((pattern[0].pcv - 1.0 / 3.0).abs() < 1e-12);
                assert_eq!(attributes[0].by_attribute.len(), 2);
            }
            other => panic!("unexpected table: {:?}", other),
        }

        let lengths = c.length_stats.as_ref().unwrap();
        assert_eq!(lengths.len(), 2);
        assert_eq!(lengths[0].label, "GDINA");
        assert_eq!(lengths[0].stats.min, 2.0);
        assert_eq!(lengths[0].stats.median, 4.0);
        assert_eq!(lengths[1].stats.max, 6.0);
        assert_eq!(lengths[1].stats.mean, 4.0);

        let titles: Vec<&str> = c.figures.iter().map(|f| f.title()).collect();
        assert_eq!(
            titles,
            vec![
                "Item exposure rates (top to bottom: GDINA, DINA)",
                "Test length distribution (left to right: GDINA, DINA)",
            ]
        );
    }

    #[test]
    fn test_duplicated_labels_warn_but_keep_rows() {
        let input = SummaryInput::Many(vec![fixed_record("GDINA", 5), fixed_record("GDINA", 5)]);
        let out = summarize(&input, Some(&reference()), None, &SummaryOptions::default()).unwrap();

        assert_eq!(
            out.diagnostics,
            vec![Diagnostic::DuplicatedLabels {
                labels: labels(&["GDINA"])
            }]
        );
        let c = comparison(&out);
        assert_eq!(c.exposure_stats.len(), 2);
        assert_eq!(c.recovery.len(), 10);
    }

    #[test]
    fn test_duplicated_labels_keep_one_series_per_record() {
        let input = SummaryInput::Many(vec![fixed_record("GDINA", 3), fixed_record("GDINA", 3)]);
        let out = summarize(&input, Some(&reference()), None, &SummaryOptions::default()).unwrap();
        let c = comparison(&out);

        for figure in &c.figures[..2] {
            match figure {
                Figure::Chart(charts::Chart::Line { series, .. }) => {
                    let counts: Vec<usize> = series.iter().map(|s| s.points.len()).collect();
                    assert_eq!(counts, vec![3, 3]);
                    assert!(series.iter().all(|s| s.name == "GDINA"));
                }
                other => panic!("unexpected figure: {:?}", other),
            }
        }
    }

    #[test]
    fn test_single_record_reports_extra_labels() {
        let given = labels(&["M1", "M2", "M3"]);
        let out = summarize(
            &SummaryInput::Single(fixed_record("GDINA", 2)),
            None,
            Some(&given),
            &SummaryOptions::default(),
        )
        .unwrap();

        assert_eq!(out.result.labels(), vec!["M1"]);
        assert_eq!(
            out.diagnostics,
            vec![Diagnostic::ExtraLabels {
                used: "M1".to_string(),
                ignored: labels(&["M2", "M3"]),
            }]
        );

        let one = labels(&["M1"]);
        let out = summarize(
            &SummaryInput::Single(fixed_record("GDINA", 2)),
            None,
            Some(&one),
            &SummaryOptions::default(),
        )
        .unwrap();
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_no_plots() {
        let input = SummaryInput::Many(vec![
            variable_record("A", &[2, 3, 4]),
            variable_record("B", &[2, 3, 4]),
        ]);
        let options = SummaryOptions {
            produce_plots: false,
            ..SummaryOptions::default()
        };
        let out = summarize(&input, Some(&reference()), None, &options).unwrap();
        assert!(out.result.figures().is_empty());
        assert!(comparison(&out).length_stats.is_some());
    }

    #[test]
    fn test_single_record_keeps_its_specifications() {
        let record = variable_record("GDINA", &[2, 3, 5]);
        let specs = record.specifications.clone();
        let out = summarize(
            &SummaryInput::Single(record),
            None,
            None,
            &SummaryOptions::default(),
        )
        .unwrap();

        assert_eq!(out.result.specifications, SourceSpecifications::Record(specs));
        assert_eq!(out.result.labels(), vec!["GDINA"]);
        match &out.result.body {
            SummaryBody::Record { summary, .. } => {
                assert!(summary.alpha_recovery.is_none());
                assert!(summary.length_stats.is_some());
            }
            other => panic!("expected record summary, got {:?}", other),
        }
    }

    #[test]
    fn test_derived_labels() {
        let mut record = variable_record("GDINA", &[2]);
        let options = SummaryOptions::default();
        assert_eq!(derive_label(&record, &options), "GDINA");

        record.fit.iterations = 0;
        assert_eq!(derive_label(&record, &options), "TRUE");

        let legacy_off = SummaryOptions {
            treat_zero_iteration_as_reference: false,
            ..options
        };
        assert_eq!(derive_label(&record, &legacy_off), "GDINA");
    }

    #[test]
    fn test_duplicated_labels_order() {
        let dups = duplicated_labels(&labels(&["B", "A", "B", "C", "A", "B"]));
        assert_eq!(dups, labels(&["B", "A"]));
        assert!(duplicated_labels(&labels(&["A", "B"])).is_empty());
    }

    #[test]
    fn test_from_records() {
        assert!(matches!(
            SummaryInput::from_records(vec![fixed_record("A", 2)]),
            SummaryInput::Single(_)
        ));
        let many = SummaryInput::from_records(vec![fixed_record("A", 2), fixed_record("B", 2)]);
        assert_eq!(many.len(), 2);
    }

    /// Summarizer returning a canned summary and counting calls.
    struct CannedSummarizer {
        calls: Cell<usize>,
    }

    impl RecordSummarizer for CannedSummarizer {
        fn summarize_record(
            &self,
            _record: &SimulationResult,
            _reference: Option<&ReferencePattern>,
            _produce_plots: bool,
        ) -> Result<RecordSummary, SummaryError> {
            self.calls.set(self.calls.get() + 1);
            Ok(RecordSummary {
                mode: TestMode::Fixed,
                alpha_recovery: None,
                item_exposure: ItemExposure {
                    rates: vec![1.0],
                    stats: DescriptiveStats::from_values(&[1.0]).unwrap(),
                },
                lengths: None,
                length_stats: None,
                figures: Vec::new(),
            })
        }
    }

    #[test]
    fn test_custom_summarizer_contract_violation() {
        let canned = CannedSummarizer {
            calls: Cell::new(0),
        };
        let input = SummaryInput::Many(vec![fixed_record("A", 2), fixed_record("B", 2)]);
        let err = summarize_with(
            &canned,
            &input,
            Some(&reference()),
            None,
            &SummaryOptions::default(),
        )
        .unwrap_err();

        assert_eq!(canned.calls.get(), 2);
        assert!(matches!(err, SummaryError::InvalidRecord { .. }));
    }
}
