//! Data models for CAT simulation summaries.
//!
//! This module contains the input records produced by a CAT simulation run
//! and the summary structures built from them.

use crate::analysis::stats::DescriptiveStats;
use crate::charts::Figure;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Test administration mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestMode {
    /// Every examinee receives exactly `max_items` items.
    Fixed,
    /// Testing stops adaptively at varying lengths.
    Variable,
}

impl fmt::Display for TestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestMode::Fixed => write!(f, "Fixed length"),
            TestMode::Variable => write!(f, "Variable length"),
        }
    }
}

/// Simulation settings recorded alongside the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specifications {
    /// Whether every examinee received `max_items` items.
    pub fixed_length: bool,
    /// Maximum number of administered items.
    pub max_items: usize,
    /// Identifier of the cognitive diagnosis model (e.g. "GDINA").
    pub model: String,
}

impl Specifications {
    pub fn mode(&self) -> TestMode {
        if self.fixed_length {
            TestMode::Fixed
        } else {
            TestMode::Variable
        }
    }
}

/// Settings of the model fit that drove item selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitConfig {
    /// Estimation iterations; zero means the generating parameters were used.
    pub iterations: u32,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self { iterations: 1 }
    }
}

/// Items administered to one examinee and the pattern estimated after each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamineeTrace {
    /// Zero-based bank indices, in administration order.
    pub items: Vec<usize>,
    /// Estimated attribute pattern after each administered item.
    pub estimates: Vec<Vec<u8>>,
}

impl ExamineeTrace {
    /// Achieved test length.
    pub fn length(&self) -> usize {
        self.items.len()
    }

    /// Estimate after `position` items (1-indexed), falling back to the
    /// last estimate when the examinee stopped earlier.
    pub fn estimate_at(&self, position: usize) -> Option<&[u8]> {
        let idx = position.saturating_sub(1).min(self.estimates.len().checked_sub(1)?);
        self.estimates.get(idx).map(Vec::as_slice)
    }

    /// Final estimated attribute pattern.
    pub fn final_estimate(&self) -> Option<&[u8]> {
        self.estimates.last().map(Vec::as_slice)
    }
}

/// One CAT simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub specifications: Specifications,
    #[serde(default)]
    pub fit: FitConfig,
    /// Number of items in the bank.
    pub bank_size: usize,
    pub examinees: Vec<ExamineeTrace>,
}

impl SimulationResult {
    /// Number of examinees administered each bank item.
    pub fn exposure_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.bank_size];
        for examinee in &self.examinees {
            for &item in &examinee.items {
                if let Some(count) = counts.get_mut(item) {
                    *count += 1;
                }
            }
        }
        counts
    }

    /// Achieved test length per examinee.
    pub fn lengths(&self) -> Vec<usize> {
        self.examinees.iter().map(ExamineeTrace::length).collect()
    }
}

/// Ground-truth attribute patterns, one row per examinee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferencePattern(pub Vec<Vec<u8>>);

impl ReferencePattern {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty() || self.0.iter().all(Vec::is_empty)
    }

    pub fn rows(&self) -> &[Vec<u8>] {
        &self.0
    }

    /// Number of attributes, taken from the first row.
    pub fn attributes(&self) -> usize {
        self.0.first().map_or(0, Vec::len)
    }
}

/// Recovery at one item position (fixed-length mode).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionRecovery {
    /// Item position, 1-indexed.
    pub position: usize,
    /// Pattern-level recovery.
    pub pcv: f64,
    /// Attribute-level recovery.
    pub pca: f64,
}

/// Recovery of the final estimates (variable-length mode).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalRecovery {
    pub pcv: f64,
    /// Match rate for each attribute.
    pub pca_by_attribute: Vec<f64>,
    /// Mean of `pca_by_attribute`.
    pub pca: f64,
}

/// Classification recovery against the reference pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaRecovery {
    ByPosition { positions: Vec<PositionRecovery> },
    Final(FinalRecovery),
}

/// Per-item exposure rates of one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemExposure {
    /// Rate for each bank item, in bank order.
    pub rates: Vec<f64>,
    pub stats: DescriptiveStats,
}

/// Frequency of each achieved test length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LengthDistribution(pub BTreeMap<usize, usize>);

impl LengthDistribution {
    pub fn from_lengths(lengths: &[usize]) -> Self {
        let mut table = BTreeMap::new();
        for &length in lengths {
            *table.entry(length).or_insert(0) += 1;
        }
        Self(table)
    }

    /// Expand the table back into one value per examinee.
    pub fn expanded(&self) -> Vec<f64> {
        self.0
            .iter()
            .flat_map(|(&length, &freq)| std::iter::repeat(length as f64).take(freq))
            .collect()
    }
}

/// Summary of a single simulation record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSummary {
    pub mode: TestMode,
    /// Absent when no reference pattern was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha_recovery: Option<AlphaRecovery>,
    pub item_exposure: ItemExposure,
    /// Present in variable-length mode only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lengths: Option<LengthDistribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_stats: Option<DescriptiveStats>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub figures: Vec<Figure>,
}

/// One row of the fixed-length recovery table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionRecoveryRow {
    pub position: usize,
    pub pcv: f64,
    pub pca: f64,
    pub label: String,
}

/// One row of the variable-length pattern recovery matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternRecoveryRow {
    pub label: String,
    pub pcv: f64,
}

/// One row of the variable-length attribute recovery matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeRecoveryRow {
    pub label: String,
    pub by_attribute: Vec<f64>,
    pub mean: f64,
}

/// Recovery tables across records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryTable {
    ByPosition {
        rows: Vec<PositionRecoveryRow>,
    },
    Final {
        pattern: Vec<PatternRecoveryRow>,
        attributes: Vec<AttributeRecoveryRow>,
    },
}

impl RecoveryTable {
    /// Number of rows in the main table.
    pub fn len(&self) -> usize {
        match self {
            RecoveryTable::ByPosition { rows } => rows.len(),
            RecoveryTable::Final { pattern, .. } => pattern.len(),
        }
    }
}

/// Descriptive statistics keyed by record label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledStats {
    pub label: String,
    pub stats: DescriptiveStats,
}

/// Exposure rate of one item in one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposureRateRow {
    /// Bank item, 1-indexed.
    pub item: usize,
    pub rate: f64,
    pub label: String,
}

/// Side-by-side summary of several records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub mode: TestMode,
    pub labels: Vec<String>,
    pub recovery: RecoveryTable,
    pub exposure_stats: Vec<LabeledStats>,
    pub exposure_rates: Vec<ExposureRateRow>,
    /// Present in variable-length mode only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_stats: Option<Vec<LabeledStats>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub figures: Vec<Figure>,
}

/// Where the result's specifications came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceSpecifications {
    /// The single summarized record's own block.
    Record(Specifications),
    /// The result compares several records.
    MultipleInputs,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryBody {
    Record {
        label: String,
        summary: RecordSummary,
    },
    Comparison(ComparisonSummary),
}

/// Final result of one `summarize` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryResult {
    pub body: SummaryBody,
    pub specifications: SourceSpecifications,
}

impl SummaryResult {
    pub fn mode(&self) -> TestMode {
        match &self.body {
            SummaryBody::Record { summary, .. } => summary.mode,
            SummaryBody::Comparison(comparison) => comparison.mode,
        }
    }

    /// Labels of the summarized records, in input order.
    pub fn labels(&self) -> Vec<&str> {
        match &self.body {
            SummaryBody::Record { label, .. } => vec![label.as_str()],
            SummaryBody::Comparison(comparison) => {
                comparison.labels.iter().map(String::as_str).collect()
            }
        }
    }

    pub fn figures(&self) -> &[Figure] {
        match &self.body {
            SummaryBody::Record { summary, .. } => &summary.figures,
            SummaryBody::Comparison(comparison) => &comparison.figures,
        }
    }
}

/// Non-fatal condition reported next to a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnostic {
    /// Two or more records share a label.
    DuplicatedLabels { labels: Vec<String> },
    /// More labels than records were given for a single record.
    ExtraLabels { used: String, ignored: Vec<String> },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DuplicatedLabels { labels } => write!(
                f,
                "duplicated labels ({}); results keyed ambiguously",
                labels.join(", ")
            ),
            Diagnostic::ExtraLabels { used, ignored } => write!(
                f,
                "single record labelled '{}'; ignored extra labels ({})",
                used,
                ignored.join(", ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace(items: Vec<usize>, estimates: Vec<Vec<u8>>) -> ExamineeTrace {
        ExamineeTrace { items, estimates }
    }

    #[test]
    fn test_specifications_mode() {
        let mut specs = Specifications {
            fixed_length: true,
            max_items: 10,
            model: "GDINA".to_string(),
        };
        assert_eq!(specs.mode(), TestMode::Fixed);
        specs.fixed_length = false;
        assert_eq!(specs.mode(), TestMode::Variable);
    }

    #[test]
    fn test_estimate_at_falls_back_to_last() {
        let t = trace(vec![0, 1], vec![vec![0, 0], vec![1, 0]]);
        assert_eq!(t.estimate_at(1), Some(&[0u8, 0][..]));
        assert_eq!(t.estimate_at(2), Some(&[1u8, 0][..]));
        assert_eq!(t.estimate_at(5), Some(&[1u8, 0][..]));
        assert_eq!(t.final_estimate(), Some(&[1u8, 0][..]));

        let empty = trace(vec![], vec![]);
        assert_eq!(empty.estimate_at(1), None);
    }

    #[test]
    fn test_exposure_counts() {
        let record = SimulationResult {
            specifications: Specifications {
                fixed_length: false,
                max_items: 3,
                model: "DINA".to_string(),
            },
            fit: FitConfig::default(),
            bank_size: 4,
            examinees: vec![
                trace(vec![0, 2], vec![vec![1], vec![1]]),
                trace(vec![2], vec![vec![0]]),
            ],
        };
        assert_eq!(record.exposure_counts(), vec![1, 0, 2, 0]);
        assert_eq!(record.lengths(), vec![2, 1]);
    }

    #[test]
    fn test_length_distribution_expanded() {
        let dist = LengthDistribution::from_lengths(&[5, 3, 5, 4]);
        assert_eq!(dist.0.get(&5), Some(&2));
        assert_eq!(dist.expanded(), vec![3.0, 4.0, 5.0, 5.0]);
    }

    #[test]
    fn test_reference_pattern_empty() {
        assert!(ReferencePattern::default().is_empty());
        assert!(ReferencePattern(vec![vec![]]).is_empty());
        assert!(!ReferencePattern(vec![vec![1, 0]]).is_empty());
    }

    #[test]
    fn test_duplicated_labels_message() {
        let d = Diagnostic::DuplicatedLabels {
            labels: vec!["M1".to_string()],
        };
        assert!(d.to_string().contains("keyed ambiguously"));
    }
}
