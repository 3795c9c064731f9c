//! Per-record summaries.
//!
//! A [`RecordSummarizer`] turns one simulation record into a
//! [`RecordSummary`]: classification recovery against a reference pattern,
//! item exposure rates, and the test-length distribution for
//! variable-length runs. The aggregator only depends on the trait.

use crate::analysis::stats::{mean, DescriptiveStats};
use crate::charts::{self, Figure, Series};
use crate::error::SummaryError;
use crate::models::{
    AlphaRecovery, FinalRecovery, ItemExposure, LengthDistribution, PositionRecovery,
    RecordSummary, ReferencePattern, SimulationResult, TestMode,
};
use std::collections::HashSet;
use tracing::debug;

/// Summarizes a single simulation record.
pub trait RecordSummarizer {
    /// Build the summary of `record`. Recovery is computed only when a
    /// reference pattern is supplied.
    fn summarize_record(
        &self,
        record: &SimulationResult,
        reference: Option<&ReferencePattern>,
        produce_plots: bool,
    ) -> Result<RecordSummary, SummaryError>;
}

/// Default summarizer for CAT simulation records.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatSummarizer;

impl RecordSummarizer for CatSummarizer {
    fn summarize_record(
        &self,
        record: &SimulationResult,
        reference: Option<&ReferencePattern>,
        produce_plots: bool,
    ) -> Result<RecordSummary, SummaryError> {
        let model = record.specifications.model.as_str();
        validate_record(record)?;

        let mode = record.specifications.mode();
        debug!(
            "Summarizing {} record '{}' ({} examinees, {} items in bank)",
            mode,
            model,
            record.examinees.len(),
            record.bank_size
        );

        let alpha_recovery = match reference {
            Some(reference) => {
                validate_reference(record, reference)?;
                Some(match mode {
                    TestMode::Fixed => position_recovery(record, reference),
                    TestMode::Variable => final_recovery(record, reference),
                })
            }
            None => None,
        };

        let item_exposure = item_exposure(record)?;

        let lengths = match mode {
            TestMode::Fixed => None,
            TestMode::Variable => Some(LengthDistribution::from_lengths(&record.lengths())),
        };
        let length_stats = lengths
            .as_ref()
            .and_then(|dist| DescriptiveStats::from_values(&dist.expanded()));

        let mut figures = Vec::new();
        if produce_plots {
            if let Some(AlphaRecovery::ByPosition { positions }) = &alpha_recovery {
                let pcv = positions.iter().map(|p| (p.position as f64, p.pcv)).collect();
                let pca = positions.iter().map(|p| (p.position as f64, p.pca)).collect();
                figures.push(Figure::Chart(charts::recovery_chart(
                    format!("Classification recovery: {}", model),
                    "Recovery rate",
                    vec![Series::new("PCV", pcv), Series::new("PCA", pca)],
                )));
            }
            figures.push(Figure::Chart(charts::exposure_chart(
                format!("Item exposure rates: {}", model),
                &item_exposure.rates,
            )));
            if let Some(dist) = &lengths {
                figures.push(Figure::Chart(charts::length_chart(
                    format!("Test length distribution: {}", model),
                    &dist.0,
                )));
            }
        }

        Ok(RecordSummary {
            mode,
            alpha_recovery,
            item_exposure,
            lengths,
            length_stats,
            figures,
        })
    }
}

fn validate_record(record: &SimulationResult) -> Result<(), SummaryError> {
    let label = &record.specifications.model;

    if record.examinees.is_empty() || record.bank_size == 0 {
        return Err(SummaryError::EmptyRecord {
            label: label.clone(),
        });
    }

    for (i, examinee) in record.examinees.iter().enumerate() {
        if examinee.items.is_empty() {
            return Err(invalid(label, format!("examinee {} received no items", i + 1)));
        }
        if examinee.items.len() != examinee.estimates.len() {
            return Err(invalid(
                label,
                format!(
                    "examinee {} has {} items but {} estimates",
                    i + 1,
                    examinee.items.len(),
                    examinee.estimates.len()
                ),
            ));
        }
        if record.specifications.fixed_length && examinee.length() != record.specifications.max_items
        {
            return Err(invalid(
                label,
                format!(
                    "fixed-length examinee {} received {} items, expected {}",
                    i + 1,
                    examinee.length(),
                    record.specifications.max_items
                ),
            ));
        }
        if let Some(&item) = examinee.items.iter().find(|&&item| item >= record.bank_size) {
            return Err(invalid(
                label,
                format!(
                    "examinee {} received item {} outside a bank of {}",
                    i + 1,
                    item,
                    record.bank_size
                ),
            ));
        }
        let mut seen = HashSet::with_capacity(examinee.items.len());
        if let Some(&item) = examinee.items.iter().find(|&&item| !seen.insert(item)) {
            return Err(invalid(
                label,
                format!("examinee {} received item {} more than once", i + 1, item),
            ));
        }
    }

    Ok(())
}

fn validate_reference(
    record: &SimulationResult,
    reference: &ReferencePattern,
) -> Result<(), SummaryError> {
    let label = &record.specifications.model;
    let mismatch = |detail: String| SummaryError::ReferenceShapeMismatch {
        label: label.clone(),
        detail,
    };

    if reference.rows().len() != record.examinees.len() {
        return Err(mismatch(format!(
            "{} reference rows for {} examinees",
            reference.rows().len(),
            record.examinees.len()
        )));
    }

    let attributes = reference.attributes();
    if reference.rows().iter().any(|row| row.len() != attributes) {
        return Err(mismatch("reference rows differ in length".to_string()));
    }

    let bad_estimate = record
        .examinees
        .iter()
        .flat_map(|e| &e.estimates)
        .any(|estimate| estimate.len() != attributes);
    if bad_estimate {
        return Err(mismatch(format!(
            "estimates do not all have {} attributes",
            attributes
        )));
    }

    Ok(())
}

fn invalid(label: &str, detail: String) -> SummaryError {
    SummaryError::InvalidRecord {
        label: label.to_string(),
        detail,
    }
}

/// Number of matching attributes between two patterns of equal width.
fn attribute_matches(estimate: &[u8], truth: &[u8]) -> usize {
    estimate.iter().zip(truth).filter(|(a, b)| a == b).count()
}

/// PCV and PCA after each item position, 1..=max_items.
fn position_recovery(record: &SimulationResult, reference: &ReferencePattern) -> AlphaRecovery {
    let n = record.examinees.len() as f64;
    let attributes = reference.attributes().max(1) as f64;

    let positions = (1..=record.specifications.max_items)
        .map(|position| {
            let mut exact = 0usize;
            let mut matched = 0usize;
            for (examinee, truth) in record.examinees.iter().zip(reference.rows()) {
                if let Some(estimate) = examinee.estimate_at(position) {
                    let hits = attribute_matches(estimate, truth);
                    matched += hits;
                    if hits == truth.len() {
                        exact += 1;
                    }
                }
            }
            PositionRecovery {
                position,
                pcv: exact as f64 / n,
                pca: matched as f64 / (n * attributes),
            }
        })
        .collect();

    AlphaRecovery::ByPosition { positions }
}

/// PCV and per-attribute PCA of the final estimates.
fn final_recovery(record: &SimulationResult, reference: &ReferencePattern) -> AlphaRecovery {
    let n = record.examinees.len() as f64;
    let mut exact = 0usize;
    let mut per_attribute = vec![0usize; reference.attributes()];

    for (examinee, truth) in record.examinees.iter().zip(reference.rows()) {
        if let Some(estimate) = examinee.final_estimate() {
            if estimate == truth.as_slice() {
                exact += 1;
            }
            for (k, (a, b)) in estimate.iter().zip(truth).enumerate() {
                if a == b {
                    per_attribute[k] += 1;
                }
            }
        }
    }

    let pca_by_attribute: Vec<f64> = per_attribute.iter().map(|&c| c as f64 / n).collect();
    AlphaRecovery::Final(FinalRecovery {
        pcv: exact as f64 / n,
        pca: mean(&pca_by_attribute),
        pca_by_attribute,
    })
}

fn item_exposure(record: &SimulationResult) -> Result<ItemExposure, SummaryError> {
    let n = record.examinees.len() as f64;
    let rates: Vec<f64> = record
        .exposure_counts()
        .into_iter()
        .map(|count| count as f64 / n)
        .collect();

    let stats = DescriptiveStats::from_values(&rates).ok_or_else(|| SummaryError::EmptyRecord {
        label: record.specifications.model.clone(),
    })?;

    Ok(ItemExposure { rates, stats })
}
