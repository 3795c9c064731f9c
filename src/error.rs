//! Error types for summary aggregation.

use thiserror::Error;

/// Errors that abort a summary before any result is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummaryError {
    /// A comparison across several records needs a reference pattern.
    #[error("a non-empty reference attribute pattern is required when summarizing several records")]
    MissingReference,

    /// Labels were given but do not line up with the records.
    #[error("{labels} labels were given for {records} records")]
    LabelLengthMismatch { labels: usize, records: usize },

    /// Fixed-length and variable-length records were mixed.
    #[error("records mix fixed-length and variable-length tests")]
    InconsistentMode,

    /// A comparison was requested over zero records.
    #[error("no simulation records to summarize")]
    EmptyInput,

    /// A record has no examinees or an empty item bank.
    #[error("record '{label}' has no examinees or an empty item bank")]
    EmptyRecord { label: String },

    /// The reference pattern does not match the record's examinees.
    #[error("reference pattern does not match record '{label}': {detail}")]
    ReferenceShapeMismatch { label: String, detail: String },

    /// The record's traces are internally inconsistent.
    #[error("invalid record '{label}': {detail}")]
    InvalidRecord { label: String, detail: String },
}
