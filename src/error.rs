//! Error types for the conjoint pipeline.
//!
//! Every stage returns [`ConjointError`]. None of the variants are
//! recoverable inside a run; the binary reports them and exits.

use thiserror::Error;

/// Errors that can occur while loading, encoding, fitting or summarizing.
#[derive(Debug, Error)]
pub enum ConjointError {
    /// The dataset could not be read, or a required value is malformed.
    #[error("failed to load data: {0}")]
    DataLoadFailure(String),

    /// A configured attribute (or the choice column) is not in the dataset.
    #[error("column '{column}' not found in dataset. Available columns: {available:?}")]
    MissingAttributeColumn {
        column: String,
        available: Vec<String>,
    },

    /// A value, profile or label vector does not match the encoding universe.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The logit optimizer stopped without a usable solution.
    #[error(
        "logit fit failed to converge after {iterations} iteration(s): {reason} (log-likelihood {log_likelihood:.6})"
    )]
    ConvergenceFailure {
        reason: String,
        iterations: usize,
        log_likelihood: f64,
    },

    /// Part-worth utilities span no range, so importances are undefined.
    #[error("degenerate model: {0}")]
    DegenerateModel(String),

    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),
}

pub type Result<T> = std::result::Result<T, ConjointError>;
