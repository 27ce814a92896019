//! Error taxonomy for summary selection.
//!
//! Construction errors are fatal at construction, usage errors at the call
//! site, and numerical errors surface to the caller at the first point they
//! are detectable. Nothing is swallowed, clamped, or silently substituted;
//! each variant carries the faulting parameter where one exists.

use thiserror::Error;

use crate::Scalar;

/// Result alias used throughout the crate.
pub type SelectionResult<T> = Result<T, SelectionError>;

/// Failures of the dense linear-algebra layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinalgError {
    /// A Cholesky column hit a non-positive radicand, so the matrix has no
    /// real factorization.
    #[error("matrix is not positive definite (column {column}, radicand {radicand})")]
    NotPositiveDefinite { column: usize, radicand: Scalar },
}

/// Failures surfaced by objectives and optimizers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    /// The cardinality budget K must be at least 1.
    #[error("cardinality budget must be at least 1 (K = {k})")]
    InvalidBudget { k: usize },

    /// Threshold sampling needs a positive epsilon and a non-empty
    /// geometric range.
    #[error("threshold grid over [{lower}, {upper}] with epsilon = {epsilon} is empty")]
    InvalidThresholdRange {
        lower: Scalar,
        upper: Scalar,
        epsilon: Scalar,
    },

    /// A hyperparameter that must be strictly positive was not.
    #[error("{name} must be positive (got {value})")]
    InvalidHyperparameter { name: &'static str, value: Scalar },

    /// The optimizer only supports batch fitting.
    #[error("{optimizer} does not support streaming; use fit() instead")]
    StreamingUnsupported { optimizer: &'static str },

    /// An accessor was called before any data was offered.
    #[error("no data has been offered yet; call fit() or offer() first")]
    NotFitted,

    /// The ids sequence does not pair up 1:1 with the data sequence.
    #[error("ids length {ids} does not match the number of items {items}")]
    IdsCardinalityMismatch { ids: usize, items: usize },

    /// The objective's maintained kernel matrix lost positive definiteness,
    /// e.g. under a pathological kernel.
    #[error("objective is not positive definite: {0}")]
    ObjectiveNotPositiveDefinite(#[from] LinalgError),
}
