//! Error types for isochrone selection.
//!
//! ## Purpose
//!
//! This module defines the single error enum surfaced by the crate. Every
//! failure mode is an input problem: the caller fixes the input and
//! re-invokes. There is no transient or retryable failure, since all
//! operations are deterministic pure computations with no I/O.
//!
//! ## Key concepts
//!
//! * **Eager detection**: All errors are raised before any computation
//!   begins; no partial results are ever returned.
//! * **Four failure kinds**: curve construction, query validation,
//!   threshold configuration, and metric naming.

// External dependencies
use thiserror::Error;

/// Errors produced by curve construction, distance computation, and
/// selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    /// The reference curve is unusable: mismatched coordinate arrays,
    /// fewer than 2 samples, or non-finite coordinates.
    #[error("invalid curve: {0}")]
    InvalidCurve(String),

    /// The query set is unusable: mismatched coordinate arrays,
    /// non-finite values, or non-contiguous array storage.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A selection threshold is negative, NaN, or missing.
    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),

    /// A metric name is not one of the supported metrics.
    #[error("unknown metric: {0:?} (use \"euclidean\" or \"perpendicular\")")]
    UnknownMetric(String),
}
