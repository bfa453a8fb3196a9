//! Fail-fast validation for curves, query sets, and thresholds.
//!
//! ## Purpose
//!
//! This module centralizes every input check so that the math, curve, and
//! engine layers can assume validated data. Validation always runs before
//! computation starts; a failing check returns immediately with no partial
//! results.
//!
//! ## Invariants
//!
//! * Curve arrays must have equal lengths, at least 2 samples, and only
//!   finite values.
//! * Query arrays must have equal lengths and only finite values; an empty
//!   query set is legal.
//! * Thresholds must be non-negative and not NaN; positive infinity is
//!   allowed (a select-everything window).
//!
//! ## Non-goals
//!
//! * This module does not clean, sort, or otherwise transform data.
//! * This module does not deduplicate coincident curve samples.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::SelectError;

/// Validate the two coordinate arrays of a reference curve.
pub fn validate_curve<T: Float>(color: &[T], mag: &[T]) -> Result<(), SelectError> {
    if color.len() != mag.len() {
        return Err(SelectError::InvalidCurve(format!(
            "color has {} samples but magnitude has {}",
            color.len(),
            mag.len()
        )));
    }
    if color.len() < 2 {
        return Err(SelectError::InvalidCurve(format!(
            "a curve needs at least 2 samples, got {}",
            color.len()
        )));
    }
    check_finite(color, "curve color").map_err(SelectError::InvalidCurve)?;
    check_finite(mag, "curve magnitude").map_err(SelectError::InvalidCurve)?;
    Ok(())
}

/// Validate the two coordinate arrays of a query set.
///
/// Empty query sets pass: selecting over zero stars yields empty outputs.
pub fn validate_queries<T: Float>(color: &[T], mag: &[T]) -> Result<(), SelectError> {
    if color.len() != mag.len() {
        return Err(SelectError::InvalidInput(format!(
            "color has {} values but magnitude has {}",
            color.len(),
            mag.len()
        )));
    }
    check_finite(color, "query color").map_err(SelectError::InvalidInput)?;
    check_finite(mag, "query magnitude").map_err(SelectError::InvalidInput)?;
    Ok(())
}

/// Validate a single selection threshold.
///
/// `name` identifies the threshold in the error message.
pub fn validate_threshold<T: Float>(value: T, name: &str) -> Result<(), SelectError> {
    if value.is_nan() || value < T::zero() {
        return Err(SelectError::InvalidThreshold(format!(
            "{name} must be non-negative"
        )));
    }
    Ok(())
}

fn check_finite<T: Float>(values: &[T], name: &str) -> Result<(), String> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(format!("{name} contains a non-finite value at index {i}")),
        None => Ok(()),
    }
}
