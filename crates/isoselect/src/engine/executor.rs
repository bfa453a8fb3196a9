//! Distance and window evaluation passes.
//!
//! ## Purpose
//!
//! This module evaluates a validated query set against a curve model:
//! one scalar distance per query under the chosen metric, or one boolean
//! per query for the per-axis window test. Parallel variants distribute
//! the queries across CPU cores via rayon.
//!
//! ## Design notes
//!
//! * **Pure passes**: No state is shared between queries; output `i`
//!   depends only on query `i`, the curve model, and the configuration.
//! * **Identical results**: The parallel passes perform the same
//!   per-element arithmetic as the sequential ones, so outputs match
//!   exactly, not just approximately.
//!
//! ## Invariants
//!
//! * Input slices have matching lengths and only finite values.
//! * Output buffers are at least as long as the query set.
//! * Output order matches input order.
//!
//! ## Non-goals
//!
//! * This module does not validate input data (handled by the validator).
//! * This module does not apply distance thresholds (handled by the API
//!   layer).

// Feature-gated imports
#[cfg(feature = "cpu")]
use rayon::prelude::*;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::curve::Isochrone;
use crate::math::distance::DistanceMetric;

#[inline]
fn distance_for<T: Float + Send + Sync>(
    curve: &Isochrone<T>,
    metric: DistanceMetric,
    color: T,
    mag: T,
) -> T {
    match metric {
        DistanceMetric::Euclidean => curve.nearest_sample(color, mag).1,
        DistanceMetric::Perpendicular => curve.nearest_segment(color, mag).distance,
    }
}

#[inline]
fn within_window<T: Float + Send + Sync>(
    curve: &Isochrone<T>,
    color_threshold: T,
    mag_threshold: T,
    color: T,
    mag: T,
) -> bool {
    let (i, _) = curve.nearest_sample(color, mag);
    (color - curve.color(i)).abs() <= color_threshold
        && (mag - curve.mag(i)).abs() <= mag_threshold
}

/// Evaluate per-query distances to the curve, sequentially.
pub fn distance_pass<T>(
    curve: &Isochrone<T>,
    color: &[T],
    mag: &[T],
    metric: DistanceMetric,
    out: &mut [T],
) where
    T: Float + Send + Sync,
{
    for i in 0..color.len() {
        out[i] = distance_for(curve, metric, color[i], mag[i]);
    }
}

/// Evaluate per-query distances to the curve across CPU cores.
#[cfg(feature = "cpu")]
pub fn distance_pass_parallel<T>(
    curve: &Isochrone<T>,
    color: &[T],
    mag: &[T],
    metric: DistanceMetric,
    out: &mut [T],
) where
    T: Float + Send + Sync,
{
    let n = color.len();
    let distances: Vec<T> = (0..n)
        .into_par_iter()
        .map(|i| distance_for(curve, metric, color[i], mag[i]))
        .collect();
    out[..n].copy_from_slice(&distances);
}

/// Evaluate the per-axis window test around the nearest sample,
/// sequentially.
pub fn window_pass<T>(
    curve: &Isochrone<T>,
    color: &[T],
    mag: &[T],
    color_threshold: T,
    mag_threshold: T,
    out: &mut [bool],
) where
    T: Float + Send + Sync,
{
    for i in 0..color.len() {
        out[i] = within_window(curve, color_threshold, mag_threshold, color[i], mag[i]);
    }
}

/// Evaluate the per-axis window test across CPU cores.
#[cfg(feature = "cpu")]
pub fn window_pass_parallel<T>(
    curve: &Isochrone<T>,
    color: &[T],
    mag: &[T],
    color_threshold: T,
    mag_threshold: T,
    out: &mut [bool],
) where
    T: Float + Send + Sync,
{
    let n = color.len();
    let mask: Vec<bool> = (0..n)
        .into_par_iter()
        .map(|i| within_window(curve, color_threshold, mag_threshold, color[i], mag[i]))
        .collect();
    out[..n].copy_from_slice(&mask);
}
