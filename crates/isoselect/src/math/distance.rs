//! Distance metrics and point/segment geometry.
//!
//! ## Purpose
//!
//! This module defines the two supported distance metrics and the scalar
//! geometry they are built from: squared Euclidean point distance and
//! clamped projection of a point onto a finite segment.
//!
//! ## Design notes
//!
//! * **Squared distances internally**: Comparisons run on squared values;
//!   the square root is taken once, at the end.
//! * **Finite segments**: Projections are clamped to the segment endpoints,
//!   never extended along the infinite carrier line.
//! * **Degenerate segments**: A zero-length segment degrades to the point
//!   distance to its first endpoint, so no division by zero can occur.
//!
//! ## Key concepts
//!
//! * **Euclidean metric**: Distance to the nearest curve sample; ignores
//!   the local curve direction.
//! * **Perpendicular metric**: Distance to the clamped projection onto the
//!   locally nearest curve segment.

// External dependencies
use num_traits::Float;
use std::str::FromStr;

// Internal dependencies
use crate::primitives::errors::SelectError;

/// Distance metric used when comparing query points against the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// Euclidean distance to the nearest curve sample.
    #[default]
    Euclidean,
    /// Distance to the clamped projection onto the locally nearest segment.
    Perpendicular,
}

impl DistanceMetric {
    /// Canonical lowercase name of the metric.
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Perpendicular => "perpendicular",
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = SelectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "euclidean" => Ok(DistanceMetric::Euclidean),
            "perpendicular" => Ok(DistanceMetric::Perpendicular),
            other => Err(SelectError::UnknownMetric(other.to_string())),
        }
    }
}

/// Squared Euclidean distance between `(ax, ay)` and `(bx, by)`.
#[inline]
pub fn euclidean_squared<T: Float>(ax: T, ay: T, bx: T, by: T) -> T {
    let dx = ax - bx;
    let dy = ay - by;
    dx * dx + dy * dy
}

/// Project `(px, py)` onto the finite segment from `(ax, ay)` to `(bx, by)`.
///
/// Returns `(distance, [cx, cy], t)` where `[cx, cy]` is the closest point
/// on the segment and `t` is the clamped parameter in `[0, 1]`. A
/// zero-length segment is treated as the point `(ax, ay)` with `t = 0`.
pub fn distance_to_segment<T: Float>(
    px: T,
    py: T,
    ax: T,
    ay: T,
    bx: T,
    by: T,
) -> (T, [T; 2], T) {
    let vx = bx - ax;
    let vy = by - ay;
    let len2 = vx * vx + vy * vy;

    if len2 == T::zero() {
        let dist = euclidean_squared(px, py, ax, ay).sqrt();
        return (dist, [ax, ay], T::zero());
    }

    let wx = px - ax;
    let wy = py - ay;
    let t = ((wx * vx + wy * vy) / len2)
        .max(T::zero())
        .min(T::one());
    let cx = ax + t * vx;
    let cy = ay + t * vy;
    let dist = euclidean_squared(px, py, cx, cy).sqrt();
    (dist, [cx, cy], t)
}
