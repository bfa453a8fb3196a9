//! Layer 3: Curve model
//!
//! ## Purpose
//!
//! This module owns the reference isochrone: an ordered polyline of
//! color-magnitude samples plus the spatial index built over them. It
//! answers the two queries everything else is built from: nearest sample
//! and nearest local segment.
//!
//! ## Design notes
//!
//! * **Build once, query many**: The KD-tree is constructed exactly once,
//!   at `Isochrone::new`, and never mutated afterwards. The model is
//!   `Sync`, so threads may share it for concurrent read-only queries.
//! * **Order is authoritative**: Samples are kept in caller order;
//!   consecutive samples define the polyline segments. The model never
//!   re-sorts.
//! * **Local segment search**: `nearest_segment` only examines the (at
//!   most) two segments adjacent to the nearest sample. For smooth,
//!   densely sampled curves this matches the true nearest segment; for
//!   sharp cusps or sparse sampling it is a documented approximation, kept
//!   for its O(log N) per-query cost.
//!
//! ## Invariants
//!
//! * A curve has at least 2 samples with finite coordinates.
//! * Tie-breaks are deterministic: lowest sample index, then lowest
//!   segment index.
//! * Returned distances are finite and non-negative.

// External dependencies
use log::debug;
use num_traits::Float;

// Internal dependencies
use crate::input::CmdInput;
use crate::math::distance::distance_to_segment;
use crate::math::neighborhood::KDTree;
use crate::primitives::errors::SelectError;
use crate::primitives::validate::validate_curve;

// Feature-gated imports
#[cfg(feature = "cpu")]
use crate::math::neighborhood::build_kdtree_parallel;

/// Closest point on a curve segment, as returned by
/// [`Isochrone::nearest_segment`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection<T> {
    /// Index of the segment: segment `i` joins samples `i` and `i + 1`.
    pub segment: usize,
    /// Closest point on the segment, as `[color, magnitude]`.
    pub point: [T; 2],
    /// Euclidean distance from the query to `point`.
    pub distance: T,
}

/// Reference isochrone in color-magnitude space.
///
/// Owns a flat copy of the samples (`[c0, m0, c1, m1, ...]`) and the
/// KD-tree indexing them.
#[derive(Debug, Clone)]
pub struct Isochrone<T> {
    points: Vec<T>,
    tree: KDTree<T>,
}

impl<T: Float + Send + Sync> Isochrone<T> {
    /// Build a curve model from its color and magnitude samples.
    ///
    /// Fails with [`SelectError::InvalidCurve`] when the arrays have
    /// mismatched lengths, fewer than 2 samples, or non-finite values.
    pub fn new<I1, I2>(color: &I1, mag: &I2) -> Result<Self, SelectError>
    where
        I1: CmdInput<T> + ?Sized,
        I2: CmdInput<T> + ?Sized,
    {
        let color = color.as_cmd_slice()?;
        let mag = mag.as_cmd_slice()?;
        validate_curve(color, mag)?;

        let mut points = Vec::with_capacity(color.len() * 2);
        for (&c, &m) in color.iter().zip(mag.iter()) {
            points.push(c);
            points.push(m);
        }

        #[cfg(feature = "cpu")]
        let tree = build_kdtree_parallel(&points);
        #[cfg(not(feature = "cpu"))]
        let tree = KDTree::new(&points);

        debug!("built spatial index over {} curve samples", color.len());

        Ok(Self { points, tree })
    }

    /// Number of curve samples.
    pub fn len(&self) -> usize {
        self.points.len() / 2
    }

    /// Always false: construction rejects curves with fewer than 2 samples.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Color of sample `i`.
    #[inline]
    pub fn color(&self, i: usize) -> T {
        self.points[i * 2]
    }

    /// Magnitude of sample `i`.
    #[inline]
    pub fn mag(&self, i: usize) -> T {
        self.points[i * 2 + 1]
    }

    /// Index and Euclidean distance of the sample nearest to the query.
    ///
    /// Exactly equidistant samples resolve to the lowest index.
    pub fn nearest_sample(&self, color: T, mag: T) -> (usize, T) {
        let (index, d2) = self.tree.find_nearest(color, mag);
        (index, d2.sqrt())
    }

    /// Closest point among the segments adjacent to the nearest sample.
    ///
    /// Finds the nearest sample, then projects the query onto the segment
    /// before it and the segment after it (where they exist), clamped to
    /// the segment endpoints. The closer projection wins; an exact tie
    /// resolves to the lower segment index. A zero-length segment degrades
    /// to the point distance to its first endpoint.
    pub fn nearest_segment(&self, color: T, mag: T) -> SegmentProjection<T> {
        let (i, _) = self.tree.find_nearest(color, mag);
        let last = self.len() - 1;

        let first_segment = if i == 0 { 0 } else { i - 1 };
        let mut best = self.project_onto(first_segment, color, mag);

        // Second adjacent segment exists only for interior samples.
        if i > 0 && i < last {
            let candidate = self.project_onto(i, color, mag);
            if candidate.distance < best.distance {
                best = candidate;
            }
        }

        best
    }

    fn project_onto(&self, segment: usize, color: T, mag: T) -> SegmentProjection<T> {
        let (distance, point, _t) = distance_to_segment(
            color,
            mag,
            self.color(segment),
            self.mag(segment),
            self.color(segment + 1),
            self.mag(segment + 1),
        );
        SegmentProjection {
            segment,
            point,
            distance,
        }
    }
}
