//! Isochrone-based star selection in color-magnitude diagrams.
//!
//! ## Purpose
//!
//! This crate selects observed stars that lie close to a reference
//! isochrone in 2D color-magnitude space. The curve is an ordered polyline
//! of samples; each query star gets a scalar distance to the curve under a
//! chosen metric, and a selection policy turns distances (or per-axis
//! deviations) into a boolean mask.
//!
//! Two metrics are supported:
//!
//! * **Euclidean**: distance to the nearest curve sample.
//! * **Perpendicular**: distance to the clamped projection onto the
//!   locally nearest curve segment.
//!
//! Two selection policies are supported:
//!
//! * **Band**: one radius threshold over a distance metric; returns the
//!   mask and the distances.
//! * **Window**: independent color and magnitude thresholds around the
//!   nearest curve sample; returns the mask.
//!
//! ## Architecture
//!
//! ```text
//! Layer 5: API            (builder, policies)
//!   ↓
//! Layer 4: Engine         (distance/window passes, results)
//!   ↓
//! Layer 3: Curve model    (Isochrone, nearest sample/segment)
//!   ↓
//! Layer 2: Math           (metrics, segment projection, KD-tree)
//!   ↓
//! Layer 1: Primitives     (errors, validation)
//! ```
//!
//! ## Example
//!
//! ```
//! use isoselect::prelude::*;
//!
//! # fn main() -> Result<(), SelectError> {
//! let iso_color = vec![0.0, 0.5, 1.0, 1.5, 2.0];
//! let iso_mag = vec![10.0, 11.0, 12.0, 13.0, 14.0];
//! let curve = Isochrone::new(&iso_color, &iso_mag)?;
//!
//! let star_color = vec![0.3, 0.7, 1.2, 3.0];
//! let star_mag = vec![10.5, 11.3, 12.1, 15.0];
//!
//! let result = IsoSelect::new()
//!     .metric(Perpendicular)
//!     .threshold(0.3)
//!     .policy(Band)
//!     .build()?
//!     .select(&curve, &star_color, &star_mag)?;
//!
//! assert_eq!(result.mask, vec![true, true, true, false]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! An [`Isochrone`](curve::Isochrone) is immutable after construction and
//! safe to share across threads for concurrent queries. With the default
//! `cpu` feature, batch passes run in parallel via rayon; parallel and
//! sequential execution produce identical results.

/// Layer 5: builder API and selection policies.
pub mod api;

/// Layer 3: the curve model.
pub mod curve;

/// Layer 4: evaluation passes and result types.
pub mod engine;

/// Input abstraction (slices, vectors, ndarray).
pub mod input;

/// Layer 2: distance metrics and the KD-tree.
pub mod math;

/// Layer 1: errors and validation.
pub mod primitives;

/// Commonly used items.
pub mod prelude {
    pub use crate::api::{
        compute_distances, Band, BandSelector, IsoSelect, SelectionPolicy, Window,
        WindowSelector,
    };
    pub use crate::curve::{Isochrone, SegmentProjection};
    pub use crate::engine::output::SelectionResult;
    pub use crate::input::CmdInput;
    pub use crate::math::distance::DistanceMetric::{self, Euclidean, Perpendicular};
    pub use crate::primitives::errors::SelectError;
}
