//! Layer 5: High-level API for isochrone selection.
//!
//! ## Purpose
//!
//! This module provides the primary user-facing entry point. It implements
//! a fluent builder for configuring the metric and thresholds and choosing
//! a selection policy (Band or Window).
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builder with sensible defaults for all
//!   parameters.
//! * **Polymorphic**: Uses marker types to transition to policy-specific
//!   builders.
//! * **Validated**: Thresholds and deferred metric errors are checked when
//!   `.build()` is called on the policy builder; query arrays are checked
//!   at the start of every `select` call.
//!
//! ## Key concepts
//!
//! * **Selection Policies**: Band (one radius threshold over a distance
//!   metric) and Window (independent per-axis thresholds around the
//!   nearest sample).
//! * **Configuration Flow**: Builder pattern ending in `.policy(...)`.
//!
//! ### Configuration Flow
//!
//! 1. Create a [`SelectorBuilder`] via `IsoSelect::new()`.
//! 2. Chain configuration methods (`.metric()`, `.threshold()`, etc.).
//! 3. Select a policy via `.policy(Band)` or `.policy(Window)` to get a
//!    policy builder, then `.build()` and `.select(&curve, color, mag)`.

// Feature-gated imports
#[cfg(feature = "cpu")]
use crate::engine::executor::{distance_pass_parallel, window_pass_parallel};

// External dependencies
use log::debug;
use num_traits::Float;

// Internal dependencies
use crate::curve::Isochrone;
use crate::engine::executor::{distance_pass, window_pass};
use crate::engine::output::SelectionResult;
use crate::input::CmdInput;
use crate::math::distance::DistanceMetric;
use crate::primitives::errors::SelectError;
use crate::primitives::validate::{validate_queries, validate_threshold};

// ============================================================================
// Policy Module
// ============================================================================

/// Policy selection namespace.
#[allow(non_snake_case)]
pub mod Policy {
    pub use super::{Band, Window};
}

// ============================================================================
// Entry Point
// ============================================================================

/// Entry point for building a selector.
#[derive(Debug, Clone, Copy)]
pub struct IsoSelect;

impl IsoSelect {
    /// Create a new selector builder with default parameters.
    #[allow(clippy::new_ret_no_self)]
    pub fn new<T: Float>() -> SelectorBuilder<T> {
        SelectorBuilder::default()
    }
}

// ============================================================================
// Shared Builder
// ============================================================================

/// Shared configuration collected before a policy is chosen.
#[derive(Debug, Clone)]
pub struct SelectorBuilder<T> {
    /// Distance metric for band selection.
    pub metric: DistanceMetric,
    /// Radius threshold for band selection.
    pub threshold: Option<T>,
    /// Color threshold for window selection.
    pub color_threshold: Option<T>,
    /// Magnitude threshold for window selection.
    pub mag_threshold: Option<T>,
    /// Parallel execution mode; policies pick their own default.
    pub parallel: Option<bool>,
    /// Configuration error deferred until `build()`.
    pub deferred_error: Option<SelectError>,
}

impl<T: Float> Default for SelectorBuilder<T> {
    fn default() -> Self {
        Self {
            metric: DistanceMetric::default(),
            threshold: None,
            color_threshold: None,
            mag_threshold: None,
            parallel: None,
            deferred_error: None,
        }
    }
}

impl<T: Float> SelectorBuilder<T> {
    /// Set the distance metric.
    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the distance metric by name (`"euclidean"` or
    /// `"perpendicular"`).
    ///
    /// An unknown name is deferred and surfaced as
    /// [`SelectError::UnknownMetric`] when `build()` runs.
    pub fn metric_name(mut self, name: &str) -> Self {
        match name.parse::<DistanceMetric>() {
            Ok(metric) => self.metric = metric,
            Err(err) => self.deferred_error = Some(err),
        }
        self
    }

    /// Set the radius threshold for band selection.
    pub fn threshold(mut self, threshold: T) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Set the color threshold for window selection.
    pub fn color_threshold(mut self, threshold: T) -> Self {
        self.color_threshold = Some(threshold);
        self
    }

    /// Set the magnitude threshold for window selection.
    pub fn mag_threshold(mut self, threshold: T) -> Self {
        self.mag_threshold = Some(threshold);
        self
    }

    /// Set parallel execution mode.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Choose a selection policy and transition to its builder.
    pub fn policy<P: SelectionPolicy<T>>(self, _policy: P) -> P::Output {
        P::convert(self)
    }
}

// ============================================================================
// Policy Marker Types
// ============================================================================

/// Conversion from the shared builder into a policy-specific builder.
pub trait SelectionPolicy<T: Float> {
    /// The policy-specific builder type.
    type Output;

    /// Convert the shared builder into the policy builder.
    fn convert(builder: SelectorBuilder<T>) -> Self::Output;
}

/// Marker for radius-based selection around the curve.
#[derive(Debug, Clone, Copy)]
pub struct Band;

impl<T: Float + Send + Sync> SelectionPolicy<T> for Band {
    type Output = BandSelectorBuilder<T>;

    fn convert(builder: SelectorBuilder<T>) -> Self::Output {
        // Batch evaluation defaults to parallel when available.
        let parallel = builder.parallel.unwrap_or(true);

        let mut base = builder;
        base.parallel = Some(parallel);
        BandSelectorBuilder { base }
    }
}

/// Marker for per-axis window selection around the nearest sample.
#[derive(Debug, Clone, Copy)]
pub struct Window;

impl<T: Float + Send + Sync> SelectionPolicy<T> for Window {
    type Output = WindowSelectorBuilder<T>;

    fn convert(builder: SelectorBuilder<T>) -> Self::Output {
        let parallel = builder.parallel.unwrap_or(true);

        let mut base = builder;
        base.parallel = Some(parallel);
        WindowSelectorBuilder { base }
    }
}

// ============================================================================
// Band Selection
// ============================================================================

/// Builder for the band (radius) selector.
#[derive(Debug, Clone)]
pub struct BandSelectorBuilder<T> {
    /// Shared configuration.
    pub base: SelectorBuilder<T>,
}

impl<T: Float + Send + Sync> BandSelectorBuilder<T> {
    /// Set the distance metric.
    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        self.base = self.base.metric(metric);
        self
    }

    /// Set the distance metric by name.
    pub fn metric_name(mut self, name: &str) -> Self {
        self.base = self.base.metric_name(name);
        self
    }

    /// Set the radius threshold.
    pub fn threshold(mut self, threshold: T) -> Self {
        self.base = self.base.threshold(threshold);
        self
    }

    /// Set parallel execution mode.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.base = self.base.parallel(parallel);
        self
    }

    /// Build the band selector.
    pub fn build(self) -> Result<BandSelector<T>, SelectError> {
        // Check for deferred configuration errors first
        if let Some(err) = self.base.deferred_error {
            return Err(err);
        }

        let threshold = self.base.threshold.ok_or_else(|| {
            SelectError::InvalidThreshold("band selection requires a threshold".to_string())
        })?;
        validate_threshold(threshold, "threshold")?;

        Ok(BandSelector {
            metric: self.base.metric,
            threshold,
            parallel: self.base.parallel.unwrap_or(true),
        })
    }
}

/// Radius-based selector: accepts queries whose distance to the curve does
/// not exceed the threshold (inclusive boundary).
#[derive(Debug, Clone)]
pub struct BandSelector<T> {
    metric: DistanceMetric,
    threshold: T,
    parallel: bool,
}

impl<T: Float + Send + Sync> BandSelector<T> {
    /// Select stars within the configured distance of the curve.
    ///
    /// Returns the mask and the per-query distances, index-aligned with
    /// the input. Fails with [`SelectError::InvalidInput`] when the query
    /// arrays are mismatched or contain non-finite values.
    pub fn select<I1, I2>(
        &self,
        curve: &Isochrone<T>,
        color: &I1,
        mag: &I2,
    ) -> Result<SelectionResult<T>, SelectError>
    where
        I1: CmdInput<T> + ?Sized,
        I2: CmdInput<T> + ?Sized,
    {
        let color = color.as_cmd_slice()?;
        let mag = mag.as_cmd_slice()?;
        validate_queries(color, mag)?;

        let distances = run_distance_pass(curve, color, mag, self.metric, self.parallel);
        let mask: Vec<bool> = distances.iter().map(|&d| d <= self.threshold).collect();

        debug!(
            "band selection ({}): {}/{} stars within threshold",
            self.metric.as_str(),
            mask.iter().filter(|&&m| m).count(),
            mask.len()
        );

        Ok(SelectionResult { mask, distances })
    }
}

// ============================================================================
// Window Selection
// ============================================================================

/// Builder for the window (per-axis) selector.
#[derive(Debug, Clone)]
pub struct WindowSelectorBuilder<T> {
    /// Shared configuration.
    pub base: SelectorBuilder<T>,
}

impl<T: Float + Send + Sync> WindowSelectorBuilder<T> {
    /// Set the color threshold.
    pub fn color_threshold(mut self, threshold: T) -> Self {
        self.base = self.base.color_threshold(threshold);
        self
    }

    /// Set the magnitude threshold.
    pub fn mag_threshold(mut self, threshold: T) -> Self {
        self.base = self.base.mag_threshold(threshold);
        self
    }

    /// Set parallel execution mode.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.base = self.base.parallel(parallel);
        self
    }

    /// Build the window selector.
    pub fn build(self) -> Result<WindowSelector<T>, SelectError> {
        if let Some(err) = self.base.deferred_error {
            return Err(err);
        }

        let color_threshold = self.base.color_threshold.ok_or_else(|| {
            SelectError::InvalidThreshold(
                "window selection requires a color threshold".to_string(),
            )
        })?;
        let mag_threshold = self.base.mag_threshold.ok_or_else(|| {
            SelectError::InvalidThreshold(
                "window selection requires a magnitude threshold".to_string(),
            )
        })?;
        validate_threshold(color_threshold, "color threshold")?;
        validate_threshold(mag_threshold, "magnitude threshold")?;

        Ok(WindowSelector {
            color_threshold,
            mag_threshold,
            parallel: self.base.parallel.unwrap_or(true),
        })
    }
}

/// Per-axis selector: accepts a query when both its color and magnitude
/// deviations from the nearest curve sample stay within the thresholds.
///
/// This is a box around the single nearest sample, not a sweep along the
/// curve: a query can be rejected even though some non-nearest sample
/// would have accepted it. The tradeoff keeps the per-query cost at one
/// nearest-neighbor lookup.
#[derive(Debug, Clone)]
pub struct WindowSelector<T> {
    color_threshold: T,
    mag_threshold: T,
    parallel: bool,
}

impl<T: Float + Send + Sync> WindowSelector<T> {
    /// Select stars inside the per-axis window around their nearest curve
    /// sample.
    pub fn select<I1, I2>(
        &self,
        curve: &Isochrone<T>,
        color: &I1,
        mag: &I2,
    ) -> Result<Vec<bool>, SelectError>
    where
        I1: CmdInput<T> + ?Sized,
        I2: CmdInput<T> + ?Sized,
    {
        let color = color.as_cmd_slice()?;
        let mag = mag.as_cmd_slice()?;
        validate_queries(color, mag)?;

        let mut mask = vec![false; color.len()];
        if self.parallel {
            #[cfg(feature = "cpu")]
            window_pass_parallel(
                curve,
                color,
                mag,
                self.color_threshold,
                self.mag_threshold,
                &mut mask,
            );
            #[cfg(not(feature = "cpu"))]
            window_pass(
                curve,
                color,
                mag,
                self.color_threshold,
                self.mag_threshold,
                &mut mask,
            );
        } else {
            window_pass(
                curve,
                color,
                mag,
                self.color_threshold,
                self.mag_threshold,
                &mut mask,
            );
        }

        debug!(
            "window selection: {}/{} stars within per-axis thresholds",
            mask.iter().filter(|&&m| m).count(),
            mask.len()
        );

        Ok(mask)
    }
}

// ============================================================================
// Distance-Only Entry Point
// ============================================================================

/// Compute per-query distances to the curve without thresholding.
///
/// Fails with [`SelectError::InvalidInput`] when the query arrays are
/// mismatched or contain non-finite values. The result is index-aligned
/// with the query set.
pub fn compute_distances<T, I1, I2>(
    curve: &Isochrone<T>,
    color: &I1,
    mag: &I2,
    metric: DistanceMetric,
) -> Result<Vec<T>, SelectError>
where
    T: Float + Send + Sync,
    I1: CmdInput<T> + ?Sized,
    I2: CmdInput<T> + ?Sized,
{
    let color = color.as_cmd_slice()?;
    let mag = mag.as_cmd_slice()?;
    validate_queries(color, mag)?;
    Ok(run_distance_pass(curve, color, mag, metric, true))
}

fn run_distance_pass<T>(
    curve: &Isochrone<T>,
    color: &[T],
    mag: &[T],
    metric: DistanceMetric,
    parallel: bool,
) -> Vec<T>
where
    T: Float + Send + Sync,
{
    let mut distances = vec![T::zero(); color.len()];
    if parallel {
        #[cfg(feature = "cpu")]
        distance_pass_parallel(curve, color, mag, metric, &mut distances);
        #[cfg(not(feature = "cpu"))]
        distance_pass(curve, color, mag, metric, &mut distances);
    } else {
        distance_pass(curve, color, mag, metric, &mut distances);
    }
    distances
}
