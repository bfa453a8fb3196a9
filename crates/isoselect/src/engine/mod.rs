//! Layer 4: Engine
//!
//! ## Purpose
//!
//! This layer runs the per-query passes: distance evaluation under a
//! metric, and the per-axis window test. Each pass has a sequential form
//! and a rayon-parallel form with identical results.
//!
//! ## Architecture
//!
//! ```text
//! Layer 5: API
//!   ↓
//! Layer 4: Engine ← You are here
//!   ↓
//! Layer 3: Curve model
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Distance and window evaluation passes.
pub mod executor;

/// Selection result types.
pub mod output;
