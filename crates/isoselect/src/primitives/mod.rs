//! Layer 1: Primitives
//!
//! ## Purpose
//!
//! This layer provides the foundational types shared by every other layer:
//! the crate error enum and the eager input validators.
//!
//! ## Architecture
//!
//! ```text
//! Layer 5: API
//!   ↓
//! Layer 4: Engine
//!   ↓
//! Layer 3: Curve model
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Crate error type.
pub mod errors;

/// Fail-fast input validation.
pub mod validate;
