//! Input abstractions for curve and query coordinate arrays.
//!
//! ## Purpose
//!
//! This module provides a unified abstraction over the numeric containers
//! callers hold their data in, so curve construction and selection accept
//! slices, vectors, and ndarray arrays through a single interface.
//!
//! ## Design notes
//!
//! * **Zero-copy**: Every impl hands back a direct slice view of the
//!   underlying buffer.
//! * **Fail-fast**: Non-contiguous ndarray views are rejected before any
//!   computation starts.
//!
//! ## Non-goals
//!
//! * This module does not validate values (handled by the validator).
//! * This module does not reshape or convert between precisions.

// Feature-gated imports
#[cfg(feature = "cpu")]
use ndarray::{ArrayBase, Data, Ix1};

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::SelectError;

/// Trait for types usable as a coordinate array input.
pub trait CmdInput<T: Float> {
    /// View the input as a contiguous slice.
    fn as_cmd_slice(&self) -> Result<&[T], SelectError>;
}

impl<T: Float> CmdInput<T> for [T] {
    fn as_cmd_slice(&self) -> Result<&[T], SelectError> {
        Ok(self)
    }
}

impl<T: Float> CmdInput<T> for Vec<T> {
    fn as_cmd_slice(&self) -> Result<&[T], SelectError> {
        Ok(self.as_slice())
    }
}

#[cfg(feature = "cpu")]
impl<T: Float, S> CmdInput<T> for ArrayBase<S, Ix1>
where
    S: Data<Elem = T>,
{
    fn as_cmd_slice(&self) -> Result<&[T], SelectError> {
        self.as_slice().ok_or_else(|| {
            SelectError::InvalidInput("ndarray input must be contiguous in memory".to_string())
        })
    }
}
