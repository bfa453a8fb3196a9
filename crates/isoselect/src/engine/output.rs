//! Selection result types.

// External dependencies
use num_traits::Float;

/// Result of a distance-based selection.
///
/// Both arrays are index-aligned with the query set, so callers can
/// inspect borderline cases without recomputation.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionResult<T> {
    /// `mask[i]` is true when query `i` passed the threshold.
    pub mask: Vec<bool>,
    /// Distance of query `i` to the curve under the configured metric.
    pub distances: Vec<T>,
}

impl<T: Float> SelectionResult<T> {
    /// Number of queries the selection ran over.
    pub fn len(&self) -> usize {
        self.mask.len()
    }

    /// Whether the query set was empty.
    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }

    /// Number of selected queries.
    pub fn selected_count(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }
}
