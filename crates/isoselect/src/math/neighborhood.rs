//! 2D nearest-neighbor search (KD-tree implementation).
//!
//! ## Purpose
//!
//! This module provides the spatial index behind nearest-sample queries:
//! a KD-tree over the curve's color-magnitude samples, built once per
//! curve and queried many times. Construction is parallelized at the top
//! levels of recursion when the `cpu` feature is enabled.
//!
//! ## Design notes
//!
//! * **Eytzinger Layout**: Cache-optimal array layout (left-complete binary
//!   tree); node `v` has children `2v` and `2v + 1`, all in `1..=n`.
//! * **Median Splitting**: Balanced construction via `select_nth_unstable`.
//! * **Permuted Buffer**: Node coordinates are copied into layout order so
//!   the search touches memory sequentially.
//! * **Recursive Parallelism**: The parallel builder uses `rayon::join`
//!   with raw pointers for concurrent writes to disjoint array indices.
//!
//! ## Invariants
//!
//! * Parallel construction produces an identical tree to sequential
//!   construction.
//! * Queries return the lowest original index among exactly equidistant
//!   samples.
//! * The tree is immutable after construction.
//!
//! ## Non-goals
//!
//! * This module does not support dynamic updates.
//! * This module does not validate coordinates (handled by the validator).

// External dependencies
use num_traits::Float;
use std::cmp::Ordering;

// Feature-gated imports
#[cfg(feature = "cpu")]
use rayon::join;

/// Splits at or below this size stay on the current thread.
#[cfg(feature = "cpu")]
const PARALLEL_SPLIT_THRESHOLD: usize = 1024;

/// A single KD-tree node: the index of the curve sample it holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct KDNode {
    /// Index of the sample in the original curve ordering.
    pub index: usize,
}

/// KD-tree over 2D points stored flat as `[x0, y0, x1, y1, ...]`.
#[derive(Debug, Clone)]
pub struct KDTree<T> {
    nodes: Vec<KDNode>,
    permuted_points: Vec<T>,
}

impl<T: Float> KDTree<T> {
    /// Build the tree sequentially from a flat point buffer.
    pub fn new(points: &[T]) -> Self {
        let n = points.len() / 2;
        let mut nodes = vec![KDNode::default(); n];
        let mut permuted_points = vec![T::zero(); n * 2];
        let mut indices: Vec<usize> = (0..n).collect();

        if n > 0 {
            build_recursive(
                points,
                &mut indices,
                &mut nodes,
                &mut permuted_points,
                0,
                1,
            );
        }

        Self {
            nodes,
            permuted_points,
        }
    }

    /// Assemble a tree from prebuilt parts (used by the parallel builder).
    pub fn from_parts(nodes: Vec<KDNode>, permuted_points: Vec<T>) -> Self {
        Self {
            nodes,
            permuted_points,
        }
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no points.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Size of the left subtree of a left-complete binary tree with `n`
    /// nodes.
    pub fn calculate_left_subtree_size(n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        // Height of the complete tree, then the capacity of the left
        // child's last level.
        let height = usize::BITS as usize - n.leading_zeros() as usize;
        let half = 1usize << (height - 2);
        let last_level = n - ((1usize << (height - 1)) - 1);
        (half - 1) + last_level.min(half)
    }

    /// Find the sample nearest to `(qx, qy)`.
    ///
    /// Returns `(original_index, squared_distance)`. Among exactly
    /// equidistant samples the lowest original index wins, so equidistant
    /// subtrees are descended rather than pruned. The tree must be
    /// non-empty.
    pub fn find_nearest(&self, qx: T, qy: T) -> (usize, T) {
        let mut best_index = usize::MAX;
        let mut best_d2 = T::infinity();
        self.search(1, 0, qx, qy, &mut best_index, &mut best_d2);
        (best_index, best_d2)
    }

    fn search(
        &self,
        v: usize,
        depth: usize,
        qx: T,
        qy: T,
        best_index: &mut usize,
        best_d2: &mut T,
    ) {
        if v > self.nodes.len() {
            return;
        }

        let base = (v - 1) * 2;
        let px = self.permuted_points[base];
        let py = self.permuted_points[base + 1];
        let dx = qx - px;
        let dy = qy - py;
        let d2 = dx * dx + dy * dy;
        let index = self.nodes[v - 1].index;

        if d2 < *best_d2 || (d2 == *best_d2 && index < *best_index) {
            *best_d2 = d2;
            *best_index = index;
        }

        // Signed distance to the splitting plane at this depth.
        let split = if depth % 2 == 0 { dx } else { dy };
        let (near, far) = if split < T::zero() {
            (2 * v, 2 * v + 1)
        } else {
            (2 * v + 1, 2 * v)
        };

        self.search(near, depth + 1, qx, qy, best_index, best_d2);

        // <= keeps exactly-equidistant far subtrees reachable for the
        // lowest-index tie-break.
        if split * split <= *best_d2 {
            self.search(far, depth + 1, qx, qy, best_index, best_d2);
        }
    }
}

fn axis_compare<T: Float>(points: &[T], axis: usize, a: usize, b: usize) -> Ordering {
    let val_a = points[a * 2 + axis];
    let val_b = points[b * 2 + axis];
    val_a.partial_cmp(&val_b).unwrap_or(Ordering::Equal)
}

fn build_recursive<T: Float>(
    points: &[T],
    indices: &mut [usize],
    nodes: &mut [KDNode],
    permuted_points: &mut [T],
    depth: usize,
    v: usize,
) {
    let n = indices.len();
    if n == 0 {
        return;
    }

    let axis = depth % 2;
    let mid = KDTree::<T>::calculate_left_subtree_size(n);

    // Partition around the median for this axis
    indices.select_nth_unstable_by(mid, |&a, &b| axis_compare(points, axis, a, b));

    nodes[v - 1].index = indices[mid];
    let dest = (v - 1) * 2;
    let src = indices[mid] * 2;
    permuted_points[dest] = points[src];
    permuted_points[dest + 1] = points[src + 1];

    let (left_indices, right_indices_with_mid) = indices.split_at_mut(mid);
    let right_indices = &mut right_indices_with_mid[1..];

    build_recursive(points, left_indices, nodes, permuted_points, depth + 1, 2 * v);
    build_recursive(
        points,
        right_indices,
        nodes,
        permuted_points,
        depth + 1,
        2 * v + 1,
    );
}

/// Parallel KD-tree builder using Rayon.
///
/// Produces the same tree as [`KDTree::new`], splitting the recursion
/// across threads at the upper levels.
#[cfg(feature = "cpu")]
pub fn build_kdtree_parallel<T>(points: &[T]) -> KDTree<T>
where
    T: Float + Send + Sync,
{
    let n = points.len() / 2;
    let mut nodes = vec![KDNode::default(); n];
    let mut permuted_points = vec![T::zero(); n * 2];
    let mut indices: Vec<usize> = (0..n).collect();

    if n > 0 {
        // SAFETY: raw pointers allow concurrent writes to the node and
        // permuted-point arrays. The Eytzinger layout guarantees that the
        // 2v and 2v + 1 recursion paths touch disjoint indices, so no two
        // threads ever write to the same slot.
        let nodes_ptr = nodes.as_mut_ptr() as usize;
        let permuted_ptr = permuted_points.as_mut_ptr() as usize;

        build_recursive_parallel(points, &mut indices, nodes_ptr, permuted_ptr, 0, 1);
    }

    KDTree::from_parts(nodes, permuted_points)
}

#[cfg(feature = "cpu")]
fn build_recursive_parallel<T>(
    points: &[T],
    indices: &mut [usize],
    nodes_ptr: usize,
    permuted_ptr: usize,
    depth: usize,
    v: usize,
) where
    T: Float + Send + Sync,
{
    let n = indices.len();
    if n == 0 {
        return;
    }

    let axis = depth % 2;
    let mid = KDTree::<T>::calculate_left_subtree_size(n);

    indices.select_nth_unstable_by(mid, |&a, &b| axis_compare(points, axis, a, b));

    // SAFETY: v is unique for each recursive call path.
    unsafe {
        let node_ref = &mut *(nodes_ptr as *mut KDNode).add(v - 1);
        node_ref.index = indices[mid];

        let dest_ptr = (permuted_ptr as *mut T).add((v - 1) * 2);
        let src_ptr = points.as_ptr().add(indices[mid] * 2);
        std::ptr::copy_nonoverlapping(src_ptr, dest_ptr, 2);
    }

    let (left_indices, right_indices_with_mid) = indices.split_at_mut(mid);
    let right_indices = &mut right_indices_with_mid[1..];

    if n > PARALLEL_SPLIT_THRESHOLD {
        join(
            || build_recursive_parallel(points, left_indices, nodes_ptr, permuted_ptr, depth + 1, 2 * v),
            || {
                build_recursive_parallel(
                    points,
                    right_indices,
                    nodes_ptr,
                    permuted_ptr,
                    depth + 1,
                    2 * v + 1,
                )
            },
        );
    } else {
        build_recursive_sequential(points, left_indices, nodes_ptr, permuted_ptr, depth + 1, 2 * v);
        build_recursive_sequential(
            points,
            right_indices,
            nodes_ptr,
            permuted_ptr,
            depth + 1,
            2 * v + 1,
        );
    }
}

#[cfg(feature = "cpu")]
fn build_recursive_sequential<T>(
    points: &[T],
    indices: &mut [usize],
    nodes_ptr: usize,
    permuted_ptr: usize,
    depth: usize,
    v: usize,
) where
    T: Float + Send + Sync,
{
    let n = indices.len();
    if n == 0 {
        return;
    }

    let axis = depth % 2;
    let mid = KDTree::<T>::calculate_left_subtree_size(n);

    indices.select_nth_unstable_by(mid, |&a, &b| axis_compare(points, axis, a, b));

    unsafe {
        let node_ref = &mut *(nodes_ptr as *mut KDNode).add(v - 1);
        node_ref.index = indices[mid];

        let dest_ptr = (permuted_ptr as *mut T).add((v - 1) * 2);
        let src_ptr = points.as_ptr().add(indices[mid] * 2);
        std::ptr::copy_nonoverlapping(src_ptr, dest_ptr, 2);
    }

    let (left_indices, right_indices_with_mid) = indices.split_at_mut(mid);
    let right_indices = &mut right_indices_with_mid[1..];

    build_recursive_sequential(points, left_indices, nodes_ptr, permuted_ptr, depth + 1, 2 * v);
    build_recursive_sequential(
        points,
        right_indices,
        nodes_ptr,
        permuted_ptr,
        depth + 1,
        2 * v + 1,
    );
}

/// Fallback for builds without the `cpu` feature.
#[cfg(not(feature = "cpu"))]
pub fn build_kdtree_parallel<T>(points: &[T]) -> KDTree<T>
where
    T: Float,
{
    KDTree::new(points)
}
