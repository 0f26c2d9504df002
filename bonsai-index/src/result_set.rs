//! # Result Collection
//!
//! Bounded k-nearest collector fed by the tree search. The search code
//! only relies on three operations: `add_point`, `worst_dist` and
//! `full`; everything else is convenience for callers.

use std::collections::BinaryHeap;

use crate::traits::SearchResult;

/// Collector for the k nearest points seen so far.
///
/// Backed by a max-heap so the current k-th best (the worst kept
/// distance) is always on top.
#[derive(Debug, Clone)]
pub struct KnnResultSet {
    capacity: usize,
    heap: BinaryHeap<SearchResult>,
}

impl KnnResultSet {
    /// Create a collector for `k` neighbors (`k >= 1`)
    pub fn new(k: usize) -> Self {
        debug_assert!(k > 0);
        Self {
            capacity: k,
            heap: BinaryHeap::with_capacity(k + 1),
        }
    }

    /// Submit a candidate point
    pub fn add_point(&mut self, distance: f32, id: usize) {
        self.heap.push(SearchResult { id, distance });
        if self.heap.len() > self.capacity {
            self.heap.pop();
        }
    }

    /// Current k-th best distance; `f32::MAX` until the set is full,
    /// which disables pruning during the warm-up phase of a search.
    pub fn worst_dist(&self) -> f32 {
        if self.heap.len() < self.capacity {
            f32::MAX
        } else {
            self.heap.peek().map(|r| r.distance).unwrap_or(f32::MAX)
        }
    }

    /// Has the collector reached capacity?
    pub fn full(&self) -> bool {
        self.heap.len() == self.capacity
    }

    /// Number of collected results
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Consume the collector, returning results sorted by ascending
    /// distance
    pub fn into_sorted_vec(self) -> Vec<SearchResult> {
        let mut results = self.heap.into_vec();
        results.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results
    }
}
