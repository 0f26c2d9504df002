//! # Vector Index Traits
//!
//! Common interface for the index implementations, plus the search
//! parameter types shared by all of them.

use serde::{Deserialize, Serialize};

/// Search result with point id and distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    pub id: usize,
    pub distance: f32,
}

impl Eq for SearchResult {}

impl PartialOrd for SearchResult {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchResult {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Normal order: smaller distance = smaller in ordering.
        // BinaryHeap is a max-heap, so the worst result sits on top
        // and gets popped when the set overflows.
        self.distance
            .partial_cmp(&other.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
    }
}

/// Leaf-scan budget for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Checks {
    /// Exact descent: every subtree that cannot be pruned is visited
    Unlimited,
    /// Best-bin-first descent, stopping once this many dataset points
    /// have been scanned at leaves and the result set is full
    Bounded(usize),
}

/// Search-time parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pub checks: Checks,
}

impl SearchParams {
    /// Exact-descent search
    pub fn exact() -> Self {
        Self {
            checks: Checks::Unlimited,
        }
    }

    /// Bounded search with the given leaf-scan budget
    pub fn bounded(checks: usize) -> Self {
        Self {
            checks: Checks::Bounded(checks),
        }
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            checks: Checks::Bounded(32),
        }
    }
}

/// Vector index trait - implemented by the flat and k-means indices
pub trait VectorIndex {
    /// Search for the k nearest neighbors of `query`
    fn search(&self, query: &[f32], k: usize, params: &SearchParams) -> Vec<SearchResult>;

    /// Number of points in the index
    fn len(&self) -> usize;

    /// Check if empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vector dimension
    fn dimension(&self) -> usize;
}
