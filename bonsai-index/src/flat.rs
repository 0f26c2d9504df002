//! # Flat Index (Brute-Force Exact Search)
//!
//! The "dumb" index that searches everything. Used for:
//! 1. Ground truth comparison (100% recall)
//! 2. Small datasets where tree overhead isn't worth it
//! 3. Testing tree index accuracy

use std::sync::Arc;

use crate::distance::DistanceMetric;
use crate::matrix::Matrix;
use crate::result_set::KnnResultSet;
use crate::traits::{SearchParams, SearchResult, VectorIndex};

/// Flat index for exact nearest neighbor search
pub struct FlatIndex {
    dataset: Arc<Matrix>,
    metric: DistanceMetric,
}

impl FlatIndex {
    /// Create a flat index over a dataset
    pub fn new(dataset: Arc<Matrix>, metric: DistanceMetric) -> Self {
        Self { dataset, metric }
    }
}

impl VectorIndex for FlatIndex {
    fn search(&self, query: &[f32], k: usize, _params: &SearchParams) -> Vec<SearchResult> {
        if self.dataset.rows() == 0 || k == 0 {
            return Vec::new();
        }
        debug_assert_eq!(query.len(), self.dataset.cols());

        let mut result = KnnResultSet::new(k);
        for (id, point) in self.dataset.iter_rows().enumerate() {
            result.add_point(self.metric.distance(query, point), id);
        }
        result.into_sorted_vec()
    }

    fn len(&self) -> usize {
        self.dataset.rows()
    }

    fn dimension(&self) -> usize {
        self.dataset.cols()
    }
}
