//! # Distance Functions
//!
//! Scalar distance kernels used by the tree and the flat ground-truth
//! index. The tree treats the metric as an opaque oracle: symmetric,
//! `d(x, x) = 0`.
//!
//! ## Pruning caveat
//!
//! The subtree pruning rule used during search
//! (`val = b - r - w`, skip iff `val > 0` and `val^2 - 4*r*w > 0`)
//! is an admissibility criterion derived for **squared Euclidean**
//! distance. Running the index with another metric may under-prune
//! (slower queries) or over-prune (missed neighbors).

use serde::{Deserialize, Serialize};

/// Distance metric types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Squared L2 (Euclidean) distance. The default, and the only
    /// metric for which subtree pruning is exact.
    SquaredL2,
    /// L1 (Manhattan) distance
    Manhattan,
    /// L∞ (Chebyshev) distance
    Chebyshev,
}

impl DistanceMetric {
    /// Distance between two points
    #[inline]
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            DistanceMetric::SquaredL2 => squared_l2(a, b),
            DistanceMetric::Manhattan => manhattan(a, b),
            DistanceMetric::Chebyshev => chebyshev(a, b),
        }
    }

    /// Distance from a point to a wide-precision center accumulator.
    ///
    /// K-means refinement keeps centers in `f64` buffers; distances to
    /// them are evaluated in wide precision and narrowed once.
    #[inline]
    pub(crate) fn distance_to_center(&self, point: &[f32], center: &[f64]) -> f32 {
        debug_assert_eq!(point.len(), center.len());
        match self {
            DistanceMetric::SquaredL2 => point
                .iter()
                .zip(center.iter())
                .map(|(&p, &c)| {
                    let d = p as f64 - c;
                    d * d
                })
                .sum::<f64>() as f32,
            DistanceMetric::Manhattan => point
                .iter()
                .zip(center.iter())
                .map(|(&p, &c)| (p as f64 - c).abs())
                .sum::<f64>() as f32,
            DistanceMetric::Chebyshev => point
                .iter()
                .zip(center.iter())
                .map(|(&p, &c)| (p as f64 - c).abs())
                .fold(0.0f64, f64::max) as f32,
        }
    }
}

impl Default for DistanceMetric {
    fn default() -> Self {
        DistanceMetric::SquaredL2
    }
}

/// Squared L2 (Euclidean) distance
#[inline]
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// L2 distance (with sqrt)
#[inline]
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    squared_l2(a, b).sqrt()
}

/// L1 (Manhattan) distance
#[inline]
pub fn manhattan(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(&x, &y)| (x - y).abs()).sum()
}

/// L∞ (Chebyshev) distance
#[inline]
pub fn chebyshev(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y).abs())
        .fold(0.0f32, f32::max)
}
