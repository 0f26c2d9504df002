//! # Bonsai Vector Index
//!
//! Hierarchical k-means tree index for approximate nearest-neighbor
//! search over dense vector datasets.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Vector Index Layer                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐      │
//! │  │  Distance   │    │    Flat     │    │   K-Means   │      │
//! │  │   Kernels   │    │   Index     │    │    Tree     │      │
//! │  │             │    │  (Exact)    │    │   (ANN)     │      │
//! │  └─────────────┘    └─────────────┘    └─────────────┘      │
//! │         │                  │                  │              │
//! │         └──────────────────┴──────────────────┘              │
//! │                           │                                  │
//! │                    VectorIndex Trait                         │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `distance`: scalar distance kernels and the metric dispatch
//! - `matrix`: row-major point storage
//! - `random`: seeded draw-with/without-replacement sources
//! - `result_set`: bounded k-nearest collector
//! - `traits`: common `VectorIndex` trait and search parameters
//! - `flat`: brute-force exact search (ground truth)
//! - `kmeans`: the hierarchical k-means tree index

pub mod distance;
pub mod flat;
pub mod kmeans;
pub mod matrix;
pub mod random;
pub mod result_set;
pub mod traits;

pub use distance::{chebyshev, l2_distance, manhattan, squared_l2, DistanceMetric};
pub use flat::FlatIndex;
pub use kmeans::{CentersInit, ClusterCenters, KMeansConfig, KMeansIndex};
pub use matrix::Matrix;
pub use result_set::KnnResultSet;
pub use traits::{Checks, SearchParams, SearchResult, VectorIndex};
