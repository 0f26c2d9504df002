//! # Hierarchical K-Means Tree Index
//!
//! Approximate nearest neighbor search over a tree built by recursive
//! k-means clustering.
//!
//! ## Algorithm Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Hierarchical K-Means Tree                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │                        ┌──────┐                              │
//! │                        │ root │   pivot / radius / variance  │
//! │                        └──┬───┘                              │
//! │              ┌────────────┼────────────┐                     │
//! │           ┌──┴──┐      ┌──┴──┐      ┌──┴──┐                  │
//! │           │  c0 │      │  c1 │      │  c2 │   B children     │
//! │           └──┬──┘      └─────┘      └──┬──┘                  │
//! │          ┌───┴───┐                 ┌───┴────┐                │
//! │        leaf    leaf              leaf     leaf  (< B points) │
//! │                                                              │
//! │  Key Properties:                                             │
//! │  • Every internal node has exactly B children                │
//! │  • Leaves hold the sorted ids of their member points         │
//! │  • Pivot = centroid, radius = max member distance,           │
//! │    variance = mean member distance                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Build Process
//! 1. Seed B centers (random / Gonzales / k-means++)
//! 2. Lloyd refinement with empty-cluster recovery
//! 3. Partition points by owner and recurse per child
//!
//! ## Search Process
//! - Exact: descend every non-pruned subtree, closest child first
//! - Bounded: best-bin-first via a global priority queue, stopping
//!   once the leaf-scan budget is spent and the result set is full

mod clustering;
mod cut;
mod node;
mod search;
mod seeding;

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use bonsai_core::error::{Error, Result};
use bonsai_core::metrics::{IndexMetrics, Timer};
use bonsai_core::utils::format_bytes;

use crate::distance::DistanceMetric;
use crate::matrix::Matrix;
use crate::result_set::KnnResultSet;
use crate::traits::{Checks, SearchParams, SearchResult, VectorIndex};

use self::clustering::{compute_clustering, compute_statistics, ClusterCtx};
use self::cut::min_variance_clusters;
use self::node::Node;
use self::search::{BranchHeap, TreeSearcher};

pub use self::seeding::CentersInit;

const KMEANS_MAGIC: &[u8; 8] = b"BONSAIKM";
const KMEANS_VERSION: u32 = 1;

/// Hierarchical k-means index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansConfig {
    /// Branching factor of the tree (children per internal node)
    pub branching: usize,
    /// Cap on k-means refinement iterations; `None` means unbounded
    pub iterations: Option<usize>,
    /// Strategy for picking initial cluster centers
    pub centers_init: CentersInit,
    /// Cluster boundary weight: biases bounded search toward large
    /// clusters by discounting branch keys by `cb_index * variance`
    pub cb_index: f32,
    /// Distance metric
    pub metric: DistanceMetric,
    /// Copy the dataset at construction instead of borrowing it
    pub copy_dataset: bool,
    /// RNG seed; a fixed seed makes builds reproducible
    pub seed: Option<u64>,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            branching: 32,
            iterations: None,
            centers_init: CentersInit::Random,
            cb_index: 0.4,
            metric: DistanceMetric::SquaredL2,
            copy_dataset: false,
            seed: None,
        }
    }
}

/// Result of a cluster cut: one pivot per row, plus the mean variance
/// of the clustering
#[derive(Debug, Clone)]
pub struct ClusterCenters {
    pub centers: Matrix,
    pub variance: f32,
}

/// Hierarchical k-means tree index
#[derive(Debug)]
pub struct KMeansIndex {
    config: KMeansConfig,
    dataset: Arc<Matrix>,
    own_dataset: bool,
    root: Option<Node>,
    /// Scratch permutation of point ids, partitioned in place during
    /// build and reused on rebuild
    indices: Vec<usize>,
    size_at_build: usize,
    rng: StdRng,
    metrics: IndexMetrics,
}

impl KMeansIndex {
    /// Create an index over a dataset. The tree is not built yet;
    /// queries return nothing until [`build`](Self::build) is called.
    pub fn new(dataset: Arc<Matrix>, config: KMeansConfig) -> Self {
        let own_dataset = config.copy_dataset;
        let dataset = if own_dataset {
            Arc::new((*dataset).clone())
        } else {
            dataset
        };
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            dataset,
            own_dataset,
            root: None,
            indices: Vec::new(),
            size_at_build: 0,
            rng,
            metrics: IndexMetrics::new(),
        }
    }

    /// Build the tree from the current dataset
    pub fn build(&mut self) -> Result<()> {
        if self.config.branching < 2 {
            return Err(Error::Configuration {
                message: "Branching factor must be at least 2".to_string(),
            });
        }

        let timer = Timer::new("kmeans_build");
        let dataset = Arc::clone(&self.dataset);

        self.indices = (0..dataset.rows()).collect();

        let mut root = Node::new();
        let (pivot, radius, variance) =
            compute_statistics(&dataset, self.config.metric, &self.indices);
        self.metrics
            .add_pivot_bytes((dataset.cols() * std::mem::size_of::<f32>()) as u64);
        root.pivot = pivot;
        root.radius = radius;
        root.variance = variance;

        let mut indices = std::mem::take(&mut self.indices);
        {
            let mut ctx = ClusterCtx {
                dataset: dataset.as_ref(),
                metric: self.config.metric,
                branching: self.config.branching,
                max_iterations: self.config.iterations.unwrap_or(usize::MAX),
                centers_init: self.config.centers_init,
                rng: &mut self.rng,
                metrics: &self.metrics,
            };
            compute_clustering(&mut ctx, &mut root, &mut indices, 0);
        }
        self.indices = indices;
        self.root = Some(root);
        self.size_at_build = dataset.rows();
        self.metrics.record_build();

        info!(
            points = dataset.rows(),
            dim = dataset.cols(),
            branching = self.config.branching,
            memory = %format_bytes(self.metrics.pivot_bytes()),
            "Built hierarchical k-means tree"
        );
        timer.stop();
        Ok(())
    }

    /// Append points to the dataset and place them in the tree.
    ///
    /// When `rebuild_threshold > 1` and the dataset has grown to at
    /// least `size_at_build * rebuild_threshold`, the tree is discarded
    /// and rebuilt from scratch; otherwise each point descends into its
    /// closest leaf, which re-clusters once it reaches the branching
    /// factor.
    pub fn add_points(&mut self, points: &Matrix, rebuild_threshold: f32) -> Result<()> {
        if points.cols() != self.dataset.cols() {
            return Err(Error::DimensionMismatch {
                expected: self.dataset.cols(),
                got: points.cols(),
            });
        }
        if self.root.is_none() {
            return Err(Error::NotBuilt);
        }

        let old_size = self.dataset.rows();
        self.dataset = Arc::new(self.dataset.stacked(points)?);
        self.own_dataset = true;
        self.metrics.record_points_added(points.rows() as u64);

        let size = self.dataset.rows();
        if rebuild_threshold > 1.0
            && (self.size_at_build as f32) * rebuild_threshold <= size as f32
        {
            info!(
                size,
                size_at_build = self.size_at_build,
                "Dataset growth exceeded rebuild threshold; rebuilding"
            );
            self.root = None;
            self.metrics.record_rebuild();
            self.build()?;
        } else {
            let dataset = Arc::clone(&self.dataset);
            let mut root = match self.root.take() {
                Some(root) => root,
                None => return Err(Error::NotBuilt),
            };
            let mut ctx = ClusterCtx {
                dataset: dataset.as_ref(),
                metric: self.config.metric,
                branching: self.config.branching,
                max_iterations: self.config.iterations.unwrap_or(usize::MAX),
                centers_init: self.config.centers_init,
                rng: &mut self.rng,
                metrics: &self.metrics,
            };
            for i in 0..points.rows() {
                let id = old_size + i;
                let dist = ctx.metric.distance(&root.pivot, dataset.row(id));
                add_point_to_tree(&mut ctx, &mut root, id, dist);
            }
            self.root = Some(root);
        }
        Ok(())
    }

    /// Collect the nearest neighbors of `query` into `result`.
    ///
    /// An unbuilt index yields no neighbors.
    pub fn find_neighbors(&self, result: &mut KnnResultSet, query: &[f32], params: &SearchParams) {
        let root = match &self.root {
            Some(root) => root,
            None => return,
        };
        debug_assert_eq!(query.len(), self.dataset.cols());

        let searcher = TreeSearcher {
            dataset: self.dataset.as_ref(),
            metric: self.config.metric,
            cb_index: self.config.cb_index,
        };

        match params.checks {
            Checks::Unlimited => {
                self.metrics.record_exact_search();
                searcher.find_exact_nn(root, result, query);
            }
            Checks::Bounded(max_checks) => {
                self.metrics.record_bounded_search();
                let mut heap: BranchHeap<'_> = BinaryHeap::with_capacity(self.dataset.rows());
                let mut checks = 0usize;
                searcher.find_nn(root, result, query, &mut checks, max_checks, &mut heap);
                while let Some(Reverse(branch)) = heap.pop() {
                    if checks >= max_checks && result.full() {
                        break;
                    }
                    searcher.find_nn(branch.node, result, query, &mut checks, max_checks, &mut heap);
                }
            }
        }
    }

    /// Cut the tree into at most `num_clusters` clusters by repeatedly
    /// splitting the frontier node that most reduces total weighted
    /// variance. Returns the frontier pivots.
    pub fn cluster_centers(&self, num_clusters: usize) -> Result<ClusterCenters> {
        if num_clusters < 1 {
            return Err(Error::Configuration {
                message: "Number of clusters must be at least 1".to_string(),
            });
        }
        let root = self.root.as_ref().ok_or(Error::NotBuilt)?;

        let (clusters, variance) =
            min_variance_clusters(root, num_clusters, self.config.branching);
        self.metrics.record_cluster_cut();
        info!(
            requested = num_clusters,
            returned = clusters.len(),
            "Computed cluster cut"
        );

        let mut centers = Matrix::zeros(clusters.len(), self.dataset.cols());
        for (i, node) in clusters.iter().enumerate() {
            centers.row_mut(i).copy_from_slice(&node.pivot);
        }
        Ok(ClusterCenters { centers, variance })
    }

    /// Adjust the cluster boundary weight used by bounded searches
    pub fn set_cb_index(&mut self, cb_index: f32) {
        self.config.cb_index = cb_index;
    }

    /// Approximate bytes held by pivot allocations
    pub fn used_memory(&self) -> usize {
        self.metrics.pivot_bytes() as usize
    }

    /// Effective configuration
    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    /// Metrics collector for this index
    pub fn metrics(&self) -> &IndexMetrics {
        &self.metrics
    }

    /// Dataset size at the last full build
    pub fn size_at_build(&self) -> usize {
        self.size_at_build
    }

    /// Has `build` completed at least once?
    pub fn is_built(&self) -> bool {
        self.root.is_some()
    }

    /// Does the index own (a copy of) its dataset?
    pub fn owns_dataset(&self) -> bool {
        self.own_dataset
    }

    /// Save the index to disk. The dataset itself is not serialized;
    /// `load` re-attaches one.
    pub fn save(&self, path: &Path) -> Result<()> {
        let root = self.root.as_ref().ok_or(Error::NotBuilt)?;
        let mut file = std::fs::File::create(path)?;

        // Header
        file.write_all(KMEANS_MAGIC)?;
        file.write_u32::<LittleEndian>(KMEANS_VERSION)?;
        file.write_u32::<LittleEndian>(self.config.branching as u32)?;
        file.write_i64::<LittleEndian>(match self.config.iterations {
            Some(iterations) => iterations as i64,
            None => -1,
        })?;
        file.write_u64::<LittleEndian>(self.metrics.pivot_bytes())?;
        file.write_f32::<LittleEndian>(self.config.cb_index)?;
        file.write_u8(metric_tag(self.config.metric))?;
        file.write_u8(centers_init_tag(self.config.centers_init))?;
        file.write_u64::<LittleEndian>(self.size_at_build as u64)?;
        file.write_u32::<LittleEndian>(self.dataset.cols() as u32)?;

        save_tree(&mut file, root)?;
        file.flush()?;
        Ok(())
    }

    /// Load an index saved with [`save`](Self::save), attaching the
    /// given dataset. Fails if the dataset dimensionality differs from
    /// the saved one.
    pub fn load(path: &Path, dataset: Arc<Matrix>) -> Result<Self> {
        let mut file = std::fs::File::open(path)?;

        let mut magic = [0u8; 8];
        file.read_exact(&mut magic)?;
        if &magic != KMEANS_MAGIC {
            return Err(Error::Persistence {
                message: "Invalid index magic".to_string(),
            });
        }
        let version = file.read_u32::<LittleEndian>()?;
        if version != KMEANS_VERSION {
            return Err(Error::Persistence {
                message: format!("Unsupported index version: {}", version),
            });
        }

        let branching = file.read_u32::<LittleEndian>()? as usize;
        let iterations = match file.read_i64::<LittleEndian>()? {
            i if i < 0 => None,
            i => Some(i as usize),
        };
        let pivot_bytes = file.read_u64::<LittleEndian>()?;
        let cb_index = file.read_f32::<LittleEndian>()?;
        let metric = metric_from_tag(file.read_u8()?)?;
        let centers_init = centers_init_from_tag(file.read_u8()?)?;
        let size_at_build = file.read_u64::<LittleEndian>()? as usize;
        let veclen = file.read_u32::<LittleEndian>()? as usize;
        if veclen != dataset.cols() {
            return Err(Error::DimensionMismatch {
                expected: veclen,
                got: dataset.cols(),
            });
        }

        let root = load_tree(&mut file, veclen, 0)?;

        let metrics = IndexMetrics::new();
        metrics.add_pivot_bytes(pivot_bytes);

        let config = KMeansConfig {
            branching,
            iterations,
            centers_init,
            cb_index,
            metric,
            copy_dataset: false,
            seed: None,
        };
        Ok(Self {
            config,
            dataset,
            own_dataset: false,
            root: Some(root),
            indices: Vec::new(),
            size_at_build,
            rng: StdRng::from_entropy(),
            metrics,
        })
    }
}

impl VectorIndex for KMeansIndex {
    fn search(&self, query: &[f32], k: usize, params: &SearchParams) -> Vec<SearchResult> {
        if k == 0 {
            return Vec::new();
        }
        let mut result = KnnResultSet::new(k);
        self.find_neighbors(&mut result, query, params);
        result.into_sorted_vec()
    }

    fn len(&self) -> usize {
        self.dataset.rows()
    }

    fn dimension(&self) -> usize {
        self.dataset.cols()
    }
}

/// Place one point into the subtree under `node`.
///
/// Radius and size are updated along the descent path; variance gets
/// the online approximation `(size * variance + dist) / (size + 1)`,
/// exact only while the pivot stays put. A leaf recomputes its full
/// statistics after the append and re-clusters once it holds
/// `branching` points.
fn add_point_to_tree(ctx: &mut ClusterCtx<'_>, node: &mut Node, index: usize, dist_to_pivot: f32) {
    if dist_to_pivot > node.radius {
        node.radius = dist_to_pivot;
    }
    node.variance = (node.size as f32 * node.variance + dist_to_pivot) / (node.size as f32 + 1.0);
    node.size += 1;

    if node.is_leaf() {
        node.indices.push(index);
        let (pivot, radius, variance) = compute_statistics(ctx.dataset, ctx.metric, &node.indices);
        ctx.metrics
            .add_pivot_bytes((ctx.dataset.cols() * std::mem::size_of::<f32>()) as u64);
        node.pivot = pivot;
        node.radius = radius;
        node.variance = variance;

        if node.indices.len() >= ctx.branching {
            let level = node.level;
            let mut indices = std::mem::take(&mut node.indices);
            compute_clustering(ctx, node, &mut indices, level);
        }
    } else {
        let point = ctx.dataset.row(index);
        let mut closest = 0;
        let mut dist = ctx.metric.distance(&node.children[0].pivot, point);
        for (i, child) in node.children.iter().enumerate().skip(1) {
            let crt_dist = ctx.metric.distance(&child.pivot, point);
            if crt_dist < dist {
                dist = crt_dist;
                closest = i;
            }
        }
        add_point_to_tree(ctx, &mut node.children[closest], index, dist);
    }
}

fn save_tree(w: &mut impl Write, node: &Node) -> Result<()> {
    for &v in &node.pivot {
        w.write_f32::<LittleEndian>(v)?;
    }
    w.write_f32::<LittleEndian>(node.radius)?;
    w.write_f32::<LittleEndian>(node.variance)?;
    w.write_u64::<LittleEndian>(node.size as u64)?;
    w.write_u32::<LittleEndian>(node.children.len() as u32)?;

    if node.children.is_empty() {
        w.write_u64::<LittleEndian>(node.indices.len() as u64)?;
        for &index in &node.indices {
            w.write_u64::<LittleEndian>(index as u64)?;
        }
    } else {
        for child in &node.children {
            save_tree(w, child)?;
        }
    }
    Ok(())
}

// `level` is not persisted; it is reconstructed from recursion depth so
// post-load inserts split leaves at the right depth.
fn load_tree(r: &mut impl Read, veclen: usize, level: usize) -> Result<Node> {
    let mut node = Node::new();
    node.level = level;

    let mut pivot = vec![0.0f32; veclen];
    for v in pivot.iter_mut() {
        *v = r.read_f32::<LittleEndian>()?;
    }
    node.pivot = pivot;
    node.radius = r.read_f32::<LittleEndian>()?;
    node.variance = r.read_f32::<LittleEndian>()?;
    node.size = r.read_u64::<LittleEndian>()? as usize;

    let child_count = r.read_u32::<LittleEndian>()? as usize;
    if child_count == 0 {
        let index_count = r.read_u64::<LittleEndian>()? as usize;
        let mut indices = Vec::with_capacity(index_count);
        for _ in 0..index_count {
            indices.push(r.read_u64::<LittleEndian>()? as usize);
        }
        node.indices = indices;
    } else {
        node.children = Vec::with_capacity(child_count);
        for _ in 0..child_count {
            node.children.push(load_tree(r, veclen, level + 1)?);
        }
    }
    Ok(node)
}

fn metric_tag(metric: DistanceMetric) -> u8 {
    match metric {
        DistanceMetric::SquaredL2 => 0,
        DistanceMetric::Manhattan => 1,
        DistanceMetric::Chebyshev => 2,
    }
}

fn metric_from_tag(tag: u8) -> Result<DistanceMetric> {
    match tag {
        0 => Ok(DistanceMetric::SquaredL2),
        1 => Ok(DistanceMetric::Manhattan),
        2 => Ok(DistanceMetric::Chebyshev),
        _ => Err(Error::Persistence {
            message: format!("Invalid metric tag: {}", tag),
        }),
    }
}

fn centers_init_tag(init: CentersInit) -> u8 {
    match init {
        CentersInit::Random => 0,
        CentersInit::Gonzales => 1,
        CentersInit::KMeansPp => 2,
    }
}

fn centers_init_from_tag(tag: u8) -> Result<CentersInit> {
    match tag {
        0 => Ok(CentersInit::Random),
        1 => Ok(CentersInit::Gonzales),
        2 => Ok(CentersInit::KMeansPp),
        _ => Err(Error::Persistence {
            message: format!("Invalid centers_init tag: {}", tag),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn random_matrix(n: usize, dim: usize, seed: u64) -> Arc<Matrix> {
        let mut rng = StdRng::seed_from_u64(seed);
        let data: Vec<f32> = (0..n * dim).map(|_| rng.gen_range(-1.0..1.0)).collect();
        Arc::new(Matrix::from_vec(data, n, dim).unwrap())
    }

    fn built_index(dataset: Arc<Matrix>, branching: usize, seed: u64) -> KMeansIndex {
        let config = KMeansConfig {
            branching,
            iterations: Some(11),
            seed: Some(seed),
            ..KMeansConfig::default()
        };
        let mut index = KMeansIndex::new(dataset, config);
        index.build().unwrap();
        index
    }

    /// Walk the tree checking the structural invariants; collects every
    /// leaf id into `seen`.
    fn check_node(node: &Node, branching: usize, dataset: &Matrix, seen: &mut Vec<usize>) {
        if node.is_leaf() {
            assert_eq!(node.size, node.indices.len());
            assert!(node.indices.windows(2).all(|w| w[0] < w[1]), "leaf ids not sorted");
            for &id in &node.indices {
                let dist = DistanceMetric::SquaredL2.distance(&node.pivot, dataset.row(id));
                assert!(
                    dist <= node.radius + 1e-4,
                    "member {} outside leaf radius: {} > {}",
                    id,
                    dist,
                    node.radius
                );
                seen.push(id);
            }
        } else {
            assert_eq!(node.children.len(), branching);
            let child_total: usize = node.children.iter().map(|c| c.size).sum();
            assert_eq!(node.size, child_total);
            for child in &node.children {
                assert_eq!(child.level, node.level + 1);
                check_node(child, branching, dataset, seen);
            }
        }
    }

    fn assert_tree_invariants(index: &KMeansIndex, branching: usize) {
        let root = index.root.as_ref().expect("tree built");
        assert_eq!(root.level, 0);
        assert_eq!(root.size, index.len());

        let mut seen = Vec::new();
        check_node(root, branching, &index.dataset, &mut seen);
        seen.sort_unstable();
        let expected: Vec<usize> = (0..index.len()).collect();
        assert_eq!(seen, expected, "each id must appear in exactly one leaf");
    }

    fn assert_same_structure(a: &Node, b: &Node) {
        assert_eq!(a.size, b.size);
        assert_eq!(a.level, b.level);
        assert_eq!(a.pivot, b.pivot);
        assert_eq!(a.indices, b.indices);
        assert_eq!(a.children.len(), b.children.len());
        for (ca, cb) in a.children.iter().zip(b.children.iter()) {
            assert_same_structure(ca, cb);
        }
    }

    #[test]
    fn test_build_invariants() {
        let dataset = random_matrix(500, 8, 7);
        let index = built_index(dataset, 4, 42);
        assert_tree_invariants(&index, 4);
    }

    #[test]
    fn test_build_invariants_all_strategies() {
        for init in [CentersInit::Random, CentersInit::Gonzales, CentersInit::KMeansPp] {
            let dataset = random_matrix(300, 4, 11);
            let config = KMeansConfig {
                branching: 8,
                iterations: Some(11),
                centers_init: init,
                seed: Some(5),
                ..KMeansConfig::default()
            };
            let mut index = KMeansIndex::new(dataset, config);
            index.build().unwrap();
            assert_tree_invariants(&index, 8);
        }
    }

    #[test]
    fn test_build_is_deterministic_per_seed() {
        let dataset = random_matrix(400, 6, 3);
        let a = built_index(Arc::clone(&dataset), 5, 99);
        let b = built_index(dataset, 5, 99);
        assert_same_structure(a.root.as_ref().unwrap(), b.root.as_ref().unwrap());
    }

    #[test]
    fn test_add_points_preserves_invariants() {
        let dataset = random_matrix(200, 8, 21);
        let mut index = built_index(dataset, 4, 17);
        let extra = random_matrix(100, 8, 22);
        index.add_points(&extra, 3.0).unwrap();
        // No rebuild at threshold 3; sizes and leaf membership must
        // still hold for all 300 points.
        assert_eq!(index.size_at_build(), 200);
        assert_tree_invariants(&index, 4);
    }

    #[test]
    fn test_bounded_search_respects_budget() {
        let dataset = random_matrix(1024, 8, 31);
        let index = built_index(Arc::clone(&dataset), 16, 8);
        let root = index.root.as_ref().unwrap();

        let searcher = TreeSearcher {
            dataset: dataset.as_ref(),
            metric: index.config.metric,
            cb_index: index.config.cb_index,
        };

        let query = dataset.row(12);
        let max_checks = 64;
        let mut result = KnnResultSet::new(5);
        let mut heap: BranchHeap<'_> = BinaryHeap::new();
        let mut checks = 0usize;
        searcher.find_nn(root, &mut result, query, &mut checks, max_checks, &mut heap);
        while let Some(Reverse(branch)) = heap.pop() {
            if checks >= max_checks && result.full() {
                break;
            }
            searcher.find_nn(branch.node, &mut result, query, &mut checks, max_checks, &mut heap);
        }

        assert!(result.full());
        // Once the result set is full, a leaf scan that would push
        // past the budget is skipped, so the count never exceeds it.
        assert!(checks <= max_checks);
    }

    #[test]
    fn test_cluster_cut_returns_root_children() {
        let dataset = random_matrix(600, 4, 13);
        let index = built_index(dataset, 4, 55);
        let root = index.root.as_ref().unwrap();

        let cut = index.cluster_centers(4).unwrap();
        assert_eq!(cut.centers.rows(), 4);
        for (i, child) in root.children.iter().enumerate() {
            assert_eq!(cut.centers.row(i), &child.pivot[..]);
        }
    }
}
