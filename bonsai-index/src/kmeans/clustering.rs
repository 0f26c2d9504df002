//! # Hierarchical Clustering
//!
//! Recursive Lloyd-style k-means subdivision. Working centers are kept
//! in wide (`f64`) accumulators during refinement and narrowed back to
//! the distance type once per node.

use rand::rngs::StdRng;

use bonsai_core::metrics::IndexMetrics;

use crate::distance::DistanceMetric;
use crate::matrix::Matrix;
use crate::kmeans::node::Node;
use crate::kmeans::seeding::{choose_centers, CentersInit};

/// Shared state threaded through the clustering recursion
pub(crate) struct ClusterCtx<'a> {
    pub dataset: &'a Matrix,
    pub metric: DistanceMetric,
    pub branching: usize,
    /// Refinement cap; `usize::MAX` when unbounded
    pub max_iterations: usize,
    pub centers_init: CentersInit,
    pub rng: &'a mut StdRng,
    pub metrics: &'a IndexMetrics,
}

/// Compute the pivot (coordinate-wise mean), radius (max member
/// distance) and variance (mean member distance) of a point set.
pub(crate) fn compute_statistics(
    dataset: &Matrix,
    metric: DistanceMetric,
    indices: &[usize],
) -> (Vec<f32>, f32, f32) {
    let size = indices.len();
    let veclen = dataset.cols();

    let mut mean = vec![0.0f32; veclen];
    for &id in indices {
        for (m, &v) in mean.iter_mut().zip(dataset.row(id).iter()) {
            *m += v;
        }
    }
    for m in mean.iter_mut() {
        *m /= size as f32;
    }

    let mut radius = 0.0f32;
    let mut variance = 0.0f32;
    for &id in indices {
        let dist = metric.distance(&mean, dataset.row(id));
        if dist > radius {
            radius = dist;
        }
        variance += dist;
    }
    variance /= size as f32;

    (mean, radius, variance)
}

/// Turn `node` into a leaf holding `indices`, sorted ascending.
fn make_leaf(node: &mut Node, indices: &[usize]) {
    node.indices = indices.to_vec();
    node.indices.sort_unstable();
}

/// Recursively cluster `indices` under `node`.
///
/// `indices` is the scratch partition: members of each child are swapped
/// into a contiguous range before recursing into it.
pub(crate) fn compute_clustering(
    ctx: &mut ClusterCtx<'_>,
    node: &mut Node,
    indices: &mut [usize],
    level: usize,
) {
    let n = indices.len();
    node.size = n;
    node.level = level;

    let branching = ctx.branching;
    if n < branching {
        make_leaf(node, indices);
        return;
    }

    let centers_idx = choose_centers(
        ctx.centers_init,
        ctx.dataset,
        ctx.metric,
        indices,
        branching,
        ctx.rng,
    );
    if centers_idx.len() < branching {
        // Seeding degenerated; keep this subtree as a leaf.
        make_leaf(node, indices);
        return;
    }

    let veclen = ctx.dataset.cols();
    let mut dcenters: Vec<Vec<f64>> = centers_idx
        .iter()
        .map(|&c| ctx.dataset.row(c).iter().map(|&v| v as f64).collect())
        .collect();

    let mut radiuses = vec![0.0f32; branching];
    let mut count = vec![0usize; branching];

    // Assign every point to its nearest center (ties to the lowest
    // index), tracking per-cluster radius and population.
    let mut belongs_to = vec![0usize; n];
    for (i, &id) in indices.iter().enumerate() {
        let point = ctx.dataset.row(id);
        let mut sq_dist = ctx.metric.distance_to_center(point, &dcenters[0]);
        belongs_to[i] = 0;
        for (j, center) in dcenters.iter().enumerate().skip(1) {
            let new_sq_dist = ctx.metric.distance_to_center(point, center);
            if sq_dist > new_sq_dist {
                belongs_to[i] = j;
                sq_dist = new_sq_dist;
            }
        }
        if sq_dist > radiuses[belongs_to[i]] {
            radiuses[belongs_to[i]] = sq_dist;
        }
        count[belongs_to[i]] += 1;
    }

    let mut converged = false;
    let mut iteration = 0usize;
    while !converged && iteration < ctx.max_iterations {
        converged = true;
        iteration += 1;

        // Recompute each center as the mean of its assigned points.
        for (center, radius) in dcenters.iter_mut().zip(radiuses.iter_mut()) {
            center.iter_mut().for_each(|c| *c = 0.0);
            *radius = 0.0;
        }
        for (i, &id) in indices.iter().enumerate() {
            let point = ctx.dataset.row(id);
            let center = &mut dcenters[belongs_to[i]];
            for (c, &v) in center.iter_mut().zip(point.iter()) {
                *c += v as f64;
            }
        }
        for (center, &cnt) in dcenters.iter_mut().zip(count.iter()) {
            for c in center.iter_mut() {
                *c /= cnt as f64;
            }
        }

        // Reassign points to the moved centers.
        for (i, &id) in indices.iter().enumerate() {
            let point = ctx.dataset.row(id);
            let mut sq_dist = ctx.metric.distance_to_center(point, &dcenters[0]);
            let mut new_centroid = 0;
            for (j, center) in dcenters.iter().enumerate().skip(1) {
                let new_sq_dist = ctx.metric.distance_to_center(point, center);
                if sq_dist > new_sq_dist {
                    new_centroid = j;
                    sq_dist = new_sq_dist;
                }
            }
            if sq_dist > radiuses[new_centroid] {
                radiuses[new_centroid] = sq_dist;
            }
            if new_centroid != belongs_to[i] {
                count[belongs_to[i]] -= 1;
                count[new_centroid] += 1;
                belongs_to[i] = new_centroid;
                converged = false;
            }
        }

        // If a cluster converged to empty, move one element into it
        // from the next cluster (cyclically) that can spare a member.
        for i in 0..branching {
            if count[i] == 0 {
                let mut j = (i + 1) % branching;
                while count[j] <= 1 {
                    j = (j + 1) % branching;
                }
                for k in 0..n {
                    if belongs_to[k] == j {
                        belongs_to[k] = i;
                        count[j] -= 1;
                        count[i] += 1;
                        break;
                    }
                }
                converged = false;
            }
        }
    }

    // Narrow the refined centers back to the distance type; these
    // become the child pivots.
    let mut centers: Vec<Vec<f32>> = dcenters
        .iter()
        .map(|center| center.iter().map(|&v| v as f32).collect())
        .collect();
    ctx.metrics
        .add_pivot_bytes((branching * veclen * std::mem::size_of::<f32>()) as u64);

    // Partition `indices` in place so each child's members form a
    // contiguous slice; the same sweep yields the child variance.
    node.children = Vec::with_capacity(branching);
    let mut start = 0usize;
    let mut end = start;
    for c in 0..branching {
        let s = count[c];

        let mut variance = 0.0f32;
        for i in 0..n {
            if belongs_to[i] == c {
                variance += ctx.metric.distance(&centers[c], ctx.dataset.row(indices[i]));
                indices.swap(i, end);
                belongs_to.swap(i, end);
                end += 1;
            }
        }
        variance /= s as f32;

        let mut child = Node::new();
        child.radius = radiuses[c];
        child.pivot = std::mem::take(&mut centers[c]);
        child.variance = variance;
        compute_clustering(ctx, &mut child, &mut indices[start..end], level + 1);
        node.children.push(child);
        start = end;
    }
}
