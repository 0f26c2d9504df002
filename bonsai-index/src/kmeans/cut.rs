//! # Cluster Cut
//!
//! Extracts a clustering from the tree: a frontier of nodes covering
//! all points, grown by repeatedly splitting the frontier node whose
//! replacement by its children most reduces the total weighted
//! variance.

use crate::kmeans::node::Node;

/// Grow a minimum-variance frontier of at most `clusters_length` nodes.
/// Returns the frontier and the mean variance of the final clustering
/// (total weighted variance over the root population).
pub(crate) fn min_variance_clusters<'a>(
    root: &'a Node,
    clusters_length: usize,
    branching: usize,
) -> (Vec<&'a Node>, f32) {
    let mut clusters: Vec<&Node> = Vec::with_capacity(clusters_length);
    clusters.push(root);

    let mut mean_variance = root.variance * root.size as f32;

    while clusters.len() < clusters_length {
        let mut min_variance = f32::MAX;
        let mut split_index = None;

        for (i, node) in clusters.iter().enumerate() {
            if !node.is_leaf() {
                let mut variance = mean_variance - node.variance * node.size as f32;
                for child in &node.children {
                    variance += child.variance * child.size as f32;
                }
                if variance < min_variance {
                    min_variance = variance;
                    split_index = Some(i);
                }
            }
        }

        let split_index = match split_index {
            Some(i) => i,
            None => break,
        };
        // A split grows the frontier by branching - 1 nodes; stop if
        // that would overshoot the requested count.
        if branching + clusters.len() - 1 > clusters_length {
            break;
        }
        mean_variance = min_variance;

        let to_split = clusters[split_index];
        clusters[split_index] = &to_split.children[0];
        for child in &to_split.children[1..] {
            clusters.push(child);
        }
    }

    (clusters, mean_variance / root.size as f32)
}
