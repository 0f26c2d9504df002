//! Tree node for the hierarchical k-means index.

/// A node in the hierarchical k-means tree.
///
/// A node is a leaf when `children` is empty; leaves carry the sorted
/// global ids of their member points in `indices`, internal nodes carry
/// exactly `branching` children. Every node owns its pivot buffer.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    /// The cluster center
    pub pivot: Vec<f32>,
    /// Maximum distance from the pivot to any member point, as of the
    /// last recompute
    pub radius: f32,
    /// Mean distance from the pivot to member points (not a squared
    /// deviation; cut selection and search keys depend on this exact
    /// definition)
    pub variance: f32,
    /// Number of points in the subtree
    pub size: usize,
    /// Depth from the root (root is 0)
    pub level: usize,
    /// Child nodes (only for internal nodes)
    pub children: Vec<Node>,
    /// Member point ids (only for leaves), sorted ascending
    pub indices: Vec<usize>,
}

impl Node {
    pub fn new() -> Self {
        Self {
            pivot: Vec::new(),
            radius: 0.0,
            variance: 0.0,
            size: 0,
            level: 0,
            children: Vec::new(),
            indices: Vec::new(),
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
