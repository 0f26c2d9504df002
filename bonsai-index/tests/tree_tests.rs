//! End-to-end tests for the hierarchical k-means tree: build, online
//! insertion, rebuild, cluster cuts, persistence and error paths.

use std::sync::Arc;

use bonsai_index::{
    CentersInit, KMeansConfig, KMeansIndex, Matrix, SearchParams, VectorIndex,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

fn random_matrix(n: usize, dim: usize, seed: u64) -> Arc<Matrix> {
    let mut rng = StdRng::seed_from_u64(seed);
    let data: Vec<f32> = (0..n * dim).map(|_| rng.gen_range(-1.0..1.0)).collect();
    Arc::new(Matrix::from_vec(data, n, dim).unwrap())
}

fn config(branching: usize, seed: u64) -> KMeansConfig {
    KMeansConfig {
        branching,
        iterations: Some(11),
        seed: Some(seed),
        ..KMeansConfig::default()
    }
}

// ============================================================================
// Build & query
// ============================================================================

#[test]
fn test_tiny_dataset_build_and_query() {
    // Four corners of the unit square; with branching 2 every leaf
    // holds at most one point.
    let dataset = Arc::new(
        Matrix::from_rows(&[
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
        ])
        .unwrap(),
    );
    let mut index = KMeansIndex::new(Arc::clone(&dataset), config(2, 1234));
    index.build().unwrap();

    assert_eq!(index.len(), 4);
    let results = index.search(&[0.1, 0.1], 1, &SearchParams::exact());
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, 0);
}

#[test]
fn test_empty_cluster_recovery_on_duplicates() {
    // 100 coincident points plus one distant outlier stress the
    // empty-cluster recovery path under k-means++ seeding.
    let mut rows: Vec<Vec<f32>> = (0..100).map(|_| vec![5.0, 5.0]).collect();
    rows.push(vec![-5.0, -5.0]);
    let dataset = Arc::new(Matrix::from_rows(&rows).unwrap());

    let config = KMeansConfig {
        branching: 3,
        iterations: Some(10),
        centers_init: CentersInit::KMeansPp,
        seed: Some(7),
        ..KMeansConfig::default()
    };
    let mut index = KMeansIndex::new(dataset, config);
    index.build().unwrap();

    // The outlier is findable on its own.
    let results = index.search(&[-5.0, -5.0], 1, &SearchParams::exact());
    assert_eq!(results[0].id, 100);
    assert!(results[0].distance < 1e-6);

    // The root cut yields three non-empty clusters.
    let cut = index.cluster_centers(3).unwrap();
    assert_eq!(cut.centers.rows(), 3);
}

#[test]
fn test_build_rejects_small_branching() {
    let dataset = random_matrix(10, 4, 1);
    let mut index = KMeansIndex::new(dataset, config(1, 1));
    let err = index.build().unwrap_err();
    assert_eq!(err.error_code(), "CONFIG_ERROR");
}

#[test]
fn test_unbuilt_index_yields_no_neighbors() {
    let dataset = random_matrix(50, 4, 2);
    let index = KMeansIndex::new(dataset, config(4, 2));
    assert!(index
        .search(&[0.0; 4], 5, &SearchParams::exact())
        .is_empty());
    assert!(index
        .search(&[0.0; 4], 5, &SearchParams::bounded(16))
        .is_empty());
}

#[test]
fn test_query_on_built_index_modes_succeed() {
    let dataset = random_matrix(256, 8, 3);
    let mut index = KMeansIndex::new(Arc::clone(&dataset), config(8, 3));
    index.build().unwrap();

    for params in [SearchParams::exact(), SearchParams::bounded(64)] {
        let results = index.search(dataset.row(7), 3, &params);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].id, 7);
        assert!(results[0].distance < 1e-6);
    }

    let snapshot = index.metrics().snapshot();
    assert_eq!(snapshot.builds, 1);
    assert_eq!(snapshot.exact_searches, 1);
    assert_eq!(snapshot.bounded_searches, 1);
    assert!(index.used_memory() > 0);
}

// ============================================================================
// Online insertion
// ============================================================================

#[test]
fn test_add_points_without_rebuild() {
    let full = random_matrix(1000, 8, 4);
    let first = Matrix::from_rows(&(0..500).map(|i| full.row(i).to_vec()).collect::<Vec<_>>())
        .unwrap();
    let rest = Matrix::from_rows(&(500..1000).map(|i| full.row(i).to_vec()).collect::<Vec<_>>())
        .unwrap();

    let mut index = KMeansIndex::new(Arc::new(first), config(16, 4));
    index.build().unwrap();
    assert_eq!(index.size_at_build(), 500);
    assert!(!index.owns_dataset());

    // 1000 / 500 = 2.0 < 3.0: no rebuild.
    index.add_points(&rest, 3.0).unwrap();
    assert_eq!(index.len(), 1000);
    assert_eq!(index.size_at_build(), 500);
    assert!(index.owns_dataset());
    assert_eq!(index.metrics().snapshot().rebuilds, 0);

    // Every added point is findable by exact descent.
    for i in 500..1000 {
        let results = index.search(full.row(i), 1, &SearchParams::exact());
        assert_eq!(results[0].id, i);
        assert!(results[0].distance < 1e-6);
    }
}

#[test]
fn test_add_points_triggers_rebuild() {
    let full = random_matrix(1000, 8, 5);
    let first = Matrix::from_rows(&(0..500).map(|i| full.row(i).to_vec()).collect::<Vec<_>>())
        .unwrap();
    let rest = Matrix::from_rows(&(500..1000).map(|i| full.row(i).to_vec()).collect::<Vec<_>>())
        .unwrap();

    let mut index = KMeansIndex::new(Arc::new(first), config(16, 5));
    index.build().unwrap();

    // 1000 / 500 = 2.0 >= 1.5: rebuild.
    index.add_points(&rest, 1.5).unwrap();
    assert_eq!(index.len(), 1000);
    assert_eq!(index.size_at_build(), 1000);
    assert_eq!(index.metrics().snapshot().rebuilds, 1);

    let results = index.search(full.row(750), 1, &SearchParams::exact());
    assert_eq!(results[0].id, 750);
}

#[test]
fn test_add_points_dimension_mismatch() {
    let dataset = random_matrix(100, 8, 6);
    let mut index = KMeansIndex::new(dataset, config(4, 6));
    index.build().unwrap();

    let wrong = random_matrix(10, 4, 6);
    let err = index.add_points(&wrong, 2.0).unwrap_err();
    assert_eq!(err.error_code(), "DIMENSION_MISMATCH");
}

#[test]
fn test_add_points_requires_build() {
    let dataset = random_matrix(100, 8, 7);
    let mut index = KMeansIndex::new(dataset, config(4, 7));
    let extra = random_matrix(10, 8, 8);
    let err = index.add_points(&extra, 2.0).unwrap_err();
    assert_eq!(err.error_code(), "NOT_BUILT");
}

// ============================================================================
// Cluster cut
// ============================================================================

#[test]
fn test_cluster_centers_counts() {
    let dataset = random_matrix(500, 4, 9);
    let mut index = KMeansIndex::new(dataset, config(4, 9));
    index.build().unwrap();

    // Exactly the root's children when k equals the branching factor.
    let cut = index.cluster_centers(4).unwrap();
    assert_eq!(cut.centers.rows(), 4);
    assert_eq!(cut.centers.cols(), 4);
    assert!(cut.variance >= 0.0);

    // A single cluster is the root itself.
    let cut = index.cluster_centers(1).unwrap();
    assert_eq!(cut.centers.rows(), 1);

    // k between cut sizes: never more than requested.
    let cut = index.cluster_centers(6).unwrap();
    assert!(cut.centers.rows() <= 6);
}

#[test]
fn test_cluster_centers_errors() {
    let dataset = random_matrix(100, 4, 10);
    let mut index = KMeansIndex::new(Arc::clone(&dataset), config(4, 10));
    assert_eq!(
        index.cluster_centers(4).unwrap_err().error_code(),
        "NOT_BUILT"
    );
    index.build().unwrap();
    assert_eq!(
        index.cluster_centers(0).unwrap_err().error_code(),
        "CONFIG_ERROR"
    );
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_save_load_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("index.bonsai");

    let dataset = random_matrix(400, 8, 11);
    let mut index = KMeansIndex::new(Arc::clone(&dataset), config(8, 11));
    index.build().unwrap();
    index.save(&path).unwrap();

    let loaded = KMeansIndex::load(&path, Arc::clone(&dataset)).unwrap();
    assert_eq!(loaded.len(), 400);
    assert_eq!(loaded.size_at_build(), 400);
    assert_eq!(loaded.config().branching, 8);
    assert_eq!(loaded.used_memory(), index.used_memory());

    let query = dataset.row(123);
    for params in [SearchParams::exact(), SearchParams::bounded(64)] {
        let before: Vec<usize> = index.search(query, 5, &params).iter().map(|r| r.id).collect();
        let after: Vec<usize> = loaded.search(query, 5, &params).iter().map(|r| r.id).collect();
        assert_eq!(before, after);
    }

    let cut_before = index.cluster_centers(8).unwrap();
    let cut_after = loaded.cluster_centers(8).unwrap();
    assert_eq!(cut_before.centers, cut_after.centers);
}

#[test]
fn test_load_rejects_wrong_dimension() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("index.bonsai");

    let dataset = random_matrix(100, 8, 12);
    let mut index = KMeansIndex::new(dataset, config(4, 12));
    index.build().unwrap();
    index.save(&path).unwrap();

    let other = random_matrix(100, 16, 12);
    let err = KMeansIndex::load(&path, other).unwrap_err();
    assert_eq!(err.error_code(), "DIMENSION_MISMATCH");
}

#[test]
fn test_load_rejects_garbage() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("junk.bonsai");
    std::fs::write(&path, b"definitely not an index file").unwrap();

    let dataset = random_matrix(10, 4, 13);
    let err = KMeansIndex::load(&path, dataset).unwrap_err();
    assert_eq!(err.error_code(), "PERSISTENCE_ERROR");
}

#[test]
fn test_save_requires_build() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("index.bonsai");
    let dataset = random_matrix(10, 4, 14);
    let index = KMeansIndex::new(dataset, config(4, 14));
    assert_eq!(index.save(&path).unwrap_err().error_code(), "NOT_BUILT");
}

// ============================================================================
// Runtime knobs
// ============================================================================

#[test]
fn test_set_cb_index() {
    let dataset = random_matrix(300, 8, 15);
    let mut index = KMeansIndex::new(Arc::clone(&dataset), config(8, 15));
    index.build().unwrap();

    index.set_cb_index(0.0);
    let narrow = index.search(dataset.row(0), 3, &SearchParams::bounded(32));
    index.set_cb_index(2.0);
    let wide = index.search(dataset.row(0), 3, &SearchParams::bounded(32));

    // The weight only re-ranks pending branches; the query point
    // itself stays the top hit either way.
    assert_eq!(narrow[0].id, 0);
    assert_eq!(wide[0].id, 0);
    assert!((index.config().cb_index - 2.0).abs() < 1e-6);
}

#[test]
fn test_copy_dataset_option() {
    let dataset = random_matrix(100, 4, 16);
    let config = KMeansConfig {
        branching: 4,
        iterations: Some(11),
        copy_dataset: true,
        seed: Some(16),
        ..KMeansConfig::default()
    };
    let mut index = KMeansIndex::new(Arc::clone(&dataset), config);
    index.build().unwrap();
    assert!(index.owns_dataset());

    let results = index.search(dataset.row(3), 1, &SearchParams::exact());
    assert_eq!(results[0].id, 3);
}
