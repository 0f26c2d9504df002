//! # Metrics and Monitoring
//!
//! Counters for observing index activity and memory consumption.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metrics collector shared by an index and its observers
#[derive(Debug, Clone)]
pub struct IndexMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    // Build metrics
    builds: AtomicU64,
    rebuilds: AtomicU64,
    points_added: AtomicU64,

    // Query metrics
    exact_searches: AtomicU64,
    bounded_searches: AtomicU64,
    cluster_cuts: AtomicU64,

    // Memory metrics
    //
    // Approximate byte count over all pivot allocations. Monotone: a
    // recomputed pivot is counted again, released pivots are not
    // subtracted. Observable, not authoritative.
    pivot_bytes: AtomicU64,
}

impl IndexMetrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                builds: AtomicU64::new(0),
                rebuilds: AtomicU64::new(0),
                points_added: AtomicU64::new(0),
                exact_searches: AtomicU64::new(0),
                bounded_searches: AtomicU64::new(0),
                cluster_cuts: AtomicU64::new(0),
                pivot_bytes: AtomicU64::new(0),
            }),
        }
    }

    /// Record a full index build
    pub fn record_build(&self) {
        self.inner.builds.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rebuild triggered by online growth
    pub fn record_rebuild(&self) {
        self.inner.rebuilds.fetch_add(1, Ordering::Relaxed);
    }

    /// Record online point additions
    pub fn record_points_added(&self, count: u64) {
        self.inner.points_added.fetch_add(count, Ordering::Relaxed);
    }

    /// Record an exact-descent query
    pub fn record_exact_search(&self) {
        self.inner.exact_searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a bounded best-bin-first query
    pub fn record_bounded_search(&self) {
        self.inner.bounded_searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cluster cut request
    pub fn record_cluster_cut(&self) {
        self.inner.cluster_cuts.fetch_add(1, Ordering::Relaxed);
    }

    /// Account bytes for a pivot allocation
    pub fn add_pivot_bytes(&self, bytes: u64) {
        self.inner.pivot_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Approximate bytes held by pivot allocations
    pub fn pivot_bytes(&self) -> u64 {
        self.inner.pivot_bytes.load(Ordering::Relaxed)
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            builds: self.inner.builds.load(Ordering::Relaxed),
            rebuilds: self.inner.rebuilds.load(Ordering::Relaxed),
            points_added: self.inner.points_added.load(Ordering::Relaxed),
            exact_searches: self.inner.exact_searches.load(Ordering::Relaxed),
            bounded_searches: self.inner.bounded_searches.load(Ordering::Relaxed),
            cluster_cuts: self.inner.cluster_cuts.load(Ordering::Relaxed),
            pivot_bytes: self.inner.pivot_bytes.load(Ordering::Relaxed),
        }
    }
}

impl Default for IndexMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Metrics snapshot
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub builds: u64,
    pub rebuilds: u64,
    pub points_added: u64,
    pub exact_searches: u64,
    pub bounded_searches: u64,
    pub cluster_cuts: u64,
    pub pivot_bytes: u64,
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    /// Start new timer
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop timer and log duration
    pub fn stop(self) {
        let duration = self.elapsed();
        tracing::debug!(
            name = %self.name,
            duration_ms = duration.as_millis(),
            "Operation completed"
        );
    }
}
