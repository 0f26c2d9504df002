//! # Bonsai Core
//!
//! Foundation crate for the bonsai hierarchical k-means index:
//! - Error types
//! - Metrics collection
//! - Common utilities
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                   bonsai-core                   │
//! ├─────────────────────────────────────────────────┤
//! │  • error      - Error handling                  │
//! │  • metrics    - Counters & timers               │
//! │  • utils      - Common utilities                │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod metrics;
pub mod utils;

// Re-export commonly used types
pub use error::{Error, Result};
pub use metrics::{IndexMetrics, MetricsSnapshot, Timer};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
