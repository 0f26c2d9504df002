//! # Error Handling
//!
//! Error types for bonsai index operations.
//!
//! ## Design Principles
//!
//! 1. **Actionable**: Every error should guide the user toward resolution
//! 2. **Contextual**: Errors include relevant context (dimensions, values)
//! 3. **Recoverable**: Distinguish between fatal and recoverable errors

use thiserror::Error;

/// Result type alias for bonsai operations
pub type Result<T> = std::result::Result<T, Error>;

/// Primary error type for bonsai
#[derive(Error, Debug)]
pub enum Error {
    // Configuration Errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    // Index Errors
    #[error("Index has not been built")]
    NotBuilt,

    #[error("Index corruption detected: {details}")]
    IndexCorruption { details: String },

    // Persistence Errors
    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("IO error: {message}")]
    Io { message: String, source: std::io::Error },

    // System Errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl Error {
    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Io { .. } => false,
            Error::IndexCorruption { .. } => false,
            Error::Internal { .. } => false,
            _ => true,
        }
    }

    /// Get error code for monitoring
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Configuration { .. } => "CONFIG_ERROR",
            Error::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            Error::NotBuilt => "NOT_BUILT",
            Error::IndexCorruption { .. } => "INDEX_CORRUPTION",
            Error::Persistence { .. } => "PERSISTENCE_ERROR",
            Error::Io { .. } => "IO_ERROR",
            Error::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Extension trait for adding context to results
pub trait ResultExt<T> {
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| Error::Internal {
            message: format!("{}: {}", f(), e),
        })
    }
}
