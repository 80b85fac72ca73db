//! Embedding error types.
//!
//! Errors raised while the index is built are fatal at startup. Errors
//! raised while a query is encoded surface as a 500 at the HTTP boundary.

use thiserror::Error;

/// Errors from embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Model download or initialization failed.
    #[error("Model initialization failed: {0}")]
    ModelInit(String),

    /// Inference failed.
    #[error("Inference failed: {0}")]
    Inference(String),

    /// A vector did not have the dimension the index was built with.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension of the embedding table.
        expected: usize,
        /// Dimension that was produced.
        actual: usize,
    },

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Service not ready (model not loaded).
    #[error("Embedding service not ready")]
    NotReady,

    /// Generic internal error.
    #[error("{0}")]
    Internal(String),
}

/// Result alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;
