//! # emoji-embeddings
//!
//! Sentence embeddings and semantic search over the emoji catalog.
//!
//! - [`EmbeddingService`]: async trait; [`MockEmbeddingService`] is a
//!   deterministic SHA-256 implementation for tests and offline runs
//! - `OnnxEmbeddingService` (feature `ort`): paraphrase-MiniLM-L6-v2 via
//!   `ort`, mean pooling + L2 normalization
//! - [`EmbeddingIndex`]: the catalog's embedding table, built once
//! - [`EmbeddingIndex::search`]: cosine similarity, stable descending rank
//!
//! ## Crate Position
//!
//! Depends on: emoji-core, emoji-settings.
//! Depended on by: emoji-server, emoji-search.

#![deny(unsafe_code)]

pub mod config;
pub mod errors;
pub mod index;
pub mod normalize;
#[cfg(feature = "ort")]
pub mod ort_service;
pub mod search;
pub mod service;
pub mod text;

pub use config::EmbeddingConfig;
pub use errors::{EmbeddingError, Result};
pub use index::EmbeddingIndex;
#[cfg(feature = "ort")]
pub use ort_service::OnnxEmbeddingService;
pub use service::{EmbeddingService, MockEmbeddingService};
