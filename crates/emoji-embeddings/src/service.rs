//! Embedding service trait and mock implementation.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::{EmbeddingError, Result};
use crate::normalize::l2_normalize;

/// Trait for embedding text into vectors.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Embed a batch of texts, one vector per text in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single text (default: calls `embed` with one item).
    async fn embed_single(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed(&[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::Inference("empty result".into()))
    }

    /// Whether the service is ready for inference.
    fn is_ready(&self) -> bool;

    /// Output embedding dimensions.
    fn dimensions(&self) -> usize;

    /// Identifier of the model producing the vectors.
    fn model_id(&self) -> &str;
}

/// Mock embedding service for tests and offline runs.
///
/// Vectors come from SHA-256 over the folded text, one digest per 16
/// components with a block counter mixed in, then unit-normalized.
pub struct MockEmbeddingService {
    dims: usize,
    ready: AtomicBool,
}

impl MockEmbeddingService {
    /// Model id reported by the mock.
    pub const MODEL_ID: &'static str = "mock-sha256";

    /// Create a new mock service with the given dimensions.
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            ready: AtomicBool::new(true),
        }
    }

    /// Set whether this mock is ready.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Case and whitespace are folded before hashing, so `"Red  Heart"` and
    /// `"red heart"` share a vector.
    fn seeded_vector(&self, text: &str) -> Vec<f32> {
        let folded = text
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ");

        let mut v = Vec::with_capacity(self.dims);
        let mut block: u32 = 0;
        while v.len() < self.dims {
            let digest = Sha256::new()
                .chain_update(block.to_le_bytes())
                .chain_update(folded.as_bytes())
                .finalize();
            v.extend(
                digest
                    .chunks_exact(2)
                    .map(|pair| f32::from(i16::from_le_bytes([pair[0], pair[1]])) / 32768.0),
            );
            block += 1;
        }
        v.truncate(self.dims);

        l2_normalize(&mut v);
        v
    }
}

#[async_trait]
impl EmbeddingService for MockEmbeddingService {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if !self.is_ready() {
            return Err(EmbeddingError::NotReady);
        }
        Ok(texts.iter().map(|t| self.seeded_vector(t)).collect())
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn model_id(&self) -> &str {
        Self::MODEL_ID
    }
}
