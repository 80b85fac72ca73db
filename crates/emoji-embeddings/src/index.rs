//! In-memory embedding table aligned with the emoji catalog.
//!
//! Built once at startup and never mutated. Row `i` of the table is the
//! embedding of entry `i`'s description text.

use std::sync::Arc;

use emoji_core::Catalog;
use tracing::{debug, info};

use crate::errors::{EmbeddingError, Result};
use crate::service::EmbeddingService;
use crate::text::description_text;

/// Catalog, its embedding table, and the service that produced it.
pub struct EmbeddingIndex {
    catalog: Catalog,
    table: Vec<Vec<f32>>,
    dimensions: usize,
    model_id: String,
    pub(crate) service: Arc<dyn EmbeddingService>,
}

impl std::fmt::Debug for EmbeddingIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingIndex")
            .field("entries", &self.catalog.len())
            .field("dimensions", &self.dimensions)
            .field("model_id", &self.model_id)
            .finish_non_exhaustive()
    }
}

impl EmbeddingIndex {
    /// Encode every catalog entry, `batch_size` descriptions per call.
    ///
    /// Fails if the service returns the wrong number of rows for a batch or
    /// a vector whose dimension differs from the rest of the table.
    pub async fn build(
        catalog: Catalog,
        service: Arc<dyn EmbeddingService>,
        batch_size: usize,
    ) -> Result<Self> {
        if !service.is_ready() {
            return Err(EmbeddingError::NotReady);
        }

        let texts: Vec<String> = catalog.entries().iter().map(description_text).collect();
        let mut table: Vec<Vec<f32>> = Vec::with_capacity(texts.len());
        let mut dimensions: Option<usize> = None;

        for (batch_idx, batch) in texts.chunks(batch_size.max(1)).enumerate() {
            let vectors = service.embed(batch).await?;
            if vectors.len() != batch.len() {
                return Err(EmbeddingError::Inference(format!(
                    "batch {batch_idx}: expected {} vectors, got {}",
                    batch.len(),
                    vectors.len()
                )));
            }
            for vector in vectors {
                let expected = *dimensions.get_or_insert(vector.len());
                if vector.len() != expected {
                    return Err(EmbeddingError::DimensionMismatch {
                        expected,
                        actual: vector.len(),
                    });
                }
                table.push(vector);
            }
            debug!(batch = batch_idx, rows = table.len(), "encoded batch");
        }

        let dimensions = dimensions.unwrap_or_else(|| service.dimensions());
        let model_id = service.model_id().to_string();
        info!(
            entries = table.len(),
            dimensions,
            model = %model_id,
            "embedding index built"
        );

        Ok(Self {
            catalog,
            table,
            dimensions,
            model_id,
            service,
        })
    }

    /// The catalog the index was built from.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Embedding table, one row per catalog entry.
    pub fn table(&self) -> &[Vec<f32>] {
        &self.table
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Vector dimension of every row.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Model that produced the table.
    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}
