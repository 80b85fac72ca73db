//! Cosine-similarity ranking over the embedding index.

use std::cmp::Ordering;

use emoji_core::{EmojiEntry, SearchResult};
use tracing::debug;

use crate::errors::{EmbeddingError, Result};
use crate::index::EmbeddingIndex;
use crate::normalize::cosine_similarity;

impl EmbeddingIndex {
    /// Encode `query` and return the `top_k` most similar entries.
    ///
    /// Results are sorted by score descending; equal scores keep catalog
    /// order. `top_k == 0` yields an empty list without encoding.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        if top_k == 0 {
            return Ok(Vec::new());
        }
        let vector = self.service.embed_single(query).await?;
        let results = self.search_vector(&vector, top_k)?;
        debug!(query, top_k, returned = results.len(), "search complete");
        Ok(results)
    }

    /// Rank entries against an already-encoded query vector.
    pub fn search_vector(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        if !self.is_empty() && query.len() != self.dimensions() {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimensions(),
                actual: query.len(),
            });
        }
        Ok(rank(query, self.catalog().entries(), self.table(), top_k))
    }
}

/// Score every row against `query`, sort descending, keep `top_k`.
///
/// `entries` and `table` are aligned by position.
pub fn rank(
    query: &[f32],
    entries: &[EmojiEntry],
    table: &[Vec<f32>],
    top_k: usize,
) -> Vec<SearchResult> {
    let mut scored: Vec<(usize, f32)> = table
        .iter()
        .enumerate()
        .map(|(i, row)| (i, cosine_similarity(query, row)))
        .collect();

    // Stable sort: ties keep table order.
    scored.sort_by(|a, b| compare_scores(b.1, a.1));
    scored.truncate(top_k);

    scored
        .into_iter()
        .filter_map(|(i, score)| {
            entries.get(i).map(|entry| SearchResult {
                entry: entry.clone(),
                score,
            })
        })
        .collect()
}

/// Total order on scores with NaN below every number.
fn compare_scores(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}
