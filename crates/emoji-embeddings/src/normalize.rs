//! Vector normalization, pooling, and similarity functions.

/// Compute the L2 (Euclidean) norm of a vector.
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// L2-normalize a vector in-place. Zero vectors remain zero.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = l2_norm(v);
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Cosine similarity between two vectors.
///
/// Returns `0.0` when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "vectors must have equal dimensions");
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Mean-pool one item's token embeddings over its attention mask.
///
/// `hidden` is the item's `[seq_len, hidden_dim]` slice, flattened. Padding
/// positions (mask `0`) are excluded. An all-zero mask yields a zero vector.
pub fn mean_pool(hidden: &[f32], mask: &[i64], hidden_dim: usize) -> Vec<f32> {
    let mut pooled = vec![0.0f32; hidden_dim];
    let mut count = 0.0f32;
    for (token, &m) in hidden.chunks_exact(hidden_dim).zip(mask) {
        if m == 0 {
            continue;
        }
        for (acc, x) in pooled.iter_mut().zip(token) {
            *acc += x;
        }
        count += 1.0;
    }
    if count > 0.0 {
        for x in &mut pooled {
            *x /= count;
        }
    }
    pooled
}
