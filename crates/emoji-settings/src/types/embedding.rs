//! Embedding model and search settings.

use serde::{Deserialize, Serialize};

/// Sentence-embedding model settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbeddingSettings {
    /// Hugging Face model repository.
    pub model: String,
    /// ONNX file path inside the repository.
    pub model_file: String,
    /// Local model cache directory (may contain `~`).
    pub cache_dir: String,
    /// Output dimensions of the model.
    pub dimensions: usize,
    /// Tokens per input before truncation.
    pub max_sequence_length: usize,
    /// Texts per inference call while building the index.
    pub batch_size: usize,
    /// ONNX Runtime intra-op threads.
    pub intra_threads: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "sentence-transformers/paraphrase-MiniLM-L6-v2".to_string(),
            model_file: "onnx/model.onnx".to_string(),
            cache_dir: "~/.emoji-search/models".to_string(),
            dimensions: 384,
            max_sequence_length: 128,
            batch_size: 64,
            intra_threads: 2,
        }
    }
}

/// Query defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchSettings {
    /// `top_k` used when a request does not specify one.
    pub default_top_k: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { default_top_k: 20 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_defaults() {
        let e = EmbeddingSettings::default();
        assert_eq!(e.model, "sentence-transformers/paraphrase-MiniLM-L6-v2");
        assert_eq!(e.model_file, "onnx/model.onnx");
        assert_eq!(e.cache_dir, "~/.emoji-search/models");
        assert_eq!(e.dimensions, 384);
        assert_eq!(e.max_sequence_length, 128);
        assert_eq!(e.batch_size, 64);
        assert_eq!(e.intra_threads, 2);
    }

    #[test]
    fn search_defaults() {
        assert_eq!(SearchSettings::default().default_top_k, 20);
    }

    #[test]
    fn embedding_partial_json() {
        let e: EmbeddingSettings = serde_json::from_str(r#"{"batchSize": 8}"#).unwrap();
        assert_eq!(e.batch_size, 8);
        assert_eq!(e.dimensions, 384);
    }
}
