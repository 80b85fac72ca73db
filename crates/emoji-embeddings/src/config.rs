//! Embedding configuration.

use emoji_settings::EmbeddingSettings;
use serde::{Deserialize, Serialize};

/// Configuration for the embedding model and index build.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbeddingConfig {
    /// Hugging Face model repository.
    pub model: String,
    /// ONNX file inside the repository.
    pub model_file: String,
    /// Output dimensions.
    pub dimensions: usize,
    /// Local model cache directory (may contain `~`).
    pub cache_dir: String,
    /// Tokens per input before truncation.
    pub max_sequence_length: usize,
    /// Texts per inference call while building the index.
    pub batch_size: usize,
    /// ONNX Runtime intra-op threads.
    pub intra_threads: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self::from_settings(&EmbeddingSettings::default())
    }
}

impl EmbeddingConfig {
    /// Create config from settings.
    pub fn from_settings(s: &EmbeddingSettings) -> Self {
        Self {
            model: s.model.clone(),
            model_file: s.model_file.clone(),
            dimensions: s.dimensions,
            cache_dir: s.cache_dir.clone(),
            max_sequence_length: s.max_sequence_length,
            batch_size: s.batch_size.max(1),
            intra_threads: s.intra_threads.max(1),
        }
    }

    /// Resolve the cache directory, expanding `~/` to the home directory.
    pub fn resolved_cache_dir(&self) -> String {
        if let Some(rest) = self.cache_dir.strip_prefix("~/") {
            if let Ok(home) = std::env::var("HOME") {
                return format!("{home}/{rest}");
            }
        }
        self.cache_dir.clone()
    }
}
