//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]`, so a
//! settings file may carry any subset of fields and missing ones take their
//! compiled default.

mod embedding;
mod server;

pub use embedding::*;
pub use server::*;

use serde::{Deserialize, Serialize};

/// Root settings type for the emoji search service.
///
/// # JSON Format
///
/// ```json
/// {
///   "server": { "port": 9000 },
///   "embedding": { "cacheDir": "/var/cache/emoji-search" },
///   "logging": { "level": "debug" }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmojiSearchSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Embedding model settings.
    pub embedding: EmbeddingSettings,
    /// Query defaults.
    pub search: SearchSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for EmojiSearchSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: "emoji-search".to_string(),
            server: ServerSettings::default(),
            embedding: EmbeddingSettings::default(),
            search: SearchSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}
