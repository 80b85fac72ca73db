//! Server configuration.

use std::path::PathBuf;
use std::time::Duration;

use emoji_settings::EmojiSearchSettings;
use serde::{Deserialize, Serialize};

/// Configuration for the emoji search server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind.
    pub host: String,
    /// Port to bind (`0` for auto-assign).
    pub port: u16,
    /// Directory served for every non-API path.
    pub static_dir: PathBuf,
    /// Allow any origin, method and header.
    pub cors_permissive: bool,
    /// `top_k` used when a search request omits it.
    pub default_top_k: usize,
    /// Seconds to wait for in-flight requests on shutdown.
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_settings(&EmojiSearchSettings::default())
    }
}

impl ServerConfig {
    /// Create config from loaded settings.
    pub fn from_settings(s: &EmojiSearchSettings) -> Self {
        Self {
            host: s.server.host.clone(),
            port: s.server.port,
            static_dir: PathBuf::from(&s.server.static_dir),
            cors_permissive: s.server.cors_permissive,
            default_top_k: s.search.default_top_k.max(1),
            shutdown_timeout_secs: s.server.shutdown_timeout_secs,
        }
    }

    /// `host:port` bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Shutdown drain timeout.
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}
