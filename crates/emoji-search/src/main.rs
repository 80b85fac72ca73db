//! # emoji-search
//!
//! Semantic emoji search server binary. Loads the emoji catalog, embeds it
//! once, and serves the HTTP API until ctrl-c.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use emoji_core::Catalog;
use emoji_embeddings::{EmbeddingConfig, EmbeddingIndex, EmbeddingService, MockEmbeddingService};
use emoji_server::{EmojiServer, ServerConfig};
use emoji_settings::EmojiSearchSettings;

/// Semantic emoji search server.
#[derive(Parser, Debug)]
#[command(name = "emoji-search", about = "Semantic emoji search server")]
struct Cli {
    /// Host to bind (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides settings, 0 for auto-assign).
    #[arg(long)]
    port: Option<u16>,

    /// Settings file (default `~/.emoji-search/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Directory holding the front-end bundle (overrides settings).
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Use deterministic hash embeddings instead of downloading the model.
    #[arg(long)]
    mock_embeddings: bool,
}

impl Cli {
    /// Apply CLI overrides on top of loaded settings.
    fn apply(&self, settings: &mut EmojiSearchSettings) {
        if let Some(ref host) = self.host {
            settings.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(ref dir) = self.static_dir {
            settings.server.static_dir = dir.display().to_string();
        }
    }
}

/// Create the embedding service. A model load failure is fatal.
async fn embedding_service(
    settings: &EmojiSearchSettings,
    mock: bool,
) -> Result<Arc<dyn EmbeddingService>> {
    let config = EmbeddingConfig::from_settings(&settings.embedding);
    if mock {
        tracing::warn!("using mock embeddings, search results are not semantic");
        return Ok(Arc::new(MockEmbeddingService::new(config.dimensions)));
    }
    onnx_service(config).await
}

#[cfg(feature = "ort")]
async fn onnx_service(config: EmbeddingConfig) -> Result<Arc<dyn EmbeddingService>> {
    let model = config.model.clone();
    let service = emoji_embeddings::OnnxEmbeddingService::new(config);
    service
        .initialize()
        .await
        .with_context(|| format!("Failed to load embedding model {model}"))?;
    Ok(Arc::new(service))
}

#[cfg(not(feature = "ort"))]
async fn onnx_service(_config: EmbeddingConfig) -> Result<Arc<dyn EmbeddingService>> {
    anyhow::bail!("built without the `ort` feature; run with --mock-embeddings")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Settings first: the log level comes from them.
    let settings_path = cli
        .settings
        .clone()
        .unwrap_or_else(emoji_settings::settings_path);
    let (mut settings, load_error) = match emoji_settings::load_settings_from_path(&settings_path)
    {
        Ok(s) => (s, None),
        Err(e) => (EmojiSearchSettings::default(), Some(e)),
    };
    cli.apply(&mut settings);

    emoji_core::logging::init_subscriber(&settings.logging.level, settings.logging.json);
    if let Some(e) = load_error {
        tracing::warn!(error = %e, path = %settings_path.display(), "failed to load settings, using defaults");
    }

    let catalog = Catalog::builtin();
    tracing::info!(entries = catalog.len(), groups = catalog.groups().len(), "emoji catalog loaded");

    let service = embedding_service(&settings, cli.mock_embeddings).await?;
    let index = EmbeddingIndex::build(catalog, service, settings.embedding.batch_size)
        .await
        .context("Failed to build embedding index")?;

    let metrics =
        emoji_server::metrics::install_recorder().context("Failed to install metrics recorder")?;

    let config = ServerConfig::from_settings(&settings);
    let bind_addr = config.bind_addr();
    let server = EmojiServer::new(config, Arc::new(index), metrics);
    let (addr, handle) = server
        .listen()
        .await
        .with_context(|| format!("Failed to bind {bind_addr}"))?;

    tracing::info!("emoji search listening on http://{addr}");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    tracing::info!("Shutting down...");
    let outcome = server.stop(handle).await;

    tracing::info!(?outcome, "Shutdown complete");
    Ok(())
}
