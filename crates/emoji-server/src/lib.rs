//! # emoji-server
//!
//! Axum HTTP boundary for emoji search.
//!
//! - `/api/emoji/*`: browse by category and semantic search
//! - `/api/health`, `/metrics`
//! - Static front-end bundle for every other path
//! - Permissive CORS, `tower-http` request tracing
//! - Listener drain on shutdown, bounded by the configured timeout
//!
//! ## Crate Position
//!
//! Depends on: emoji-core, emoji-settings, emoji-embeddings.
//! Depended on by: emoji-search.

#![deny(unsafe_code)]

pub mod config;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod metrics;
pub mod server;
pub mod shutdown;

pub use config::ServerConfig;
pub use errors::ApiError;
pub use server::{AppState, EmojiServer};
pub use shutdown::{DrainOutcome, ShutdownCoordinator};
