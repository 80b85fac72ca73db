//! # emoji-core
//!
//! Foundation types and dataset loading for emoji search.
//!
//! - [`EmojiEntry`], [`Category`], [`SearchResult`]
//! - [`Catalog`]: skin-tone filtering, rule-based categorisation, keywords
//! - [`source::builtin_table`]: the bundled Unicode emoji table
//! - [`logging::init_subscriber`]: stderr `tracing` subscriber
//!
//! ## Crate Position
//!
//! Standalone. Depended on by: emoji-embeddings, emoji-server, emoji-search.

#![deny(unsafe_code)]

pub mod catalog;
pub mod entry;
pub mod logging;
pub mod source;

pub use catalog::{Catalog, RawEmoji};
pub use entry::{Category, EmojiEntry, SearchResult, UnknownCategory};
