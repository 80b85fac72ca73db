//! # emoji-settings
//!
//! Configuration management with layered sources for emoji search.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`EmojiSearchSettings::default()`]
//! 2. **User file**: `~/.emoji-search/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `EMOJI_SEARCH_*` overrides (highest priority)
//!
//! The binary applies its CLI flags on top of the loaded value.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings_from_path, settings_path};
pub use types::*;
