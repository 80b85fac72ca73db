//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`EmojiSearchSettings::default()`]
//! 2. If the settings file exists, deep-merge its values over defaults
//! 3. Apply `EMOJI_SEARCH_*` environment variable overrides (highest priority)
//! 4. Validate
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::{Result, SettingsError};
use crate::types::EmojiSearchSettings;

/// Resolve the default settings file path (`~/.emoji-search/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".emoji-search").join("settings.json")
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults. Invalid JSON or an invalid value is an
/// error.
pub fn load_settings_from_path(path: &Path) -> Result<EmojiSearchSettings> {
    let mut settings = read_settings_file(path)?;
    apply_env_overrides(&mut settings);
    validate(&settings)?;
    Ok(settings)
}

/// Defaults deep-merged with the file at `path`, without env overrides.
pub fn read_settings_file(path: &Path) -> Result<EmojiSearchSettings> {
    let defaults = serde_json::to_value(EmojiSearchSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Reject values the service cannot run with.
pub fn validate(settings: &EmojiSearchSettings) -> Result<()> {
    if settings.search.default_top_k == 0 {
        return Err(SettingsError::InvalidValue(
            "search.defaultTopK must be at least 1".into(),
        ));
    }
    if settings.embedding.batch_size == 0 {
        return Err(SettingsError::InvalidValue(
            "embedding.batchSize must be at least 1".into(),
        ));
    }
    if settings.embedding.max_sequence_length == 0 {
        return Err(SettingsError::InvalidValue(
            "embedding.maxSequenceLength must be at least 1".into(),
        ));
    }
    if settings.embedding.model.trim().is_empty() {
        return Err(SettingsError::InvalidValue(
            "embedding.model must not be empty".into(),
        ));
    }
    Ok(())
}

/// Apply environment variable overrides to loaded settings.
///
/// Invalid values are logged and ignored (the file/default value stays).
pub fn apply_env_overrides(settings: &mut EmojiSearchSettings) {
    // ── Server ──────────────────────────────────────────────────────
    if let Some(v) = read_env_string("EMOJI_SEARCH_HOST") {
        settings.server.host = v;
    }
    if let Some(v) = read_env_u16("EMOJI_SEARCH_PORT", 1, 65535) {
        settings.server.port = v;
    }
    if let Some(v) = read_env_string("EMOJI_SEARCH_STATIC_DIR") {
        settings.server.static_dir = v;
    }

    // ── Embedding ───────────────────────────────────────────────────
    if let Some(v) = read_env_string("EMOJI_SEARCH_MODEL") {
        settings.embedding.model = v;
    }
    if let Some(v) = read_env_string("EMOJI_SEARCH_CACHE_DIR") {
        settings.embedding.cache_dir = v;
    }

    // ── Search ──────────────────────────────────────────────────────
    if let Some(v) = read_env_usize("EMOJI_SEARCH_DEFAULT_TOP_K", 1, 10_000) {
        settings.search.default_top_k = v;
    }

    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = read_env_string("EMOJI_SEARCH_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = read_env_bool("EMOJI_SEARCH_LOG_JSON") {
        settings.logging.json = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u16` within a range.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `usize` within a range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers ─────────────────────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_bool(name: &str) -> Option<bool> {
    let val = std::env::var(name).ok()?;
    let result = parse_bool(&val);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid boolean env var, ignoring");
    }
    result
}

fn read_env_u16(name: &str, min: u16, max: u16) -> Option<u16> {
    let val = std::env::var(name).ok()?;
    let result = parse_u16_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u16 env var, ignoring");
    }
    result
}

fn read_env_usize(name: &str, min: usize, max: usize) -> Option<usize> {
    let val = std::env::var(name).ok()?;
    let result = parse_usize_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid usize env var, ignoring");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_settings(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_nested_override() {
        let target = serde_json::json!({"server": {"port": 8000, "host": "0.0.0.0"}});
        let source = serde_json::json!({"server": {"port": 9090}});
        let merged = deep_merge(target, source);
        assert_eq!(merged["server"]["port"], 9090);
        assert_eq!(merged["server"]["host"], "0.0.0.0");
    }

    #[test]
    fn merge_null_preserves_target() {
        let target = serde_json::json!({"a": 1, "b": 2});
        let source = serde_json::json!({"a": null});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn merge_array_replace() {
        let target = serde_json::json!({"items": [1, 2, 3]});
        let source = serde_json::json!({"items": [4]});
        assert_eq!(deep_merge(target, source)["items"], serde_json::json!([4]));
    }

    #[test]
    fn merge_new_keys_added() {
        let merged = deep_merge(serde_json::json!({"a": 1}), serde_json::json!({"b": 2}));
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn merge_primitive_replaces_object() {
        let target = serde_json::json!({"a": {"nested": true}});
        let source = serde_json::json!({"a": 42});
        assert_eq!(deep_merge(target, source)["a"], 42);
    }

    // ── read_settings_file ──────────────────────────────────────────

    #[test]
    fn missing_file_returns_defaults() {
        let settings = read_settings_file(Path::new("/nonexistent/settings.json")).unwrap();
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.search.default_top_k, 20);
    }

    #[test]
    fn partial_file_overrides() {
        let (_dir, path) = write_settings(
            r#"{"server": {"port": 9100}, "embedding": {"cacheDir": "/srv/models"}}"#,
        );
        let settings = read_settings_file(&path).unwrap();
        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.embedding.cache_dir, "/srv/models");
        assert_eq!(settings.embedding.batch_size, 64);
    }

    #[test]
    fn invalid_json_is_error() {
        let (_dir, path) = write_settings("not json");
        let err = read_settings_file(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn wrong_type_is_error() {
        let (_dir, path) = write_settings(r#"{"server": {"port": "eighty"}}"#);
        assert!(matches!(
            read_settings_file(&path).unwrap_err(),
            SettingsError::Json(_)
        ));
    }

    // ── validate ────────────────────────────────────────────────────

    #[test]
    fn defaults_are_valid() {
        validate(&EmojiSearchSettings::default()).unwrap();
    }

    #[test]
    fn zero_top_k_rejected() {
        let mut settings = EmojiSearchSettings::default();
        settings.search.default_top_k = 0;
        let err = validate(&settings).unwrap_err();
        assert!(err.to_string().contains("defaultTopK"));
    }

    #[test]
    fn zero_batch_size_rejected() {
        let mut settings = EmojiSearchSettings::default();
        settings.embedding.batch_size = 0;
        assert!(matches!(
            validate(&settings).unwrap_err(),
            SettingsError::InvalidValue(_)
        ));
    }

    #[test]
    fn blank_model_rejected() {
        let mut settings = EmojiSearchSettings::default();
        settings.embedding.model = "  ".into();
        assert!(validate(&settings).is_err());
    }

    #[test]
    fn load_from_path_validates() {
        let (_dir, path) = write_settings(r#"{"embedding": {"maxSequenceLength": 0}}"#);
        assert!(matches!(
            load_settings_from_path(&path).unwrap_err(),
            SettingsError::InvalidValue(_)
        ));
    }

    // ── parsing ─────────────────────────────────────────────────────

    #[test]
    fn parse_bool_variants() {
        for val in ["true", "1", "yes", "ON"] {
            assert_eq!(parse_bool(val), Some(true), "failed for {val}");
        }
        for val in ["false", "0", "no", "Off"] {
            assert_eq!(parse_bool(val), Some(false), "failed for {val}");
        }
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn parse_u16_bounds() {
        assert_eq!(parse_u16_range("8000", 1, 65535), Some(8000));
        assert_eq!(parse_u16_range("0", 1, 65535), None);
        assert_eq!(parse_u16_range("99999", 1, 65535), None);
        assert_eq!(parse_u16_range("port", 1, 65535), None);
    }

    #[test]
    fn parse_usize_bounds() {
        assert_eq!(parse_usize_range("20", 1, 10_000), Some(20));
        assert_eq!(parse_usize_range("0", 1, 10_000), None);
        assert_eq!(parse_usize_range("-3", 1, 10_000), None);
    }

    #[test]
    fn settings_path_under_home_dir() {
        let path = settings_path();
        assert!(path.ends_with(".emoji-search/settings.json"));
    }
}
