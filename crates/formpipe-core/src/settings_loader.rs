//! Settings loading from configuration files.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `FORMPIPE_DEBUG` | `debug` |
//! | `FORMPIPE_LOG_LEVEL` | `log_level` |
//! | `FORMPIPE_RECOVER_PLUGIN_PANICS` | `recover_plugin_panics` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use formpipe_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file("config/formpipe.toml").unwrap();
//! let settings = settings_loader::from_json_file("config/formpipe.json").unwrap();
//! let settings = settings_loader::from_toml_file_with_env("config/formpipe.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::FormpipeError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Any fields not present in the TOML keep their default values.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, FormpipeError> {
    // Merge over the serialized defaults so missing keys keep their defaults.
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| FormpipeError::Configuration(format!("Failed to parse TOML: {e}")))?;

    let json_value = toml_to_json(toml_value);
    merge_over_defaults(json_value, "TOML")
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, FormpipeError> {
    let content = read_config_file(path.as_ref(), "TOML")?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, FormpipeError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
pub fn from_json_str(json_str: &str) -> Result<Settings, FormpipeError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| FormpipeError::Configuration(format!("Failed to parse JSON: {e}")))?;
    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, FormpipeError> {
    let content = read_config_file(path.as_ref(), "JSON")?;
    from_json_str(&content)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies environment variable overrides to a settings struct.
///
/// Boolean variables accept "true"/"1"/"yes" as true; anything else is false.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides(settings, |key| std::env::var(key).ok());
}

fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("FORMPIPE_DEBUG") {
        settings.debug = parse_env_bool(&val);
    }

    if let Some(val) = lookup("FORMPIPE_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Some(val) = lookup("FORMPIPE_RECOVER_PLUGIN_PANICS") {
        settings.recover_plugin_panics = parse_env_bool(&val);
    }
}

fn parse_env_bool(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes")
}

// ============================================================
// Helpers
// ============================================================

fn read_config_file(path: &Path, format: &str) -> Result<String, FormpipeError> {
    std::fs::read_to_string(path).map_err(|e| {
        FormpipeError::Configuration(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

fn merge_over_defaults(value: serde_json::Value, format: &str) -> Result<Settings, FormpipeError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        FormpipeError::Configuration(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        FormpipeError::Configuration(format!("Failed to deserialize settings from {format}: {e}"))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}
