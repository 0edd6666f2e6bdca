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
//! | `BACKOFFICE_DEBUG` | `debug` |
//! | `BACKOFFICE_LOG_LEVEL` | `log_level` |
//! | `BACKOFFICE_ORGANIZATION_ID` | `organization_id` |
//! | `BACKOFFICE_STORE_URL` | `store.url` |
//! | `BACKOFFICE_STORE_API_KEY` | `store.api_key` |
//! | `BACKOFFICE_STORE_TABLE` | `store.table` |
//! | `BACKOFFICE_STORE_TIMEOUT_SECS` | `store.timeout_secs` |
//! | `BACKOFFICE_STORE_MAX_RETRIES` | `store.max_retries` |
//! | `BACKOFFICE_LANGUAGE_CODE` | `locale.language_code` |
//! | `BACKOFFICE_CURRENCY_SYMBOL` | `locale.currency_symbol` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use backoffice_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("backoffice.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::BackofficeError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Keys missing from the TOML keep their default values, including keys
/// nested inside `[store]` and `[locale]`.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, BackofficeError> {
    let layer: serde_json::Value = toml::from_str(toml_str)
        .map_err(|e| BackofficeError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    merge_over_defaults(layer, "TOML")
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, BackofficeError> {
    let content = read_config(path.as_ref())?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, BackofficeError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
pub fn from_json_str(json_str: &str) -> Result<Settings, BackofficeError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| BackofficeError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, BackofficeError> {
    let content = read_config(path.as_ref())?;
    from_json_str(&content)
}

/// Loads settings from a file, picking the format from its extension
/// (`.json` is JSON, anything else is TOML), then applies env overrides.
pub fn from_file_with_env(path: impl AsRef<Path>) -> Result<Settings, BackofficeError> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let mut settings = if is_json {
        from_json_file(path)?
    } else {
        from_toml_file(path)?
    };
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `BACKOFFICE_*` environment variable overrides to a settings struct.
///
/// Numeric variables that fail to parse are ignored.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("BACKOFFICE_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Ok(val) = std::env::var("BACKOFFICE_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("BACKOFFICE_ORGANIZATION_ID") {
        settings.organization_id = Some(val).filter(|v| !v.trim().is_empty());
    }

    if let Ok(val) = std::env::var("BACKOFFICE_STORE_URL") {
        settings.store.url = val;
    }

    if let Ok(val) = std::env::var("BACKOFFICE_STORE_API_KEY") {
        settings.store.api_key = val;
    }

    if let Ok(val) = std::env::var("BACKOFFICE_STORE_TABLE") {
        settings.store.table = val;
    }

    if let Ok(val) = std::env::var("BACKOFFICE_STORE_TIMEOUT_SECS") {
        if let Ok(secs) = val.parse::<u64>() {
            settings.store.timeout_secs = secs;
        }
    }

    if let Ok(val) = std::env::var("BACKOFFICE_STORE_MAX_RETRIES") {
        if let Ok(retries) = val.parse::<usize>() {
            settings.store.max_retries = retries;
        }
    }

    if let Ok(val) = std::env::var("BACKOFFICE_LANGUAGE_CODE") {
        settings.locale.language_code = val;
    }

    if let Ok(val) = std::env::var("BACKOFFICE_CURRENCY_SYMBOL") {
        settings.locale.currency_symbol = val;
    }
}

// ============================================================
// Helpers
// ============================================================

fn read_config(path: &Path) -> Result<String, BackofficeError> {
    std::fs::read_to_string(path).map_err(|e| {
        BackofficeError::ConfigurationError(format!(
            "Failed to read config file '{}': {e}",
            path.display()
        ))
    })
}

fn merge_over_defaults(
    layer: serde_json::Value,
    format: &str,
) -> Result<Settings, BackofficeError> {
    let mut settings = serde_json::to_value(Settings::default()).map_err(|e| {
        BackofficeError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    overlay(&mut settings, layer);
    serde_json::from_value(settings).map_err(|e| {
        BackofficeError::ConfigurationError(format!(
            "Failed to deserialize settings from {format}: {e}"
        ))
    })
}

/// Writes `layer` over `settings` in place.
///
/// Sections (`store`, `locale`) are overlaid key by key so a partial table
/// keeps the other defaults; every other value, arrays included, replaces
/// what was there.
fn overlay(settings: &mut serde_json::Value, layer: serde_json::Value) {
    use serde_json::Value;

    match (settings, layer) {
        (Value::Object(section), Value::Object(keys)) => {
            for (key, value) in keys {
                match section.get_mut(&key) {
                    Some(current) => overlay(current, value),
                    None => {
                        section.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── TOML loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            debug = false
            organization_id = "org-42"

            [store]
            url = "https://project.example.co"
            api_key = "anon-key"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.organization_id.as_deref(), Some("org-42"));
        assert_eq!(settings.store.url, "https://project.example.co");
        // Nested defaults preserved
        assert_eq!(settings.store.table, "custom_field_definitions");
        assert_eq!(settings.store.max_retries, 2);
        assert_eq!(settings.locale.currency_symbol, "$");
    }

    #[test]
    fn test_from_toml_str_locale() {
        let toml = r#"
            [locale]
            language_code = "pt-br"
            currency_symbol = "R$"
            decimal_separator = ","
            thousands_separator = "."
            date_format = "%d/%m/%Y"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.locale.currency_symbol, "R$");
        assert_eq!(settings.locale.decimal_separator, ",");
        assert_eq!(settings.locale.date_format, "%d/%m/%Y");
        assert_eq!(settings.locale.no_label, "\u{2717} No");
    }

    #[test]
    fn test_from_toml_str_empty() {
        let settings = from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = from_toml_str("[[invalid toml content");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_toml_str_wrong_type() {
        let result = from_toml_str("debug = \"sometimes\"");
        assert!(matches!(
            result,
            Err(BackofficeError::ConfigurationError(_))
        ));
    }

    // ── JSON loading ────────────────────────────────────────────────

    #[test]
    fn test_from_json_str_basic() {
        let json = r#"{
            "log_level": "debug",
            "store": {"timeout_secs": 5}
        }"#;

        let settings = from_json_str(json).unwrap();
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.store.timeout_secs, 5);
        assert_eq!(settings.store.table, "custom_field_definitions");
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(from_json_str("{invalid json").is_err());
    }

    // ── File loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backoffice.toml");
        std::fs::write(&path, "organization_id = \"file-org\"\n").unwrap();

        let settings = from_toml_file(&path).unwrap();
        assert_eq!(settings.organization_id.as_deref(), Some("file-org"));
    }

    #[test]
    fn test_from_file_with_env_picks_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backoffice.json");
        std::fs::write(&path, r#"{"store": {"table": "field_defs"}}"#).unwrap();

        let settings = from_file_with_env(&path).unwrap();
        assert_eq!(settings.store.table, "field_defs");
    }

    #[test]
    fn test_from_toml_file_missing() {
        let result = from_toml_file("/nonexistent/path/backoffice.toml");
        assert!(result.is_err());
    }

    // ── Environment variable overrides ──────────────────────────────

    #[test]
    fn test_apply_env_overrides_store_url() {
        let mut settings = Settings::default();
        std::env::set_var("BACKOFFICE_STORE_URL", "https://env.example.co");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.store.url, "https://env.example.co");
        std::env::remove_var("BACKOFFICE_STORE_URL");
    }

    #[test]
    fn test_apply_env_overrides_invalid_retries() {
        let mut settings = Settings::default();
        std::env::set_var("BACKOFFICE_STORE_MAX_RETRIES", "lots");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.store.max_retries, 2);
        std::env::remove_var("BACKOFFICE_STORE_MAX_RETRIES");
    }

    #[test]
    fn test_apply_env_overrides_currency_symbol() {
        let mut settings = Settings::default();
        std::env::set_var("BACKOFFICE_CURRENCY_SYMBOL", "\u{20ac}");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.locale.currency_symbol, "\u{20ac}");
        std::env::remove_var("BACKOFFICE_CURRENCY_SYMBOL");
    }

    // ── overlay helper ──────────────────────────────────────────────

    #[test]
    fn test_overlay_partial_section_keeps_defaults() {
        let mut settings = serde_json::to_value(Settings::default()).unwrap();
        overlay(
            &mut settings,
            serde_json::json!({"store": {"max_retries": 5}, "debug": true}),
        );
        assert_eq!(settings["store"]["max_retries"], 5);
        assert_eq!(settings["store"]["table"], "custom_field_definitions");
        assert_eq!(settings["debug"], true);
        assert_eq!(settings["locale"]["currency_symbol"], "$");
    }

    #[test]
    fn test_overlay_replaces_scalars_and_arrays() {
        let mut settings = serde_json::json!({"organization_id": null, "tags": [1, 2, 3]});
        overlay(
            &mut settings,
            serde_json::json!({"organization_id": "org-7", "tags": [4]}),
        );
        assert_eq!(settings["organization_id"], "org-7");
        assert_eq!(settings["tags"], serde_json::json!([4]));
    }

    #[test]
    fn test_from_toml_str_partial_store_keeps_timeout() {
        let settings = from_toml_str("[store]\ntable = \"field_defs\"\n").unwrap();
        assert_eq!(settings.store.table, "field_defs");
        assert_eq!(settings.store.timeout_secs, Settings::default().store.timeout_secs);
        assert_eq!(settings.store.url, Settings::default().store.url);
    }
}
