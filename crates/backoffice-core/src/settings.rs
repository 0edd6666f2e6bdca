//! Settings for backoffice-rs.
//!
//! [`Settings`] holds the tenant, remote store and locale configuration.
//! It is built once at startup (see [`settings_loader`](crate::settings_loader))
//! and passed explicitly to whatever needs it; there is no global instance.

use serde::{Deserialize, Serialize};

/// Connection configuration for the hosted row store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Base URL of the hosted project (e.g. `https://abc.example.co`).
    pub url: String,
    /// The anon/service key sent as `apikey` and bearer token.
    pub api_key: String,
    /// Table holding custom field definitions.
    pub table: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// How many times a failed read is retried on transient errors.
    pub max_retries: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            table: "custom_field_definitions".to_string(),
            timeout_secs: 30,
            max_retries: 2,
        }
    }
}

/// Locale used by the read-only display formatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleSettings {
    /// The language code (e.g. "en-us", "pt-br").
    pub language_code: String,
    /// Symbol placed before currency amounts.
    pub currency_symbol: String,
    /// Decimal separator for amounts.
    pub decimal_separator: String,
    /// Thousands separator for amounts.
    pub thousands_separator: String,
    /// `chrono` format string for dates.
    pub date_format: String,
    /// Glyph shown for a `true` boolean value.
    pub yes_label: String,
    /// Glyph shown for a `false` boolean value.
    pub no_label: String,
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self {
            language_code: "en-us".to_string(),
            currency_symbol: "$".to_string(),
            decimal_separator: ".".to_string(),
            thousands_separator: ",".to_string(),
            date_format: "%m/%d/%Y".to_string(),
            yes_label: "\u{2713} Yes".to_string(),
            no_label: "\u{2717} No".to_string(),
        }
    }
}

/// The complete set of application settings.
///
/// # Examples
///
/// ```
/// use backoffice_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert!(settings.organization_id.is_none());
/// assert_eq!(settings.store.table, "custom_field_definitions");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,
    /// The log filter directive (e.g. "info", "backoffice_store=debug").
    pub log_level: String,
    /// The tenant every store query is scoped to.
    pub organization_id: Option<String>,
    /// Remote store connection.
    pub store: StoreSettings,
    /// Display locale.
    pub locale: LocaleSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            organization_id: None,
            store: StoreSettings::default(),
            locale: LocaleSettings::default(),
        }
    }
}

impl Settings {
    /// Returns the configured tenant id, or an error naming the missing setting.
    pub fn require_organization_id(&self) -> crate::BackofficeResult<&str> {
        self.organization_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                crate::BackofficeError::ImproperlyConfigured(
                    "organization_id is not set".to_string(),
                )
            })
    }
}
