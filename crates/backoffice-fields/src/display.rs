//! Read-only formatting of stored custom field values.
//!
//! The formatter is built from [`LocaleSettings`] so the currency symbol,
//! separators, date format and yes/no glyphs follow the tenant's locale.
//! Values that cannot be interpreted for their type (an amount that does
//! not parse, a malformed date) are shown as entered.

use std::fmt::{self, Write as _};

use backoffice_core::LocaleSettings;
use chrono::NaiveDate;

use crate::definition::FieldDefinition;
use crate::field_type::FieldType;
use crate::value::{FieldValue, FieldValues};
use crate::widgets::escape_html;

/// The read-only representation of one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayValue {
    Text(String),
    /// A clickable value: `mailto:`, `tel:` or a web address.
    Link { href: String, text: String },
}

impl DisplayValue {
    /// The visible text.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Link { text, .. } => text,
        }
    }

    /// Renders the value as escaped HTML, wrapping links in `<a>`.
    pub fn to_html(&self) -> String {
        match self {
            Self::Text(text) => escape_html(text),
            Self::Link { href, text } => format!(
                r#"<a href="{}">{}</a>"#,
                escape_html(href),
                escape_html(text)
            ),
        }
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// One row of a read-only custom field panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEntry {
    pub field_name: String,
    pub label: String,
    pub value: DisplayValue,
}

/// Formats values for read-only display.
#[derive(Debug, Clone, Default)]
pub struct DisplayFormatter {
    locale: LocaleSettings,
}

impl From<LocaleSettings> for DisplayFormatter {
    fn from(locale: LocaleSettings) -> Self {
        Self { locale }
    }
}

impl DisplayFormatter {
    pub fn new(locale: &LocaleSettings) -> Self {
        Self::from(locale.clone())
    }

    pub const fn locale(&self) -> &LocaleSettings {
        &self.locale
    }

    /// Formats one value according to its field's type.
    pub fn format_value(&self, def: &FieldDefinition, value: &FieldValue) -> DisplayValue {
        match def.field_type {
            FieldType::Boolean => DisplayValue::Text(if value.as_bool() {
                self.locale.yes_label.clone()
            } else {
                self.locale.no_label.clone()
            }),
            FieldType::Currency => DisplayValue::Text(
                parse_amount(value)
                    .map_or_else(|| value.to_string(), |amount| self.format_currency(amount)),
            ),
            FieldType::Date => DisplayValue::Text(self.format_date(value)),
            FieldType::Multiselect => DisplayValue::Text(value.to_list().join(", ")),
            FieldType::Email => {
                let text = value.to_string();
                DisplayValue::Link {
                    href: format!("mailto:{}", text.trim()),
                    text,
                }
            }
            FieldType::Phone => {
                let text = value.to_string();
                let dial: String = text.chars().filter(|c| !c.is_whitespace()).collect();
                DisplayValue::Link {
                    href: format!("tel:{dial}"),
                    text,
                }
            }
            FieldType::Url => {
                let text = value.to_string();
                DisplayValue::Link {
                    href: text.trim().to_string(),
                    text,
                }
            }
            FieldType::Text
            | FieldType::Number
            | FieldType::Select
            | FieldType::Textarea => DisplayValue::Text(value.to_string()),
        }
    }

    /// Builds the read-only rows for an entity.
    ///
    /// Definitions whose key is absent from `values` produce no row at all.
    pub fn display_entries(
        &self,
        definitions: &[FieldDefinition],
        values: &FieldValues,
    ) -> Vec<DisplayEntry> {
        definitions
            .iter()
            .filter_map(|def| {
                values.get(&def.field_name).map(|value| DisplayEntry {
                    field_name: def.field_name.clone(),
                    label: def.label(),
                    value: self.format_value(def, value),
                })
            })
            .collect()
    }

    /// Formats an amount as `{symbol}{grouped integer}{decimal}{cents}`.
    pub fn format_currency(&self, amount: f64) -> String {
        let fixed = format!("{:.2}", amount.abs());
        let (int_part, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
        format!(
            "{sign}{}{}{}{cents}",
            self.locale.currency_symbol,
            group_thousands(int_part, &self.locale.thousands_separator),
            self.locale.decimal_separator,
        )
    }

    fn format_date(&self, value: &FieldValue) -> String {
        let raw = value.to_string();
        let trimmed = raw.trim();
        // Accept both `YYYY-MM-DD` and timestamps starting with one.
        let date_part = trimmed.get(..10).unwrap_or(trimmed);
        let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") else {
            tracing::debug!(value = %raw, "date value does not parse; shown as entered");
            return raw;
        };
        let mut out = String::new();
        if write!(out, "{}", date.format(&self.locale.date_format)).is_err() {
            tracing::debug!(format = %self.locale.date_format, "invalid date format");
            return raw;
        }
        out
    }
}

fn parse_amount(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Number(n) => Some(*n),
        FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
        FieldValue::Bool(_) | FieldValue::List(_) => None,
    }
    .filter(|n| n.is_finite())
}

fn group_thousands(digits: &str, separator: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, ch) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push_str(separator);
        }
        result.push(*ch);
    }
    result
}
