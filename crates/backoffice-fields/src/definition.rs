//! Custom field definitions.
//!
//! A [`FieldDefinition`] is one row of the tenant's field definition table.
//! [`NewFieldDefinition`] is what the creation form submits; it is turned
//! into a definition by normalising the machine name.

use std::fmt;
use std::str::FromStr;

use backoffice_core::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::field_type::{FieldCategory, FieldType};
use crate::validation::validate_field;
use crate::value::FieldValue;

const fn default_true() -> bool {
    true
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Metadata describing one custom field.
///
/// Rows are read from the store with serde; `field_label` is accepted as an
/// alias of `display_name` and a `null` options column reads as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Opaque identifier assigned by the store. Empty until inserted.
    #[serde(default)]
    pub id: String,
    /// The tenant owning this definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    /// Machine name, unique per tenant. Keys the value map.
    pub field_name: String,
    /// Human-readable caption.
    #[serde(default, alias = "field_label")]
    pub display_name: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub field_category: FieldCategory,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_searchable: bool,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    /// Applied once when an entity has no value for this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<FieldValue>,
    /// Choices for `select` / `multiselect`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub options: Vec<String>,
    /// Display order within a category. Not necessarily contiguous.
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl FieldDefinition {
    /// Creates a visible, optional, uncategorised definition.
    ///
    /// The name is used as given; use [`normalize_field_name`] for user input.
    pub fn new(field_name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: String::new(),
            organization_id: None,
            field_name: field_name.into(),
            display_name: String::new(),
            field_type,
            field_category: FieldCategory::General,
            is_required: false,
            is_searchable: false,
            is_visible: true,
            default_value: None,
            options: Vec::new(),
            sort_order: 0,
            created_at: None,
            updated_at: None,
        }
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    #[must_use]
    pub const fn category(mut self, category: FieldCategory) -> Self {
        self.field_category = category;
        self
    }

    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.is_required = required;
        self
    }

    #[must_use]
    pub const fn searchable(mut self, searchable: bool) -> Self {
        self.is_searchable = searchable;
        self
    }

    #[must_use]
    pub const fn visible(mut self, visible: bool) -> Self {
        self.is_visible = visible;
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// The caption to show: `display_name`, or the humanised machine name.
    pub fn label(&self) -> String {
        if self.display_name.trim().is_empty() {
            humanize(&self.field_name)
        } else {
            self.display_name.clone()
        }
    }

    /// Returns the current value of a flag.
    pub const fn flag(&self, flag: FieldFlag) -> bool {
        match flag {
            FieldFlag::Required => self.is_required,
            FieldFlag::Searchable => self.is_searchable,
            FieldFlag::Visible => self.is_visible,
        }
    }

    /// Sets a flag in place.
    pub fn set_flag(&mut self, flag: FieldFlag, on: bool) {
        match flag {
            FieldFlag::Required => self.is_required = on,
            FieldFlag::Searchable => self.is_searchable = on,
            FieldFlag::Visible => self.is_visible = on,
        }
    }

    /// Checks the definition's own invariants.
    ///
    /// - `field_name` is non-empty and already normalised
    /// - choice types have a non-empty list of distinct, non-blank options
    /// - `default_value`, if any, passes this field's own value rules
    pub fn check(&self) -> Result<(), ValidationError> {
        if self.field_name.is_empty() {
            return Err(ValidationError::new("Field name is required.", "field_name"));
        }
        if normalize_field_name(&self.field_name) != self.field_name {
            return Err(ValidationError::new(
                format!(
                    "Field name '{}' must be lower-case letters, digits and underscores.",
                    self.field_name
                ),
                "field_name",
            ));
        }

        if self.field_type.is_choice() {
            if self.options.is_empty() {
                return Err(ValidationError::new(
                    format!("Field type '{}' requires at least one option.", self.field_type),
                    "options",
                ));
            }
            if self.options.iter().any(|o| o.trim().is_empty()) {
                return Err(ValidationError::new("Options cannot be blank.", "options"));
            }
            for (i, option) in self.options.iter().enumerate() {
                if self.options[..i].contains(option) {
                    return Err(ValidationError::new(
                        format!("Option '{option}' is listed twice."),
                        "options",
                    ));
                }
            }
        }

        if let Some(default) = &self.default_value {
            let optional = Self {
                is_required: false,
                ..self.clone()
            };
            let outcome = validate_field(&optional, Some(default));
            if let Some(error) = outcome.error {
                return Err(ValidationError::new(
                    format!("Default value is invalid: {error}"),
                    "default_value",
                ));
            }
        }

        Ok(())
    }
}

/// The creation form's input.
///
/// `field_name` is free text ("VAT Number") and is normalised on
/// [`into_definition`](Self::into_definition). A missing `sort_order` is
/// assigned by the manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFieldDefinition {
    pub field_name: String,
    #[serde(default, alias = "field_label")]
    pub display_name: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub field_category: FieldCategory,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_searchable: bool,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub default_value: Option<FieldValue>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub options: Vec<String>,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

impl NewFieldDefinition {
    /// Starts a creation request for the given raw name and type.
    pub fn new(field_name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field_name: field_name.into(),
            display_name: String::new(),
            field_type,
            field_category: FieldCategory::General,
            is_required: false,
            is_searchable: false,
            is_visible: true,
            default_value: None,
            options: Vec::new(),
            sort_order: None,
        }
    }

    /// Normalises the name and produces an unsaved definition.
    ///
    /// When no display name was given, the raw name (trimmed) is used.
    pub fn into_definition(self) -> FieldDefinition {
        let display_name = if self.display_name.trim().is_empty() {
            self.field_name.trim().to_string()
        } else {
            self.display_name.trim().to_string()
        };
        FieldDefinition {
            id: String::new(),
            organization_id: None,
            field_name: normalize_field_name(&self.field_name),
            display_name,
            field_type: self.field_type,
            field_category: self.field_category,
            is_required: self.is_required,
            is_searchable: self.is_searchable,
            is_visible: self.is_visible,
            default_value: self.default_value.filter(|v| !v.is_empty()),
            options: self
                .options
                .into_iter()
                .map(|o| o.trim().to_string())
                .collect(),
            sort_order: self.sort_order.unwrap_or(0),
            created_at: None,
            updated_at: None,
        }
    }
}

/// An independent boolean flag on a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldFlag {
    Required,
    Searchable,
    Visible,
}

impl FieldFlag {
    /// The store column backing this flag.
    pub const fn column(self) -> &'static str {
        match self {
            Self::Required => "is_required",
            Self::Searchable => "is_searchable",
            Self::Visible => "is_visible",
        }
    }
}

impl fmt::Display for FieldFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Required => "required",
            Self::Searchable => "searchable",
            Self::Visible => "visible",
        })
    }
}

impl FromStr for FieldFlag {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "required" | "is_required" => Ok(Self::Required),
            "searchable" | "is_searchable" => Ok(Self::Searchable),
            "visible" | "is_visible" => Ok(Self::Visible),
            other => Err(ValidationError::new(format!("Unknown flag '{other}'."), "flag")),
        }
    }
}

/// Normalises free text into a machine field name.
///
/// Lower-cases letters (accented ones included), turns every run of other
/// characters into a single underscore and trims underscores from both
/// ends.
///
/// ```
/// use backoffice_fields::normalize_field_name;
///
/// assert_eq!(normalize_field_name("VAT Number"), "vat_number");
/// assert_eq!(normalize_field_name("  Project -- Code #2 "), "project_code_2");
/// assert_eq!(normalize_field_name("Preço Final"), "preço_final");
/// ```
pub fn normalize_field_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for ch in raw.chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(ch.to_lowercase().filter(|c| c.is_alphanumeric()));
        } else {
            pending_sep = true;
        }
    }
    out
}

fn humanize(field_name: &str) -> String {
    let spaced = field_name.replace('_', " ");
    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_field_name() {
        assert_eq!(normalize_field_name("Discount Code"), "discount_code");
        assert_eq!(normalize_field_name("already_ok"), "already_ok");
        assert_eq!(normalize_field_name("Preço Final"), "preço_final");
        assert_eq!(normalize_field_name("Número de Série"), "número_de_série");
        assert_eq!(normalize_field_name("__Trim__me__"), "trim_me");
        assert_eq!(normalize_field_name("!!!"), "");
    }

    #[test]
    fn test_deserialize_row() {
        let row = serde_json::json!({
            "id": "7d1c",
            "organization_id": "org-1",
            "field_name": "contract_type",
            "field_label": "Contract type",
            "field_type": "select",
            "field_category": "legal",
            "is_required": true,
            "options": ["fixed", "hourly"],
            "sort_order": 3
        });
        let def: FieldDefinition = serde_json::from_value(row).unwrap();
        assert_eq!(def.display_name, "Contract type");
        assert_eq!(def.field_type, FieldType::Select);
        assert_eq!(def.field_category, FieldCategory::Legal);
        assert!(def.is_required);
        assert!(def.is_visible);
        assert!(!def.is_searchable);
        assert_eq!(def.options, vec!["fixed", "hourly"]);
        assert_eq!(def.sort_order, 3);
    }

    #[test]
    fn test_deserialize_null_options() {
        let row = serde_json::json!({
            "field_name": "notes",
            "field_type": "textarea",
            "options": null,
            "default_value": null
        });
        let def: FieldDefinition = serde_json::from_value(row).unwrap();
        assert!(def.options.is_empty());
        assert!(def.default_value.is_none());
    }

    #[test]
    fn test_label_fallback() {
        let def = FieldDefinition::new("vat_number", FieldType::Text);
        assert_eq!(def.label(), "Vat number");
        assert_eq!(def.display_name("VAT").label(), "VAT");
    }

    #[test]
    fn test_check_requires_options_for_choice_types() {
        let def = FieldDefinition::new("tier", FieldType::Select);
        assert_eq!(def.check().unwrap_err().code, "options");

        let def = FieldDefinition::new("tier", FieldType::Multiselect).options(["gold", "gold"]);
        assert_eq!(def.check().unwrap_err().code, "options");

        let def = FieldDefinition::new("tier", FieldType::Select).options(["gold", "silver"]);
        assert!(def.check().is_ok());
    }

    #[test]
    fn test_check_rejects_unnormalised_name() {
        let def = FieldDefinition::new("VAT Number", FieldType::Text);
        assert_eq!(def.check().unwrap_err().code, "field_name");
    }

    #[test]
    fn test_check_validates_default_value() {
        let def = FieldDefinition::new("budget", FieldType::Currency).default_value("lots");
        assert_eq!(def.check().unwrap_err().code, "default_value");

        let def = FieldDefinition::new("budget", FieldType::Currency)
            .required(true)
            .default_value("0");
        assert!(def.check().is_ok());
    }

    #[test]
    fn test_new_field_definition_into_definition() {
        let mut input = NewFieldDefinition::new(" Discount Code ", FieldType::Text);
        input.default_value = Some(FieldValue::from("NONE"));
        let def = input.into_definition();
        assert_eq!(def.field_name, "discount_code");
        assert_eq!(def.display_name, "Discount Code");
        assert_eq!(def.default_value, Some(FieldValue::from("NONE")));
        assert!(def.is_visible);
    }

    #[test]
    fn test_new_field_definition_drops_empty_default() {
        let mut input = NewFieldDefinition::new("region", FieldType::Text);
        input.default_value = Some(FieldValue::from(""));
        assert!(input.into_definition().default_value.is_none());
    }

    #[test]
    fn test_flags() {
        let mut def = FieldDefinition::new("x", FieldType::Text);
        def.set_flag(FieldFlag::Searchable, true);
        assert!(def.flag(FieldFlag::Searchable));
        assert_eq!("is_visible".parse::<FieldFlag>().unwrap(), FieldFlag::Visible);
        assert!("hidden".parse::<FieldFlag>().is_err());
        assert_eq!(FieldFlag::Required.column(), "is_required");
    }
}
