//! The closed sets of custom field types and categories.
//!
//! Both enums serialise to the lower-case names stored in the
//! `field_type` and `field_category` columns.

use std::fmt;
use std::str::FromStr;

use backoffice_core::ValidationError;
use serde::{Deserialize, Serialize};

/// The declared type of a custom field.
///
/// The renderer, validator and display formatter all dispatch on this enum
/// with exhaustive matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Single-line free text.
    Text,
    /// A number, kept as typed text until displayed.
    Number,
    /// A money amount, kept as typed text until displayed.
    Currency,
    /// A calendar date (`YYYY-MM-DD`).
    Date,
    /// A yes/no checkbox.
    Boolean,
    /// One choice out of `options`.
    Select,
    /// Any number of choices out of `options`.
    Multiselect,
    /// An e-mail address.
    Email,
    /// A phone number.
    Phone,
    /// A URL.
    Url,
    /// Multi-line free text.
    Textarea,
}

impl FieldType {
    /// Every field type, in the order the creation form offers them.
    pub const ALL: [Self; 11] = [
        Self::Text,
        Self::Number,
        Self::Currency,
        Self::Date,
        Self::Boolean,
        Self::Select,
        Self::Multiselect,
        Self::Email,
        Self::Phone,
        Self::Url,
        Self::Textarea,
    ];

    /// The name stored in the `field_type` column.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Currency => "currency",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Select => "select",
            Self::Multiselect => "multiselect",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Url => "url",
            Self::Textarea => "textarea",
        }
    }

    /// Returns `true` for types whose values come from an options list.
    pub const fn is_choice(self) -> bool {
        matches!(self, Self::Select | Self::Multiselect)
    }

    /// Returns `true` for types whose values must parse as a number.
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Number | Self::Currency)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| {
                ValidationError::new(format!("Unknown field type '{s}'."), "field_type")
            })
    }
}

/// A display-grouping label for field definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldCategory {
    #[default]
    General,
    Financial,
    Legal,
    Project,
    Sales,
    Technical,
    Marketing,
}

impl FieldCategory {
    /// Every category, in the order the creation form offers them.
    pub const ALL: [Self; 7] = [
        Self::General,
        Self::Financial,
        Self::Legal,
        Self::Project,
        Self::Sales,
        Self::Technical,
        Self::Marketing,
    ];

    /// The name stored in the `field_category` column.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Financial => "financial",
            Self::Legal => "legal",
            Self::Project => "project",
            Self::Sales => "sales",
            Self::Technical => "technical",
            Self::Marketing => "marketing",
        }
    }
}

impl fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| {
                ValidationError::new(format!("Unknown field category '{s}'."), "field_category")
            })
    }
}
