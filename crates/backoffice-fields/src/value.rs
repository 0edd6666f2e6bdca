//! Custom field values.
//!
//! Each entity (customer, order, ...) stores its custom field values as an
//! opaque JSON object keyed by `field_name`. [`FieldValues`] is the typed view
//! of that blob: any key may be absent, and absence is kept distinct from an
//! empty value.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::definition::FieldDefinition;

/// A single custom field value.
///
/// Serialised untagged, so a value map round-trips as a plain JSON object:
/// `{"vat_number": "PT123", "budget": 1200.5, "nda_signed": true, "tags": ["a"]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Returns `true` for an empty or whitespace-only string and an empty list.
    ///
    /// `Bool(false)` and `Number(0.0)` are not empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Bool(_) | Self::Number(_) => false,
        }
    }

    /// Returns the string slice for a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Interprets the value as a boolean.
    ///
    /// Text is truthy when it reads "true", "1", "on" or "yes".
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0,
            Self::Text(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "on" | "yes"),
            Self::List(items) => !items.is_empty(),
        }
    }

    /// Interprets the value as a list of strings.
    ///
    /// Text is split on commas; scalars become a one-element list.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            Self::List(items) => items.clone(),
            Self::Text(s) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            Self::Bool(_) | Self::Number(_) => vec![self.to_string()],
        }
    }

    /// Converts a JSON value from a stored blob.
    ///
    /// `null` and objects have no representation and yield `None`; array
    /// elements that are not strings are stringified.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null | serde_json::Value::Object(_) => None,
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            serde_json::Value::Array(items) => Some(Self::List(
                items
                    .iter()
                    .filter(|v| !v.is_null())
                    .map(|v| match v {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            )),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(v: Vec<String>) -> Self {
        Self::List(v)
    }
}

/// The per-entity custom field value map, keyed by `field_name`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValues(BTreeMap<String, FieldValue>);

impl FieldValues {
    /// Creates an empty value map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a value map from a stored JSON blob.
    ///
    /// A non-object blob yields an empty map; `null` entries are treated as
    /// absent.
    pub fn from_json(blob: &serde_json::Value) -> Self {
        let Some(map) = blob.as_object() else {
            return Self::new();
        };
        Self(
            map.iter()
                .filter_map(|(k, v)| FieldValue::from_json(v).map(|v| (k.clone(), v)))
                .collect(),
        )
    }

    /// Serialises the map back into a JSON object for storage.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::Value::Object(serde_json::Map::new()))
    }

    pub fn get(&self, field_name: &str) -> Option<&FieldValue> {
        self.0.get(field_name)
    }

    pub fn contains(&self, field_name: &str) -> bool {
        self.0.contains_key(field_name)
    }

    /// Sets a value, returning the previous one.
    pub fn insert(&mut self, field_name: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.0.insert(field_name.into(), value)
    }

    pub fn remove(&mut self, field_name: &str) -> Option<FieldValue> {
        self.0.remove(field_name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for FieldValues {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Fills in `default_value` for every field absent from `values`.
///
/// Existing entries are never overwritten, even when empty.
pub fn merge_defaults(values: &FieldValues, definitions: &[FieldDefinition]) -> FieldValues {
    let mut merged = values.clone();
    for def in definitions {
        if let Some(default) = &def.default_value {
            if !merged.contains(&def.field_name) {
                merged.insert(def.field_name.clone(), default.clone());
            }
        }
    }
    merged
}

/// Returns the keys in `values` that no definition claims.
///
/// These are left behind when a definition is deleted or renamed.
pub fn orphaned_keys<'a>(values: &'a FieldValues, definitions: &[FieldDefinition]) -> Vec<&'a str> {
    values
        .keys()
        .filter(|key| !definitions.iter().any(|d| d.field_name == *key))
        .collect()
}
