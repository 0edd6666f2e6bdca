//! Per-field validation.
//!
//! Rules are evaluated independently per field; there are no cross-field
//! rules. A failed rule is reported inline and never blocks further input,
//! so validation returns a [`FieldValidation`] value rather than an error.
//!
//! 1. Required: absent values, blank strings and empty lists fail.
//!    `false` is an answer and passes.
//! 2. Type rules apply only to present, non-empty values:
//!    numbers must be finite, e-mails must look like `local@domain.tld`,
//!    URLs must parse as absolute URLs and choices must come from `options`.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::definition::FieldDefinition;
use crate::field_type::FieldType;
use crate::value::{FieldValue, FieldValues};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Outcome of validating one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValidation {
    pub valid: bool,
    pub error: Option<String>,
}

impl FieldValidation {
    const fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(message.into()),
        }
    }
}

/// Validates one value against its definition.
pub fn validate_field(def: &FieldDefinition, value: Option<&FieldValue>) -> FieldValidation {
    let present = value.filter(|v| !v.is_empty());

    let Some(value) = present else {
        return if def.is_required {
            FieldValidation::fail("This field is required.")
        } else {
            FieldValidation::ok()
        };
    };

    match def.field_type {
        FieldType::Number | FieldType::Currency => check_number(value),
        FieldType::Email => check_email(value),
        FieldType::Url => check_url(value),
        FieldType::Select => check_choice(def, value),
        FieldType::Multiselect => check_choices(def, value),
        FieldType::Text
        | FieldType::Date
        | FieldType::Boolean
        | FieldType::Phone
        | FieldType::Textarea => FieldValidation::ok(),
    }
}

/// Validates every definition against a value map.
///
/// Errors accumulate across fields; the result maps `field_name` to the
/// error message and is empty when everything passes.
pub fn validate_values(
    definitions: &[FieldDefinition],
    values: &FieldValues,
) -> BTreeMap<String, String> {
    definitions
        .iter()
        .filter_map(|def| {
            validate_field(def, values.get(&def.field_name))
                .error
                .map(|error| (def.field_name.clone(), error))
        })
        .collect()
}

fn check_number(value: &FieldValue) -> FieldValidation {
    let finite = match value {
        FieldValue::Number(n) => n.is_finite(),
        FieldValue::Text(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
        FieldValue::Bool(_) | FieldValue::List(_) => false,
    };
    if finite {
        FieldValidation::ok()
    } else {
        FieldValidation::fail("Enter a number.")
    }
}

fn check_email(value: &FieldValue) -> FieldValidation {
    match value.as_text() {
        Some(s) if EMAIL_RE.is_match(s.trim()) => FieldValidation::ok(),
        _ => FieldValidation::fail("Enter a valid email address."),
    }
}

fn check_url(value: &FieldValue) -> FieldValidation {
    match value.as_text() {
        Some(s) if url::Url::parse(s.trim()).is_ok() => FieldValidation::ok(),
        _ => FieldValidation::fail("Enter a valid URL."),
    }
}

fn check_choice(def: &FieldDefinition, value: &FieldValue) -> FieldValidation {
    // Scalars compare by their text, as multiselect items do.
    if matches!(value, FieldValue::List(_)) {
        return FieldValidation::fail("Select a single choice.");
    }
    let choice = value.to_string();
    if def.options.iter().any(|o| *o == choice) {
        FieldValidation::ok()
    } else {
        FieldValidation::fail(format!(
            "Select a valid choice. {choice} is not one of the available choices."
        ))
    }
}

fn check_choices(def: &FieldDefinition, value: &FieldValue) -> FieldValidation {
    match value
        .to_list()
        .into_iter()
        .find(|choice| !def.options.contains(choice))
    {
        Some(bad) => FieldValidation::fail(format!(
            "Select a valid choice. {bad} is not one of the available choices."
        )),
        None => FieldValidation::ok(),
    }
}
