//! A value map bound to its field definitions.
//!
//! [`CustomFieldForm`] is the editing surface of a customer/order/product
//! page: it renders every definition against the current values, applies
//! control events, and validates each changed field inline. Errors never
//! block input; the form keeps the latest message per field until the
//! field passes again.

use std::collections::BTreeMap;

use crate::definition::FieldDefinition;
use crate::grouping::{group_by_category, CategoryGroups};
use crate::validation::{validate_field, validate_values, FieldValidation};
use crate::value::FieldValues;
use crate::widgets::{apply_event, escape_html, render_field, ControlEvent, RenderedField};

#[derive(Debug, Clone, Default)]
pub struct CustomFieldForm {
    definitions: Vec<FieldDefinition>,
    values: FieldValues,
    readonly: bool,
    errors: BTreeMap<String, String>,
}

impl CustomFieldForm {
    /// Binds a value map to an ordered list of definitions.
    pub fn new(definitions: Vec<FieldDefinition>, values: FieldValues) -> Self {
        Self {
            definitions,
            values,
            readonly: false,
            errors: BTreeMap::new(),
        }
    }

    /// Renders every control read-only and ignores events.
    #[must_use]
    pub const fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    pub fn definitions(&self) -> &[FieldDefinition] {
        &self.definitions
    }

    pub const fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn into_values(self) -> FieldValues {
        self.values
    }

    /// Current per-field error messages, keyed by `field_name`.
    pub const fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn error(&self, field_name: &str) -> Option<&str> {
        self.errors.get(field_name).map(String::as_str)
    }

    /// The definitions partitioned by category, in display order.
    pub fn groups(&self) -> CategoryGroups<'_> {
        group_by_category(&self.definitions)
    }

    /// One rendered field per definition, in definition order.
    pub fn rendered_fields(&self) -> Vec<RenderedField> {
        self.definitions
            .iter()
            .map(|def| render_field(def, self.values.get(&def.field_name), self.readonly))
            .collect()
    }

    /// Applies an event to the named field.
    ///
    /// On success the field is validated, its error entry updated, and
    /// `on_change` receives the full updated value map. Returns `None`
    /// without touching anything when the form is read-only, the field is
    /// unknown, or the event does not fit the field's control.
    pub fn handle_event<F>(
        &mut self,
        field_name: &str,
        event: ControlEvent,
        mut on_change: F,
    ) -> Option<FieldValidation>
    where
        F: FnMut(&FieldValues),
    {
        if self.readonly {
            return None;
        }
        let def = self.definitions.iter().find(|d| d.field_name == field_name)?;
        let value = apply_event(def, self.values.get(field_name), event)?;

        let outcome = validate_field(def, Some(&value));
        match &outcome.error {
            Some(message) => {
                self.errors.insert(field_name.to_string(), message.clone());
            }
            None => {
                self.errors.remove(field_name);
            }
        }

        self.values.insert(field_name, value);
        on_change(&self.values);
        Some(outcome)
    }

    /// Validates every field and replaces the error map. Returns `true` when
    /// no field has an error.
    pub fn full_clean(&mut self) -> bool {
        self.errors = validate_values(&self.definitions, &self.values);
        self.errors.is_empty()
    }

    /// Returns `true` if the last validation left no errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Renders the form as HTML, one `<fieldset>` per category.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for (category, defs) in self.groups().iter() {
            html.push_str(&format!(
                "<fieldset class=\"category-{category}\">\n<legend>{}</legend>\n",
                capitalize(category.as_str())
            ));
            for def in defs {
                let field = render_field(def, self.values.get(&def.field_name), self.readonly);
                html.push_str("<div class=\"field\">\n");
                html.push_str(&field.to_html());
                html.push('\n');
                if let Some(error) = self.errors.get(&def.field_name) {
                    html.push_str(&format!(
                        "<ul class=\"errorlist\"><li>{}</li></ul>\n",
                        escape_html(error)
                    ));
                }
                html.push_str("</div>\n");
            }
            html.push_str("</fieldset>\n");
        }
        html
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_type::{FieldCategory, FieldType};
    use crate::value::FieldValue;

    fn defs() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("po_number", FieldType::Text)
                .display_name("PO number")
                .required(true),
            FieldDefinition::new("budget", FieldType::Currency).category(FieldCategory::Financial),
            FieldDefinition::new("nda_signed", FieldType::Boolean).category(FieldCategory::Legal),
        ]
    }

    #[test]
    fn test_handle_event_updates_and_notifies() {
        let mut form = CustomFieldForm::new(defs(), FieldValues::new());
        let mut seen = Vec::new();
        let outcome = form
            .handle_event("budget", ControlEvent::Input("12.5".into()), |v| seen.push(v.clone()))
            .unwrap();
        assert!(outcome.valid);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].get("budget"), Some(&FieldValue::from("12.5")));
    }

    #[test]
    fn test_invalid_input_is_kept_and_reported() {
        let mut form = CustomFieldForm::new(defs(), FieldValues::new());
        let outcome = form
            .handle_event("budget", ControlEvent::Input("abc".into()), |_| {})
            .unwrap();
        assert!(!outcome.valid);
        assert_eq!(form.values().get("budget"), Some(&FieldValue::from("abc")));
        assert_eq!(form.error("budget"), Some("Enter a number."));

        form.handle_event("budget", ControlEvent::Input("3".into()), |_| {});
        assert!(form.error("budget").is_none());
    }

    #[test]
    fn test_ignored_events() {
        let mut form = CustomFieldForm::new(defs(), FieldValues::new());
        let mut calls = 0;
        assert!(form
            .handle_event("missing", ControlEvent::Input("x".into()), |_| calls += 1)
            .is_none());
        assert!(form
            .handle_event("po_number", ControlEvent::Toggle(true), |_| calls += 1)
            .is_none());

        let mut form = form.readonly(true);
        assert!(form
            .handle_event("po_number", ControlEvent::Input("x".into()), |_| calls += 1)
            .is_none());
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_full_clean() {
        let mut form = CustomFieldForm::new(defs(), FieldValues::new());
        assert!(!form.full_clean());
        assert!(!form.is_valid());
        assert_eq!(form.error("po_number"), Some("This field is required."));

        let values: FieldValues = [
            ("po_number", FieldValue::from("PO-7")),
            ("nda_signed", FieldValue::Bool(false)),
        ]
        .into_iter()
        .collect();
        let mut form = CustomFieldForm::new(defs(), values);
        assert!(form.full_clean());
    }

    #[test]
    fn test_to_html_groups_by_category() {
        let mut form = CustomFieldForm::new(defs(), FieldValues::new());
        form.full_clean();
        let html = form.to_html();
        assert_eq!(html.matches("<fieldset").count(), 3);
        assert!(html.contains("<legend>General</legend>"));
        assert!(html.contains("<legend>Financial</legend>"));
        assert!(html.contains("<ul class=\"errorlist\"><li>This field is required.</li></ul>"));
        let general = html.find("General").unwrap();
        let legal = html.find("Legal").unwrap();
        assert!(general < legal);
    }

    #[test]
    fn test_rendered_fields_follow_definitions() {
        let form = CustomFieldForm::new(defs(), FieldValues::new()).readonly(true);
        let fields = form.rendered_fields();
        assert_eq!(fields.len(), 3);
        assert!(fields.iter().all(|f| f.readonly));
        assert_eq!(fields[0].name, "po_number");
    }
}
