//! Type-to-control dispatch for custom fields.
//!
//! [`render_field`] maps a definition and its current value onto one of the
//! eleven [`Control`] variants. The control is a plain description of what
//! the user sees; [`RenderedField::to_html`] turns it into markup and
//! [`apply_event`] turns a user interaction back into a [`FieldValue`].

use std::fmt::Write as _;

use crate::definition::FieldDefinition;
use crate::field_type::FieldType;
use crate::value::FieldValue;

/// The input control chosen for a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    /// `<input type="text">`.
    Text { value: String },
    /// `<input type="number" step="any">`.
    Number { value: String },
    /// `<input type="number" step="0.01">`.
    Currency { value: String },
    /// `<input type="date">`.
    Date { value: String },
    /// A single checkbox carrying the field caption as its inline label.
    Checkbox { checked: bool, label: String },
    /// `<select>` with an empty leading choice.
    Select { value: String, options: Vec<String> },
    /// One checkbox per option.
    CheckboxGroup {
        selected: Vec<String>,
        options: Vec<String>,
    },
    /// `<input type="email">`.
    Email { value: String },
    /// `<input type="tel">`.
    Phone { value: String },
    /// `<input type="url">`.
    Url { value: String },
    /// `<textarea>`.
    Textarea { value: String },
}

impl Control {
    /// The HTML `type` attribute for single-input controls.
    const fn input_type(&self) -> Option<&'static str> {
        match self {
            Self::Text { .. } => Some("text"),
            Self::Number { .. } | Self::Currency { .. } => Some("number"),
            Self::Date { .. } => Some("date"),
            Self::Email { .. } => Some("email"),
            Self::Phone { .. } => Some("tel"),
            Self::Url { .. } => Some("url"),
            Self::Checkbox { .. }
            | Self::Select { .. }
            | Self::CheckboxGroup { .. }
            | Self::Textarea { .. } => None,
        }
    }
}

/// A field bound to its current value, ready to be shown.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedField {
    /// The `field_name`, used as the HTML `name`.
    pub name: String,
    /// Caption shown above the control. `None` for checkboxes, which carry
    /// their caption inline.
    pub label: Option<String>,
    pub required: bool,
    pub readonly: bool,
    pub control: Control,
}

impl RenderedField {
    /// The value the control holds, as submitting it unchanged would
    /// produce it.
    ///
    /// Text-like and numeric inputs hold text, so a stored `Number(12.5)`
    /// reads back as `Text("12.5")`. An empty input, an empty choice and an
    /// empty checkbox group read back as `None`.
    pub fn read_value(&self) -> Option<FieldValue> {
        match &self.control {
            Control::Text { value }
            | Control::Number { value }
            | Control::Currency { value }
            | Control::Date { value }
            | Control::Email { value }
            | Control::Phone { value }
            | Control::Url { value }
            | Control::Textarea { value }
            | Control::Select { value, .. } => {
                (!value.is_empty()).then(|| FieldValue::Text(value.clone()))
            }
            Control::Checkbox { checked, .. } => Some(FieldValue::Bool(*checked)),
            Control::CheckboxGroup { selected, .. } => {
                (!selected.is_empty()).then(|| FieldValue::List(selected.clone()))
            }
        }
    }

    /// The HTML `id` of the control.
    pub fn auto_id(&self) -> String {
        format!("id_{}", self.name)
    }

    /// Renders a `<label>` element, or an empty string for checkboxes.
    pub fn label_tag(&self) -> String {
        let Some(label) = &self.label else {
            return String::new();
        };
        let marker = if self.required { " *" } else { "" };
        let target = match self.control {
            Control::CheckboxGroup { .. } => format!("{}_0", self.auto_id()),
            _ => self.auto_id(),
        };
        format!(
            r#"<label for="{target}">{}{marker}</label>"#,
            escape_html(label)
        )
    }

    /// Renders the control alone.
    pub fn render(&self) -> String {
        let name = escape_html(&self.name);
        let id = self.auto_id();
        let id = escape_html(&id);
        let required = if self.required { " required" } else { "" };
        let readonly = if self.readonly { " readonly" } else { "" };
        let disabled = if self.readonly { " disabled" } else { "" };

        match &self.control {
            Control::Text { value }
            | Control::Number { value }
            | Control::Currency { value }
            | Control::Date { value }
            | Control::Email { value }
            | Control::Phone { value }
            | Control::Url { value } => {
                let input_type = self.control.input_type().unwrap_or("text");
                let step = match self.control {
                    Control::Number { .. } => r#" step="any""#,
                    Control::Currency { .. } => r#" step="0.01""#,
                    _ => "",
                };
                format!(
                    r#"<input type="{input_type}" name="{name}" id="{id}" value="{}"{step}{required}{readonly} />"#,
                    escape_html(value)
                )
            }
            Control::Textarea { value } => format!(
                r#"<textarea name="{name}" id="{id}" rows="3"{required}{readonly}>{}</textarea>"#,
                escape_html(value)
            ),
            // A required checkbox would force `true`; `false` is a valid answer.
            Control::Checkbox { checked, label } => {
                let checked = if *checked { " checked" } else { "" };
                format!(
                    r#"<label for="{id}"><input type="checkbox" name="{name}" id="{id}"{checked}{disabled} /> {}</label>"#,
                    escape_html(label)
                )
            }
            Control::Select { value, options } => {
                let mut html =
                    format!(r#"<select name="{name}" id="{id}"{required}{disabled}>"#);
                html.push_str(r#"<option value="">---------</option>"#);
                for option in options {
                    let selected = if option == value { " selected" } else { "" };
                    let option = escape_html(option);
                    let _ = write!(
                        html,
                        r#"<option value="{option}"{selected}>{option}</option>"#
                    );
                }
                html.push_str("</select>");
                html
            }
            Control::CheckboxGroup { selected, options } => {
                let mut html = String::from("<div>");
                for (i, option) in options.iter().enumerate() {
                    let checked = if selected.contains(option) {
                        " checked"
                    } else {
                        ""
                    };
                    let option = escape_html(option);
                    let _ = write!(
                        html,
                        r#"<div><input type="checkbox" name="{name}" value="{option}" id="{id}_{i}"{checked}{disabled} /> <label for="{id}_{i}">{option}</label></div>"#
                    );
                }
                html.push_str("</div>");
                html
            }
        }
    }

    /// Renders the label followed by the control.
    pub fn to_html(&self) -> String {
        let label = self.label_tag();
        if label.is_empty() {
            self.render()
        } else {
            format!("{label}\n{}", self.render())
        }
    }
}

/// A user interaction with a rendered control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    /// New text typed into a text-like or numeric input.
    Input(String),
    /// A checkbox was ticked or cleared.
    Toggle(bool),
    /// A choice was picked from a dropdown.
    Choose(String),
    /// One checkbox of a group changed.
    Check { option: String, checked: bool },
}

/// Chooses the control for a definition and binds the current value.
pub fn render_field(
    def: &FieldDefinition,
    value: Option<&FieldValue>,
    readonly: bool,
) -> RenderedField {
    let text = || value.map(ToString::to_string).unwrap_or_default();

    let control = match def.field_type {
        FieldType::Text => Control::Text { value: text() },
        FieldType::Number => Control::Number { value: text() },
        FieldType::Currency => Control::Currency { value: text() },
        FieldType::Date => Control::Date { value: text() },
        FieldType::Boolean => Control::Checkbox {
            checked: value.is_some_and(FieldValue::as_bool),
            label: def.label(),
        },
        FieldType::Select => Control::Select {
            value: text(),
            options: def.options.clone(),
        },
        FieldType::Multiselect => Control::CheckboxGroup {
            selected: value.map(FieldValue::to_list).unwrap_or_default(),
            options: def.options.clone(),
        },
        FieldType::Email => Control::Email { value: text() },
        FieldType::Phone => Control::Phone { value: text() },
        FieldType::Url => Control::Url { value: text() },
        FieldType::Textarea => Control::Textarea { value: text() },
    };

    let label = match control {
        Control::Checkbox { .. } => None,
        _ => Some(def.label()),
    };

    RenderedField {
        name: def.field_name.clone(),
        label,
        required: def.is_required,
        readonly,
        control,
    }
}

/// Computes the new value produced by an event on a field's control.
///
/// Returns `None` when the event does not apply to the field's control,
/// for example a [`ControlEvent::Toggle`] on a text input.
///
/// Multiselect values append on check (never twice) and filter on uncheck;
/// the previous selection keeps its order.
pub fn apply_event(
    def: &FieldDefinition,
    current: Option<&FieldValue>,
    event: ControlEvent,
) -> Option<FieldValue> {
    match (def.field_type, event) {
        (
            FieldType::Text
            | FieldType::Number
            | FieldType::Currency
            | FieldType::Date
            | FieldType::Email
            | FieldType::Phone
            | FieldType::Url
            | FieldType::Textarea,
            ControlEvent::Input(text),
        ) => Some(FieldValue::Text(text)),
        (FieldType::Boolean, ControlEvent::Toggle(on)) => Some(FieldValue::Bool(on)),
        (FieldType::Select, ControlEvent::Choose(choice)) => Some(FieldValue::Text(choice)),
        (FieldType::Multiselect, ControlEvent::Check { option, checked }) => {
            let mut selected = current.map(FieldValue::to_list).unwrap_or_default();
            if checked {
                if !selected.contains(&option) {
                    selected.push(option);
                }
            } else {
                selected.retain(|o| *o != option);
            }
            Some(FieldValue::List(selected))
        }
        _ => None,
    }
}

pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
