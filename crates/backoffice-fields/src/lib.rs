//! # backoffice-fields
//!
//! The custom field engine of backoffice-rs: tenant-defined fields attached
//! to customers, orders, products and tickets.
//!
//! - [`field_type`] - The closed sets of field types and categories
//! - [`definition`] - Field definitions as stored remotely, and creation input
//! - [`value`] - The per-entity value map and default merging
//! - [`widgets`] - Type-to-control dispatch and control events
//! - [`form`] - A value map bound to its definitions, driven by control events
//! - [`validation`] - Per-field validation rules
//! - [`grouping`] - Stable partition of fields by category
//! - [`display`] - Read-only formatting of stored values

pub mod definition;
pub mod display;
pub mod field_type;
pub mod form;
pub mod grouping;
pub mod validation;
pub mod value;
pub mod widgets;

pub use definition::{normalize_field_name, FieldDefinition, FieldFlag, NewFieldDefinition};
pub use display::{DisplayEntry, DisplayFormatter, DisplayValue};
pub use field_type::{FieldCategory, FieldType};
pub use form::CustomFieldForm;
pub use grouping::{group_by_category, CategoryGroups};
pub use validation::{validate_field, validate_values, FieldValidation};
pub use value::{merge_defaults, orphaned_keys, FieldValue, FieldValues};
pub use widgets::{apply_event, render_field, Control, ControlEvent, RenderedField};
