//! # backoffice-rs
//!
//! Tenant-defined custom fields for customer, order, product and ticket
//! pages.
//!
//! This is the meta-crate that re-exports the sub-crates. Depend on
//! `backoffice-rs` for everything, or on individual crates for finer
//! control.
//!
//! ```rust
//! use backoffice_rs::prelude::*;
//!
//! let defs = vec![
//!     FieldDefinition::new("vat_number", FieldType::Text).required(true),
//!     FieldDefinition::new("budget", FieldType::Currency).category(FieldCategory::Financial),
//! ];
//! let mut form = CustomFieldForm::new(defs, FieldValues::new());
//! assert!(!form.full_clean());
//! assert_eq!(form.error("vat_number"), Some("This field is required."));
//! ```

/// Settings, errors, configuration checks and logging.
pub use backoffice_core as core;

/// Field definitions, values, rendering, validation, grouping and display.
pub use backoffice_fields as fields;

/// Field definition stores, the loader and the definition manager.
#[cfg(feature = "store")]
pub use backoffice_store as store;

/// Management commands (CLI).
#[cfg(feature = "cli")]
pub use backoffice_cli as cli;

/// The types most pages need.
pub mod prelude {
    pub use backoffice_core::{BackofficeError, BackofficeResult, LocaleSettings, Settings};
    pub use backoffice_fields::{
        group_by_category, render_field, validate_field, ControlEvent, CustomFieldForm,
        DisplayFormatter, FieldCategory, FieldDefinition, FieldType, FieldValue, FieldValues,
    };

    #[cfg(feature = "store")]
    pub use backoffice_store::{
        load, load_into, DefinitionManager, FieldDefinitionStore, InMemoryStore, RestStore,
    };
}
