//! # backoffice-core
//!
//! Core types for backoffice-rs: settings, error types, configuration
//! checks and logging. Every other crate in the workspace builds on these.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Tenant, store and locale configuration
//! - [`settings_loader`] - Loading settings from TOML/JSON files and the environment
//! - [`checks`] - Configuration checks run before talking to the store
//! - [`logging`] - Tracing-based logging integration

pub mod checks;
pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{BackofficeError, BackofficeResult, ValidationError};
pub use settings::{LocaleSettings, Settings, StoreSettings};
