//! # backoffice-cli
//!
//! Management commands for backoffice-rs, run as `backoffice <command>`.
//!
//! - **Configuration** - `check` runs the tenant/store/locale checks
//! - **Field administration** - `fields-list`, `fields-create`,
//!   `fields-toggle`, `fields-reorder`, `fields-delete`
//! - **Values** - `values-validate` and `values-show` read an entity's
//!   value map from a JSON file
//!
//! ## Quick Start
//!
//! ```rust
//! use backoffice_cli::command::CommandRegistry;
//! use backoffice_cli::commands::register_builtin_commands;
//!
//! let mut registry = CommandRegistry::new();
//! register_builtin_commands(&mut registry);
//!
//! let names = registry.list_commands();
//! assert!(names.contains(&"check"));
//! assert!(names.contains(&"fields-create"));
//! ```

// - result_large_err: BackofficeError is the workspace-wide error type
// - unused_async: command handlers keep one async signature
#![allow(clippy::result_large_err)]
#![allow(clippy::unused_async)]

pub mod command;
pub mod commands;

pub use command::{CommandRegistry, ManagementCommand};
pub use commands::{register_builtin_commands, register_commands_with_store, StoreSource};
