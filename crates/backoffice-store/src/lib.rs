//! # backoffice-store
//!
//! Where custom field definitions live and how they are loaded and managed.
//!
//! ## Modules
//!
//! - [`store`] - The [`FieldDefinitionStore`] trait, queries and patches
//! - [`memory`] - An in-process store
//! - [`rest`] - A store backed by the hosted row API, with read retries
//! - [`loader`] - Loading visible definitions and merging defaults
//! - [`manager`] - Creating, toggling, reordering and deleting definitions
//! - [`error`] - Store boundary errors

pub mod error;
pub mod loader;
pub mod manager;
pub mod memory;
pub mod rest;
pub mod store;

pub use error::StoreError;
pub use loader::{load, load_into, load_or_empty};
pub use manager::DefinitionManager;
pub use memory::InMemoryStore;
pub use rest::RestStore;
pub use store::{DefinitionQuery, FieldDefinitionPatch, FieldDefinitionStore};
