//! Built-in management commands.
//!
//! Every command except `check` talks to the tenant's field definition
//! store, reached through a [`StoreSource`].

pub mod check;
pub mod fields_create;
pub mod fields_delete;
pub mod fields_list;
pub mod fields_reorder;
pub mod fields_toggle;
pub mod values_show;
pub mod values_validate;

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use backoffice_core::{BackofficeError, BackofficeResult, Settings, ValidationError};
use backoffice_fields::FieldValues;
use backoffice_store::{FieldDefinitionStore, RestStore};
use tokio::io::AsyncReadExt;

pub use check::CheckCommand;
pub use fields_create::FieldsCreateCommand;
pub use fields_delete::FieldsDeleteCommand;
pub use fields_list::FieldsListCommand;
pub use fields_reorder::FieldsReorderCommand;
pub use fields_toggle::FieldsToggleCommand;
pub use values_show::ValuesShowCommand;
pub use values_validate::ValuesValidateCommand;

use crate::command::CommandRegistry;

/// Where store-backed commands get their store from.
#[derive(Clone, Default)]
pub enum StoreSource {
    /// A REST store built from `settings.store` and `settings.organization_id`.
    #[default]
    Settings,
    /// A store supplied by the caller.
    Fixed(Arc<dyn FieldDefinitionStore>),
}

impl StoreSource {
    pub fn open(&self, settings: &Settings) -> BackofficeResult<Arc<dyn FieldDefinitionStore>> {
        match self {
            Self::Settings => Ok(Arc::new(RestStore::from_settings(settings)?)),
            Self::Fixed(store) => Ok(Arc::clone(store)),
        }
    }
}

impl std::fmt::Debug for StoreSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Settings => f.write_str("StoreSource::Settings"),
            Self::Fixed(store) => write!(f, "StoreSource::Fixed({})", store.organization_id()),
        }
    }
}

/// Registers every built-in command, with stores opened from settings.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    register_commands_with_store(registry, &StoreSource::Settings);
}

/// Registers every built-in command, with stores taken from `source`.
pub fn register_commands_with_store(registry: &mut CommandRegistry, source: &StoreSource) {
    registry.register(Box::new(CheckCommand));
    registry.register(Box::new(FieldsListCommand::new(source.clone())));
    registry.register(Box::new(FieldsCreateCommand::new(source.clone())));
    registry.register(Box::new(FieldsToggleCommand::new(source.clone())));
    registry.register(Box::new(FieldsReorderCommand::new(source.clone())));
    registry.register(Box::new(FieldsDeleteCommand::new(source.clone())));
    registry.register(Box::new(ValuesValidateCommand::new(source.clone())));
    registry.register(Box::new(ValuesShowCommand::new(source.clone())));
}

/// Reads a required string argument.
pub(crate) fn required_arg<'a>(matches: &'a clap::ArgMatches, name: &str) -> BackofficeResult<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| BackofficeError::ConfigurationError(format!("missing argument <{name}>")))
}

/// Parses an optional argument with the type's `FromStr`.
pub(crate) fn parse_arg<T>(matches: &clap::ArgMatches, name: &str) -> BackofficeResult<Option<T>>
where
    T: FromStr<Err = ValidationError>,
{
    matches
        .get_one::<String>(name)
        .map(|raw| raw.parse::<T>())
        .transpose()
        .map_err(BackofficeError::from)
}

/// Reads an entity's value map from a JSON file, or stdin for `-`.
pub(crate) async fn read_values(source: &str) -> BackofficeResult<FieldValues> {
    let text = if source == "-" {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        tokio::fs::read_to_string(Path::new(source)).await?
    };
    let blob: serde_json::Value = serde_json::from_str(&text)?;
    if !blob.is_object() {
        return Err(BackofficeError::SerializationError(
            "value map must be a JSON object".to_string(),
        ));
    }
    Ok(FieldValues::from_json(&blob))
}
