//! The `fields-delete` management command.
//!
//! Deleting a definition does not touch entity value maps; values stored
//! under its name become orphans that no form shows.

use async_trait::async_trait;
use backoffice_core::{BackofficeError, Settings};
use backoffice_store::{DefinitionManager, FieldDefinitionStore};

use super::{required_arg, StoreSource};
use crate::command::ManagementCommand;

/// Hard-deletes a field definition. Requires `--yes`.
pub struct FieldsDeleteCommand {
    source: StoreSource,
}

impl FieldsDeleteCommand {
    pub const fn new(source: StoreSource) -> Self {
        Self { source }
    }
}

#[async_trait]
impl ManagementCommand for FieldsDeleteCommand {
    fn name(&self) -> &'static str {
        "fields-delete"
    }

    fn help(&self) -> &'static str {
        "Delete a custom field definition"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(clap::Arg::new("id").required(true).help("Field definition id"))
            .arg(
                clap::Arg::new("yes")
                    .long("yes")
                    .action(clap::ArgAction::SetTrue)
                    .help("Confirm the deletion"),
            )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), BackofficeError> {
        let id = required_arg(matches, "id")?;
        let manager = DefinitionManager::new(self.source.open(settings)?);
        let def = manager.store().get(id).await?;

        if !matches.get_flag("yes") {
            tracing::warn!(
                field = %def.field_name,
                "Deleting a field leaves its stored values orphaned. Use --yes to confirm."
            );
            return Err(BackofficeError::ConfigurationError(
                "fields-delete requires --yes to proceed".to_string(),
            ));
        }

        manager.delete(id).await?;
        println!("Deleted field '{}'.", def.field_name);
        Ok(())
    }
}
