//! The `fields-reorder` management command.

use async_trait::async_trait;
use backoffice_core::{BackofficeError, Settings};
use backoffice_store::DefinitionManager;

use super::{required_arg, StoreSource};
use crate::command::ManagementCommand;

/// Moves one field to a new position and prints the resulting order.
pub struct FieldsReorderCommand {
    source: StoreSource,
}

impl FieldsReorderCommand {
    pub const fn new(source: StoreSource) -> Self {
        Self { source }
    }
}

#[async_trait]
impl ManagementCommand for FieldsReorderCommand {
    fn name(&self) -> &'static str {
        "fields-reorder"
    }

    fn help(&self) -> &'static str {
        "Move a custom field to a new position"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(clap::Arg::new("id").required(true).help("Field definition id"))
            .arg(
                clap::Arg::new("position")
                    .required(true)
                    .value_parser(clap::value_parser!(usize))
                    .help("Zero-based target position; past the end moves it last"),
            )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), BackofficeError> {
        let id = required_arg(matches, "id")?;
        let position = matches.get_one::<usize>("position").copied().unwrap_or(0);

        let manager = DefinitionManager::new(self.source.open(settings)?);
        let ordered = manager.reorder(id, position).await?;
        for def in &ordered {
            println!("{:>3}  {}", def.sort_order, def.field_name);
        }
        Ok(())
    }
}
