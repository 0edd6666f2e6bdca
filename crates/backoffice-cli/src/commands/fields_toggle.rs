//! The `fields-toggle` management command.

use async_trait::async_trait;
use backoffice_core::{BackofficeError, Settings, ValidationError};
use backoffice_fields::FieldFlag;
use backoffice_store::DefinitionManager;

use super::{required_arg, StoreSource};
use crate::command::ManagementCommand;

/// Sets the required, searchable or visible flag of one field.
pub struct FieldsToggleCommand {
    source: StoreSource,
}

impl FieldsToggleCommand {
    pub const fn new(source: StoreSource) -> Self {
        Self { source }
    }
}

/// Reads a switch state such as `on`, `off`, `true` or `no`.
pub fn parse_state(raw: &str) -> Result<bool, ValidationError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(ValidationError::new(
            format!("Expected on or off, got '{other}'."),
            "state",
        )),
    }
}

#[async_trait]
impl ManagementCommand for FieldsToggleCommand {
    fn name(&self) -> &'static str {
        "fields-toggle"
    }

    fn help(&self) -> &'static str {
        "Turn a field's required, searchable or visible flag on or off"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(clap::Arg::new("id").required(true).help("Field definition id"))
            .arg(
                clap::Arg::new("flag")
                    .required(true)
                    .value_parser(["required", "searchable", "visible"]),
            )
            .arg(clap::Arg::new("state").required(true).help("on or off"))
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), BackofficeError> {
        let id = required_arg(matches, "id")?;
        let flag: FieldFlag = required_arg(matches, "flag")?.parse()?;
        let on = parse_state(required_arg(matches, "state")?)?;

        let manager = DefinitionManager::new(self.source.open(settings)?);
        let updated = manager.set_flag(id, flag, on).await?;
        println!(
            "Field '{}' is {}{flag}.",
            updated.field_name,
            if updated.flag(flag) { "" } else { "not " }
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_state() {
        assert!(parse_state("on").unwrap());
        assert!(!parse_state(" OFF ").unwrap());
        assert!(parse_state("yes").unwrap());
        let err = parse_state("maybe").unwrap_err();
        assert_eq!(err.code, "state");
    }
}
