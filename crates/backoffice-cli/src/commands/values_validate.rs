//! The `values-validate` management command.
//!
//! Checks an entity's stored value map against the tenant's visible field
//! definitions, the way the edit page does before saving.

use std::collections::BTreeMap;

use async_trait::async_trait;
use backoffice_core::{BackofficeError, Settings, ValidationError};
use backoffice_fields::{orphaned_keys, validate_values, FieldDefinition, FieldValues};
use backoffice_store::load;

use super::{read_values, required_arg, StoreSource};
use crate::command::ManagementCommand;

/// Validates a value map read from a file or stdin.
pub struct ValuesValidateCommand {
    source: StoreSource,
}

impl ValuesValidateCommand {
    pub const fn new(source: StoreSource) -> Self {
        Self { source }
    }
}

/// Validates `values` and folds the per-field messages into one error.
pub fn check_values(
    definitions: &[FieldDefinition],
    values: &FieldValues,
) -> Result<(), ValidationError> {
    let errors = validate_values(definitions, values);
    if errors.is_empty() {
        return Ok(());
    }
    let field_errors: BTreeMap<String, Vec<ValidationError>> = errors
        .into_iter()
        .map(|(name, message)| (name, vec![ValidationError::new(message, "invalid")]))
        .collect();
    Err(ValidationError::with_field_errors(field_errors))
}

#[async_trait]
impl ManagementCommand for ValuesValidateCommand {
    fn name(&self) -> &'static str {
        "values-validate"
    }

    fn help(&self) -> &'static str {
        "Validate an entity's custom field values (JSON object)"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("values")
                .long("values")
                .required(true)
                .value_name("FILE")
                .help("JSON file holding the value map, or - for stdin"),
        )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), BackofficeError> {
        let values = read_values(required_arg(matches, "values")?).await?;
        let store = self.source.open(settings)?;
        let definitions = load(&*store, None).await?;

        for key in orphaned_keys(&values, &definitions) {
            tracing::warn!(key, "value has no visible field definition; it is kept but not shown");
        }

        match check_values(&definitions, &values) {
            Ok(()) => {
                println!("{} field(s) checked, all valid.", definitions.len());
                Ok(())
            }
            Err(err) => {
                for (name, errors) in &err.field_errors {
                    for e in errors {
                        println!("{name}: {}", e.message);
                    }
                }
                Err(err.into())
            }
        }
    }
}
