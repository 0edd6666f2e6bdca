//! The `fields-create` management command.

use async_trait::async_trait;
use backoffice_core::{BackofficeError, Settings};
use backoffice_fields::{FieldCategory, FieldType, FieldValue, NewFieldDefinition};
use backoffice_store::DefinitionManager;

use super::{parse_arg, required_arg, StoreSource};
use crate::command::ManagementCommand;

/// Creates a field definition, the way the creation form does.
///
/// The name is free text and is normalised (`"VAT Number"` becomes
/// `vat_number`); the label defaults to the raw name.
pub struct FieldsCreateCommand {
    source: StoreSource,
}

impl FieldsCreateCommand {
    pub const fn new(source: StoreSource) -> Self {
        Self { source }
    }
}

/// Reads a `--default` argument.
///
/// JSON literals (`true`, `12.5`, `["a","b"]`) keep their type; anything
/// else is taken as text.
pub fn parse_default(raw: &str) -> Option<FieldValue> {
    serde_json::from_str::<serde_json::Value>(raw)
        .ok()
        .and_then(|json| FieldValue::from_json(&json))
        .or_else(|| Some(FieldValue::Text(raw.to_string())))
        .filter(|v| !v.is_empty())
}

/// Builds the creation input from parsed arguments.
pub fn new_definition_from_args(
    matches: &clap::ArgMatches,
) -> Result<NewFieldDefinition, BackofficeError> {
    let name = required_arg(matches, "name")?;
    let field_type: FieldType = required_arg(matches, "type")?.parse()?;

    let mut input = NewFieldDefinition::new(name, field_type);
    if let Some(label) = matches.get_one::<String>("label") {
        input.display_name.clone_from(label);
    }
    if let Some(category) = parse_arg::<FieldCategory>(matches, "category")? {
        input.field_category = category;
    }
    input.is_required = matches.get_flag("required");
    input.is_searchable = matches.get_flag("searchable");
    input.is_visible = !matches.get_flag("hidden");
    input.default_value = matches
        .get_one::<String>("default")
        .and_then(|raw| parse_default(raw));
    input.options = matches
        .get_many::<String>("option")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    input.sort_order = matches.get_one::<i32>("sort-order").copied();
    Ok(input)
}

#[async_trait]
impl ManagementCommand for FieldsCreateCommand {
    fn name(&self) -> &'static str {
        "fields-create"
    }

    fn help(&self) -> &'static str {
        "Create a custom field definition"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("name")
                .required(true)
                .help("Field name; normalised to lowercase with underscores"),
        )
        .arg(
            clap::Arg::new("type")
                .long("type")
                .short('t')
                .required(true)
                .value_parser(FieldType::ALL.map(FieldType::as_str))
                .help("Field type"),
        )
        .arg(
            clap::Arg::new("label")
                .long("label")
                .help("Caption shown to users (defaults to the name)"),
        )
        .arg(
            clap::Arg::new("category")
                .long("category")
                .value_parser(FieldCategory::ALL.map(FieldCategory::as_str))
                .help("Display group (defaults to general)"),
        )
        .arg(
            clap::Arg::new("required")
                .long("required")
                .action(clap::ArgAction::SetTrue)
                .help("Values must be filled in"),
        )
        .arg(
            clap::Arg::new("searchable")
                .long("searchable")
                .action(clap::ArgAction::SetTrue)
                .help("Mark the field as searchable"),
        )
        .arg(
            clap::Arg::new("hidden")
                .long("hidden")
                .action(clap::ArgAction::SetTrue)
                .help("Create the field with its visible flag off"),
        )
        .arg(
            clap::Arg::new("default")
                .long("default")
                .help("Default value; JSON literals keep their type"),
        )
        .arg(
            clap::Arg::new("option")
                .long("option")
                .action(clap::ArgAction::Append)
                .help("A choice for select and multiselect fields (repeatable)"),
        )
        .arg(
            clap::Arg::new("sort-order")
                .long("sort-order")
                .value_parser(clap::value_parser!(i32))
                .help("Position (defaults to after every existing field)"),
        )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), BackofficeError> {
        let input = new_definition_from_args(matches)?;
        let manager = DefinitionManager::new(self.source.open(settings)?);
        let created = manager.create(input).await?;
        println!(
            "Created field '{}' ({}, {}) with id {}.",
            created.field_name, created.field_type, created.field_category, created.id
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> clap::ArgMatches {
        let command = FieldsCreateCommand::new(StoreSource::Settings);
        command
            .add_arguments(clap::Command::new("fields-create"))
            .try_get_matches_from(args)
            .unwrap()
    }

    #[test]
    fn test_parse_default() {
        assert_eq!(parse_default("true"), Some(FieldValue::Bool(true)));
        assert_eq!(parse_default("12.5"), Some(FieldValue::Number(12.5)));
        assert_eq!(
            parse_default(r#"["a","b"]"#),
            Some(FieldValue::List(vec!["a".into(), "b".into()]))
        );
        assert_eq!(parse_default("Gold"), Some(FieldValue::Text("Gold".into())));
        assert_eq!(parse_default("  "), None);
        assert_eq!(parse_default("null"), Some(FieldValue::Text("null".into())));
    }

    #[test]
    fn test_new_definition_from_args() {
        let matches = parse(&[
            "fields-create",
            "Customer Tier",
            "--type",
            "select",
            "--category",
            "sales",
            "--required",
            "--hidden",
            "--option",
            "Gold",
            "--option",
            "Silver",
            "--default",
            "Gold",
        ]);
        let input = new_definition_from_args(&matches).unwrap();
        assert_eq!(input.field_type, FieldType::Select);
        assert_eq!(input.field_category, FieldCategory::Sales);
        assert!(input.is_required);
        assert!(!input.is_visible);
        assert_eq!(input.options, vec!["Gold", "Silver"]);
        assert_eq!(input.sort_order, None);

        let def = input.into_definition();
        assert_eq!(def.field_name, "customer_tier");
        assert_eq!(def.display_name, "Customer Tier");
        assert_eq!(def.default_value, Some(FieldValue::Text("Gold".into())));
    }

    #[test]
    fn test_numeric_default_for_numeric_options() {
        let matches = parse(&[
            "fields-create",
            "Payment Days",
            "--type",
            "select",
            "--option",
            "30",
            "--option",
            "60",
            "--default",
            "30",
        ]);
        let def = new_definition_from_args(&matches).unwrap().into_definition();
        assert_eq!(def.default_value, Some(FieldValue::Number(30.0)));
        assert!(def.check().is_ok());
    }

    #[test]
    fn test_unknown_type_is_rejected_by_parser() {
        let command = FieldsCreateCommand::new(StoreSource::Settings);
        let result = command
            .add_arguments(clap::Command::new("fields-create"))
            .try_get_matches_from(["fields-create", "x", "--type", "colour"]);
        assert!(result.is_err());
    }
}
