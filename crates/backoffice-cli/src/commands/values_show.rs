//! The `values-show` management command.

use async_trait::async_trait;
use backoffice_core::{BackofficeError, Settings};
use backoffice_fields::{
    group_by_category, CustomFieldForm, DisplayFormatter, FieldCategory, FieldDefinition,
    FieldValues,
};
use backoffice_store::{load, load_into};

use super::{parse_arg, read_values, required_arg, StoreSource};
use crate::command::ManagementCommand;

/// Prints an entity's custom field values.
///
/// By default values are formatted for reading, one line per field,
/// grouped by category. With `--html` the read-only edit form is printed
/// instead, with defaults filled in for absent keys.
pub struct ValuesShowCommand {
    source: StoreSource,
}

impl ValuesShowCommand {
    pub const fn new(source: StoreSource) -> Self {
        Self { source }
    }
}

/// Formats the read-only listing of `values`.
///
/// Fields without a stored value are omitted, and so are categories left
/// with no entries. Labels and values are those of
/// [`DisplayFormatter::display_entries`].
pub fn format_listing(
    formatter: &DisplayFormatter,
    definitions: &[FieldDefinition],
    values: &FieldValues,
) -> String {
    let mut out = Vec::new();
    for (category, fields) in group_by_category(definitions).iter() {
        let lines: Vec<String> = fields
            .iter()
            .filter_map(|def| {
                values
                    .get(&def.field_name)
                    .map(|value| format!("{}: {}", def.label(), formatter.format_value(def, value)))
            })
            .collect();
        if lines.is_empty() {
            continue;
        }
        out.push(format!("[{category}]"));
        out.extend(lines);
    }
    out.join("\n")
}

#[async_trait]
impl ManagementCommand for ValuesShowCommand {
    fn name(&self) -> &'static str {
        "values-show"
    }

    fn help(&self) -> &'static str {
        "Show an entity's custom field values as text or as an HTML form"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("values")
                .long("values")
                .required(true)
                .value_name("FILE")
                .help("JSON file holding the value map, or - for stdin"),
        )
        .arg(
            clap::Arg::new("category")
                .long("category")
                .help("Only show fields of this category"),
        )
        .arg(
            clap::Arg::new("html")
                .long("html")
                .action(clap::ArgAction::SetTrue)
                .help("Print the read-only form markup"),
        )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), BackofficeError> {
        let values = read_values(required_arg(matches, "values")?).await?;
        let category = parse_arg::<FieldCategory>(matches, "category")?;
        let store = self.source.open(settings)?;

        if matches.get_flag("html") {
            let mut merged = FieldValues::new();
            let definitions = load_into(&*store, category, &values, |filled| merged = filled).await?;
            let form = CustomFieldForm::new(definitions, merged).readonly(true);
            println!("{}", form.to_html());
            return Ok(());
        }

        let definitions = load(&*store, category).await?;
        let formatter = DisplayFormatter::from(settings.locale.clone());
        let listing = format_listing(&formatter, &definitions, &values);
        if listing.is_empty() {
            println!("No custom field values.");
        } else {
            println!("{listing}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_fields::{FieldType, FieldValue};

    #[test]
    fn test_format_listing_groups_and_omits() {
        let defs = vec![
            FieldDefinition::new("budget", FieldType::Currency)
                .display_name("Budget")
                .category(FieldCategory::Financial),
            FieldDefinition::new("nda", FieldType::Boolean)
                .display_name("NDA signed")
                .category(FieldCategory::Legal),
            FieldDefinition::new("notes", FieldType::Textarea),
        ];
        let mut values = FieldValues::new();
        values.insert("budget", FieldValue::Number(1234.5));
        values.insert("nda", FieldValue::Bool(true));

        let listing = format_listing(&DisplayFormatter::default(), &defs, &values);
        assert_eq!(
            listing,
            "[financial]\nBudget: $1,234.50\n[legal]\nNDA signed: \u{2713} Yes"
        );
    }

    #[test]
    fn test_format_listing_empty() {
        let defs = vec![FieldDefinition::new("notes", FieldType::Textarea)];
        assert!(format_listing(&DisplayFormatter::default(), &defs, &FieldValues::new()).is_empty());
    }
}
