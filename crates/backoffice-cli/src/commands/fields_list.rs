//! The `fields-list` management command.
//!
//! Prints the tenant's field definitions in `sort_order`, as an aligned
//! table or as JSON rows.

use async_trait::async_trait;
use backoffice_core::{BackofficeError, Settings};
use backoffice_fields::{FieldCategory, FieldDefinition};
use backoffice_store::{DefinitionQuery, FieldDefinitionStore};

use super::{parse_arg, StoreSource};
use crate::command::ManagementCommand;

/// Lists field definitions.
pub struct FieldsListCommand {
    source: StoreSource,
}

impl FieldsListCommand {
    pub const fn new(source: StoreSource) -> Self {
        Self { source }
    }
}

/// Renders definitions as a plain-text table.
///
/// Flags are shown as `R` (required), `S` (searchable) and `V` (visible),
/// with `-` for an unset flag.
pub fn format_table(definitions: &[FieldDefinition]) -> String {
    const HEADERS: [&str; 6] = ["#", "NAME", "LABEL", "TYPE", "CATEGORY", "FLAGS"];

    let rows: Vec<[String; 6]> = definitions
        .iter()
        .map(|d| {
            let flags: String = [
                (d.is_required, 'R'),
                (d.is_searchable, 'S'),
                (d.is_visible, 'V'),
            ]
            .iter()
            .map(|&(on, c)| if on { c } else { '-' })
            .collect();
            [
                d.sort_order.to_string(),
                d.field_name.clone(),
                d.label(),
                d.field_type.to_string(),
                d.field_category.to_string(),
                flags,
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[&str]| -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(&HEADERS);
    for row in &rows {
        out.push('\n');
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&line(&cells));
    }
    out
}

#[async_trait]
impl ManagementCommand for FieldsListCommand {
    fn name(&self) -> &'static str {
        "fields-list"
    }

    fn help(&self) -> &'static str {
        "List the tenant's custom field definitions"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("category")
                .long("category")
                .help("Only list fields of this category"),
        )
        .arg(
            clap::Arg::new("visible-only")
                .long("visible-only")
                .action(clap::ArgAction::SetTrue)
                .help("Hide fields whose visible flag is off"),
        )
        .arg(
            clap::Arg::new("format")
                .long("format")
                .value_parser(["table", "json"])
                .default_value("table")
                .help("Output format"),
        )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), BackofficeError> {
        let store = self.source.open(settings)?;
        let mut query = if matches.get_flag("visible-only") {
            DefinitionQuery::visible()
        } else {
            DefinitionQuery::all()
        };
        query.category = parse_arg::<FieldCategory>(matches, "category")?;

        let definitions = store.list(&query).await?;
        tracing::debug!(
            tenant = %store.organization_id(),
            count = definitions.len(),
            "listed custom fields"
        );

        match matches.get_one::<String>("format").map(String::as_str) {
            Some("json") => println!("{}", serde_json::to_string_pretty(&definitions)?),
            _ if definitions.is_empty() => println!("No custom fields defined."),
            _ => println!("{}", format_table(&definitions)),
        }
        Ok(())
    }
}
