//! The `backoffice` binary.
//!
//! Settings come from `--settings FILE`, else the file named by
//! `BACKOFFICE_SETTINGS`, else the environment alone. `BACKOFFICE_*`
//! variables override file values.

use std::process::ExitCode;

use anyhow::Context;
use backoffice_cli::{register_builtin_commands, CommandRegistry};
use backoffice_core::logging::{setup_logging, tenant_span};
use backoffice_core::{settings_loader, Settings};
use tracing::Instrument;

fn load_settings(path: Option<&str>) -> anyhow::Result<Settings> {
    let path = path
        .map(String::from)
        .or_else(|| std::env::var("BACKOFFICE_SETTINGS").ok())
        .filter(|p| !p.trim().is_empty());
    match path {
        Some(path) => settings_loader::from_file_with_env(&path)
            .with_context(|| format!("failed to load settings from {path}")),
        None => Ok(settings_loader::from_env()),
    }
}

async fn run() -> anyhow::Result<()> {
    let mut registry = CommandRegistry::new();
    register_builtin_commands(&mut registry);
    let matches = registry.build_cli().get_matches();

    let settings = load_settings(matches.get_one::<String>("settings").map(String::as_str))?;
    setup_logging(&settings);

    let span = settings
        .organization_id
        .as_deref()
        .map_or_else(tracing::Span::none, tenant_span);
    let command = matches.subcommand_name().unwrap_or_default().to_string();

    registry
        .execute(&matches, &settings)
        .instrument(span)
        .await
        .with_context(|| format!("backoffice {command} failed"))
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
