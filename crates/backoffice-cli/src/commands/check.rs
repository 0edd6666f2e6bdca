//! `backoffice check`: run the configuration checks.

use async_trait::async_trait;
use backoffice_core::checks::{run_checks, CheckLevel};
use backoffice_core::{BackofficeError, Settings};

use crate::command::ManagementCommand;

pub struct CheckCommand;

#[async_trait]
impl ManagementCommand for CheckCommand {
    fn name(&self) -> &'static str {
        "check"
    }

    fn help(&self) -> &'static str {
        "Check tenant, store and locale configuration"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("fail-level")
                .long("fail-level")
                .value_parser(["ERROR", "WARNING"])
                .default_value("ERROR")
                .help("Lowest message level that makes the command fail"),
        )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), BackofficeError> {
        let fail_level = match matches.get_one::<String>("fail-level").map(String::as_str) {
            Some("WARNING") => CheckLevel::Warning,
            _ => CheckLevel::Error,
        };

        let messages = run_checks(settings);
        if messages.is_empty() {
            println!("System check identified no issues.");
            return Ok(());
        }

        for msg in &messages {
            println!("{msg}");
        }
        let failing = messages.iter().filter(|m| m.level >= fail_level).count();
        println!(
            "System check identified {} issue(s) ({failing} at or above {fail_level}).",
            messages.len()
        );
        tracing::info!(issues = messages.len(), failing, "configuration check finished");

        if failing > 0 {
            return Err(BackofficeError::ImproperlyConfigured(format!(
                "system check found {failing} problem(s)"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandRegistry;

    fn configured() -> Settings {
        let mut settings = Settings {
            organization_id: Some("org-1".into()),
            ..Settings::default()
        };
        settings.store.url = "https://db.example.com".into();
        settings.store.api_key = "key".into();
        settings
    }

    async fn run(args: &[&str], settings: &Settings) -> Result<(), BackofficeError> {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(CheckCommand));
        let matches = registry.build_cli().try_get_matches_from(args).unwrap();
        registry.execute(&matches, settings).await
    }

    #[tokio::test]
    async fn test_check_passes_when_configured() {
        assert!(run(&["backoffice", "check"], &configured()).await.is_ok());
    }

    #[tokio::test]
    async fn test_check_fails_without_tenant() {
        let err = run(&["backoffice", "check"], &Settings::default()).await.unwrap_err();
        assert!(matches!(err, BackofficeError::ImproperlyConfigured(_)));
    }

    #[tokio::test]
    async fn test_fail_level_warning() {
        let mut settings = configured();
        settings.store.timeout_secs = 0;
        assert!(run(&["backoffice", "check"], &settings).await.is_ok());
        assert!(run(&["backoffice", "check", "--fail-level", "WARNING"], &settings)
            .await
            .is_err());
    }
}
