//! Management command framework for backoffice-rs.
//!
//! A [`ManagementCommand`] is one `backoffice <name>` subcommand; the
//! [`CommandRegistry`] collects them, builds the clap parser and dispatches.
//!
//! ## Defining a Command
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use backoffice_cli::command::ManagementCommand;
//! use backoffice_core::{BackofficeError, Settings};
//!
//! struct WhoAmI;
//!
//! #[async_trait]
//! impl ManagementCommand for WhoAmI {
//!     fn name(&self) -> &str { "whoami" }
//!     fn help(&self) -> &str { "Print the configured tenant" }
//!
//!     async fn handle(
//!         &self,
//!         _matches: &clap::ArgMatches,
//!         settings: &Settings,
//!     ) -> Result<(), BackofficeError> {
//!         println!("{}", settings.require_organization_id()?);
//!         Ok(())
//!     }
//! }
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use backoffice_core::{BackofficeError, Settings};

/// A command invocable as `backoffice <name>`.
#[async_trait]
pub trait ManagementCommand: Send + Sync {
    /// The subcommand name.
    fn name(&self) -> &str;

    /// One-line help shown in `backoffice --help`.
    fn help(&self) -> &str;

    /// Adds the command's arguments. The default adds none.
    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd
    }

    /// Runs the command.
    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), BackofficeError>;
}

/// The registered management commands, keyed by name.
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn ManagementCommand>>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Registers a command, replacing any command with the same name.
    pub fn register(&mut self, command: Box<dyn ManagementCommand>) {
        let name = command.name().to_string();
        self.commands.insert(name, command);
    }

    pub fn get(&self, name: &str) -> Option<&dyn ManagementCommand> {
        self.commands.get(name).map(AsRef::as_ref)
    }

    /// Registered command names, sorted.
    pub fn list_commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Builds the top-level `backoffice` parser with one subcommand per
    /// registered command and the global `--settings` option.
    pub fn build_cli(&self) -> clap::Command {
        let mut app = clap::Command::new("backoffice")
            .about("Custom field administration for the back office")
            .subcommand_required(true)
            .arg(
                clap::Arg::new("settings")
                    .long("settings")
                    .global(true)
                    .value_name("FILE")
                    .help("TOML or JSON settings file (defaults to BACKOFFICE_SETTINGS)"),
            );

        let mut entries: Vec<_> = self.commands.iter().collect();
        entries.sort_by_key(|(name, _)| (*name).clone());

        for (name, cmd) in entries {
            // clap wants `&'static str` names; commands are registered once.
            let static_name: &'static str = Box::leak(name.clone().into_boxed_str());
            let subcmd = clap::Command::new(static_name).about(cmd.help().to_string());
            app = app.subcommand(cmd.add_arguments(subcmd));
        }

        app
    }

    /// Dispatches to the subcommand named in `matches`.
    pub async fn execute(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), BackofficeError> {
        let (name, sub_matches) = matches.subcommand().ok_or_else(|| {
            BackofficeError::ConfigurationError("No subcommand specified".to_string())
        })?;

        let cmd = self.get(name).ok_or_else(|| {
            BackofficeError::ConfigurationError(format!("Unknown command: {name}"))
        })?;

        tracing::debug!(command = name, "running management command");
        cmd.handle(sub_matches, settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoCommand {
        cmd_name: String,
    }

    impl EchoCommand {
        fn new(name: &str) -> Self {
            Self {
                cmd_name: name.to_string(),
            }
        }
    }

    #[async_trait]
    impl ManagementCommand for EchoCommand {
        fn name(&self) -> &str {
            &self.cmd_name
        }

        fn help(&self) -> &'static str {
            "Echo a message"
        }

        fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
            cmd.arg(clap::Arg::new("message").required(false))
        }

        async fn handle(
            &self,
            _matches: &clap::ArgMatches,
            _settings: &Settings,
        ) -> Result<(), BackofficeError> {
            Ok(())
        }
    }

    struct TenantCommand;

    #[async_trait]
    impl ManagementCommand for TenantCommand {
        fn name(&self) -> &'static str {
            "tenant"
        }

        fn help(&self) -> &'static str {
            "Needs a tenant"
        }

        async fn handle(
            &self,
            _matches: &clap::ArgMatches,
            settings: &Settings,
        ) -> Result<(), BackofficeError> {
            settings.require_organization_id().map(|_| ())
        }
    }

    #[test]
    fn test_registry_starts_empty() {
        let registry = CommandRegistry::default();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.get("anything").is_none());
    }

    #[test]
    fn test_register_get_and_replace() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(EchoCommand::new("echo")));
        registry.register(Box::new(EchoCommand::new("echo")));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("echo").unwrap().help(), "Echo a message");
    }

    #[test]
    fn test_list_commands_sorted() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(EchoCommand::new("values-show")));
        registry.register(Box::new(EchoCommand::new("check")));
        registry.register(Box::new(EchoCommand::new("fields-list")));
        assert_eq!(registry.list_commands(), vec!["check", "fields-list", "values-show"]);
    }

    #[test]
    fn test_build_cli_global_settings() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(EchoCommand::new("echo")));
        let matches = registry
            .build_cli()
            .try_get_matches_from(["backoffice", "echo", "hi", "--settings", "app.toml"])
            .unwrap();
        assert_eq!(
            matches.get_one::<String>("settings").map(String::as_str),
            Some("app.toml")
        );
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "echo");
        assert_eq!(sub.get_one::<String>("message").map(String::as_str), Some("hi"));
    }

    #[test]
    fn test_build_cli_requires_subcommand() {
        let registry = CommandRegistry::new();
        assert!(registry.build_cli().try_get_matches_from(["backoffice"]).is_err());
    }

    #[tokio::test]
    async fn test_execute_dispatches() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(TenantCommand));
        let matches = registry
            .build_cli()
            .try_get_matches_from(["backoffice", "tenant"])
            .unwrap();

        let err = registry
            .execute(&matches, &Settings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BackofficeError::ImproperlyConfigured(_)));

        let settings = Settings {
            organization_id: Some("org-1".into()),
            ..Settings::default()
        };
        assert!(registry.execute(&matches, &settings).await.is_ok());
    }
}
