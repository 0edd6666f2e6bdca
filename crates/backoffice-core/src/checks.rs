//! Configuration checks.
//!
//! [`run_checks`] inspects [`Settings`] for problems that would otherwise
//! only show up as failed store requests: a missing tenant id, a missing
//! store URL or key, and an unusable locale.

use crate::settings::Settings;

/// Severity level for a check message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckLevel {
    /// Informational message.
    Info = 1,
    /// A potential problem.
    Warning = 2,
    /// A definite problem that should be fixed.
    Error = 3,
}

impl std::fmt::Display for CheckLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// A diagnostic message produced by a configuration check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckMessage {
    /// The severity level.
    pub level: CheckLevel,
    /// The human-readable message describing the issue.
    pub msg: String,
    /// An optional hint on how to fix the issue.
    pub hint: Option<String>,
    /// A unique identifier for this check (e.g. "tenant.E001").
    pub id: String,
}

impl CheckMessage {
    fn new(level: CheckLevel, msg: &str, hint: &str, id: &str) -> Self {
        Self {
            level,
            msg: msg.to_string(),
            hint: Some(hint.to_string()),
            id: id.to_string(),
        }
    }

    /// Returns `true` if this message is at least error-level.
    pub fn is_serious(&self) -> bool {
        self.level >= CheckLevel::Error
    }
}

impl std::fmt::Display for CheckMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ({}) {}", self.level, self.id, self.msg)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n\tHINT: {hint}")?;
        }
        Ok(())
    }
}

/// Runs all configuration checks against the given settings.
pub fn run_checks(settings: &Settings) -> Vec<CheckMessage> {
    let mut messages = Vec::new();

    if settings.require_organization_id().is_err() {
        messages.push(CheckMessage::new(
            CheckLevel::Error,
            "organization_id is not set",
            "Set organization_id (or BACKOFFICE_ORGANIZATION_ID) to the tenant's id",
            "tenant.E001",
        ));
    }

    if settings.store.url.trim().is_empty() {
        messages.push(CheckMessage::new(
            CheckLevel::Error,
            "store.url is empty",
            "Set store.url (or BACKOFFICE_STORE_URL) to the hosted project URL",
            "store.E001",
        ));
    } else if !settings.store.url.starts_with("https://") && !settings.store.url.starts_with("http://") {
        messages.push(CheckMessage::new(
            CheckLevel::Error,
            "store.url is not an http(s) URL",
            "Use the full project URL, including the scheme",
            "store.E002",
        ));
    } else if settings.store.url.starts_with("http://") && !settings.debug {
        messages.push(CheckMessage::new(
            CheckLevel::Warning,
            "store.url uses plain http with debug disabled",
            "Use https in production",
            "store.W001",
        ));
    }

    if settings.store.api_key.trim().is_empty() {
        messages.push(CheckMessage::new(
            CheckLevel::Error,
            "store.api_key is empty",
            "Set store.api_key (or BACKOFFICE_STORE_API_KEY)",
            "store.E003",
        ));
    }

    if settings.store.timeout_secs == 0 {
        messages.push(CheckMessage::new(
            CheckLevel::Warning,
            "store.timeout_secs is 0",
            "A zero timeout makes every request fail; use a few seconds",
            "store.W002",
        ));
    }

    if settings.locale.date_format.trim().is_empty() {
        messages.push(CheckMessage::new(
            CheckLevel::Warning,
            "locale.date_format is empty",
            "Dates will be shown as stored; set a chrono format such as %d/%m/%Y",
            "locale.W001",
        ));
    }

    messages
}
