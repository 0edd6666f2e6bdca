//! Logging integration for backoffice-rs.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-tenant spans.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level` (e.g. "debug", "info",
/// "backoffice_store=debug"). In debug mode a pretty, human-readable format
/// is used; otherwise a structured JSON format. Installing a second
/// subscriber is a no-op.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span scoped to one tenant.
///
/// # Examples
///
/// ```
/// use backoffice_core::logging::tenant_span;
///
/// let span = tenant_span("org-1");
/// let _guard = span.enter();
/// tracing::info!("loading custom fields");
/// ```
pub fn tenant_span(organization_id: &str) -> tracing::Span {
    tracing::info_span!("tenant", organization_id = organization_id)
}
