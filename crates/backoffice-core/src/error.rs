//! Core error types for backoffice-rs.
//!
//! [`BackofficeError`] is the error surfaced to callers of the custom field
//! engine: lookups that miss, uniqueness conflicts, invalid definitions,
//! configuration problems and failures reported by the remote store.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Represents a validation error with optional field-level errors.
///
/// A validation error is either simple (one message) or compound
/// (per-field error lists keyed by field name).
///
/// # Examples
///
/// ```
/// use backoffice_core::error::ValidationError;
///
/// let err = ValidationError::new("Options are required for select fields.", "options");
///
/// let mut field_errors = std::collections::BTreeMap::new();
/// field_errors.insert(
///     "contact_email".to_string(),
///     vec![ValidationError::new("Enter a valid email address.", "invalid")],
/// );
/// let err = ValidationError::with_field_errors(field_errors);
/// assert!(err.to_string().contains("contact_email"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The primary error message.
    pub message: String,
    /// A short code identifying the failure (e.g. "required", "invalid").
    pub code: String,
    /// Per-field validation errors, keyed by field name.
    pub field_errors: BTreeMap<String, Vec<Self>>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            field_errors: BTreeMap::new(),
        }
    }

    /// Creates a `ValidationError` containing per-field errors.
    pub fn with_field_errors(field_errors: BTreeMap<String, Vec<Self>>) -> Self {
        Self {
            message: String::new(),
            code: String::new(),
            field_errors,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            write!(f, "{}", self.message)?;
        } else if !self.field_errors.is_empty() {
            let mut first = true;
            for (field, errors) in &self.field_errors {
                for error in errors {
                    if !first {
                        write!(f, "; ")?;
                    }
                    write!(f, "{field}: {error}")?;
                    first = false;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for backoffice-rs.
///
/// Each variant maps to an HTTP-like status code via
/// [`BackofficeError::status_code`] so a web layer can surface it directly.
#[derive(Error, Debug)]
pub enum BackofficeError {
    /// The requested row does not exist for this tenant.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A uniqueness rule was violated (e.g. duplicate field name).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A definition or value map failed validation.
    #[error("Validation error: {0}")]
    ValidationError(ValidationError),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The application is improperly configured (e.g. no tenant id).
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    /// The remote store rejected or failed a request.
    #[error("Store error: {0}")]
    StoreError(String),

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl BackofficeError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `ValidationError` -> 400
    /// - `NotFound` -> 404
    /// - `Conflict` -> 409
    /// - `StoreError` -> 502
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::ValidationError(_) => 400,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::StoreError(_) => 502,
            Self::ConfigurationError(_)
            | Self::ImproperlyConfigured(_)
            | Self::SerializationError(_)
            | Self::IoError(_) => 500,
        }
    }
}

impl From<ValidationError> for BackofficeError {
    fn from(err: ValidationError) -> Self {
        Self::ValidationError(err)
    }
}

impl From<serde_json::Error> for BackofficeError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// A convenience type alias for `Result<T, BackofficeError>`.
pub type BackofficeResult<T> = Result<T, BackofficeError>;
