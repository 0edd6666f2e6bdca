use backoffice_core::{BackofficeError, ValidationError};
use thiserror::Error;

/// Errors raised at the boundary with a field definition store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("unauthorized: check the store api key")]
    Unauthorized,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("json error: {0}")]
    Serde(String),
    #[error("invalid definition: {0}")]
    InvalidDefinition(ValidationError),
}

impl StoreError {
    /// Returns true if the error is transient and should be retried.
    pub fn should_retry(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout => true,
            Self::Http { status, .. } => *status == 429 || (500..=599).contains(status),
            _ => false,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidDefinition(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

impl From<StoreError> for BackofficeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => Self::NotFound(what),
            StoreError::Conflict(what) => Self::Conflict(what),
            StoreError::InvalidDefinition(e) => Self::ValidationError(e),
            StoreError::Serde(msg) => Self::SerializationError(msg),
            other => Self::StoreError(other.to_string()),
        }
    }
}

pub(crate) fn map_reqwest_error(e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::Timeout
    } else if e.is_decode() {
        StoreError::Serde(e.to_string())
    } else {
        StoreError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_retry() {
        assert!(StoreError::Timeout.should_retry());
        assert!(StoreError::Transport("reset".into()).should_retry());
        assert!(StoreError::Http { status: 503, body: String::new() }.should_retry());
        assert!(StoreError::Http { status: 429, body: String::new() }.should_retry());
        assert!(!StoreError::Http { status: 400, body: String::new() }.should_retry());
        assert!(!StoreError::Unauthorized.should_retry());
        assert!(!StoreError::Conflict("x".into()).should_retry());
    }

    #[test]
    fn test_into_backoffice_error() {
        let err: BackofficeError = StoreError::NotFound("abc".into()).into();
        assert_eq!(err.status_code(), 404);
        let err: BackofficeError = StoreError::Conflict("vat_number".into()).into();
        assert_eq!(err.status_code(), 409);
        let err: BackofficeError =
            StoreError::InvalidDefinition(ValidationError::new("bad", "options")).into();
        assert_eq!(err.status_code(), 400);
        let err: BackofficeError = StoreError::Timeout.into();
        assert_eq!(err.status_code(), 502);
        assert!(err.to_string().contains("timeout"));
    }
}
