//! Backend error types
//!
//! Errors raised while talking to the hosted data/auth/storage service.

use thiserror::Error;

/// Errors that can occur when calling the backend service
#[derive(Error, Debug)]
pub enum BackendError {
    /// Service could not be reached
    #[error("Backend unavailable")]
    Unavailable,

    /// Request timed out
    #[error("Request timeout")]
    Timeout,

    /// Transport-level failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Response was missing something the protocol requires
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Backend URL or key missing
    #[error("Backend not configured: {0}")]
    NotConfigured(String),
}

impl BackendError {
    /// Classify a transport error the way the rest of the crate reports it
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout
        } else if is_connect(&err) {
            BackendError::Unavailable
        } else {
            BackendError::Request(err)
        }
    }

    /// HTTP status carried by an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn is_connect(err: &reqwest::Error) -> bool {
    err.is_connect()
}

#[cfg(target_arch = "wasm32")]
fn is_connect(_err: &reqwest::Error) -> bool {
    false
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode(err.to_string())
    }
}

/// Result type alias for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BackendError::Api {
            status: 404,
            message: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "API error 404: missing");
        assert_eq!(err.status(), Some(404));
        assert_eq!(BackendError::Timeout.status(), None);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: BackendError = json_err.into();
        assert!(matches!(err, BackendError::Decode(_)));
    }
}
