//! Content service error types

use thiserror::Error;

use crate::backend::BackendError;

/// Errors from the content services
#[derive(Error, Debug)]
pub enum ContentError {
    /// A draft failed validation before reaching the backend
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// The backend call failed
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ContentError {
    pub(crate) fn required(field: &'static str) -> Self {
        ContentError::Validation {
            field,
            reason: "must not be blank".to_string(),
        }
    }

    /// Field that failed validation, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ContentError::Validation { field, .. } => Some(field),
            ContentError::Backend(_) => None,
        }
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(err: serde_json::Error) -> Self {
        ContentError::Backend(BackendError::from(err))
    }
}

/// Result type alias for content operations
pub type ContentResult<T> = Result<T, ContentError>;
