//! Errors from the generic API request helpers.

use thiserror::Error;

use super::category::ErrorCategory;
use crate::traits::HttpError;

/// Failure of a request made through `ApiClient`.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("{0}")]
    Transport(#[from] HttpError),

    /// The backend answered with a non-2xx status.
    #[error("Request to {endpoint} failed ({status}): {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// The body could not be encoded or decoded.
    #[error("Invalid JSON for {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

impl ApiError {
    /// HTTP status, if the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// A 401 from any endpoint means the stored session is no longer
    /// accepted. Acting on it is up to the caller.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::Transport(_) => ErrorCategory::Network,
            ApiError::Status { status: 401 | 403, .. } => ErrorCategory::Auth,
            ApiError::Status { status, .. } if *status >= 500 => ErrorCategory::Server,
            ApiError::Status { .. } => ErrorCategory::Client,
            ApiError::Decode { .. } => ErrorCategory::Server,
        }
    }
}
