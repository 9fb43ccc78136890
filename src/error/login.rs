//! Login failure taxonomy.
//!
//! Every way `SessionManager::login` can fail, structured so a front-end can
//! choose its message without string-matching the backend payload.

use std::fmt;

use super::category::ErrorCategory;

/// Fallback shown when a 401 carries no backend message.
pub const INVALID_CREDENTIALS_FALLBACK: &str =
    "Invalid email or password. Please check your credentials.";

/// Fallback shown when a 400 carries no backend message.
pub const MALFORMED_REQUEST_FALLBACK: &str = "Please provide both email and password.";

/// Fallback shown for transport failures.
pub const NETWORK_FALLBACK: &str = "Login failed. Please check your connection and try again.";

/// Errors surfaced to the caller of `login`.
///
/// A failing login never mutates session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// HTTP 401: the backend rejected the email/password pair.
    InvalidCredentials { message: Option<String> },

    /// HTTP 400, or empty fields rejected before any request was sent.
    MalformedRequest { message: Option<String> },

    /// Any other non-2xx status.
    Server { status: u16, message: Option<String> },

    /// The request never produced a response.
    Network { message: String },

    /// A 2xx response whose body did not contain `token` and `user`.
    UnexpectedResponse { message: String },

    /// The token could not be persisted.
    Storage { message: String },
}

impl LoginError {
    /// Build the error for a non-2xx response.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 => LoginError::InvalidCredentials { message },
            400 => LoginError::MalformedRequest { message },
            _ => LoginError::Server { status, message },
        }
    }

    /// The backend's own `error`/`message` text, when it sent one.
    pub fn message(&self) -> Option<&str> {
        match self {
            LoginError::InvalidCredentials { message }
            | LoginError::MalformedRequest { message }
            | LoginError::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of the rejection, if the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            LoginError::InvalidCredentials { .. } => Some(401),
            LoginError::MalformedRequest { .. } => Some(400),
            LoginError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text for the login screen: the backend message when present,
    /// otherwise a fixed fallback per failure kind.
    pub fn user_message(&self) -> String {
        match self {
            LoginError::InvalidCredentials { message } => message
                .clone()
                .unwrap_or_else(|| INVALID_CREDENTIALS_FALLBACK.to_string()),
            LoginError::MalformedRequest { message } => message
                .clone()
                .unwrap_or_else(|| MALFORMED_REQUEST_FALLBACK.to_string()),
            LoginError::Server { status, message } => message
                .clone()
                .unwrap_or_else(|| format!("Request failed with status code {}", status)),
            LoginError::Network { .. } => NETWORK_FALLBACK.to_string(),
            LoginError::UnexpectedResponse { .. } => {
                "Login failed: the server sent an unexpected response.".to_string()
            }
            LoginError::Storage { .. } => {
                "Signed in, but the session could not be saved. Check file permissions."
                    .to_string()
            }
        }
    }

    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            LoginError::InvalidCredentials { .. } => "E_LOGIN_INVALID",
            LoginError::MalformedRequest { .. } => "E_LOGIN_BAD_REQUEST",
            LoginError::Server { .. } => "E_LOGIN_SERVER",
            LoginError::Network { .. } => "E_LOGIN_NETWORK",
            LoginError::UnexpectedResponse { .. } => "E_LOGIN_RESPONSE",
            LoginError::Storage { .. } => "E_LOGIN_STORAGE",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            LoginError::InvalidCredentials { .. } => ErrorCategory::Auth,
            LoginError::MalformedRequest { .. } => ErrorCategory::Client,
            LoginError::Server { .. } | LoginError::UnexpectedResponse { .. } => {
                ErrorCategory::Server
            }
            LoginError::Network { .. } => ErrorCategory::Network,
            LoginError::Storage { .. } => ErrorCategory::System,
        }
    }
}

impl fmt::Display for LoginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginError::InvalidCredentials { message } => match message {
                Some(m) => write!(f, "Invalid credentials: {}", m),
                None => write!(f, "Invalid credentials"),
            },
            LoginError::MalformedRequest { message } => match message {
                Some(m) => write!(f, "Malformed login request: {}", m),
                None => write!(f, "Malformed login request"),
            },
            LoginError::Server { status, message } => match message {
                Some(m) => write!(f, "Login failed ({}): {}", status, m),
                None => write!(f, "Login failed ({})", status),
            },
            LoginError::Network { message } => write!(f, "Login request failed: {}", message),
            LoginError::UnexpectedResponse { message } => {
                write!(f, "Unexpected login response: {}", message)
            }
            LoginError::Storage { message } => {
                write!(f, "Failed to persist session token: {}", message)
            }
        }
    }
}

impl std::error::Error for LoginError {}
