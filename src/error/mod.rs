//! Error types for the admin console core.
//!
//! | Error | Surfaced by | Handling |
//! |-------|-------------|----------|
//! | [`LoginError`] | `SessionManager::login` | Shown to the user; never retried automatically |
//! | [`ApiError`] | `ApiClient` helpers | Returned to the caller |
//! | `StorageError` | `KeyValueStore` | Logged and swallowed by `verify`/`logout`/theme |
//!
//! `SessionManager::verify` and the theme resolver never return errors.

mod api;
mod category;
mod login;

pub use api::ApiError;
pub use category::ErrorCategory;
pub use login::{
    LoginError, INVALID_CREDENTIALS_FALLBACK, MALFORMED_REQUEST_FALLBACK, NETWORK_FALLBACK,
};
