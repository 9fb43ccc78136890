//! Admin session management.
//!
//! [`SessionManager`] owns the signed-in identity and its persisted token.
//! Startup calls [`SessionManager::verify`]; the login surface calls
//! [`SessionManager::login`] with an email run through [`normalize_email`].

pub mod manager;
pub mod state;
pub mod user;

pub use manager::{SessionManager, TOKEN_KEY};
pub use state::{SessionPhase, SessionState};
pub use user::{normalize_email, AdminRole, AdminUser};
