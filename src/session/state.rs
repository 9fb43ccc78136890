//! Observable session state.

use super::user::AdminUser;

/// Where the session is in its lifecycle.
///
/// ```text
/// Initializing ──verify ok──▶ Authenticated ◀──login ok── Anonymous
///      │                            │                        ▲
///      └──────verify none/failed────┼────────────────────────┤
///                                   └────────logout──────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Startup verification has not finished yet.
    Initializing,
    /// No verified identity.
    Anonymous,
    /// A login or verify call succeeded in this process.
    Authenticated,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Initializing => "initializing",
            SessionPhase::Anonymous => "anonymous",
            SessionPhase::Authenticated => "authenticated",
        }
    }
}

/// Snapshot published to subscribers after every transition.
///
/// `user` is set only by a successful login or verify; a persisted token
/// alone never populates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<AdminUser>,
    /// True only while the startup verify is in flight.
    pub loading: bool,
}

impl SessionState {
    /// State at process start, before `verify()` has run.
    pub fn initializing() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.user.is_some() {
            SessionPhase::Authenticated
        } else if self.loading {
            SessionPhase::Initializing
        } else {
            SessionPhase::Anonymous
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::initializing()
    }
}
