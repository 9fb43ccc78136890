//! Session manager: login, logout and startup verification.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::state::{SessionPhase, SessionState};
use super::user::AdminUser;
use crate::api::interceptor::{bearer, AUTHORIZATION};
use crate::api::{backend_message, endpoints, ApiClient, BearerAuth, InterceptorId};
use crate::error::{ApiError, LoginError};
use crate::traits::{Headers, KeyValueStore};

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "admin_token";

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    user: AdminUser,
}

#[derive(Deserialize)]
struct VerifyResponse {
    user: AdminUser,
}

/// Owns the authenticated identity and the persisted bearer token.
///
/// State changes are published on a `tokio::sync::watch` channel; front-ends
/// call [`subscribe`](Self::subscribe) instead of polling.
///
/// While authenticated, a [`BearerAuth`] interceptor is registered on the
/// shared [`ApiClient`], so every request made through any clone of that
/// client carries the token without the call site attaching it.
///
/// # Example
///
/// ```ignore
/// let session = SessionManager::new(api.clone(), store);
/// session.verify().await;
/// if session.user().is_none() {
///     session.login(&normalize_email(&email), &password).await?;
/// }
/// ```
pub struct SessionManager {
    api: ApiClient,
    store: Arc<dyn KeyValueStore>,
    state: watch::Sender<SessionState>,
    auth_interceptor: Mutex<Option<InterceptorId>>,
}

impl SessionManager {
    /// Create a manager in the `Initializing` phase. Call
    /// [`verify`](Self::verify) once at startup.
    pub fn new(api: ApiClient, store: Arc<dyn KeyValueStore>) -> Self {
        let (state, _) = watch::channel(SessionState::initializing());
        Self {
            api,
            store,
            state,
            auth_interceptor: Mutex::new(None),
        }
    }

    /// The API client whose interceptor chain this manager owns a slot in.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Receive every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<AdminUser> {
        self.state.borrow().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.borrow().phase()
    }

    /// The persisted token, if any. Read failures count as absent.
    pub fn token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Failed to read stored session token: {}", e);
                None
            }
        }
    }

    /// Exchange the persisted token for the current user.
    ///
    /// Never fails: a missing token leaves the session anonymous, and any
    /// verification failure (transport error, non-2xx, malformed body)
    /// removes the persisted token and leaves it anonymous. `loading` is
    /// false afterwards in every case.
    pub async fn verify(&self) -> SessionPhase {
        let Some(token) = self.token() else {
            debug!("No stored session token, starting anonymous");
            self.state.send_modify(|s| s.loading = false);
            return self.phase();
        };

        match self.fetch_verified_user(&token).await {
            Ok(_) if self.token().as_deref() != Some(token.as_str()) => {
                debug!("Stored token changed during verification, ignoring result");
                self.state.send_modify(|s| s.loading = false);
            }
            Ok(user) => {
                info!(user_id = %user.id, role = %user.role, "Restored admin session");
                self.install_bearer(&token);
                self.state.send_modify(|s| {
                    s.user = Some(user);
                    s.loading = false;
                });
            }
            Err(reason) => {
                warn!("Session verification failed: {}", reason);
                self.discard_if_current(&token);
                self.state.send_modify(|s| s.loading = false);
            }
        }

        self.phase()
    }

    async fn fetch_verified_user(&self, token: &str) -> Result<AdminUser, String> {
        let mut headers = Headers::new();
        headers.insert(AUTHORIZATION.to_string(), bearer(token));

        let response = self
            .api
            .get(endpoints::VERIFY, &headers)
            .await
            .map_err(|e| e.to_string())?;

        if !response.is_success() {
            return Err(match backend_message(&response) {
                Some(message) => format!("HTTP {}: {}", response.status, message),
                None => format!("HTTP {}", response.status),
            });
        }

        response
            .json::<VerifyResponse>()
            .map(|body| body.user)
            .map_err(|e| format!("invalid verify response: {}", e))
    }

    /// Drop a token that failed verification, unless a login replaced it
    /// while the request was in flight.
    fn discard_if_current(&self, token: &str) {
        if self.token().as_deref() != Some(token) {
            debug!("Stored token changed during verification, keeping it");
            return;
        }

        if let Err(e) = self.store.remove(TOKEN_KEY) {
            warn!("Failed to remove rejected session token: {}", e);
        }
        self.clear_bearer();
        self.state.send_if_modified(|s| s.user.take().is_some());
    }

    /// Sign in with email and password.
    ///
    /// The caller normalizes the email (see
    /// [`normalize_email`](super::normalize_email)). On success the token is
    /// persisted, the bearer interceptor is installed and the user is
    /// published. On failure nothing changes and the error says whether
    /// the credentials were rejected (401), the request was malformed
    /// (400), or something else went wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminUser, LoginError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(LoginError::MalformedRequest { message: None });
        }

        let response = self
            .api
            .post_json(
                endpoints::LOGIN,
                &LoginRequest { email, password },
                &Headers::new(),
            )
            .await
            .map_err(|e| match e {
                ApiError::Transport(err) => LoginError::Network {
                    message: err.to_string(),
                },
                other => LoginError::UnexpectedResponse {
                    message: other.to_string(),
                },
            })?;

        if !response.is_success() {
            let err = LoginError::from_status(response.status, backend_message(&response));
            warn!(code = err.error_code(), status = response.status, "Login rejected");
            return Err(err);
        }

        let LoginResponse { token, user } =
            response
                .json()
                .map_err(|e| LoginError::UnexpectedResponse {
                    message: e.to_string(),
                })?;

        if token.is_empty() {
            return Err(LoginError::UnexpectedResponse {
                message: "empty token".to_string(),
            });
        }

        self.store
            .set(TOKEN_KEY, &token)
            .map_err(|e| LoginError::Storage {
                message: e.to_string(),
            })?;
        self.install_bearer(&token);
        self.state.send_modify(|s| s.user = Some(user.clone()));

        info!(user_id = %user.id, role = %user.role, "Admin signed in");
        Ok(user)
    }

    /// Sign out. Synchronous and idempotent: removes the persisted token,
    /// clears the user and removes the bearer interceptor. No request is
    /// made.
    pub fn logout(&self) {
        if let Err(e) = self.store.remove(TOKEN_KEY) {
            warn!("Failed to remove session token on logout: {}", e);
        }
        self.clear_bearer();

        if self.state.send_if_modified(|s| s.user.take().is_some()) {
            info!("Admin signed out");
        }
    }

    fn install_bearer(&self, token: &str) {
        let mut slot = self
            .auth_interceptor
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = slot.take() {
            self.api.interceptors().deregister(previous);
        }
        *slot = Some(
            self.api
                .interceptors()
                .register(Arc::new(BearerAuth::new(token))),
        );
    }

    fn clear_bearer(&self) {
        let mut slot = self
            .auth_interceptor
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        if let Some(id) = slot.take() {
            self.api.interceptors().deregister(id);
        }
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.clear_bearer();
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("phase", &self.phase())
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}
