//! Common test utilities for integration tests.
//!
//! Fixtures for wiring a [`SessionManager`] or [`ThemeResolver`] over a real
//! reqwest transport (pointed at a `wiremock` server) and in-memory seams.

#![allow(dead_code)]

use std::sync::Arc;

use smsadmin::adapters::mock::{InMemoryStore, MockAppearance};
use smsadmin::adapters::ReqwestHttpClient;
use smsadmin::api::ApiClient;
use smsadmin::session::SessionManager;
use smsadmin::theme::ThemeResolver;
use wiremock::MockServer;

pub const ADMIN_EMAIL: &str = "admin@bulksms.com";
pub const ADMIN_PASSWORD: &str = "admin123";

/// The admin user as the backend returns it.
pub fn admin_user_json() -> serde_json::Value {
    serde_json::json!({
        "id": "1",
        "email": ADMIN_EMAIL,
        "name": "Admin",
        "role": "admin"
    })
}

/// Body of a successful login.
pub fn login_success_json(token: &str) -> serde_json::Value {
    serde_json::json!({ "token": token, "user": admin_user_json() })
}

/// Body of a successful verify.
pub fn verify_success_json() -> serde_json::Value {
    serde_json::json!({ "user": admin_user_json() })
}

/// API client using the production reqwest adapter against `server`.
pub fn api_for(server: &MockServer) -> ApiClient {
    ApiClient::new(server.uri(), Arc::new(ReqwestHttpClient::new()))
}

/// Session manager over `server` and `store`.
pub fn session_for(server: &MockServer, store: &InMemoryStore) -> SessionManager {
    SessionManager::new(api_for(server), Arc::new(store.clone()))
}

/// Theme resolver over `store` and `os`.
pub fn theme_for(store: &InMemoryStore, os: &MockAppearance) -> ThemeResolver {
    ThemeResolver::new(Arc::new(store.clone()), Arc::new(os.clone()))
}
