//! HTTP plumbing for the admin backend.
//!
//! - [`ApiClient`] - base URL + injected transport + shared interceptor chain
//! - [`InterceptorChain`] / [`BearerAuth`] - default headers with explicit ownership
//! - [`endpoints`] - backend paths
//! - [`dashboard`] - read-only dashboard fetches

pub mod client;
pub mod dashboard;
pub mod endpoints;
pub mod interceptor;

pub use client::{backend_message, ApiClient};
pub use dashboard::{fetch_app_settings, fetch_dashboard_stats, DashboardStats};
pub use interceptor::{BearerAuth, InterceptorChain, InterceptorId, RequestInterceptor};
