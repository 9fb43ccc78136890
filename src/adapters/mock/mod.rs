//! Mock implementations for testing.
//!
//! These doubles let the session and theme containers be exercised without
//! network access, file system access, or a desktop session.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses
//! - [`InMemoryStore`] - In-memory key/value storage
//! - [`MockAppearance`] - Controllable OS color scheme

pub mod appearance;
pub mod http;
pub mod store;

pub use appearance::MockAppearance;
pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use store::InMemoryStore;
