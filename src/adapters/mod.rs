//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`FileStore`] - JSON-file key/value storage
//! - [`SystemAppearance`] - Desktop light/dark preference
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles for all adapters:
//! - [`mock::MockHttpClient`] - Configurable HTTP responses
//! - [`mock::InMemoryStore`] - In-memory key/value storage
//! - [`mock::MockAppearance`] - Controllable OS preference

pub mod file_store;
pub mod mock;
pub mod reqwest_http;
pub mod system_appearance;

pub use file_store::FileStore;
pub use mock::{InMemoryStore, MockAppearance, MockHttpClient};
pub use reqwest_http::ReqwestHttpClient;
pub use system_appearance::SystemAppearance;
