//! Trait abstractions for dependency injection and testability.
//!
//! The session and theme containers never talk to the network, the disk or
//! the desktop directly; they go through these traits so tests can swap in
//! the doubles from [`crate::adapters::mock`].
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST)
//! - [`KeyValueStore`] - Durable client-side key/value storage
//! - [`AppearanceSource`] - OS-level light/dark preference

pub mod appearance;
pub mod http;
pub mod storage;

pub use appearance::AppearanceSource;
pub use http::{Headers, HttpClient, HttpError, Response};
pub use storage::{KeyValueStore, StorageError};
