//! smsadmin - session and theme core for the bulk-SMS admin console.
//!
//! This library exposes modules for use by the binary and integration tests.

pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod theme;
pub mod traits;
