//! Runtime configuration.
//!
//! Defaults suit a backend running on the local machine; every field can be
//! overridden from the environment with [`AdminConfig::from_env`] or in
//! code with the `with_*` builders.

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::api::endpoints::DEFAULT_API_URL;
use crate::theme::{ThemeMode, DEFAULT_POLL_INTERVAL};

pub const API_URL_ENV: &str = "SMSADMIN_API_URL";
pub const DATA_DIR_ENV: &str = "SMSADMIN_DATA_DIR";
pub const TIMEOUT_ENV: &str = "SMSADMIN_TIMEOUT_SECS";
pub const APPEARANCE_POLL_ENV: &str = "SMSADMIN_APPEARANCE_POLL_MS";
pub const DEFAULT_THEME_ENV: &str = "SMSADMIN_DEFAULT_THEME";

/// Transport timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Directory name under the home directory for persisted state.
const DATA_DIR_NAME: &str = ".smsadmin";

/// Configuration for the admin client.
///
/// # Example
///
/// ```ignore
/// use smsadmin::config::AdminConfig;
///
/// let config = AdminConfig::from_env()
///     .with_api_base_url("https://api.example.com");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AdminConfig {
    /// Backend base URL, without a trailing slash
    pub api_base_url: String,
    /// Directory holding `storage.json`
    pub data_dir: PathBuf,
    /// Per-request transport timeout
    pub request_timeout: Duration,
    /// How often the theme watcher reads the OS appearance
    pub appearance_poll_interval: Duration,
    /// Theme mode used when none is stored
    pub default_theme: ThemeMode,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            data_dir: default_data_dir(),
            request_timeout: DEFAULT_TIMEOUT,
            appearance_poll_interval: DEFAULT_POLL_INTERVAL,
            default_theme: ThemeMode::System,
        }
    }
}

impl AdminConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_appearance_poll_interval(mut self, interval: Duration) -> Self {
        self.appearance_poll_interval = interval;
        self
    }

    pub fn with_default_theme(mut self, mode: ThemeMode) -> Self {
        self.default_theme = mode;
        self
    }

    /// Defaults overridden by `SMSADMIN_*` environment variables.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(API_URL_ENV) {
            config = config.with_api_base_url(url.trim());
        }

        if let Some(dir) = get(DATA_DIR_ENV) {
            config = config.with_data_dir(dir);
        }

        if let Some(secs) = get(TIMEOUT_ENV) {
            match secs.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => warn!("Ignoring invalid {}={:?}", TIMEOUT_ENV, secs),
            }
        }

        if let Some(ms) = get(APPEARANCE_POLL_ENV) {
            match ms.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => {
                    config.appearance_poll_interval = Duration::from_millis(ms)
                }
                _ => warn!("Ignoring invalid {}={:?}", APPEARANCE_POLL_ENV, ms),
            }
        }

        if let Some(theme) = get(DEFAULT_THEME_ENV) {
            match theme.parse() {
                Ok(mode) => config.default_theme = mode,
                Err(e) => warn!("Ignoring {}: {}", DEFAULT_THEME_ENV, e),
            }
        }

        config
    }
}

/// `~/.smsadmin`, or `./.smsadmin` when there is no home directory.
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AdminConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:4000");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.appearance_poll_interval, Duration::from_secs(2));
        assert_eq!(config.default_theme, ThemeMode::System);
        assert!(config.data_dir.ends_with(".smsadmin"));
    }

    #[test]
    fn test_builder() {
        let config = AdminConfig::new()
            .with_api_base_url("https://api.example.com/")
            .with_data_dir("/tmp/smsadmin")
            .with_request_timeout(Duration::from_secs(5))
            .with_default_theme(ThemeMode::Dark);

        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/smsadmin"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.default_theme, ThemeMode::Dark);
    }

    #[test]
    fn test_lookup_overrides() {
        let config = AdminConfig::from_lookup(lookup(&[
            (API_URL_ENV, "http://10.0.0.5:4000/"),
            (DATA_DIR_ENV, "/var/lib/smsadmin"),
            (TIMEOUT_ENV, "12"),
            (APPEARANCE_POLL_ENV, "250"),
            (DEFAULT_THEME_ENV, "light"),
        ]));

        assert_eq!(config.api_base_url, "http://10.0.0.5:4000");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/smsadmin"));
        assert_eq!(config.request_timeout, Duration::from_secs(12));
        assert_eq!(config.appearance_poll_interval, Duration::from_millis(250));
        assert_eq!(config.default_theme, ThemeMode::Light);
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let config = AdminConfig::from_lookup(lookup(&[
            (TIMEOUT_ENV, "soon"),
            (APPEARANCE_POLL_ENV, "0"),
            (DEFAULT_THEME_ENV, "sepia"),
            (API_URL_ENV, "   "),
        ]));

        assert_eq!(config, AdminConfig::default());
    }

    #[test]
    #[serial]
    fn test_from_env_reads_process_environment() {
        std::env::set_var(API_URL_ENV, "http://env.example:4000");
        let config = AdminConfig::from_env();
        std::env::remove_var(API_URL_ENV);

        assert_eq!(config.api_base_url, "http://env.example:4000");
    }
}
