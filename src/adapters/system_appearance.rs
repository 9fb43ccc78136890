//! Desktop color-scheme detection.
//!
//! There is no portable change-notification API for the OS color scheme, so
//! detection is a cheap one-shot query and the theme resolver polls it.
//!
//! Detection order:
//! 1. `SMSADMIN_APPEARANCE=light|dark` override
//! 2. macOS: `defaults read -g AppleInterfaceStyle`
//! 3. Linux: `gsettings` color-scheme, then `GTK_THEME`

use std::process::{Command, Stdio};

use crate::theme::ResolvedTheme;
use crate::traits::AppearanceSource;

/// Environment variable that pins the detected appearance.
pub const APPEARANCE_ENV: &str = "SMSADMIN_APPEARANCE";

/// Production [`AppearanceSource`] that asks the desktop environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAppearance;

impl SystemAppearance {
    pub fn new() -> Self {
        Self
    }
}

impl AppearanceSource for SystemAppearance {
    fn detect(&self) -> Option<ResolvedTheme> {
        if let Some(theme) = from_env_override() {
            return Some(theme);
        }
        detect_platform()
    }
}

fn from_env_override() -> Option<ResolvedTheme> {
    let value = std::env::var(APPEARANCE_ENV).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "dark" => Some(ResolvedTheme::Dark),
        "light" => Some(ResolvedTheme::Light),
        other => {
            tracing::debug!("Ignoring unrecognized {}={:?}", APPEARANCE_ENV, other);
            None
        }
    }
}

/// Run a command and return trimmed stdout if it exited successfully.
#[cfg_attr(not(any(target_os = "macos", target_os = "linux")), allow(dead_code))]
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .ok()?;

    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(target_os = "macos")]
fn detect_platform() -> Option<ResolvedTheme> {
    // The key only exists while dark mode is on; a failing read means light.
    match command_output("defaults", &["read", "-g", "AppleInterfaceStyle"]) {
        Some(style) => Some(parse_apple_interface_style(&style)),
        None => Some(ResolvedTheme::Light),
    }
}

#[cfg(target_os = "linux")]
fn detect_platform() -> Option<ResolvedTheme> {
    if let Some(scheme) = command_output(
        "gsettings",
        &["get", "org.gnome.desktop.interface", "color-scheme"],
    ) {
        if let Some(theme) = parse_gnome_color_scheme(&scheme) {
            return Some(theme);
        }
    }

    std::env::var("GTK_THEME")
        .ok()
        .map(|theme| parse_gtk_theme(&theme))
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn detect_platform() -> Option<ResolvedTheme> {
    None
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn parse_apple_interface_style(style: &str) -> ResolvedTheme {
    if style.eq_ignore_ascii_case("dark") {
        ResolvedTheme::Dark
    } else {
        ResolvedTheme::Light
    }
}

/// `gsettings` prints quoted values like `'prefer-dark'`. `'default'` says
/// nothing about the preference, so it yields None.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_gnome_color_scheme(raw: &str) -> Option<ResolvedTheme> {
    match raw.trim().trim_matches('\'') {
        "prefer-dark" => Some(ResolvedTheme::Dark),
        "prefer-light" => Some(ResolvedTheme::Light),
        _ => None,
    }
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_gtk_theme(theme: &str) -> ResolvedTheme {
    if theme.to_ascii_lowercase().contains("dark") {
        ResolvedTheme::Dark
    } else {
        ResolvedTheme::Light
    }
}
