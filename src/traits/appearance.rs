//! OS appearance trait for dependency injection.
//!
//! Lets the theme resolver follow the desktop light/dark preference in
//! production and a controllable fake in tests.

use crate::theme::ResolvedTheme;

/// Source of the operating system's preferred color scheme.
///
/// Implementations must be thread-safe (Send + Sync) so the resolver's
/// watcher task can poll them.
pub trait AppearanceSource: Send + Sync {
    /// Read the current preference.
    ///
    /// Returns None if the preference can't be determined; callers treat
    /// that as light.
    fn detect(&self) -> Option<ResolvedTheme>;

    /// Current preference with the light fallback applied.
    fn current(&self) -> ResolvedTheme {
        self.detect().unwrap_or(ResolvedTheme::Light)
    }
}
