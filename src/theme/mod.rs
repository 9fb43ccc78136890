//! Light/dark theme resolution.
//!
//! [`ThemeResolver`] owns the stored preference ([`ThemeMode`]) and the
//! concrete [`ResolvedTheme`] derived from it and the OS appearance.

pub mod mode;
pub mod resolver;

pub use mode::{ParseThemeModeError, ResolvedTheme, ThemeMode, ThemeState};
pub use resolver::{ThemeResolver, DEFAULT_POLL_INTERVAL, THEME_KEY};
