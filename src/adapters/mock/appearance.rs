//! Controllable appearance source for testing.

use std::sync::{Arc, Mutex};

use crate::theme::ResolvedTheme;
use crate::traits::AppearanceSource;

/// Mock [`AppearanceSource`].
///
/// Clones share state, so a test can hand one clone to the resolver and
/// flip the "OS preference" through the other.
#[derive(Debug, Clone, Default)]
pub struct MockAppearance {
    preference: Arc<Mutex<Option<ResolvedTheme>>>,
}

impl MockAppearance {
    /// Source that can't determine a preference.
    pub fn new() -> Self {
        Self::default()
    }

    /// Source reporting `theme`.
    pub fn with_preference(theme: ResolvedTheme) -> Self {
        Self {
            preference: Arc::new(Mutex::new(Some(theme))),
        }
    }

    /// Change the reported preference (simulates the user flipping the OS setting).
    pub fn set_preference(&self, theme: Option<ResolvedTheme>) {
        *self.preference.lock().unwrap() = theme;
    }
}

impl AppearanceSource for MockAppearance {
    fn detect(&self) -> Option<ResolvedTheme> {
        *self.preference.lock().unwrap()
    }
}
