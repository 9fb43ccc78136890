//! Theme resolver: explicit choice or OS preference.
//!
//! The OS has no portable change notification, so while started the
//! resolver polls its [`AppearanceSource`] and republishes the resolved
//! theme whenever the preference flips and the mode is `system`.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::mode::{ResolvedTheme, ThemeMode, ThemeState};
use crate::traits::{AppearanceSource, KeyValueStore};

/// Storage key holding an explicit `light`/`dark` choice. Absent means system.
pub const THEME_KEY: &str = "theme";

/// How often the watcher reads the OS preference.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Owns the theme preference and publishes the resolved theme.
///
/// The resolved theme is computed during construction, so the first
/// snapshot is already correct. Call [`start`](Self::start) to follow OS
/// changes and [`stop`](Self::stop) (or drop the resolver) to release the
/// watcher.
///
/// Reading the OS preference may spawn a process (`defaults`, `gsettings`)
/// and block. While the watcher runs, [`resolved`](Self::resolved),
/// [`set_mode`](Self::set_mode) and [`toggle_mode`](Self::toggle_mode) use
/// the preference from its last poll instead; when it is stopped they read
/// the OS synchronously.
pub struct ThemeResolver {
    store: Arc<dyn KeyValueStore>,
    appearance: Arc<dyn AppearanceSource>,
    state: Arc<watch::Sender<ThemeState>>,
    last_os: Arc<Mutex<ResolvedTheme>>,
    poll_interval: Duration,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl ThemeResolver {
    /// Resolver whose default mode (when nothing is stored) is `system`.
    pub fn new(store: Arc<dyn KeyValueStore>, appearance: Arc<dyn AppearanceSource>) -> Self {
        Self::with_default_mode(store, appearance, ThemeMode::System)
    }

    /// Resolver that falls back to `default_mode` when no valid preference
    /// is stored.
    pub fn with_default_mode(
        store: Arc<dyn KeyValueStore>,
        appearance: Arc<dyn AppearanceSource>,
        default_mode: ThemeMode,
    ) -> Self {
        let mode = load_mode(store.as_ref(), default_mode);
        let os_preference = appearance.current();
        let resolved = mode.resolve(os_preference);
        debug!("Initial theme: mode={} resolved={}", mode, resolved);

        let (state, _) = watch::channel(ThemeState { mode, resolved });
        Self {
            store,
            appearance,
            state: Arc::new(state),
            last_os: Arc::new(Mutex::new(os_preference)),
            poll_interval: DEFAULT_POLL_INTERVAL,
            watcher: Mutex::new(None),
        }
    }

    /// Set the watcher's polling interval. Takes effect on the next `start()`.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemeState> {
        self.state.subscribe()
    }

    /// Last published state, without reading the OS.
    pub fn snapshot(&self) -> ThemeState {
        *self.state.borrow()
    }

    pub fn mode(&self) -> ThemeMode {
        self.state.borrow().mode
    }

    /// OS preference: the watcher's last poll while it runs, otherwise a
    /// synchronous read.
    fn os_preference(&self) -> ResolvedTheme {
        if self.is_running() {
            return *self.last_os.lock().unwrap_or_else(|e| e.into_inner());
        }
        let preference = self.appearance.current();
        *self.last_os.lock().unwrap_or_else(|e| e.into_inner()) = preference;
        preference
    }

    /// Resolved theme as of now. In `system` mode this takes the current
    /// OS preference and publishes it if the state has not caught up yet.
    pub fn resolved(&self) -> ResolvedTheme {
        if self.mode().is_system() {
            let preference = self.os_preference();
            self.state
                .send_if_modified(|s| apply_preference(s, preference));
        }
        self.state.borrow().resolved
    }

    /// Change the preference and recompute the resolved theme.
    ///
    /// `system` removes the stored key; `light`/`dark` write it. Storage
    /// failures are logged and otherwise ignored.
    pub fn set_mode(&self, mode: ThemeMode) {
        self.persist(mode);

        let next = ThemeState {
            mode,
            resolved: mode.resolve(self.os_preference()),
        };
        let changed = self.state.send_if_modified(|s| {
            if *s == next {
                return false;
            }
            *s = next;
            true
        });

        if changed {
            info!("Theme set to {} (resolved {})", next.mode, next.resolved);
        }
    }

    /// Flip between light and dark. From `system`, picks the opposite of
    /// what the OS currently resolves to. Always leaves an explicit mode.
    pub fn toggle_mode(&self) -> ThemeMode {
        let next = match self.mode() {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::System => ThemeMode::from(self.os_preference().opposite()),
        };
        self.set_mode(next);
        next
    }

    fn persist(&self, mode: ThemeMode) {
        let result = match mode {
            ThemeMode::System => self.store.remove(THEME_KEY),
            explicit => self.store.set(THEME_KEY, explicit.as_str()),
        };
        if let Err(e) = result {
            warn!("Failed to persist theme preference '{}': {}", mode, e);
        }
    }

    /// Start following OS preference changes. Idempotent.
    ///
    /// Needs a running tokio runtime; without one the call logs a warning
    /// and does nothing.
    pub fn start(&self) {
        let mut watcher = self.watcher.lock().unwrap_or_else(|e| e.into_inner());
        if watcher.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No tokio runtime; theme watcher not started");
                return;
            }
        };

        *watcher = Some(runtime.spawn(watch_appearance(
            Arc::clone(&self.state),
            Arc::clone(&self.appearance),
            Arc::clone(&self.last_os),
            self.poll_interval,
        )));
    }

    /// Stop following OS changes. Idempotent.
    pub fn stop(&self) {
        let handle = self
            .watcher
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            handle.abort();
            debug!("Theme watcher stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.watcher
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for ThemeResolver {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for ThemeResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeResolver")
            .field("state", &self.snapshot())
            .field("poll_interval", &self.poll_interval)
            .field("running", &self.is_running())
            .finish()
    }
}

fn load_mode(store: &dyn KeyValueStore, default_mode: ThemeMode) -> ThemeMode {
    match store.get(THEME_KEY) {
        Ok(Some(value)) => value.parse().unwrap_or_else(|e| {
            warn!("Ignoring stored theme: {}", e);
            default_mode
        }),
        Ok(None) => default_mode,
        Err(e) => {
            warn!("Failed to read stored theme: {}", e);
            default_mode
        }
    }
}

/// Apply an OS preference to the state. Only `system` mode follows it.
fn apply_preference(state: &mut ThemeState, preference: ResolvedTheme) -> bool {
    if state.mode.is_system() && state.resolved != preference {
        state.resolved = preference;
        true
    } else {
        false
    }
}

async fn watch_appearance(
    state: Arc<watch::Sender<ThemeState>>,
    appearance: Arc<dyn AppearanceSource>,
    last_os: Arc<Mutex<ResolvedTheme>>,
    poll_interval: Duration,
) {
    debug!("Theme watcher started (interval: {:?})", poll_interval);

    let mut interval = tokio::time::interval(poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        // Detection may shell out, keep it off the async workers.
        let source = Arc::clone(&appearance);
        let preference = match tokio::task::spawn_blocking(move || source.current()).await {
            Ok(preference) => preference,
            Err(e) => {
                debug!("Appearance probe failed: {}", e);
                continue;
            }
        };

        *last_os.lock().unwrap_or_else(|e| e.into_inner()) = preference;

        if state.send_if_modified(|s| apply_preference(s, preference)) {
            info!("OS appearance changed, theme resolved to {}", preference);
        } else {
            tracing::trace!("OS appearance unchanged");
        }
    }
}
