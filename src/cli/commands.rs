//! Command handlers.
//!
//! Each handler writes its user-facing output to `out` so tests can
//! capture it; diagnostics go through `tracing`.

use color_eyre::eyre::{bail, eyre};
use color_eyre::Result;
use std::io::Write;
use std::sync::Arc;

use super::args::ThemeAction;
use crate::adapters::{FileStore, ReqwestHttpClient, SystemAppearance};
use crate::api::{fetch_dashboard_stats, ApiClient};
use crate::config::AdminConfig;
use crate::session::{normalize_email, AdminUser, SessionManager};
use crate::theme::ThemeResolver;
use crate::traits::{AppearanceSource, HttpClient, KeyValueStore};

/// The session and theme containers a command runs against.
#[derive(Debug)]
pub struct AdminContext {
    pub api: ApiClient,
    pub session: SessionManager,
    pub theme: ThemeResolver,
}

impl AdminContext {
    /// Production wiring: reqwest transport, `storage.json` in the data
    /// directory, desktop appearance.
    pub fn from_config(config: &AdminConfig) -> Self {
        Self::with_parts(
            config,
            Arc::new(ReqwestHttpClient::with_timeout(config.request_timeout)),
            Arc::new(FileStore::new(&config.data_dir)),
            Arc::new(SystemAppearance::new()),
        )
    }

    /// Wire the containers over injected adapters.
    pub fn with_parts(
        config: &AdminConfig,
        http: Arc<dyn HttpClient>,
        store: Arc<dyn KeyValueStore>,
        appearance: Arc<dyn AppearanceSource>,
    ) -> Self {
        let api = ApiClient::new(config.api_base_url.clone(), http);
        let session = SessionManager::new(api.clone(), Arc::clone(&store));
        let theme = ThemeResolver::with_default_mode(store, appearance, config.default_theme)
            .with_poll_interval(config.appearance_poll_interval);

        Self {
            api,
            session,
            theme,
        }
    }
}

fn describe(user: &AdminUser) -> String {
    format!("{} <{}> ({})", user.name, user.email, user.role)
}

/// `login <email>` with an already-collected password.
pub async fn login(
    ctx: &AdminContext,
    email: &str,
    password: &str,
    out: &mut impl Write,
) -> Result<()> {
    let email = normalize_email(email);
    match ctx.session.login(&email, password).await {
        Ok(user) => {
            writeln!(out, "Signed in as {}", describe(&user))?;
            Ok(())
        }
        Err(e) => {
            tracing::debug!(code = e.error_code(), category = %e.category(), "Login failed");
            Err(eyre!(e.user_message()))
        }
    }
}

pub fn logout(ctx: &AdminContext, out: &mut impl Write) -> Result<()> {
    ctx.session.logout();
    writeln!(out, "Signed out")?;
    Ok(())
}

pub async fn whoami(ctx: &AdminContext, out: &mut impl Write) -> Result<()> {
    ctx.session.verify().await;
    match ctx.session.user() {
        Some(user) => writeln!(out, "{}", describe(&user))?,
        None => writeln!(out, "Not signed in")?,
    }
    Ok(())
}

pub async fn status(ctx: &AdminContext, out: &mut impl Write) -> Result<()> {
    ctx.session.verify().await;
    let state = ctx.session.snapshot();

    writeln!(out, "session: {}", state.phase().as_str())?;
    if let Some(user) = &state.user {
        writeln!(out, "user:    {}", describe(user))?;
    }
    writeln!(out, "api:     {}", ctx.api.base_url())?;
    writeln!(
        out,
        "theme:   {} (resolved {})",
        ctx.theme.mode(),
        ctx.theme.resolved()
    )?;
    Ok(())
}

pub fn theme(ctx: &AdminContext, action: ThemeAction, out: &mut impl Write) -> Result<()> {
    match action {
        ThemeAction::Show => {}
        ThemeAction::Set(mode) => ctx.theme.set_mode(mode),
        ThemeAction::Toggle => {
            ctx.theme.toggle_mode();
        }
        ThemeAction::Watch => bail!("`theme watch` runs through watch_theme"),
    }
    writeln!(
        out,
        "theme: {} (resolved {})",
        ctx.theme.mode(),
        ctx.theme.resolved()
    )?;
    Ok(())
}

/// Print the resolved theme, then every change, until `shutdown` resolves.
pub async fn watch_theme<F>(ctx: &AdminContext, shutdown: F, out: &mut impl Write) -> Result<()>
where
    F: std::future::Future<Output = ()>,
{
    let mut rx = ctx.theme.subscribe();
    ctx.theme.start();
    writeln!(out, "theme: {} (resolved {})", ctx.theme.mode(), ctx.theme.resolved())?;
    out.flush()?;

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *rx.borrow_and_update();
                writeln!(out, "theme: {} (resolved {})", state.mode, state.resolved)?;
                out.flush()?;
            }
            _ = &mut shutdown => break,
        }
    }

    ctx.theme.stop();
    Ok(())
}

/// Resolve when `signal` fires. A signal listener that fails to install is
/// logged and never resolves, so the caller keeps running until killed.
pub async fn wait_for_interrupt<F>(signal: F)
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Restore the session and print the dashboard counters as JSON.
pub async fn stats(ctx: &AdminContext, out: &mut impl Write) -> Result<()> {
    ctx.session.verify().await;
    if ctx.session.user().is_none() {
        bail!("Not signed in. Run `smsadmin login <email>` first.");
    }

    let stats = fetch_dashboard_stats(&ctx.api).await.map_err(|e| {
        if e.is_unauthorized() {
            eyre!("Session expired. Please sign in again.")
        } else {
            eyre!("{} ({})", e, e.category().recovery_hint())
        }
    })?;

    writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryStore, MockAppearance, MockHttpClient, MockResponse};
    use crate::api::endpoints;
    use crate::session::TOKEN_KEY;
    use crate::theme::{ResolvedTheme, ThemeMode, THEME_KEY};

    fn user_json() -> serde_json::Value {
        serde_json::json!({
            "id": "1",
            "email": "admin@bulksms.com",
            "name": "Admin",
            "role": "admin"
        })
    }

    fn context(store: &InMemoryStore) -> (AdminContext, MockHttpClient) {
        let mock = MockHttpClient::new();
        let ctx = AdminContext::with_parts(
            &AdminConfig::default(),
            Arc::new(mock.clone()),
            Arc::new(store.clone()),
            Arc::new(MockAppearance::with_preference(ResolvedTheme::Dark)),
        );
        (ctx, mock)
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn test_login_normalizes_email_and_prints_user() {
        let store = InMemoryStore::new();
        let (ctx, mock) = context(&store);
        mock.set_response(
            endpoints::LOGIN,
            MockResponse::json(200, serde_json::json!({"token": "t1", "user": user_json()})),
        );

        let mut out = Vec::new();
        login(&ctx, " Admin@Bulksms.com ", "admin123", &mut out).await.unwrap();

        assert_eq!(output(out), "Signed in as Admin <admin@bulksms.com> (admin)\n");
        let body = mock.last_request().unwrap().body.unwrap();
        assert!(body.contains("\"admin@bulksms.com\""));
        assert_eq!(store.peek(TOKEN_KEY), Some("t1".to_string()));
    }

    #[tokio::test]
    async fn test_login_failure_reports_user_message() {
        let store = InMemoryStore::new();
        let (ctx, mock) = context(&store);
        mock.set_response(
            endpoints::LOGIN,
            MockResponse::json(401, serde_json::json!({"error": "Invalid email or password"})),
        );

        let err = login(&ctx, "admin@bulksms.com", "nope", &mut Vec::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");
    }

    #[tokio::test]
    async fn test_whoami_without_session() {
        let (ctx, _) = context(&InMemoryStore::new());
        let mut out = Vec::new();
        whoami(&ctx, &mut out).await.unwrap();
        assert_eq!(output(out), "Not signed in\n");
    }

    #[tokio::test]
    async fn test_status_reports_phase_and_theme() {
        let store = InMemoryStore::with_entries([(TOKEN_KEY, "abc")]);
        let (ctx, mock) = context(&store);
        mock.set_response(
            endpoints::VERIFY,
            MockResponse::json(200, serde_json::json!({"user": user_json()})),
        );

        let mut out = Vec::new();
        status(&ctx, &mut out).await.unwrap();
        let text = output(out);
        assert!(text.contains("session: authenticated"));
        assert!(text.contains("theme:   system (resolved dark)"));
    }

    #[test]
    fn test_theme_toggle_from_system() {
        let store = InMemoryStore::new();
        let (ctx, _) = context(&store);

        let mut out = Vec::new();
        theme(&ctx, ThemeAction::Toggle, &mut out).unwrap();
        assert_eq!(output(out), "theme: light (resolved light)\n");
        assert_eq!(store.peek(THEME_KEY), Some("light".to_string()));

        theme(&ctx, ThemeAction::Set(ThemeMode::System), &mut Vec::new()).unwrap();
        assert!(!store.contains(THEME_KEY));
    }

    #[tokio::test]
    async fn test_watch_theme_prints_os_changes() {
        let os = MockAppearance::with_preference(ResolvedTheme::Light);
        let config = AdminConfig::default()
            .with_appearance_poll_interval(std::time::Duration::from_millis(10));
        let ctx = AdminContext::with_parts(
            &config,
            Arc::new(MockHttpClient::new()),
            Arc::new(InMemoryStore::new()),
            Arc::new(os.clone()),
        );

        let mut rx = ctx.theme.subscribe();
        let flip = async {
            os.set_preference(Some(ResolvedTheme::Dark));
            let _ = rx.wait_for(|s| s.resolved == ResolvedTheme::Dark).await;
        };

        let mut out = Vec::new();
        watch_theme(&ctx, flip, &mut out).await.unwrap();

        let text = output(out);
        assert!(text.starts_with("theme: system (resolved light)\n"));
        assert!(!ctx.theme.is_running());
    }

    #[tokio::test]
    async fn test_wait_for_interrupt_resolves_on_signal() {
        let waited = tokio::time::timeout(
            std::time::Duration::from_millis(500),
            wait_for_interrupt(async { Ok(()) }),
        )
        .await;
        assert!(waited.is_ok());
    }

    #[tokio::test]
    async fn test_wait_for_interrupt_keeps_waiting_when_listener_fails() {
        let failed = async { Err(std::io::Error::new(std::io::ErrorKind::Other, "no signal handler")) };
        let waited =
            tokio::time::timeout(std::time::Duration::from_millis(50), wait_for_interrupt(failed))
                .await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn test_stats_requires_session() {
        let (ctx, mock) = context(&InMemoryStore::new());
        let err = stats(&ctx, &mut Vec::new()).await.unwrap_err();
        assert!(err.to_string().contains("Not signed in"));
        assert!(mock.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_stats_prints_json_with_bearer() {
        let store = InMemoryStore::with_entries([(TOKEN_KEY, "abc")]);
        let (ctx, mock) = context(&store);
        mock.set_response(
            endpoints::VERIFY,
            MockResponse::json(200, serde_json::json!({"user": user_json()})),
        );
        mock.set_response(
            endpoints::DASHBOARD_STATS,
            MockResponse::json(
                200,
                serde_json::json!({
                    "totalUsers": 10, "totalMessages": 20, "totalRevenue": 30.0,
                    "activeUsers": 5, "pendingMessages": 1, "systemAlerts": 0,
                    "growthRate": 2.5, "monthlyRevenue": 12.0
                }),
            ),
        );

        let mut out = Vec::new();
        stats(&ctx, &mut out).await.unwrap();
        assert!(output(out).contains("\"totalUsers\": 10"));
        assert_eq!(mock.last_request().unwrap().authorization(), Some("Bearer abc"));
    }
}
