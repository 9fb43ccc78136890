//! Backend endpoint paths, relative to the API base URL.

/// POST `{ email, password }` → `{ token, user }`.
pub const LOGIN: &str = "/api/auth/admin/login";

/// GET with `Authorization: Bearer <token>` → `{ user }`.
pub const VERIFY: &str = "/api/auth/admin/auth/verify";

/// GET → dashboard overview counters.
pub const DASHBOARD_STATS: &str = "/api/auth/admin/dashboard-stats";

/// GET → public app settings shown on the landing page. No auth required.
pub const APP_SETTINGS: &str = "/api/auth/admin/app-settings";

/// Default API base URL when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:4000";
