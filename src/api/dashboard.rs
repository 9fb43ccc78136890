//! Read-only dashboard endpoints.
//!
//! Fetch failures are returned to the caller as errors. Nothing here
//! substitutes placeholder data.

use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use super::endpoints;
use crate::error::ApiError;

/// Overview counters shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_messages: u64,
    pub total_revenue: f64,
    pub active_users: u64,
    pub pending_messages: u64,
    pub system_alerts: u64,
    /// Percent, e.g. `12.5`.
    pub growth_rate: f64,
    pub monthly_revenue: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// GET the dashboard counters. Requires an authenticated session.
pub async fn fetch_dashboard_stats(api: &ApiClient) -> Result<DashboardStats, ApiError> {
    api.get_json(endpoints::DASHBOARD_STATS).await
}

/// GET the public app settings. The shape is owned by the backend, so it
/// is returned as raw JSON.
pub async fn fetch_app_settings(api: &ApiClient) -> Result<serde_json::Value, ApiError> {
    api.get_json(endpoints::APP_SETTINGS).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use std::sync::Arc;

    #[test]
    fn test_stats_wire_format() {
        let stats: DashboardStats = serde_json::from_value(serde_json::json!({
            "totalUsers": 1247,
            "totalMessages": 15680,
            "totalRevenue": 234560,
            "activeUsers": 892,
            "pendingMessages": 23,
            "systemAlerts": 3,
            "growthRate": 12.5,
            "monthlyRevenue": 45670,
            "currency": "RWF"
        }))
        .unwrap();

        assert_eq!(stats.total_users, 1247);
        assert_eq!(stats.growth_rate, 12.5);
        assert_eq!(stats.currency.as_deref(), Some("RWF"));
    }

    #[test]
    fn test_currency_optional() {
        let stats: DashboardStats = serde_json::from_value(serde_json::json!({
            "totalUsers": 1, "totalMessages": 2, "totalRevenue": 3.0,
            "activeUsers": 1, "pendingMessages": 0, "systemAlerts": 0,
            "growthRate": 0.0, "monthlyRevenue": 3.0
        }))
        .unwrap();
        assert!(stats.currency.is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_surfaced() {
        let mock = MockHttpClient::new();
        mock.set_response(
            endpoints::DASHBOARD_STATS,
            MockResponse::json(500, serde_json::json!({"error": "db down"})),
        );
        let api = ApiClient::new("http://localhost:4000", Arc::new(mock));

        let err = fetch_dashboard_stats(&api).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_fetch_app_settings() {
        let mock = MockHttpClient::new();
        mock.set_response(
            endpoints::APP_SETTINGS,
            MockResponse::json(200, serde_json::json!({"appName": "BulkSMS"})),
        );
        let api = ApiClient::new("http://localhost:4000", Arc::new(mock));

        let settings = fetch_app_settings(&api).await.unwrap();
        assert_eq!(settings["appName"], "BulkSMS");
    }
}
