//! API client for the admin backend.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::interceptor::InterceptorChain;
use crate::error::ApiError;
use crate::traits::{Headers, HttpClient, HttpError, Response};

/// Error body shape returned by the backend: `{ "error": ... }` or
/// `{ "message": ... }`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Extract the backend's `error` (preferred) or `message` text from a
/// response body.
pub fn backend_message(response: &Response) -> Option<String> {
    let body: ErrorBody = response.json().ok()?;
    body.error
        .or(body.message)
        .filter(|m| !m.trim().is_empty())
}

/// Client for the admin backend.
///
/// Every request runs the shared [`InterceptorChain`] before call-site
/// headers are merged, so call-site headers win on conflict. Clones share
/// the HTTP client and the chain.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
    interceptors: Arc<InterceptorChain>,
}

impl ApiClient {
    /// Create a client for `base_url` (trailing slashes are ignored).
    pub fn new(base_url: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http,
            interceptors: Arc::new(InterceptorChain::new()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The interceptor chain shared by all clones of this client.
    pub fn interceptors(&self) -> &InterceptorChain {
        &self.interceptors
    }

    /// Absolute URL for an endpoint path.
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    fn build_headers(&self, extra: &Headers) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        self.interceptors.apply(&mut headers);
        // Header names are case-insensitive on the wire.
        for (name, value) in extra {
            headers.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
            headers.insert(name.clone(), value.clone());
        }
        headers
    }

    /// GET an endpoint. Non-2xx statuses are returned as `Ok`.
    pub async fn get(&self, endpoint: &str, headers: &Headers) -> Result<Response, HttpError> {
        let url = self.url(endpoint);
        tracing::debug!("GET {}", url);
        self.http.get(&url, &self.build_headers(headers)).await
    }

    /// POST a JSON body to an endpoint. Non-2xx statuses are returned as `Ok`.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        headers: &Headers,
    ) -> Result<Response, ApiError> {
        let payload = serde_json::to_string(body).map_err(|e| ApiError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;

        let url = self.url(endpoint);
        tracing::debug!("POST {}", url);
        Ok(self
            .http
            .post(&url, &payload, &self.build_headers(headers))
            .await?)
    }

    /// GET an endpoint and decode a 2xx JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let response = self.get(endpoint, &Headers::new()).await?;

        if !response.is_success() {
            let message = backend_message(&response)
                .unwrap_or_else(|| format!("HTTP {}", response.status));
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: response.status,
                message,
            });
        }

        response.json().map_err(|e| ApiError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("interceptors", &self.interceptors)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::api::interceptor::{BearerAuth, AUTHORIZATION};
    use bytes::Bytes;

    fn client_with(mock: &MockHttpClient) -> ApiClient {
        ApiClient::new("http://localhost:4000/", Arc::new(mock.clone()))
    }

    #[test]
    fn test_url_joining() {
        let client = client_with(&MockHttpClient::new());
        assert_eq!(client.base_url(), "http://localhost:4000");
        assert_eq!(
            client.url("/api/auth/admin/login"),
            "http://localhost:4000/api/auth/admin/login"
        );
        assert_eq!(client.url("health"), "http://localhost:4000/health");
    }

    #[test]
    fn test_backend_message_prefers_error_field() {
        let response = Response::json_body(
            401,
            &serde_json::json!({"error": "Invalid email or password", "message": "other"}),
        );
        assert_eq!(
            backend_message(&response),
            Some("Invalid email or password".to_string())
        );

        let response = Response::json_body(400, &serde_json::json!({"message": "Email required"}));
        assert_eq!(backend_message(&response), Some("Email required".to_string()));

        let response = Response::new(500, Bytes::from("<html>oops</html>"));
        assert_eq!(backend_message(&response), None);

        let response = Response::json_body(500, &serde_json::json!({"error": ""}));
        assert_eq!(backend_message(&response), None);
    }

    #[tokio::test]
    async fn test_interceptors_apply_to_every_request() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::json(200, serde_json::json!({})));
        let client = client_with(&mock);

        client.get("/a", &Headers::new()).await.unwrap();
        assert_eq!(mock.last_request().unwrap().authorization(), None);

        let id = client
            .interceptors()
            .register(Arc::new(BearerAuth::new("t1")));
        client.get("/b", &Headers::new()).await.unwrap();
        client
            .post_json("/c", &serde_json::json!({"x": 1}), &Headers::new())
            .await
            .unwrap();
        for request in &mock.get_requests()[1..] {
            assert_eq!(request.authorization(), Some("Bearer t1"));
        }

        client.interceptors().deregister(id);
        client.get("/d", &Headers::new()).await.unwrap();
        assert_eq!(mock.last_request().unwrap().authorization(), None);
    }

    #[tokio::test]
    async fn test_clones_share_interceptors() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::json(200, serde_json::json!({})));
        let client = client_with(&mock);
        let view_client = client.clone();

        client
            .interceptors()
            .register(Arc::new(BearerAuth::new("shared")));
        view_client.get("/x", &Headers::new()).await.unwrap();

        assert_eq!(
            mock.last_request().unwrap().authorization(),
            Some("Bearer shared")
        );
    }

    #[tokio::test]
    async fn test_call_site_headers_win() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::json(200, serde_json::json!({})));
        let client = client_with(&mock);
        client
            .interceptors()
            .register(Arc::new(BearerAuth::new("default")));

        let mut headers = Headers::new();
        headers.insert(AUTHORIZATION.to_string(), "Bearer explicit".to_string());
        client.get("/x", &headers).await.unwrap();

        let request = mock.last_request().unwrap();
        assert_eq!(request.authorization(), Some("Bearer explicit"));
        assert_eq!(
            request.headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
    }

    #[tokio::test]
    async fn test_call_site_header_overrides_regardless_of_case() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::json(200, serde_json::json!({})));
        let client = client_with(&mock);
        client
            .interceptors()
            .register(Arc::new(BearerAuth::new("default")));

        let mut headers = Headers::new();
        headers.insert("authorization".to_string(), "Bearer explicit".to_string());
        headers.insert("content-type".to_string(), "text/plain".to_string());
        client.get("/x", &headers).await.unwrap();

        let request = mock.last_request().unwrap();
        let auth: Vec<_> = request
            .headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(AUTHORIZATION))
            .collect();
        assert_eq!(auth.len(), 1);
        assert_eq!(auth[0].1, "Bearer explicit");
        assert_eq!(request.headers.len(), 2);
        assert_eq!(
            request.headers.get("content-type"),
            Some(&"text/plain".to_string())
        );
    }

    #[tokio::test]
    async fn test_get_json_status_error() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "/api/auth/admin/dashboard-stats",
            MockResponse::json(403, serde_json::json!({"message": "Forbidden"})),
        );
        let client = client_with(&mock);

        let err = client
            .get_json::<serde_json::Value>("/api/auth/admin/dashboard-stats")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert!(err.to_string().contains("Forbidden"));
    }

    #[tokio::test]
    async fn test_get_json_decode_error() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "/x",
            MockResponse::Success(Response::new(200, Bytes::from("not json"))),
        );
        let client = client_with(&mock);

        let err = client.get_json::<serde_json::Value>("/x").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_transport_error_maps_to_api_error() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "/x",
            MockResponse::Error(HttpError::ConnectionFailed("refused".to_string())),
        );
        let client = client_with(&mock);

        let err = client.get_json::<serde_json::Value>("/x").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(HttpError::ConnectionFailed(_))));
    }
}
