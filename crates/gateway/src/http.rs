//! Shared HTTP plumbing for the REST gateways.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::GatewayError;

/// Timeout applied to every gateway request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Clamp for raw-body excerpts quoted in error messages.
const BODY_EXCERPT_LEN: usize = 200;

/// One backend instance: a pooled [`reqwest::Client`] plus the API base URL.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the backend at `base_url`.
    ///
    /// Trailing slashes are trimmed so request paths can always start
    /// with `/`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    /// Create a client with an explicit per-request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self::with_client(http, base_url)
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// The configured API base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Request helpers
    // -----------------------------------------------------------------------

    pub(crate) async fn get<T>(&self, path: &str, token: Option<&str>) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let request = authorize(self.http.get(self.url(path)), token);
        send(request).await
    }

    pub(crate) async fn post<B, T>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = authorize(self.http.post(self.url(path)).json(body), token);
        send(request).await
    }

    pub(crate) async fn put<B, T>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = authorize(self.http.put(self.url(path)).json(body), token);
        send(request).await
    }

    pub(crate) async fn delete<T>(&self, path: &str, token: Option<&str>) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let request = authorize(self.http.delete(self.url(path)), token);
        send(request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn authorize(request: reqwest::RequestBuilder, token: Option<&str>) -> reqwest::RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// Send the request, classify non-2xx statuses, and decode the JSON body.
///
/// The body is read as text first so decode failures can quote what the
/// server actually sent.
async fn send<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, GatewayError> {
    let response = request.send().await?;
    let status = response.status().as_u16();
    let body = response.text().await?;

    if let Some(err) = classify_status(status, &body) {
        return Err(err);
    }

    serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))
}

// ---------------------------------------------------------------------------
// Status classification
// ---------------------------------------------------------------------------

/// Map a non-2xx status to its [`GatewayError`], extracting the server's
/// message from the body. Returns `None` for successful statuses.
pub(crate) fn classify_status(status: u16, body: &str) -> Option<GatewayError> {
    match status {
        200..=299 => None,
        401 => Some(GatewayError::Unauthorized),
        403 => Some(GatewayError::Forbidden(error_message(body))),
        404 => Some(GatewayError::NotFound(error_message(body))),
        400 | 422 => Some(GatewayError::Validation(error_message(body))),
        _ => Some(GatewayError::Api {
            status,
            message: error_message(body),
        }),
    }
}

/// Pull `message` or `msg` out of a JSON error body, falling back to a
/// truncated excerpt of the raw text.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "msg"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    trimmed.chars().take(BODY_EXCERPT_LEN).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
