//! Typed errors for the REST gateways.

/// Errors surfaced by gateway calls.
///
/// Every non-2xx status is mapped to a variant here so callers can match
/// on what went wrong instead of inspecting status codes.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The request itself failed (connection refused, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// 401: the token is missing, expired, or revoked.
    #[error("Authentication required")]
    Unauthorized,

    /// 403: the signed-in user may not perform this operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 404: the entity does not exist on the server.
    #[error("Not found: {0}")]
    NotFound(String),

    /// 400 or 422: the server rejected the payload.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// 2xx response whose envelope carried `success = false`.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Any other non-2xx status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body was not the JSON shape we expected.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Whether this failure invalidates the whole session.
    ///
    /// Callers treat an auth failure differently from an ordinary error:
    /// the stored token is dead and the user must sign in again.
    pub fn is_auth(&self) -> bool {
        matches!(self, GatewayError::Unauthorized)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
