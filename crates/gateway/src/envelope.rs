//! Response envelopes the backend wraps every payload in.
//!
//! Task and user endpoints answer with `{success, message, data}`; the
//! login endpoint has its own `{error, msg, result}` shape. Both are
//! unwrapped here so the rest of the crate only sees domain types.

use serde::Deserialize;

use taskdeck_core::user::User;

use crate::error::GatewayError;

// ---------------------------------------------------------------------------
// Standard envelope
// ---------------------------------------------------------------------------

/// The `{success, message, data}` wrapper on task and user endpoints.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, turning `success = false` into a rejection.
    ///
    /// A successful envelope with no `data` is a decode error: the server
    /// promised a payload and did not deliver one.
    pub fn into_data(self) -> Result<T, GatewayError> {
        if !self.success {
            return Err(GatewayError::Rejected(self.message_or_default()));
        }
        self.data
            .ok_or_else(|| GatewayError::Decode("envelope carried no data".into()))
    }

    /// Accept an envelope whose payload the caller does not need (deletes).
    pub fn into_ack(self) -> Result<(), GatewayError> {
        if !self.success {
            return Err(GatewayError::Rejected(self.message_or_default()));
        }
        Ok(())
    }

    fn message_or_default(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "Request failed".to_string())
    }
}

// ---------------------------------------------------------------------------
// Login envelope
// ---------------------------------------------------------------------------

/// The login endpoint's `{error, msg, result}` wrapper.
#[derive(Debug, Deserialize)]
pub struct LoginEnvelope {
    pub error: bool,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub result: Option<AuthSession>,
}

/// Token and profile returned by a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

impl LoginEnvelope {
    /// Unwrap the session, turning `error = true` into a rejection.
    pub fn into_session(self) -> Result<AuthSession, GatewayError> {
        if self.error {
            return Err(GatewayError::Rejected(
                self.msg.unwrap_or_else(|| "Login failed".to_string()),
            ));
        }
        self.result
            .ok_or_else(|| GatewayError::Decode("login response carried no result".into()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
