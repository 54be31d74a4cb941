//! User gateway: authentication and the `/api/users` endpoint family.

use async_trait::async_trait;
use serde::Serialize;
use validator::Validate;

use taskdeck_core::user::{Role, User};

use crate::envelope::{ApiEnvelope, AuthSession, LoginEnvelope};
use crate::error::GatewayError;
use crate::http::ApiClient;

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Payload for `POST /api/users` (admin only on the server side).
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Partial payload for `PUT /api/users/{id}`. `None` fields are omitted
/// and left untouched by the server.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

// ---------------------------------------------------------------------------
// UserApi
// ---------------------------------------------------------------------------

/// Authentication and user directory operations.
#[async_trait]
pub trait UserApi: Send + Sync {
    /// `POST /api/auth/login`: exchange credentials for a token and profile.
    ///
    /// Bad credentials come back as [`GatewayError::Rejected`] or
    /// [`GatewayError::Unauthorized`] depending on how the server answers;
    /// neither means an existing session expired.
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, GatewayError>;

    /// `GET /api/users`: the user directory (for assignee pickers).
    async fn list_users(&self, token: &str) -> Result<Vec<User>, GatewayError>;

    /// `POST /api/users`.
    async fn create_user(&self, token: &str, input: &CreateUser) -> Result<User, GatewayError>;

    /// `PUT /api/users/{id}`.
    async fn update_user(
        &self,
        token: &str,
        id: &str,
        changes: &UpdateUser,
    ) -> Result<User, GatewayError>;

    /// `DELETE /api/users/{id}`.
    async fn delete_user(&self, token: &str, id: &str) -> Result<(), GatewayError>;
}

// ---------------------------------------------------------------------------
// UserGateway
// ---------------------------------------------------------------------------

/// [`UserApi`] implementation against the live REST backend.
#[derive(Debug, Clone)]
pub struct UserGateway {
    api: ApiClient,
}

impl UserGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl UserApi for UserGateway {
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, GatewayError> {
        let body = LoginRequest { email, password };
        self.api
            .post::<_, LoginEnvelope>("/api/auth/login", &body, None)
            .await?
            .into_session()
    }

    async fn list_users(&self, token: &str) -> Result<Vec<User>, GatewayError> {
        self.api
            .get::<ApiEnvelope<Vec<User>>>("/api/users", Some(token))
            .await?
            .into_data()
    }

    async fn create_user(&self, token: &str, input: &CreateUser) -> Result<User, GatewayError> {
        self.api
            .post::<_, ApiEnvelope<User>>("/api/users", input, Some(token))
            .await?
            .into_data()
    }

    async fn update_user(
        &self,
        token: &str,
        id: &str,
        changes: &UpdateUser,
    ) -> Result<User, GatewayError> {
        self.api
            .put::<_, ApiEnvelope<User>>(&format!("/api/users/{id}"), changes, Some(token))
            .await?
            .into_data()
    }

    async fn delete_user(&self, token: &str, id: &str) -> Result<(), GatewayError> {
        self.api
            .delete::<ApiEnvelope<serde_json::Value>>(&format!("/api/users/{id}"), Some(token))
            .await?
            .into_ack()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input() -> CreateUser {
        CreateUser {
            name: "Ana Lima".into(),
            email: "ana@example.com".into(),
            password: "hunter2hunter2".into(),
            role: Role::Developer,
            department: None,
            position: None,
            phone: None,
        }
    }

    #[test]
    fn valid_user_input_passes_validation() {
        assert!(create_input().validate().is_ok());
    }

    #[test]
    fn short_password_fails_validation() {
        let mut input = create_input();
        input.password = "short".into();
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn malformed_email_fails_validation() {
        let mut input = create_input();
        input.email = "ana-at-example".into();
        assert!(input.validate().is_err());
    }

    #[test]
    fn update_user_omits_unset_fields() {
        let changes = UpdateUser {
            role: Some(Role::Manager),
            ..UpdateUser::default()
        };
        let value = serde_json::to_value(&changes).unwrap();
        assert_eq!(value, serde_json::json!({"role": "manager"}));
    }
}
