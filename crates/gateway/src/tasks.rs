//! Task gateway: the typed wrapper over the `/api/tasks` endpoint family.

use async_trait::async_trait;
use serde::Serialize;
use validator::Validate;

use taskdeck_core::comment::Comment;
use taskdeck_core::history::HistoryEntry;
use taskdeck_core::task::{Task, TaskKind, TaskPriority, TaskStatus};

use crate::envelope::ApiEnvelope;
use crate::error::GatewayError;
use crate::http::ApiClient;

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Payload for `POST /api/tasks`.
///
/// Validated locally before it is sent so bulk imports can report bad rows
/// without burning a round trip per failure.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// ISO-8601 timestamp or `YYYY-MM-DD`; the backend stores it verbatim.
    #[validate(length(min = 1, message = "Due date is required"))]
    pub due_date: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// Email of the assignee; the backend resolves it to a user record.
    #[validate(email(message = "Assignee must be a valid email"))]
    pub assigned_to: String,
    #[validate(length(min = 1, message = "Company is required"))]
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub task_type: TaskKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Partial payload for `PUT /api/tasks/{id}`. `None` fields are omitted
/// from the JSON body and left untouched by the server.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<TaskKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_approval: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl UpdateTask {
    /// The full editable field set of `task`, for save-the-whole-form edits.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: Some(task.title.clone()),
            description: task.description.clone(),
            due_date: Some(task.due_date.clone()),
            status: Some(task.status),
            priority: Some(task.priority),
            assigned_to: Some(task.assigned_to.email().to_string()),
            company_name: Some(task.company_name.clone()),
            brand: task.brand.clone(),
            task_type: Some(task.task_type),
            completed_approval: Some(task.completed_approval),
            tags: Some(task.tags.clone()),
        }
    }

    /// An update that only flips the status field.
    pub fn status_only(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Payload for `POST /api/tasks/{id}/comments`.
#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub content: String,
}

/// Payload for `POST /api/tasks/{id}/history`.
#[derive(Debug, Clone, Serialize)]
pub struct NewHistoryEntry {
    pub action: String,
    pub description: String,
}

// ---------------------------------------------------------------------------
// TaskApi
// ---------------------------------------------------------------------------

/// The task endpoint family as the dashboard consumes it.
///
/// Implemented by [`TaskGateway`] against the live backend and by in-memory
/// fakes in tests.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// `GET /api/tasks`: every task visible to the token's user.
    async fn list_tasks(&self, token: &str) -> Result<Vec<Task>, GatewayError>;

    /// `POST /api/tasks`: create a task and return the stored record.
    async fn create_task(&self, token: &str, input: &CreateTask) -> Result<Task, GatewayError>;

    /// `PUT /api/tasks/{id}`: apply a partial update, returning the new state.
    async fn update_task(
        &self,
        token: &str,
        id: &str,
        changes: &UpdateTask,
    ) -> Result<Task, GatewayError>;

    /// `DELETE /api/tasks/{id}`.
    async fn delete_task(&self, token: &str, id: &str) -> Result<(), GatewayError>;

    /// `GET /api/tasks/{id}/comments`, oldest first.
    async fn list_comments(&self, token: &str, task_id: &str) -> Result<Vec<Comment>, GatewayError>;

    /// `POST /api/tasks/{id}/comments`: add a comment authored by the
    /// token's user.
    async fn add_comment(
        &self,
        token: &str,
        task_id: &str,
        content: &str,
    ) -> Result<Comment, GatewayError>;

    /// `DELETE /api/tasks/{id}/comments/{commentId}`.
    async fn delete_comment(
        &self,
        token: &str,
        task_id: &str,
        comment_id: &str,
    ) -> Result<(), GatewayError>;

    /// `GET /api/tasks/{id}/history`, newest first.
    async fn list_history(
        &self,
        token: &str,
        task_id: &str,
    ) -> Result<Vec<HistoryEntry>, GatewayError>;

    /// `POST /api/tasks/{id}/history`: record an action performed by the
    /// token's user.
    async fn append_history(
        &self,
        token: &str,
        task_id: &str,
        entry: &NewHistoryEntry,
    ) -> Result<HistoryEntry, GatewayError>;
}

// ---------------------------------------------------------------------------
// TaskGateway
// ---------------------------------------------------------------------------

/// [`TaskApi`] implementation against the live REST backend.
#[derive(Debug, Clone)]
pub struct TaskGateway {
    api: ApiClient,
}

impl TaskGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl TaskApi for TaskGateway {
    async fn list_tasks(&self, token: &str) -> Result<Vec<Task>, GatewayError> {
        self.api
            .get::<ApiEnvelope<Vec<Task>>>("/api/tasks", Some(token))
            .await?
            .into_data()
    }

    async fn create_task(&self, token: &str, input: &CreateTask) -> Result<Task, GatewayError> {
        self.api
            .post::<_, ApiEnvelope<Task>>("/api/tasks", input, Some(token))
            .await?
            .into_data()
    }

    async fn update_task(
        &self,
        token: &str,
        id: &str,
        changes: &UpdateTask,
    ) -> Result<Task, GatewayError> {
        self.api
            .put::<_, ApiEnvelope<Task>>(&format!("/api/tasks/{id}"), changes, Some(token))
            .await?
            .into_data()
    }

    async fn delete_task(&self, token: &str, id: &str) -> Result<(), GatewayError> {
        self.api
            .delete::<ApiEnvelope<serde_json::Value>>(&format!("/api/tasks/{id}"), Some(token))
            .await?
            .into_ack()
    }

    async fn list_comments(&self, token: &str, task_id: &str) -> Result<Vec<Comment>, GatewayError> {
        self.api
            .get::<ApiEnvelope<Vec<Comment>>>(&format!("/api/tasks/{task_id}/comments"), Some(token))
            .await?
            .into_data()
    }

    async fn add_comment(
        &self,
        token: &str,
        task_id: &str,
        content: &str,
    ) -> Result<Comment, GatewayError> {
        let body = NewComment {
            content: content.to_string(),
        };
        self.api
            .post::<_, ApiEnvelope<Comment>>(
                &format!("/api/tasks/{task_id}/comments"),
                &body,
                Some(token),
            )
            .await?
            .into_data()
    }

    async fn delete_comment(
        &self,
        token: &str,
        task_id: &str,
        comment_id: &str,
    ) -> Result<(), GatewayError> {
        self.api
            .delete::<ApiEnvelope<serde_json::Value>>(
                &format!("/api/tasks/{task_id}/comments/{comment_id}"),
                Some(token),
            )
            .await?
            .into_ack()
    }

    async fn list_history(
        &self,
        token: &str,
        task_id: &str,
    ) -> Result<Vec<HistoryEntry>, GatewayError> {
        self.api
            .get::<ApiEnvelope<Vec<HistoryEntry>>>(
                &format!("/api/tasks/{task_id}/history"),
                Some(token),
            )
            .await?
            .into_data()
    }

    async fn append_history(
        &self,
        token: &str,
        task_id: &str,
        entry: &NewHistoryEntry,
    ) -> Result<HistoryEntry, GatewayError> {
        self.api
            .post::<_, ApiEnvelope<HistoryEntry>>(
                &format!("/api/tasks/{task_id}/history"),
                entry,
                Some(token),
            )
            .await?
            .into_data()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
