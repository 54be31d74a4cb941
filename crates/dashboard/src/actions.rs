//! Mutation handlers: the seam between user intent and the gateways.
//!
//! Every handler follows the same contract: advisory domain checks run
//! before any network call, the in-memory collection mirrors whatever the
//! server returned, and the outcome lands on the notification bus instead
//! of escaping as an error. A 401 anywhere clears the session.

use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use taskdeck_core::comment::Comment;
use taskdeck_core::error::CoreError;
use taskdeck_core::filter::{aggregate, TaskQuery};
use taskdeck_core::history::{self, describe_changes, HistoryEntry};
use taskdeck_core::permissions::{ensure_can_edit, ensure_can_set_approval, ensure_can_toggle};
use taskdeck_core::task::{is_external_id, Task, TaskStatus};
use taskdeck_core::user::{User, Viewer};
use taskdeck_gateway::error::GatewayError;
use taskdeck_gateway::http::ApiClient;
use taskdeck_gateway::tasks::{CreateTask, NewHistoryEntry, TaskApi, TaskGateway, UpdateTask};
use taskdeck_gateway::users::{CreateUser, UpdateUser, UserApi, UserGateway};

use crate::bulk::{validation_message, BulkFailure, BulkReport, BulkRow};
use crate::config::DashboardConfig;
use crate::notify::Notifier;
use crate::session::SessionStore;
use crate::store::TaskStore;

/// The dashboard root: session, task collection, gateways, and bus.
pub struct Dashboard {
    tasks_api: Arc<dyn TaskApi>,
    users_api: Arc<dyn UserApi>,
    session: SessionStore,
    store: TaskStore,
    notifier: Notifier,
    utc_offset_minutes: i32,
}

impl Dashboard {
    pub fn new(
        tasks_api: Arc<dyn TaskApi>,
        users_api: Arc<dyn UserApi>,
        session: SessionStore,
        notifier: Notifier,
        utc_offset_minutes: i32,
    ) -> Self {
        Self {
            tasks_api,
            users_api,
            session,
            store: TaskStore::new(),
            notifier,
            utc_offset_minutes,
        }
    }

    /// Wire up live gateways from configuration.
    pub fn from_config(config: &DashboardConfig) -> Self {
        let api = ApiClient::with_timeout(config.api_url.clone(), config.http_timeout);
        let session = match &config.session_file {
            Some(path) => SessionStore::with_file(path),
            None => SessionStore::new(),
        };
        Self::new(
            Arc::new(TaskGateway::new(api.clone())),
            Arc::new(UserGateway::new(api)),
            session,
            Notifier::new(),
            config.utc_offset_minutes,
        )
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionStore {
        &mut self.session
    }

    /// The raw native collection, in backend order.
    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.store.get(id)
    }

    pub fn viewer(&self) -> Option<Viewer> {
        self.session.viewer()
    }

    /// The aggregated view for `query`. Empty while signed out.
    pub fn visible_tasks(&self, query: &TaskQuery) -> Vec<&Task> {
        let Some(viewer) = self.session.viewer() else {
            return Vec::new();
        };
        aggregate(
            self.store.tasks(),
            &viewer,
            query,
            Utc::now(),
            self.utc_offset_minutes,
        )
    }

    // -----------------------------------------------------------------------
    // Auth
    // -----------------------------------------------------------------------

    /// Exchange credentials for a session and load the task list.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> bool {
        // 1. Exchange credentials for a token.
        let session = match self.users_api.login(email, password).await {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(email, error = %err, "login failed");
                self.notifier.error(login_message(&err));
                return false;
            }
        };

        // 2. Adopt the session.
        let name = session.user.name.clone();
        self.session.sign_in(session.token, session.user);
        self.notifier.success(format!("Welcome back, {name}"));

        // 3. Load the task list for the fresh session.
        self.refresh_tasks().await;
        true
    }

    pub fn sign_out(&mut self) {
        self.session.sign_out();
        self.store.clear();
        self.notifier.info("Signed out");
    }

    // -----------------------------------------------------------------------
    // Task reads
    // -----------------------------------------------------------------------

    /// Re-fetch the full task list. A no-op while signed out.
    pub async fn refresh_tasks(&mut self) {
        let Some(token) = self.token() else { return };
        match self.tasks_api.list_tasks(&token).await {
            Ok(tasks) => {
                tracing::debug!(count = tasks.len(), "task list refreshed");
                self.store.replace_all(tasks);
            }
            Err(err) => self.handle_failure("load tasks", err),
        }
    }

    /// Comments for a task, degrading to empty on failure so the task
    /// modal still opens without its side panel.
    pub async fn comments(&mut self, task_id: &str) -> Vec<Comment> {
        let Some(token) = self.token() else {
            return Vec::new();
        };
        match self.tasks_api.list_comments(&token, task_id).await {
            Ok(comments) => comments,
            Err(err) if err.is_auth() => {
                self.force_sign_out();
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(task = task_id, error = %err, "comment list degraded to empty");
                Vec::new()
            }
        }
    }

    /// Change history, newest first, degrading to empty on failure.
    pub async fn task_history(&mut self, task_id: &str) -> Vec<HistoryEntry> {
        let Some(token) = self.token() else {
            return Vec::new();
        };
        match self.tasks_api.list_history(&token, task_id).await {
            Ok(entries) => entries,
            Err(err) if err.is_auth() => {
                self.force_sign_out();
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(task = task_id, error = %err, "history list degraded to empty");
                Vec::new()
            }
        }
    }

    // -----------------------------------------------------------------------
    // Task mutations
    // -----------------------------------------------------------------------

    /// Validate and create one task, mirroring the stored record locally.
    pub async fn create_task(&mut self, input: CreateTask) -> bool {
        let Some((token, _)) = self.authenticated() else {
            return false;
        };
        // 1. Local validation before spending a round trip.
        if let Err(errors) = input.validate() {
            self.notifier.error(validation_message(&errors));
            return false;
        }
        // 2. Create and mirror.
        match self.tasks_api.create_task(&token, &input).await {
            Ok(task) => {
                self.store.upsert(task);
                self.notifier.success("Task created");
                true
            }
            Err(err) => {
                self.handle_failure("create task", err);
                false
            }
        }
    }

    /// Flip a task between completed and pending.
    ///
    /// An admin completing someone else's task locks it in the same
    /// update; reopening releases the lock.
    pub async fn toggle_status(&mut self, id: &str) {
        let Some((token, viewer)) = self.authenticated() else {
            return;
        };
        // 1. Refuse external projections before even looking them up.
        if is_external_id(id) {
            self.refuse(CoreError::ExternalReadOnly(id.to_string()));
            return;
        }
        // 2. Advisory checks against the cached record.
        let Some(task) = self.store.get(id) else {
            self.notifier.error("Task not found");
            return;
        };
        if let Err(err) = ensure_can_toggle(&viewer, task) {
            self.refuse(err);
            return;
        }

        // 3. Build the transition.
        let completing = task.status != TaskStatus::Completed;
        let mut changes = UpdateTask::status_only(if completing {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        });
        if completing && viewer.is_admin() && !task.assigned_to.matches(&viewer) {
            changes.completed_approval = Some(true);
        }
        if !completing {
            changes.completed_approval = Some(false);
        }

        // 4. Persist and mirror.
        match self.tasks_api.update_task(&token, id, &changes).await {
            Ok(updated) => {
                self.store.upsert(updated);
                self.notifier.success(if completing {
                    "Task completed"
                } else {
                    "Task reopened"
                });
            }
            Err(err) => self.handle_failure("update task", err),
        }
    }

    /// Grant or clear completed approval. Strictly assigner-only; admins
    /// are not exempt.
    pub async fn set_approval(&mut self, id: &str, approved: bool) {
        let Some((token, viewer)) = self.authenticated() else {
            return;
        };
        if is_external_id(id) {
            self.refuse(CoreError::ExternalReadOnly(id.to_string()));
            return;
        }
        let Some(task) = self.store.get(id) else {
            self.notifier.error("Task not found");
            return;
        };
        if let Err(err) = ensure_can_set_approval(&viewer, task) {
            self.refuse(err);
            return;
        }

        let changes = UpdateTask {
            completed_approval: Some(approved),
            ..UpdateTask::default()
        };
        match self.tasks_api.update_task(&token, id, &changes).await {
            Ok(updated) => {
                self.store.upsert(updated);
                let (action, message) = if approved {
                    (history::actions::APPROVAL_SET, "Completed approval granted")
                } else {
                    (history::actions::APPROVAL_CLEARED, "Completed approval removed")
                };
                self.record_history(&token, id, action, message.to_string()).await;
                self.notifier.success(message);
            }
            Err(err) => self.handle_failure("update approval", err),
        }
    }

    /// Persist a full edit, then append the field-by-field change log as a
    /// history entry. History failure is logged and swallowed; the edit
    /// itself stands.
    pub async fn edit_task(&mut self, edited: Task) {
        let Some((token, viewer)) = self.authenticated() else {
            return;
        };
        if is_external_id(&edited.id) {
            self.refuse(CoreError::ExternalReadOnly(edited.id.clone()));
            return;
        }
        let Some(before) = self.store.get(&edited.id) else {
            self.notifier.error("Task not found");
            return;
        };
        if let Err(err) = ensure_can_edit(&viewer, before) {
            self.refuse(err);
            return;
        }

        // 1. Diff before persisting so the log reflects what the user saw.
        let changes = describe_changes(before, &edited);
        if changes.is_empty() {
            self.notifier.info("No changes to save");
            return;
        }

        // 2. Persist the full editable field set.
        let payload = UpdateTask::from_task(&edited);
        match self.tasks_api.update_task(&token, &edited.id, &payload).await {
            Ok(updated) => {
                let id = updated.id.clone();
                self.store.upsert(updated);
                // 3. Best-effort history append.
                self.record_history(&token, &id, history::actions::EDITED, changes.join("; "))
                    .await;
                self.notifier.success("Task updated");
            }
            Err(err) => self.handle_failure("update task", err),
        }
    }

    pub async fn delete_task(&mut self, id: &str) {
        let Some((token, viewer)) = self.authenticated() else {
            return;
        };
        if is_external_id(id) {
            self.refuse(CoreError::ExternalReadOnly(id.to_string()));
            return;
        }
        let Some(task) = self.store.get(id) else {
            self.notifier.error("Task not found");
            return;
        };
        if let Err(err) = ensure_can_edit(&viewer, task) {
            self.refuse(err);
            return;
        }

        match self.tasks_api.delete_task(&token, id).await {
            Ok(()) => {
                self.store.remove(id);
                self.notifier.success("Task deleted");
            }
            Err(err) => self.handle_failure("delete task", err),
        }
    }

    /// Create many tasks sequentially, keeping per-row outcomes.
    ///
    /// Rows fail locally on validation without a request; a dead session
    /// fails the remaining rows instead of hammering the backend. Prior
    /// successes are never rolled back.
    pub async fn bulk_create(&mut self, rows: Vec<BulkRow>) -> BulkReport {
        let mut report = BulkReport::default();
        let Some(token) = self.token() else {
            report.failures = rows
                .iter()
                .map(|row| BulkFailure {
                    row_number: row.row_number,
                    reason: "Not signed in".into(),
                })
                .collect();
            return report;
        };

        let mut session_dead = false;
        for row in rows {
            if session_dead {
                report.failures.push(BulkFailure {
                    row_number: row.row_number,
                    reason: "Session expired".into(),
                });
                continue;
            }
            if let Err(errors) = row.input.validate() {
                report.failures.push(BulkFailure {
                    row_number: row.row_number,
                    reason: validation_message(&errors),
                });
                continue;
            }
            match self.tasks_api.create_task(&token, &row.input).await {
                Ok(task) => {
                    self.store.upsert(task.clone());
                    report.created.push(task);
                }
                Err(err) if err.is_auth() => {
                    self.force_sign_out();
                    session_dead = true;
                    report.failures.push(BulkFailure {
                        row_number: row.row_number,
                        reason: "Session expired".into(),
                    });
                }
                Err(err) => {
                    report.failures.push(BulkFailure {
                        row_number: row.row_number,
                        reason: gateway_message(&err),
                    });
                }
            }
        }

        tracing::info!(
            created = report.created.len(),
            failed = report.failures.len(),
            "bulk create finished"
        );
        if report.created.is_empty() && report.failures.is_empty() {
            self.notifier.info(report.summary());
        } else if report.created.is_empty() {
            self.notifier.error(report.summary());
        } else {
            self.notifier.success(report.summary());
        }
        report
    }

    // -----------------------------------------------------------------------
    // Comments
    // -----------------------------------------------------------------------

    pub async fn add_comment(&mut self, task_id: &str, content: &str) -> Option<Comment> {
        let Some((token, _)) = self.authenticated() else {
            return None;
        };
        if is_external_id(task_id) {
            self.refuse(CoreError::ExternalReadOnly(task_id.to_string()));
            return None;
        }
        let content = content.trim();
        if content.is_empty() {
            self.notifier.info("Comment cannot be empty");
            return None;
        }
        match self.tasks_api.add_comment(&token, task_id, content).await {
            Ok(comment) => Some(comment),
            Err(err) => {
                self.handle_failure("add comment", err);
                None
            }
        }
    }

    pub async fn delete_comment(&mut self, task_id: &str, comment_id: &str) -> bool {
        let Some((token, _)) = self.authenticated() else {
            return false;
        };
        match self.tasks_api.delete_comment(&token, task_id, comment_id).await {
            Ok(()) => true,
            Err(err) => {
                self.handle_failure("delete comment", err);
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // User directory
    // -----------------------------------------------------------------------

    /// The user directory (assignee pickers), degrading to empty on
    /// failure.
    pub async fn users(&mut self) -> Vec<User> {
        let Some(token) = self.token() else {
            return Vec::new();
        };
        match self.users_api.list_users(&token).await {
            Ok(users) => users,
            Err(err) if err.is_auth() => {
                self.force_sign_out();
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(error = %err, "user list degraded to empty");
                Vec::new()
            }
        }
    }

    pub async fn create_user(&mut self, input: CreateUser) -> bool {
        let Some((token, _)) = self.authenticated() else {
            return false;
        };
        if let Err(errors) = input.validate() {
            self.notifier.error(validation_message(&errors));
            return false;
        }
        match self.users_api.create_user(&token, &input).await {
            Ok(_) => {
                self.notifier.success("User created");
                true
            }
            Err(err) => {
                self.handle_failure("create user", err);
                false
            }
        }
    }

    pub async fn update_user(&mut self, id: &str, changes: UpdateUser) -> bool {
        let Some((token, _)) = self.authenticated() else {
            return false;
        };
        match self.users_api.update_user(&token, id, &changes).await {
            Ok(_) => {
                self.notifier.success("User updated");
                true
            }
            Err(err) => {
                self.handle_failure("update user", err);
                false
            }
        }
    }

    pub async fn delete_user(&mut self, id: &str) -> bool {
        let Some((token, _)) = self.authenticated() else {
            return false;
        };
        match self.users_api.delete_user(&token, id).await {
            Ok(()) => {
                self.notifier.success("User deleted");
                true
            }
            Err(err) => {
                self.handle_failure("delete user", err);
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // Shared plumbing
    // -----------------------------------------------------------------------

    fn token(&self) -> Option<String> {
        self.session.token().map(str::to_string)
    }

    fn authenticated(&mut self) -> Option<(String, Viewer)> {
        match (self.token(), self.session.viewer()) {
            (Some(token), Some(viewer)) => Some((token, viewer)),
            _ => {
                self.notifier.error("Sign in first");
                None
            }
        }
    }

    fn refuse(&mut self, err: CoreError) {
        tracing::debug!(error = %err, "refused before network call");
        self.notifier.error(err.to_string());
    }

    async fn record_history(&mut self, token: &str, task_id: &str, action: &str, description: String) {
        let entry = NewHistoryEntry {
            action: action.to_string(),
            description,
        };
        match self.tasks_api.append_history(token, task_id, &entry).await {
            Ok(_) => {}
            Err(err) if err.is_auth() => self.force_sign_out(),
            Err(err) => {
                tracing::warn!(task = task_id, error = %err, "failed to record history")
            }
        }
    }

    fn force_sign_out(&mut self) {
        tracing::warn!("token rejected, clearing session");
        self.session.sign_out();
        self.store.clear();
        self.notifier.session_expired();
    }

    fn handle_failure(&mut self, action: &str, err: GatewayError) {
        if err.is_auth() {
            self.force_sign_out();
            return;
        }
        tracing::error!(action, error = %err, "gateway call failed");
        self.notifier.error(gateway_message(&err));
    }
}

/// User-facing line for a gateway failure. Server-authored messages pass
/// through; transport and decode details stay in the logs.
fn gateway_message(err: &GatewayError) -> String {
    match err {
        GatewayError::Rejected(message)
        | GatewayError::Forbidden(message)
        | GatewayError::NotFound(message)
        | GatewayError::Validation(message) => message.clone(),
        GatewayError::Transport(_) => "Could not reach the server".to_string(),
        _ => "Something went wrong, try again".to_string(),
    }
}

fn login_message(err: &GatewayError) -> String {
    match err {
        GatewayError::Rejected(message) => message.clone(),
        GatewayError::Unauthorized => "Invalid email or password".to_string(),
        GatewayError::Transport(_) => "Could not reach the server".to_string(),
        _ => "Login failed, try again".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
