//! The task model and its wire representation.

use serde::{Deserialize, Serialize};

use crate::types::{TaskId, Timestamp};
use crate::user::UserRef;

// ---------------------------------------------------------------------------
// Status / priority / kind
// ---------------------------------------------------------------------------

/// Task lifecycle status as the backend serializes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Wire / display name for the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    #[default]
    Regular,
    Troubleshoot,
    Maintenance,
    Development,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Regular => "regular",
            TaskKind::Troubleshoot => "troubleshoot",
            TaskKind::Maintenance => "maintenance",
            TaskKind::Development => "development",
        }
    }
}

// ---------------------------------------------------------------------------
// External pseudo-task ids
// ---------------------------------------------------------------------------

/// Id prefix marking a task as a read-only projection of an external
/// calendar event. This prefix is the only provenance marker: every
/// mutation path must refuse ids that carry it.
pub const EXTERNAL_ID_PREFIX: &str = "gcal-";

/// Whether a task id denotes an external calendar projection.
pub fn is_external_id(id: &str) -> bool {
    id.starts_with(EXTERNAL_ID_PREFIX)
}

/// Build the task id for an external calendar event.
pub fn external_id(event_id: &str) -> TaskId {
    format!("{EXTERNAL_ID_PREFIX}{event_id}")
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// A unit of work as held in the dashboard's in-memory collection.
///
/// `due_date` is kept exactly as the backend sent it; parsing is lenient and
/// localized to [`crate::dates`] so an unparseable value degrades (not
/// overdue, no calendar bucket) instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// ISO-8601 timestamp string, verbatim from the backend.
    pub due_date: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assigned_to: UserRef,
    pub assigned_by: UserRef,
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub task_type: TaskKind,
    /// Terminal lock set by the assigner; freezes status for everyone else.
    #[serde(default)]
    pub completed_approval: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Task {
    /// Whether this task is a read-only external calendar projection.
    pub fn is_external(&self) -> bool {
        is_external_id(&self.id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_kebab_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        let status: TaskStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(status, TaskStatus::InProgress);
    }

    #[test]
    fn task_deserializes_from_backend_shape() {
        let task: Task = serde_json::from_str(
            r#"{
                "id": "t-1",
                "title": "Fix banner",
                "dueDate": "2026-03-01T12:00:00Z",
                "status": "pending",
                "priority": "high",
                "assignedTo": "dev@example.com",
                "assignedBy": {"id": "u-2", "email": "lead@example.com"},
                "companyName": "Acme",
                "taskType": "troubleshoot"
            }"#,
        )
        .unwrap();

        assert_eq!(task.title, "Fix banner");
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.assigned_to.email(), "dev@example.com");
        assert_eq!(task.assigned_by.id(), Some("u-2"));
        assert_eq!(task.task_type, TaskKind::Troubleshoot);
        // Omitted optionals degrade to their defaults.
        assert!(!task.completed_approval);
        assert!(task.tags.is_empty());
        assert!(task.description.is_none());
        assert!(task.created_at.is_none());
    }

    #[test]
    fn task_serializes_camel_case_and_skips_empty_optionals() {
        let task = Task {
            id: "t-1".into(),
            title: "Fix banner".into(),
            description: None,
            due_date: "2026-03-01T12:00:00Z".into(),
            status: TaskStatus::Completed,
            priority: TaskPriority::Low,
            assigned_to: UserRef::Email("dev@example.com".into()),
            assigned_by: UserRef::Email("lead@example.com".into()),
            company_name: "Acme".into(),
            brand: None,
            task_type: TaskKind::Regular,
            completed_approval: true,
            created_at: None,
            updated_at: None,
            tags: vec![],
        };

        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&task).unwrap()).unwrap();
        assert_eq!(value["dueDate"], "2026-03-01T12:00:00Z");
        assert_eq!(value["companyName"], "Acme");
        assert_eq!(value["completedApproval"], true);
        assert!(value.get("description").is_none());
        assert!(value.get("brand").is_none());
        assert!(value.get("tags").is_none());
    }

    #[test]
    fn external_id_prefix_is_detected() {
        assert!(is_external_id("gcal-abc123"));
        assert!(!is_external_id("t-42"));
        assert!(!is_external_id(""));
        assert_eq!(external_id("abc123"), "gcal-abc123");
    }
}
