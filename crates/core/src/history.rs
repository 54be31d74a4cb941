//! Append-only task history: the audit trail shown in the task modal.
//!
//! Entries are written through the gateway after a mutation succeeds and are
//! never edited or deleted from this client.

use serde::{Deserialize, Serialize};

use crate::dates::display_date;
use crate::task::Task;
use crate::types::{TaskId, Timestamp};
use crate::user::UserSnapshot;

// ---------------------------------------------------------------------------
// Action tag constants
// ---------------------------------------------------------------------------

/// Known action tags for history entries.
pub mod actions {
    pub const CREATED: &str = "created";
    pub const EDITED: &str = "edited";
    pub const STATUS_CHANGED: &str = "status_changed";
    pub const APPROVAL_SET: &str = "approval_set";
    pub const APPROVAL_CLEARED: &str = "approval_cleared";
    pub const COMMENT_ADDED: &str = "comment_added";
    pub const DELETED: &str = "deleted";
}

// ---------------------------------------------------------------------------
// HistoryEntry
// ---------------------------------------------------------------------------

/// A single audit-trail entry as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub task_id: TaskId,
    /// One of the [`actions`] constants (unknown tags are kept verbatim).
    pub action: String,
    pub description: String,
    /// Identity snapshot of the acting user at write time.
    pub actor: UserSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Edit diffing
// ---------------------------------------------------------------------------

/// Produce a human-readable change log for a task edit.
///
/// Compares `after` against `before` field by field and returns one line per
/// changed field, in a fixed field order. An empty result means the edit is
/// a no-op. Due dates are rendered through [`display_date`] so the log shows
/// the same formatting the rest of the dashboard uses.
pub fn describe_changes(before: &Task, after: &Task) -> Vec<String> {
    let mut changes = Vec::new();

    if before.title != after.title {
        changes.push(format!(
            "Title changed from \"{}\" to \"{}\"",
            before.title, after.title
        ));
    }
    if before.description != after.description {
        changes.push("Description updated".to_string());
    }
    if before.due_date != after.due_date {
        changes.push(format!(
            "Due date changed from {} to {}",
            display_date(&before.due_date),
            display_date(&after.due_date)
        ));
    }
    if before.status != after.status {
        changes.push(format!(
            "Status changed from {} to {}",
            before.status.as_str(),
            after.status.as_str()
        ));
    }
    if before.priority != after.priority {
        changes.push(format!(
            "Priority changed from {} to {}",
            before.priority.as_str(),
            after.priority.as_str()
        ));
    }
    if before.assigned_to.email() != after.assigned_to.email() {
        changes.push(format!(
            "Reassigned from {} to {}",
            before.assigned_to.email(),
            after.assigned_to.email()
        ));
    }
    if before.company_name != after.company_name {
        changes.push(format!(
            "Company changed from \"{}\" to \"{}\"",
            before.company_name, after.company_name
        ));
    }
    if before.brand != after.brand {
        changes.push(format!(
            "Brand changed from {} to {}",
            before.brand.as_deref().unwrap_or("none"),
            after.brand.as_deref().unwrap_or("none")
        ));
    }
    if before.task_type != after.task_type {
        changes.push(format!(
            "Task type changed from {} to {}",
            before.task_type.as_str(),
            after.task_type.as_str()
        ));
    }
    if before.tags != after.tags {
        changes.push("Tags updated".to_string());
    }

    changes
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
