//! Comments attached to a task.
//!
//! Comments are owned by their task and live only for the duration of an
//! open task modal: the dashboard fetches them on demand and never caches
//! them in the task collection.

use serde::{Deserialize, Serialize};

use crate::types::{TaskId, Timestamp};
use crate::user::UserSnapshot;

/// A single comment as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub task_id: TaskId,
    /// Identity snapshot of the author at write time.
    pub author: UserSnapshot,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}
