/// Task identifiers are backend-assigned opaque strings. Externally-sourced
/// pseudo-tasks carry a reserved prefix (see [`crate::task::EXTERNAL_ID_PREFIX`]).
pub type TaskId = String;

/// User identifiers are backend-assigned opaque strings.
pub type UserId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
