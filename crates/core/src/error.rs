use crate::types::TaskId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: TaskId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Task {0} is locked by completed approval")]
    ApprovalLocked(TaskId),

    #[error("Task {0} is an external calendar event and cannot be modified")]
    ExternalReadOnly(TaskId),
}
