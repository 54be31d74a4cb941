//! Row bookkeeping for bulk task creation.

use taskdeck_core::task::Task;
use taskdeck_gateway::tasks::CreateTask;
use validator::ValidationErrors;

/// One row of a bulk import, keeping the number the user saw in their
/// sheet so failures can point back at it.
#[derive(Debug, Clone)]
pub struct BulkRow {
    pub row_number: usize,
    pub input: CreateTask,
}

/// Why one row did not become a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkFailure {
    pub row_number: usize,
    pub reason: String,
}

/// Outcome of a bulk create: successes and failures side by side, never
/// rolled back into each other.
#[derive(Debug, Default)]
pub struct BulkReport {
    pub created: Vec<Task>,
    pub failures: Vec<BulkFailure>,
}

impl BulkReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// One line for the toast rail.
    pub fn summary(&self) -> String {
        let created = self.created.len();
        let failed = self.failures.len();
        match (created, failed) {
            (0, 0) => "Nothing to import".to_string(),
            (_, 0) => format!("Created {created} {}", plural(created, "task")),
            (0, _) => format!("No tasks created, {failed} {} failed", plural(failed, "row")),
            _ => format!(
                "Created {created} {}, {failed} {} failed",
                plural(created, "task"),
                plural(failed, "row")
            ),
        }
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        noun.to_string()
    } else {
        format!("{noun}s")
    }
}

/// Flatten validator output into one human-readable line.
pub(crate) fn validation_message(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = Vec::new();
    for (field, failures) in errors.field_errors() {
        for failure in failures {
            match &failure.message {
                Some(message) => parts.push(message.to_string()),
                None => parts.push(format!("{field} is invalid")),
            }
        }
    }
    if parts.is_empty() {
        return "Invalid input".to_string();
    }
    parts.sort();
    parts.join("; ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
