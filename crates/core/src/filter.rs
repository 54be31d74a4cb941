//! The task aggregation engine: visibility, stat quick-filter, advanced
//! filters, and free-text search over the in-memory collection.
//!
//! [`aggregate`] is pure: it never mutates the input collection and
//! preserves the input's relative order, so display ordering is inherited
//! from whatever order the gateway returned.

use crate::dates::{is_overdue, same_day, within_next_days};
use crate::permissions::is_visible_to;
use crate::task::{Task, TaskKind, TaskPriority, TaskStatus};
use crate::types::Timestamp;
use crate::user::Viewer;

/// Span of the "next seven days" window, inclusive of today.
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

/// Single-click coarse filter, distinct from the advanced filter panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatFilter {
    #[default]
    All,
    Completed,
    Pending,
    Overdue,
}

/// Assignment-direction filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AssignedScope {
    #[default]
    Any,
    /// Tasks assigned to the viewer.
    ToMe,
    /// Tasks the viewer assigned out.
    ByMe,
}

/// Due-date window filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateWindow {
    #[default]
    Any,
    Today,
    NextSevenDays,
    Overdue,
}

/// The full filter state as selected in the dashboard.
///
/// `Default` is the empty query: every filter wide open, empty search term.
/// Applying it returns the visibility-filtered collection unchanged.
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub stat: StatFilter,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned: AssignedScope,
    pub date_window: DateWindow,
    pub task_type: Option<TaskKind>,
    /// Exact company-name match.
    pub company: Option<String>,
    /// Exact brand match.
    pub brand: Option<String>,
    /// Case-insensitive substring, matched against title, description,
    /// company, and brand.
    pub search: String,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Filter the collection down to what `viewer` should see for `query`.
///
/// Stages, in order: visibility, stat quick-filter, advanced filters (AND
/// semantics), free-text search. The visibility stage always runs; the rest
/// are no-ops at their defaults.
pub fn aggregate<'a>(
    tasks: &'a [Task],
    viewer: &Viewer,
    query: &TaskQuery,
    now: Timestamp,
    utc_offset_minutes: i32,
) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| is_visible_to(viewer, task))
        .filter(|task| stat_matches(task, query.stat, now))
        .filter(|task| advanced_matches(task, viewer, query, now, utc_offset_minutes))
        .filter(|task| search_matches(task, &query.search))
        .collect()
}

fn stat_matches(task: &Task, stat: StatFilter, now: Timestamp) -> bool {
    match stat {
        StatFilter::All => true,
        StatFilter::Completed => task.status == TaskStatus::Completed,
        StatFilter::Pending => task.status == TaskStatus::Pending,
        StatFilter::Overdue => is_overdue(&task.due_date, task.status, now),
    }
}

fn advanced_matches(
    task: &Task,
    viewer: &Viewer,
    query: &TaskQuery,
    now: Timestamp,
    utc_offset_minutes: i32,
) -> bool {
    if let Some(status) = query.status {
        if task.status != status {
            return false;
        }
    }
    if let Some(priority) = query.priority {
        if task.priority != priority {
            return false;
        }
    }
    match query.assigned {
        AssignedScope::Any => {}
        AssignedScope::ToMe => {
            if !task.assigned_to.matches(viewer) {
                return false;
            }
        }
        AssignedScope::ByMe => {
            if !task.assigned_by.matches(viewer) {
                return false;
            }
        }
    }
    match query.date_window {
        DateWindow::Any => {}
        DateWindow::Today => {
            if !same_day(&task.due_date, now, utc_offset_minutes) {
                return false;
            }
        }
        DateWindow::NextSevenDays => {
            if !within_next_days(&task.due_date, now, UPCOMING_WINDOW_DAYS, utc_offset_minutes) {
                return false;
            }
        }
        DateWindow::Overdue => {
            if !is_overdue(&task.due_date, task.status, now) {
                return false;
            }
        }
    }
    if let Some(kind) = query.task_type {
        if task.task_type != kind {
            return false;
        }
    }
    if let Some(company) = &query.company {
        if &task.company_name != company {
            return false;
        }
    }
    if let Some(brand) = &query.brand {
        if task.brand.as_deref() != Some(brand.as_str()) {
            return false;
        }
    }
    true
}

fn search_matches(task: &Task, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    [
        Some(task.title.as_str()),
        task.description.as_deref(),
        Some(task.company_name.as_str()),
        task.brand.as_deref(),
    ]
    .iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&needle))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_timestamp;
    use crate::user::{Role, UserRef};

    fn now() -> Timestamp {
        parse_timestamp("2026-03-02T12:00:00Z").unwrap()
    }

    fn viewer(email: &str, role: Role) -> Viewer {
        Viewer {
            id: format!("id-{email}"),
            email: email.into(),
            role,
        }
    }

    fn task(id: &str, to: &str, by: &str) -> Task {
        Task {
            id: id.into(),
            title: format!("Task {id}"),
            description: None,
            due_date: "2026-03-20T09:00:00Z".into(),
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            assigned_to: UserRef::Email(to.into()),
            assigned_by: UserRef::Email(by.into()),
            company_name: "Acme".into(),
            brand: None,
            task_type: TaskKind::Regular,
            completed_approval: false,
            created_at: None,
            updated_at: None,
            tags: vec![],
        }
    }

    fn sample() -> Vec<Task> {
        let mut t1 = task("t-1", "dev@example.com", "lead@example.com");
        t1.due_date = "2026-03-01T09:00:00Z".into(); // overdue at now()

        let mut t2 = task("t-2", "dev@example.com", "lead@example.com");
        t2.status = TaskStatus::Completed;

        let mut t3 = task("t-3", "other@example.com", "dev@example.com");
        t3.priority = TaskPriority::High;
        t3.company_name = "Globex".into();
        t3.brand = Some("Nordic".into());

        let t4 = task("t-4", "other@example.com", "lead@example.com");

        vec![t1, t2, t3, t4]
    }

    fn ids(result: &[&Task]) -> Vec<String> {
        result.iter().map(|t| t.id.clone()).collect()
    }

    // -- visibility ----------------------------------------------------------

    #[test]
    fn admin_with_empty_query_gets_full_set_in_order() {
        let tasks = sample();
        let result = aggregate(
            &tasks,
            &viewer("admin@example.com", Role::Admin),
            &TaskQuery::default(),
            now(),
            0,
        );
        assert_eq!(ids(&result), vec!["t-1", "t-2", "t-3", "t-4"]);
    }

    #[test]
    fn non_admin_sees_only_tasks_assigned_to_or_by_them() {
        let tasks = sample();
        let result = aggregate(
            &tasks,
            &viewer("dev@example.com", Role::Developer),
            &TaskQuery::default(),
            now(),
            0,
        );
        // t-4 belongs to other people entirely.
        assert_eq!(ids(&result), vec!["t-1", "t-2", "t-3"]);
    }

    #[test]
    fn every_output_task_touches_the_viewer() {
        let tasks = sample();
        let v = viewer("dev@example.com", Role::Developer);
        for t in aggregate(&tasks, &v, &TaskQuery::default(), now(), 0) {
            assert!(t.assigned_to.matches(&v) || t.assigned_by.matches(&v));
        }
    }

    // -- stat quick-filter ---------------------------------------------------

    #[test]
    fn stat_completed_narrows_by_status() {
        let tasks = sample();
        let query = TaskQuery {
            stat: StatFilter::Completed,
            ..Default::default()
        };
        let result = aggregate(&tasks, &viewer("admin@example.com", Role::Admin), &query, now(), 0);
        assert_eq!(ids(&result), vec!["t-2"]);
    }

    #[test]
    fn stat_overdue_excludes_completed() {
        let mut tasks = sample();
        // Completed task with a past due date must not count as overdue.
        tasks[1].due_date = "2026-03-01T09:00:00Z".into();

        let query = TaskQuery {
            stat: StatFilter::Overdue,
            ..Default::default()
        };
        let result = aggregate(&tasks, &viewer("admin@example.com", Role::Admin), &query, now(), 0);
        assert_eq!(ids(&result), vec!["t-1"]);
    }

    // -- advanced filters ----------------------------------------------------

    #[test]
    fn advanced_filters_combine_with_and_semantics() {
        let tasks = sample();
        let query = TaskQuery {
            priority: Some(TaskPriority::High),
            company: Some("Globex".into()),
            ..Default::default()
        };
        let result = aggregate(&tasks, &viewer("admin@example.com", Role::Admin), &query, now(), 0);
        assert_eq!(ids(&result), vec!["t-3"]);

        // Same priority but the wrong company: no match.
        let query = TaskQuery {
            priority: Some(TaskPriority::High),
            company: Some("Acme".into()),
            ..Default::default()
        };
        let result = aggregate(&tasks, &viewer("admin@example.com", Role::Admin), &query, now(), 0);
        assert!(result.is_empty());
    }

    #[test]
    fn assigned_scope_distinguishes_direction() {
        let tasks = sample();
        let v = viewer("dev@example.com", Role::Developer);

        let to_me = TaskQuery {
            assigned: AssignedScope::ToMe,
            ..Default::default()
        };
        assert_eq!(ids(&aggregate(&tasks, &v, &to_me, now(), 0)), vec!["t-1", "t-2"]);

        let by_me = TaskQuery {
            assigned: AssignedScope::ByMe,
            ..Default::default()
        };
        assert_eq!(ids(&aggregate(&tasks, &v, &by_me, now(), 0)), vec!["t-3"]);
    }

    #[test]
    fn date_window_today_matches_same_calendar_day() {
        let mut tasks = sample();
        tasks[3].due_date = "2026-03-02T22:00:00Z".into();

        let query = TaskQuery {
            date_window: DateWindow::Today,
            ..Default::default()
        };
        let result = aggregate(&tasks, &viewer("admin@example.com", Role::Admin), &query, now(), 0);
        assert_eq!(ids(&result), vec!["t-4"]);
    }

    #[test]
    fn date_window_next_seven_days_is_inclusive() {
        let mut tasks = sample();
        tasks[3].due_date = "2026-03-09T08:00:00Z".into();

        let query = TaskQuery {
            date_window: DateWindow::NextSevenDays,
            ..Default::default()
        };
        let result = aggregate(&tasks, &viewer("admin@example.com", Role::Admin), &query, now(), 0);
        assert_eq!(ids(&result), vec!["t-4"]);
    }

    #[test]
    fn date_window_overdue_fails_open_on_garbage_dates() {
        let mut tasks = sample();
        tasks[3].due_date = "not a date".into();

        let query = TaskQuery {
            date_window: DateWindow::Overdue,
            ..Default::default()
        };
        let result = aggregate(&tasks, &viewer("admin@example.com", Role::Admin), &query, now(), 0);
        assert_eq!(ids(&result), vec!["t-1"]);
    }

    // -- free-text search ----------------------------------------------------

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let tasks = sample();
        let admin = viewer("admin@example.com", Role::Admin);

        let by_company = TaskQuery {
            search: "gLoBeX".into(),
            ..Default::default()
        };
        assert_eq!(ids(&aggregate(&tasks, &admin, &by_company, now(), 0)), vec!["t-3"]);

        let by_brand = TaskQuery {
            search: "nordic".into(),
            ..Default::default()
        };
        assert_eq!(ids(&aggregate(&tasks, &admin, &by_brand, now(), 0)), vec!["t-3"]);

        let by_title = TaskQuery {
            search: "task t-1".into(),
            ..Default::default()
        };
        assert_eq!(ids(&aggregate(&tasks, &admin, &by_title, now(), 0)), vec!["t-1"]);
    }

    #[test]
    fn search_covers_description() {
        let mut tasks = sample();
        tasks[3].description = Some("Replace the hero image".into());

        let query = TaskQuery {
            search: "HERO".into(),
            ..Default::default()
        };
        let result = aggregate(&tasks, &viewer("admin@example.com", Role::Admin), &query, now(), 0);
        assert_eq!(ids(&result), vec!["t-4"]);
    }

    #[test]
    fn blank_search_is_a_no_op() {
        let tasks = sample();
        let admin = viewer("admin@example.com", Role::Admin);

        let spaces = TaskQuery {
            search: "   ".into(),
            ..Default::default()
        };
        assert_eq!(
            aggregate(&tasks, &admin, &spaces, now(), 0).len(),
            aggregate(&tasks, &admin, &TaskQuery::default(), now(), 0).len()
        );
    }

    // -- purity --------------------------------------------------------------

    #[test]
    fn aggregation_is_idempotent_and_leaves_input_untouched() {
        let tasks = sample();
        let snapshot = tasks.clone();
        let v = viewer("dev@example.com", Role::Developer);
        let query = TaskQuery {
            stat: StatFilter::Pending,
            search: "task".into(),
            ..Default::default()
        };

        let first = ids(&aggregate(&tasks, &v, &query, now(), 0));
        let second = ids(&aggregate(&tasks, &v, &query, now(), 0));

        assert_eq!(first, second);
        assert_eq!(tasks, snapshot);
    }

    #[test]
    fn output_preserves_relative_input_order() {
        let mut tasks = sample();
        // Shuffle so stored order is not alphabetical.
        tasks.swap(0, 3);
        tasks.swap(1, 2);
        let expected: Vec<String> = tasks.iter().map(|t| t.id.clone()).collect();

        let result = aggregate(
            &tasks,
            &viewer("admin@example.com", Role::Admin),
            &TaskQuery::default(),
            now(),
            0,
        );
        assert_eq!(ids(&result), expected);
    }
}
