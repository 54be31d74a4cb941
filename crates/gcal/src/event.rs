//! Calendar event DTOs and their projection into pseudo-tasks.

use serde::Deserialize;

use taskdeck_core::dates;
use taskdeck_core::task::{external_id, Task, TaskKind, TaskPriority, TaskStatus};
use taskdeck_core::types::Timestamp;
use taskdeck_core::user::UserRef;

/// Company label stamped on every projected event, so the dashboard can
/// group them and users can tell them apart from native tasks.
pub const EVENT_COMPANY: &str = "Google Calendar";

/// Title used when an event has no summary.
const UNTITLED: &str = "(untitled event)";

// ---------------------------------------------------------------------------
// Wire shapes (Calendar v3)
// ---------------------------------------------------------------------------

/// Start or end of an event. Timed events carry `dateTime` (RFC 3339);
/// all-day events carry `date` (`YYYY-MM-DD`). Exactly one is set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
    pub time_zone: Option<String>,
}

impl EventDateTime {
    /// The raw timestamp string, whichever field carries it.
    pub fn raw(&self) -> Option<&str> {
        self.date_time.as_deref().or(self.date.as_deref())
    }

    fn parsed(&self) -> Option<Timestamp> {
        self.raw().and_then(dates::parse_timestamp)
    }
}

/// One event as the Calendar v3 API returns it. Fields we do not project
/// are simply not declared.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    /// `confirmed`, `tentative`, or `cancelled`.
    pub status: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start: Option<EventDateTime>,
    pub end: Option<EventDateTime>,
    /// Calendar color slot (`"1"`..`"11"`); drives the derived priority.
    pub color_id: Option<String>,
}

/// One page of the events listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsPage {
    #[serde(default)]
    pub items: Vec<CalendarEvent>,
    pub next_page_token: Option<String>,
}

impl CalendarEvent {
    pub fn is_cancelled(&self) -> bool {
        self.status.as_deref() == Some("cancelled")
    }

    /// Map the event onto the task status vocabulary.
    ///
    /// Tentative events read as pending. Everything else is judged by its
    /// end time: already over means completed, otherwise in progress. An
    /// event whose end cannot be parsed stays in progress rather than
    /// silently completing.
    pub fn derived_status(&self, now: Timestamp) -> TaskStatus {
        if self.status.as_deref() == Some("tentative") {
            return TaskStatus::Pending;
        }
        match self.end.as_ref().and_then(EventDateTime::parsed) {
            Some(end) if end < now => TaskStatus::Completed,
            _ => TaskStatus::InProgress,
        }
    }

    /// Map the calendar color slot onto a priority.
    ///
    /// Tomato (11) and Tangerine (6) read as high, Sage (2) and Basil (10)
    /// as low. Uncolored and every other slot stay at the default.
    pub fn derived_priority(&self) -> TaskPriority {
        match self.color_id.as_deref() {
            Some("11") | Some("6") => TaskPriority::High,
            Some("2") | Some("10") => TaskPriority::Low,
            _ => TaskPriority::Medium,
        }
    }

    /// Project this event into a read-only pseudo-task owned by `viewer_email`.
    ///
    /// The id gets the external prefix so mutation paths refuse it, and both
    /// assignment references point at the viewer so the visibility rule keeps
    /// the event on their dashboard.
    pub fn to_pseudo_task(&self, viewer_email: &str, now: Timestamp) -> Task {
        let due_date = self
            .start
            .as_ref()
            .and_then(EventDateTime::raw)
            .or_else(|| self.end.as_ref().and_then(EventDateTime::raw))
            .unwrap_or_default()
            .to_string();

        Task {
            id: external_id(&self.id),
            title: self
                .summary
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| UNTITLED.to_string()),
            description: self.description.clone(),
            due_date,
            status: self.derived_status(now),
            priority: self.derived_priority(),
            assigned_to: UserRef::Email(viewer_email.to_string()),
            assigned_by: UserRef::Email(viewer_email.to_string()),
            company_name: EVENT_COMPANY.to_string(),
            brand: None,
            task_type: TaskKind::Regular,
            completed_approval: false,
            created_at: None,
            updated_at: None,
            tags: Vec::new(),
        }
    }
}

/// Project a fetched month of events, dropping cancelled ones.
pub fn events_to_tasks(events: &[CalendarEvent], viewer_email: &str, now: Timestamp) -> Vec<Task> {
    events
        .iter()
        .filter(|event| !event.is_cancelled())
        .map(|event| event.to_pseudo_task(viewer_email, now))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn timed(raw: &str) -> Option<EventDateTime> {
        Some(EventDateTime {
            date_time: Some(raw.to_string()),
            ..EventDateTime::default()
        })
    }

    fn sample_event() -> CalendarEvent {
        CalendarEvent {
            id: "abc123".into(),
            status: Some("confirmed".into()),
            summary: Some("Sprint review".into()),
            description: Some("Bring the demo build".into()),
            start: timed("2026-03-12T15:00:00Z"),
            end: timed("2026-03-12T16:00:00Z"),
            color_id: None,
        }
    }

    // -- wire shape ----------------------------------------------------------

    #[test]
    fn deserializes_a_calendar_v3_events_page() {
        let page: EventsPage = serde_json::from_str(
            r#"{
                "kind": "calendar#events",
                "items": [
                    {
                        "id": "abc123",
                        "status": "confirmed",
                        "summary": "Sprint review",
                        "colorId": "11",
                        "start": {"dateTime": "2026-03-12T15:00:00Z"},
                        "end": {"dateTime": "2026-03-12T16:00:00Z"}
                    },
                    {
                        "id": "allday1",
                        "status": "confirmed",
                        "summary": "Release day",
                        "start": {"date": "2026-03-20"},
                        "end": {"date": "2026-03-21"}
                    }
                ],
                "nextPageToken": "tok-2"
            }"#,
        )
        .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].color_id.as_deref(), Some("11"));
        assert_eq!(page.items[1].start.as_ref().unwrap().raw(), Some("2026-03-20"));
        assert_eq!(page.next_page_token.as_deref(), Some("tok-2"));
    }

    #[test]
    fn empty_page_defaults_to_no_items() {
        let page: EventsPage = serde_json::from_str(r#"{"kind":"calendar#events"}"#).unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_page_token.is_none());
    }

    // -- derived status ------------------------------------------------------

    #[test]
    fn tentative_events_read_as_pending() {
        let mut event = sample_event();
        event.status = Some("tentative".into());
        assert_eq!(event.derived_status(now()), TaskStatus::Pending);
    }

    #[test]
    fn past_events_read_as_completed() {
        let mut event = sample_event();
        event.end = timed("2026-03-01T10:00:00Z");
        assert_eq!(event.derived_status(now()), TaskStatus::Completed);
    }

    #[test]
    fn future_events_read_as_in_progress() {
        assert_eq!(sample_event().derived_status(now()), TaskStatus::InProgress);
    }

    #[test]
    fn unparseable_end_stays_in_progress() {
        let mut event = sample_event();
        event.end = timed("whenever");
        assert_eq!(event.derived_status(now()), TaskStatus::InProgress);
    }

    // -- derived priority ----------------------------------------------------

    #[test]
    fn color_slots_map_to_priorities() {
        let mut event = sample_event();
        assert_eq!(event.derived_priority(), TaskPriority::Medium);

        event.color_id = Some("11".into());
        assert_eq!(event.derived_priority(), TaskPriority::High);
        event.color_id = Some("6".into());
        assert_eq!(event.derived_priority(), TaskPriority::High);
        event.color_id = Some("2".into());
        assert_eq!(event.derived_priority(), TaskPriority::Low);
        event.color_id = Some("10".into());
        assert_eq!(event.derived_priority(), TaskPriority::Low);
        event.color_id = Some("7".into());
        assert_eq!(event.derived_priority(), TaskPriority::Medium);
    }

    // -- projection ----------------------------------------------------------

    #[test]
    fn projection_prefixes_the_id_and_assigns_the_viewer() {
        let task = sample_event().to_pseudo_task("ana@example.com", now());

        assert_eq!(task.id, "gcal-abc123");
        assert!(task.is_external());
        assert_eq!(task.title, "Sprint review");
        assert_eq!(task.due_date, "2026-03-12T15:00:00Z");
        assert_eq!(task.assigned_to.email(), "ana@example.com");
        assert_eq!(task.assigned_by.email(), "ana@example.com");
        assert_eq!(task.company_name, EVENT_COMPANY);
        assert!(!task.completed_approval);
    }

    #[test]
    fn all_day_events_use_the_bare_date_as_due_date() {
        let event = CalendarEvent {
            id: "allday1".into(),
            summary: Some("Release day".into()),
            start: Some(EventDateTime {
                date: Some("2026-03-20".into()),
                ..EventDateTime::default()
            }),
            ..CalendarEvent::default()
        };
        let task = event.to_pseudo_task("ana@example.com", now());
        assert_eq!(task.due_date, "2026-03-20");
    }

    #[test]
    fn missing_summary_falls_back_to_a_placeholder() {
        let mut event = sample_event();
        event.summary = None;
        assert_eq!(event.to_pseudo_task("a@b.c", now()).title, UNTITLED);

        event.summary = Some("   ".into());
        assert_eq!(event.to_pseudo_task("a@b.c", now()).title, UNTITLED);
    }

    #[test]
    fn cancelled_events_are_dropped_from_the_projection() {
        let mut cancelled = sample_event();
        cancelled.id = "gone".into();
        cancelled.status = Some("cancelled".into());

        let tasks = events_to_tasks(&[sample_event(), cancelled], "ana@example.com", now());
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "gcal-abc123");
    }
}
