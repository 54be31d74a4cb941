//! Month-grid calendar state and the external-event overlay.

use chrono::{Datelike, NaiveDate};

use taskdeck_core::calendar::{month_grid, next_month, prev_month, tasks_on_day, DayCell};
use taskdeck_core::dates::local_day;
use taskdeck_core::task::Task;
use taskdeck_core::types::Timestamp;
use taskdeck_gcal::{events_to_tasks, CalendarEvent, FetchGeneration, GcalClient, GcalError};

/// The focused month, its projected external events, and the fetch guard.
///
/// The view is navigation-first: month moves always succeed, and a fetch
/// failure leaves the previous events in place. Overlapping fetches are
/// resolved by ticket; only the latest one may apply its response.
pub struct CalendarView {
    client: GcalClient,
    generation: FetchGeneration,
    access_token: Option<String>,
    year: i32,
    month: u32,
    events: Vec<Task>,
    utc_offset_minutes: i32,
}

impl CalendarView {
    /// A disconnected view focused on the month containing `now`.
    pub fn new(client: GcalClient, now: Timestamp, utc_offset_minutes: i32) -> Self {
        let today = local_day(now, utc_offset_minutes);
        Self {
            client,
            generation: FetchGeneration::new(),
            access_token: None,
            year: today.year(),
            month: today.month(),
            events: Vec::new(),
            utc_offset_minutes,
        }
    }

    pub fn focused(&self) -> (i32, u32) {
        (self.year, self.month)
    }

    pub fn is_connected(&self) -> bool {
        self.access_token.is_some()
    }

    /// Projected pseudo-tasks for the focused month.
    pub fn events(&self) -> &[Task] {
        &self.events
    }

    // -----------------------------------------------------------------------
    // Connection and fetching
    // -----------------------------------------------------------------------

    /// Attach the viewer's OAuth access token and fetch the focused month.
    ///
    /// The token is obtained out-of-band (browser consent flow); this view
    /// only spends it.
    pub async fn connect(
        &mut self,
        access_token: impl Into<String>,
        viewer_email: &str,
        now: Timestamp,
    ) -> Result<(), GcalError> {
        self.access_token = Some(access_token.into());
        self.refresh(viewer_email, now).await
    }

    /// Drop the token and every projected event.
    pub fn disconnect(&mut self) {
        self.access_token = None;
        self.events.clear();
    }

    /// Re-fetch the focused month. A no-op while disconnected.
    pub async fn refresh(&mut self, viewer_email: &str, now: Timestamp) -> Result<(), GcalError> {
        let Some(token) = self.access_token.clone() else {
            return Ok(());
        };
        let ticket = self.begin_fetch();
        let (year, month) = (self.year, self.month);

        match self.client.list_month_events(Some(&token), year, month).await {
            Ok(events) => {
                self.apply_if_current(ticket, &events, viewer_email, now);
                Ok(())
            }
            Err(err) => {
                if matches!(err, GcalError::Api { status: 401 | 403, .. }) {
                    // The Google grant died, not the backend session.
                    tracing::warn!("calendar access revoked, disconnecting");
                    self.disconnect();
                } else {
                    tracing::warn!(year, month, error = %err, "calendar fetch failed");
                }
                Err(err)
            }
        }
    }

    /// Move focus one month forward and fetch it.
    pub async fn next_month(&mut self, viewer_email: &str, now: Timestamp) -> Result<(), GcalError> {
        (self.year, self.month) = next_month(self.year, self.month);
        self.refresh(viewer_email, now).await
    }

    /// Move focus one month back and fetch it.
    pub async fn prev_month(&mut self, viewer_email: &str, now: Timestamp) -> Result<(), GcalError> {
        (self.year, self.month) = prev_month(self.year, self.month);
        self.refresh(viewer_email, now).await
    }

    /// Hand out a fetch ticket, invalidating every earlier in-flight fetch.
    pub fn begin_fetch(&self) -> u64 {
        self.generation.begin()
    }

    /// Apply a fetched batch if `ticket` is still current.
    ///
    /// Returns `false` (and changes nothing) for superseded tickets, so a
    /// slow response can never overwrite the month the user navigated to.
    pub fn apply_if_current(
        &mut self,
        ticket: u64,
        events: &[CalendarEvent],
        viewer_email: &str,
        now: Timestamp,
    ) -> bool {
        if !self.generation.is_current(ticket) {
            tracing::debug!(ticket, "discarding superseded calendar fetch");
            return false;
        }
        self.events = events_to_tasks(events, viewer_email, now);
        true
    }

    // -----------------------------------------------------------------------
    // Grid and per-day lookup
    // -----------------------------------------------------------------------

    /// The 42-cell grid for the focused month.
    pub fn grid(&self) -> Vec<DayCell> {
        month_grid(self.year, self.month).unwrap_or_default()
    }

    /// Everything due on `date`: native tasks first, then projected events,
    /// each keeping its own relative order.
    pub fn day_tasks<'a>(&'a self, native: &'a [Task], date: NaiveDate) -> Vec<&'a Task> {
        let mut due = tasks_on_day(native, date, self.utc_offset_minutes);
        due.extend(tasks_on_day(&self.events, date, self.utc_offset_minutes));
        due
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
