//! Calendar v3 REST client.

use std::time::Duration;

use taskdeck_core::calendar::month_bounds;

use crate::event::{CalendarEvent, EventsPage};

/// Public Calendar v3 endpoint.
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Page size for event listings.
const PAGE_SIZE: u32 = 250;

/// Timeout applied to every calendar request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Clamp for raw-body excerpts quoted in error messages.
const BODY_EXCERPT_LEN: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum GcalError {
    /// The request itself failed (connection refused, DNS, TLS, timeout).
    #[error("Calendar request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx answer from the Calendar API.
    #[error("Calendar API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The response body was not the JSON shape we expected.
    #[error("Failed to decode calendar response: {0}")]
    Decode(String),

    /// The requested month does not exist.
    #[error("Invalid calendar range: {year}-{month}")]
    InvalidRange { year: i32, month: u32 },
}

/// Client for one Google calendar.
///
/// Authentication is two-layered: the API key identifies the application
/// and rides along as a query parameter, while the per-user OAuth access
/// token (when present) goes in the Authorization header.
#[derive(Debug, Clone)]
pub struct GcalClient {
    http: reqwest::Client,
    base_url: String,
    calendar_id: String,
    api_key: String,
}

impl GcalClient {
    /// Client against the public Calendar v3 endpoint.
    pub fn new(calendar_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_base_url(CALENDAR_API_BASE, calendar_id, api_key)
    }

    /// Client against an explicit base URL.
    pub fn with_base_url(
        base_url: impl Into<String>,
        calendar_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            calendar_id: calendar_id.into(),
            api_key: api_key.into(),
        }
    }

    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    /// Fetch every non-recurring-expanded event overlapping the given month.
    ///
    /// Recurring events come back as their expanded single instances, in
    /// start order, and pagination is followed to the end. Cancelled events
    /// are still included; projection filters them.
    pub async fn list_month_events(
        &self,
        access_token: Option<&str>,
        year: i32,
        month: u32,
    ) -> Result<Vec<CalendarEvent>, GcalError> {
        let (time_min, time_max) =
            month_bounds(year, month).ok_or(GcalError::InvalidRange { year, month })?;

        let url = format!("{}/calendars/{}/events", self.base_url, self.calendar_id);
        let time_min = time_min.to_rfc3339();
        let time_max = time_max.to_rfc3339();

        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(&url)
                .query(&[
                    ("timeMin", time_min.as_str()),
                    ("timeMax", time_max.as_str()),
                    ("singleEvents", "true"),
                    ("orderBy", "startTime"),
                ])
                .query(&[("maxResults", PAGE_SIZE)]);

            if !self.api_key.is_empty() {
                request = request.query(&[("key", self.api_key.as_str())]);
            }
            if let Some(token) = access_token {
                request = request.bearer_auth(token);
            }
            if let Some(token) = page_token.as_deref() {
                request = request.query(&[("pageToken", token)]);
            }

            let page = fetch_page(request).await?;
            events.extend(page.items);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(events)
    }
}

async fn fetch_page(request: reqwest::RequestBuilder) -> Result<EventsPage, GcalError> {
    let response = request.send().await?;
    let status = response.status().as_u16();
    let body = response.text().await?;

    if !(200..=299).contains(&status) {
        return Err(GcalError::Api {
            status,
            body: body.trim().chars().take(BODY_EXCERPT_LEN).collect(),
        });
    }

    serde_json::from_str(&body).map_err(|e| GcalError::Decode(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
