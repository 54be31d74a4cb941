//! Environment-driven configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration, read once at startup.
///
/// | Variable | Default | Purpose |
/// |---|---|---|
/// | `TASKDECK_API_URL` | `http://localhost:5000` | Backend base URL |
/// | `TASKDECK_GOOGLE_CLIENT_ID` | empty | OAuth client id; empty disables the calendar |
/// | `TASKDECK_GOOGLE_API_KEY` | empty | Calendar API key; empty disables the calendar |
/// | `TASKDECK_GOOGLE_CALENDAR_ID` | `primary` | Which calendar to fetch |
/// | `TASKDECK_HTTP_TIMEOUT_SECS` | `30` | Per-request timeout |
/// | `TASKDECK_UTC_OFFSET_MINUTES` | `0` | Offset for calendar-day bucketing |
/// | `TASKDECK_SESSION_FILE` | unset | Session persistence path; unset disables it |
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub api_url: String,
    pub google_client_id: String,
    pub google_api_key: String,
    pub google_calendar_id: String,
    pub http_timeout: Duration,
    pub utc_offset_minutes: i32,
    pub session_file: Option<PathBuf>,
}

impl DashboardConfig {
    /// Read configuration from the environment, loading `.env` first.
    ///
    /// Missing variables fall back to their defaults; malformed numeric
    /// values panic with the variable named.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            api_url: var_or("TASKDECK_API_URL", "http://localhost:5000"),
            google_client_id: var_or("TASKDECK_GOOGLE_CLIENT_ID", ""),
            google_api_key: var_or("TASKDECK_GOOGLE_API_KEY", ""),
            google_calendar_id: var_or("TASKDECK_GOOGLE_CALENDAR_ID", "primary"),
            http_timeout: Duration::from_secs(
                std::env::var("TASKDECK_HTTP_TIMEOUT_SECS")
                    .ok()
                    .map(|raw| {
                        raw.parse()
                            .expect("TASKDECK_HTTP_TIMEOUT_SECS must be a number of seconds")
                    })
                    .unwrap_or(30),
            ),
            utc_offset_minutes: std::env::var("TASKDECK_UTC_OFFSET_MINUTES")
                .ok()
                .map(|raw| {
                    raw.parse()
                        .expect("TASKDECK_UTC_OFFSET_MINUTES must be an integer")
                })
                .unwrap_or(0),
            session_file: std::env::var("TASKDECK_SESSION_FILE").ok().map(PathBuf::from),
        }
    }

    /// Whether both Google credentials are configured.
    pub fn calendar_enabled(&self) -> bool {
        !self.google_client_id.is_empty() && !self.google_api_key.is_empty()
    }
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
