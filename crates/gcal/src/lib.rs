//! Google Calendar adapter.
//!
//! Fetches a month of events from the Calendar v3 REST API and projects
//! them into read-only pseudo-tasks so the dashboard can render native
//! tasks and calendar events side by side. The projection is one-way:
//! pseudo-tasks carry a `gcal-` id prefix and every mutation path
//! upstream refuses them.

pub mod client;
pub mod event;
pub mod generation;

pub use client::{GcalClient, GcalError};
pub use event::{events_to_tasks, CalendarEvent};
pub use generation::FetchGeneration;
