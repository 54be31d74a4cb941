//! Typed REST gateways for the task-dashboard backend.
//!
//! Wraps the auth, task, and user endpoint families with [`reqwest`],
//! unwrapping the backend's response envelopes into domain types and
//! typed errors. No retries and no caching: every call is a single
//! request whose outcome the caller decides how to handle.

pub mod envelope;
pub mod error;
pub mod http;
pub mod tasks;
pub mod users;
