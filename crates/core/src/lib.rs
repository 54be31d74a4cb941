//! Domain types and pure logic for the task dashboard.
//!
//! This crate has no I/O and no async code. It holds the task/user/comment
//! models shared with the backend wire format, the in-memory aggregation
//! engine, permission predicates, date helpers, and the calendar day-grid
//! math, so the gateway, calendar adapter, and dashboard layers can all
//! depend on it without pulling in a runtime.

pub mod calendar;
pub mod comment;
pub mod dates;
pub mod error;
pub mod filter;
pub mod history;
pub mod permissions;
pub mod task;
pub mod types;
pub mod user;
