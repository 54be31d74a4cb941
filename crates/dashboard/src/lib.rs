//! Dashboard composition root.
//!
//! Owns everything stateful on the client side: the session, the
//! in-memory task collection, the notification bus, and the calendar
//! view, and mediates every mutation between user intent and the REST
//! gateways. Nothing here renders; consumers subscribe to the
//! [`notify::Notifier`] and re-read derived views after each action.

pub mod actions;
pub mod bulk;
pub mod calendar;
pub mod config;
pub mod notify;
pub mod session;
pub mod store;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter. Call once, before anything
/// else logs.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "taskdeck_dashboard=debug,taskdeck_gateway=debug,taskdeck_gcal=debug,taskdeck_core=info",
                )
            }),
        )
        .init();
}
