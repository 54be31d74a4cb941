//! Fetch-generation guard for overlapping calendar requests.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counter that stamps each fetch with a ticket.
///
/// When the user pages through months faster than responses arrive, only
/// the response whose ticket is still current may be applied; anything
/// older is discarded. This keeps a slow February response from
/// overwriting the March data the user is now looking at.
#[derive(Debug, Default)]
pub struct FetchGeneration {
    current: AtomicU64,
}

impl FetchGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new fetch, invalidating every ticket handed out before.
    pub fn begin(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `ticket` is still the latest fetch.
    pub fn is_current(&self, ticket: u64) -> bool {
        self.current.load(Ordering::SeqCst) == ticket
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_ticket_is_current() {
        let generation = FetchGeneration::new();
        let ticket = generation.begin();
        assert!(generation.is_current(ticket));
    }

    #[test]
    fn starting_a_new_fetch_invalidates_older_tickets() {
        let generation = FetchGeneration::new();
        let first = generation.begin();
        let second = generation.begin();

        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[test]
    fn stale_tickets_never_come_back() {
        let generation = FetchGeneration::new();
        let first = generation.begin();
        let _second = generation.begin();
        let third = generation.begin();

        assert!(!generation.is_current(first));
        assert!(generation.is_current(third));
    }
}
