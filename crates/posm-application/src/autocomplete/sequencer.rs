//! Stale-response guard.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Issues increasing tickets; only a response carrying the newest ticket may
/// be applied.
///
/// Clones share the counter.
#[derive(Debug, Clone, Default)]
pub struct QuerySequencer {
    latest: Arc<AtomicU64>,
}

impl QuerySequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a new request as the latest one.
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Makes every outstanding ticket stale without issuing a request.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_latest(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let sequencer = QuerySequencer::new();
        let first = sequencer.issue();
        let second = sequencer.clone().issue();

        assert!(!sequencer.is_latest(first));
        assert!(sequencer.is_latest(second));

        sequencer.invalidate();
        assert!(!sequencer.is_latest(second));
    }
}
