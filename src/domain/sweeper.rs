//! Process-wide status of the background expiration sweeper.

use chrono::{DateTime, Duration, Utc};
use std::sync::RwLock;

/// Records when the sweeper last ran.
///
/// Unset until the first run. The health endpoint reads it to detect a
/// stalled or never-started sweeper; nothing else coordinates through it.
#[derive(Debug, Default)]
pub struct SweeperStatus {
    last_run: RwLock<Option<DateTime<Utc>>>,
}

impl SweeperStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a sweep run as started, at call time.
    pub fn mark_run(&self) {
        let mut guard = self.last_run.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(Utc::now());
    }

    /// The start time of the most recent run, or `None` before the first.
    pub fn last_run(&self) -> Option<DateTime<Utc>> {
        *self.last_run.read().unwrap_or_else(|e| e.into_inner())
    }

    /// True when no run has happened within `max_delay`.
    pub fn is_stale(&self, max_delay: Duration) -> bool {
        match self.last_run() {
            None => true,
            Some(at) => Utc::now() - at > max_delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_until_first_run() {
        let status = SweeperStatus::new();
        assert!(status.last_run().is_none());
        assert!(status.is_stale(Duration::minutes(2)));
    }

    #[test]
    fn test_fresh_after_mark() {
        let status = SweeperStatus::new();
        status.mark_run();

        assert!(status.last_run().is_some());
        assert!(!status.is_stale(Duration::minutes(2)));
    }
}
