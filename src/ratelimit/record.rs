//! Per-identity attempt tracking record.

use std::time::Duration;
use tokio::time::Instant;

/// Attempt-tracking state for a single identity.
///
/// A record is created on the first observed attempt, mutated on every
/// subsequent check, and removed either by an explicit reset or by the
/// periodic sweep once stale.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    /// Attempts made in the current window
    pub attempts: u32,
    /// When the current counting window began
    pub window_start: Instant,
    /// Most recent attempt, or the time a block was (re)confirmed
    pub last_attempt: Instant,
    /// Whether the identity is currently under a block
    pub blocked: bool,
}

impl AttemptRecord {
    /// A fresh record whose single attempt is the one being observed now.
    pub(crate) fn first_attempt(now: Instant) -> Self {
        Self {
            attempts: 1,
            window_start: now,
            last_attempt: now,
            blocked: false,
        }
    }

    /// Time elapsed since the record's window began.
    pub fn age(&self, now: Instant) -> Duration {
        now.duration_since(self.window_start)
    }
}
