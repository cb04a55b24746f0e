//! Core rate limiter implementation.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::config::RateLimitConfig;

use super::record::AttemptRecord;

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The attempt is permitted.
    Allowed {
        /// Attempts remaining in the current window after this one
        attempts_left: u32,
    },
    /// The attempt is rejected.
    Blocked {
        /// Time until the block lifts
        retry_after: Duration,
    },
}

impl Decision {
    /// Whether the attempt was permitted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed { .. })
    }

    /// The wait time for a blocked decision, `None` when allowed.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Decision::Allowed { .. } => None,
            Decision::Blocked { retry_after } => Some(*retry_after),
        }
    }
}

/// The core rate limiter that tracks submission attempts per identity.
///
/// This struct is thread-safe and can be shared across multiple tasks. State
/// is memory-resident only; an instance is expected to live for the process
/// lifetime, with stale records evicted by [`cleanup`](Self::cleanup) (driven
/// by the periodic [`Sweeper`](super::Sweeper)).
pub struct RateLimiter {
    /// Attempt records indexed by identity
    records: RwLock<HashMap<String, AttemptRecord>>,
    /// Immutable policy configuration
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Check whether a new attempt by `identity` is permitted, and record it.
    ///
    /// Escalation is one-way within a window: once the limit is exceeded the
    /// identity is blocked for the full block duration, measured from the
    /// moment the block was last confirmed. An expired block behaves like a
    /// fresh window, with the unblocking call counted as attempt one.
    ///
    /// Note the deployed `max_attempts = 1` shape: the first call succeeds
    /// with no attempts left, and the second call both reaches and exceeds
    /// the limit, moving straight to a block.
    pub fn check_rate_limit(&self, identity: &str) -> Decision {
        let now = Instant::now();
        let max_attempts = self.config.max_attempts;
        let mut records = self.records.write();

        let record = match records.entry(identity.to_string()) {
            Entry::Vacant(entry) => {
                trace!(identity, "First attempt, creating record");
                entry.insert(AttemptRecord::first_attempt(now));
                return Decision::Allowed {
                    attempts_left: max_attempts.saturating_sub(1),
                };
            }
            Entry::Occupied(entry) => entry.into_mut(),
        };

        if record.blocked {
            let since_block = now.duration_since(record.last_attempt);
            if since_block < self.config.block_duration() {
                trace!(identity, "Attempt rejected, block still active");
                return Decision::Blocked {
                    retry_after: self.config.block_duration() - since_block,
                };
            }

            // Block has expired: start over, counting this call as the
            // first attempt of a new window.
            debug!(identity, "Block expired, restarting window");
            *record = AttemptRecord::first_attempt(now);
            return Decision::Allowed {
                attempts_left: max_attempts.saturating_sub(1),
            };
        }

        if now.duration_since(record.window_start) > self.config.window() {
            trace!(identity, "Window expired, restarting count");
            *record = AttemptRecord::first_attempt(now);
            return Decision::Allowed {
                attempts_left: max_attempts.saturating_sub(1),
            };
        }

        if record.attempts < max_attempts {
            record.attempts += 1;
            record.last_attempt = now;

            if record.attempts > max_attempts {
                record.blocked = true;
                debug!(identity, "Rate limit exceeded, blocking");
                return Decision::Blocked {
                    retry_after: self.config.block_duration(),
                };
            }

            return Decision::Allowed {
                attempts_left: max_attempts - record.attempts,
            };
        }

        // Already at the limit: this attempt overflows it and triggers
        // the block.
        record.blocked = true;
        record.last_attempt = now;
        debug!(identity, "Rate limit exceeded, blocking");
        Decision::Blocked {
            retry_after: self.config.block_duration(),
        }
    }

    /// Force a block for `identity`, e.g. after a successful delivery.
    ///
    /// Guarantees at most one successful submission per block cycle even when
    /// the attempt budget alone would permit another try within the window.
    /// The attempt count of an existing record is left untouched.
    pub fn block_after_success(&self, identity: &str) {
        let now = Instant::now();
        let mut records = self.records.write();

        match records.entry(identity.to_string()) {
            Entry::Occupied(mut entry) => {
                let record = entry.get_mut();
                record.blocked = true;
                record.last_attempt = now;
            }
            Entry::Vacant(entry) => {
                entry.insert(AttemptRecord {
                    attempts: self.config.max_attempts,
                    window_start: now,
                    last_attempt: now,
                    blocked: true,
                });
            }
        }
        debug!(identity, "Identity blocked after successful submission");
    }

    /// Remove the record for `identity`, returning it to first-contact state.
    ///
    /// No-op if no record exists.
    pub fn reset(&self, identity: &str) {
        let mut records = self.records.write();
        records.remove(identity);
    }

    /// Evict records old enough that neither the window nor a block could
    /// still apply to them.
    pub fn cleanup(&self) {
        let now = Instant::now();
        let max_age = self.config.max_record_age();
        let mut records = self.records.write();

        let before = records.len();
        records.retain(|_, record| record.age(now) <= max_age);
        let removed = before - records.len();

        if removed > 0 {
            debug!(
                removed,
                remaining = records.len(),
                "Evicted stale rate limit records"
            );
        }
    }

    /// Get the current stored record for `identity`.
    ///
    /// Returns `None` if the identity has never been seen or was evicted.
    pub fn status(&self, identity: &str) -> Option<AttemptRecord> {
        let records = self.records.read();
        records.get(identity).cloned()
    }

    /// Get the number of identities currently tracked.
    pub fn record_count(&self) -> usize {
        let records = self.records.read();
        records.len()
    }
}
