//! Periodic eviction of stale rate limit records.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

use super::limiter::RateLimiter;

/// Handle to a running background sweep task.
///
/// The task runs [`RateLimiter::cleanup`] at a fixed period until
/// [`stop`](Self::stop) is called. Dropping the handle without stopping it
/// aborts the task, so instances created in tests do not leak timers.
pub struct Sweeper {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl Sweeper {
    /// Start a background task that periodically evicts stale records from
    /// the given limiter.
    pub fn spawn(limiter: Arc<RateLimiter>, period: Duration) -> Sweeper {
        let (shutdown, mut signal) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately; skip it so the first sweep
            // happens one full period after startup.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        trace!("Running rate limit sweep");
                        limiter.cleanup();
                    }
                    _ = signal.changed() => {
                        debug!("Sweeper shutting down");
                        break;
                    }
                }
            }
        });

        Sweeper {
            shutdown,
            task: Some(task),
        }
    }

    /// Signal the sweep task to stop and wait for it to finish.
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RateLimitConfig;

    fn test_config() -> RateLimitConfig {
        RateLimitConfig {
            max_attempts: 3,
            window_ms: 300_000,
            block_duration_ms: 120_000,
        }
    }

    // Let the sweep task catch up with the paused clock.
    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_stale_records() {
        let limiter = Arc::new(RateLimiter::new(test_config()));
        let sweeper = Sweeper::spawn(Arc::clone(&limiter), Duration::from_secs(300));
        settle().await;

        limiter.check_rate_limit("X");
        assert_eq!(limiter.record_count(), 1);

        // Move past the eviction threshold; the sweep period at the 300s and
        // 600s marks fires along the way, and the one the record outlives
        // evicts it.
        tokio::time::advance(Duration::from_secs(601)).await;
        settle().await;
        tokio::time::advance(Duration::from_secs(300)).await;
        settle().await;

        assert_eq!(limiter.record_count(), 0);
        sweeper.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_leaves_fresh_records() {
        let limiter = Arc::new(RateLimiter::new(test_config()));
        let sweeper = Sweeper::spawn(Arc::clone(&limiter), Duration::from_secs(300));
        settle().await;

        limiter.check_rate_limit("X");

        // One sweep period elapses, but the record is still within its
        // maximum age.
        tokio::time::advance(Duration::from_secs(301)).await;
        settle().await;

        assert_eq!(limiter.record_count(), 1);
        sweeper.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_terminates_task() {
        let limiter = Arc::new(RateLimiter::new(test_config()));
        let sweeper = Sweeper::spawn(Arc::clone(&limiter), Duration::from_secs(300));

        sweeper.stop().await;
        // Stopping consumed the handle; the task is gone and no further
        // sweeps run against the limiter.
        assert_eq!(limiter.record_count(), 0);
    }
}
