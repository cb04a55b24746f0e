//! Form submission control flow.
//!
//! Ties the identity deriver, the rate limiter, and the outbound relay
//! together: check, send, then confirm the block on success. Identity
//! derivation failures fail open rather than locking out users whose
//! environment exposes no signals.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::identity::{derive_identity, ClientSignals};
use crate::ratelimit::{Decision, RateLimiter};

use super::relay::{ContactMessage, MessageRelay};

/// Outcome of a contact form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The message was delivered and the identity is now blocked for the
    /// rest of the block cycle.
    Sent,
    /// The rate limiter rejected the attempt; nothing was sent.
    RateLimited {
        /// Time until the identity may try again
        retry_after: Duration,
    },
    /// The relay failed; the user may retry within their remaining
    /// attempt budget.
    RelayFailed {
        /// Human-readable failure reason
        reason: String,
    },
}

/// The contact form controller.
pub struct ContactForm<R: MessageRelay> {
    limiter: Arc<RateLimiter>,
    relay: R,
}

impl<R: MessageRelay> ContactForm<R> {
    /// Create a new controller over a shared limiter and a relay.
    pub fn new(limiter: Arc<RateLimiter>, relay: R) -> Self {
        Self { limiter, relay }
    }

    /// Submit a message on behalf of the client described by `signals`.
    ///
    /// A successful delivery immediately blocks the identity, so at most one
    /// message goes out per block cycle regardless of remaining attempt
    /// budget. A delivery failure does not block; the attempt recorded by
    /// the check still counts against the window.
    pub async fn submit(
        &self,
        signals: &ClientSignals,
        message: &ContactMessage,
    ) -> SubmitOutcome {
        let identity = match derive_identity(signals) {
            Ok(identity) => Some(identity),
            Err(e) => {
                // Fail open: a client we cannot fingerprint is not throttled.
                warn!(error = %e, "Identity derivation failed, skipping rate limit");
                None
            }
        };

        if let Some(identity) = &identity {
            match self.limiter.check_rate_limit(identity) {
                Decision::Blocked { retry_after } => {
                    debug!(%identity, ?retry_after, "Submission rejected by rate limit");
                    return SubmitOutcome::RateLimited { retry_after };
                }
                Decision::Allowed { attempts_left } => {
                    debug!(%identity, attempts_left, "Submission permitted");
                }
            }
        }

        match self.relay.send(message).await {
            Ok(()) => {
                if let Some(identity) = &identity {
                    self.limiter.block_after_success(identity);
                }
                info!("Contact message relayed");
                SubmitOutcome::Sent
            }
            Err(e) => {
                warn!(error = %e, "Message relay failed");
                SubmitOutcome::RelayFailed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Format a wait duration for display, e.g. `"3m 20s"` or `"45s"`.
pub fn format_wait(wait: Duration) -> String {
    let total_secs = wait.as_secs();
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;

    if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// User-facing message for a rate-limited submission.
pub fn rate_limit_message(retry_after: Duration) -> String {
    format!(
        "Rate limit reached. Please try again in {}.",
        format_wait(retry_after)
    )
}
