//! Rate limiting logic and state management.

mod limiter;
mod record;
mod sweeper;

pub use limiter::{Decision, RateLimiter};
pub use record::AttemptRecord;
pub use sweeper::Sweeper;
