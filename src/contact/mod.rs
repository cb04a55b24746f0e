//! Contact form submission flow.

mod controller;
mod relay;

pub use controller::{format_wait, rate_limit_message, ContactForm, SubmitOutcome};
pub use relay::{ContactMessage, MessageRelay};
