//! Message payload and the outbound relay seam.

use async_trait::async_trait;

use crate::error::Result;

/// A message submitted through the contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    /// Sender's display name
    pub from_name: String,
    /// Sender's reply address
    pub from_email: String,
    /// Message subject
    pub subject: String,
    /// Message body
    pub body: String,
}

/// Trait for outbound message delivery.
///
/// The crate treats delivery as opaque: the controller only calls it after
/// the rate limiter grants permission, and only interprets success versus
/// failure. Implementations wrap whatever third-party relay the deployment
/// uses.
#[async_trait]
pub trait MessageRelay: Send + Sync {
    /// Deliver the message, returning an error on any transport failure.
    async fn send(&self, message: &ContactMessage) -> Result<()>;
}
