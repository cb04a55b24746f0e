//! Error types for the Formgate crate.

use thiserror::Error;

/// Main error type for Formgate operations.
///
/// Rate limit rejections are not errors: a blocked identity is reported as
/// a first-class [`Decision`](crate::ratelimit::Decision) value.
#[derive(Error, Debug)]
pub enum FormgateError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Identity derivation errors (e.g., no client signals available)
    #[error("Identity error: {0}")]
    Identity(String),

    /// Message relay errors
    #[error("Relay error: {0}")]
    Relay(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Formgate operations.
pub type Result<T> = std::result::Result<T, FormgateError>;
