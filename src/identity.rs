//! Client identity derivation.
//!
//! With no backend in the deployment there is no trustworthy network address
//! to key attempts on, so the identity is a heuristic fingerprint built from
//! environment signals the browser exposes. The same environment yields the
//! same identity; collisions across users are an accepted tradeoff.

use base64::{engine::general_purpose, Engine as _};

use crate::error::{FormgateError, Result};

/// Prefix tagging derived identities.
const IDENTITY_PREFIX: &str = "client-";
/// Length the encoded fingerprint is truncated to.
const FINGERPRINT_LEN: usize = 16;

/// Environment signals used to derive a client identity.
///
/// Individual signals may be unavailable; derivation only fails when none
/// of them are present.
#[derive(Debug, Clone, Default)]
pub struct ClientSignals {
    /// Browser user agent string
    pub user_agent: Option<String>,
    /// Preferred language/locale
    pub language: Option<String>,
    /// Resolved timezone name
    pub timezone: Option<String>,
}

impl ClientSignals {
    /// Create signals from the three environment values.
    pub fn new(
        user_agent: impl Into<String>,
        language: impl Into<String>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            user_agent: Some(user_agent.into()),
            language: Some(language.into()),
            timezone: Some(timezone.into()),
        }
    }

    fn is_empty(&self) -> bool {
        fn blank(s: &Option<String>) -> bool {
            s.as_deref().map_or(true, |v| v.is_empty())
        }
        blank(&self.user_agent) && blank(&self.language) && blank(&self.timezone)
    }
}

/// Derive a stable identity string from client signals.
///
/// The signals are concatenated, base64-encoded, and truncated to a fixed
/// length under a constant prefix. Returns an error when no signals are
/// available at all; callers are expected to fail open in that case.
pub fn derive_identity(signals: &ClientSignals) -> Result<String> {
    if signals.is_empty() {
        return Err(FormgateError::Identity(
            "no client signals available".to_string(),
        ));
    }

    let raw = format!(
        "{}-{}-{}",
        signals.user_agent.as_deref().unwrap_or(""),
        signals.language.as_deref().unwrap_or(""),
        signals.timezone.as_deref().unwrap_or(""),
    );

    let encoded = general_purpose::STANDARD.encode(raw.as_bytes());
    let fingerprint: String = encoded.chars().take(FINGERPRINT_LEN).collect();

    Ok(format!("{}{}", IDENTITY_PREFIX, fingerprint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    fn signals() -> ClientSignals {
        ClientSignals::new("Mozilla/5.0 (X11; Linux x86_64)", "en-US", "Europe/Berlin")
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let a = assert_ok!(derive_identity(&signals()));
        let b = assert_ok!(derive_identity(&signals()));
        assert_eq!(a, b);
    }

    #[test]
    fn test_identity_shape() {
        let identity = assert_ok!(derive_identity(&signals()));
        assert!(identity.starts_with(IDENTITY_PREFIX));
        assert_eq!(identity.len(), IDENTITY_PREFIX.len() + FINGERPRINT_LEN);
    }

    #[test]
    fn test_different_environments_differ() {
        let a = assert_ok!(derive_identity(&signals()));
        let b = assert_ok!(derive_identity(&ClientSignals::new(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X)",
            "fr-FR",
            "Europe/Paris",
        )));
        assert_ne!(a, b);
    }

    #[test]
    fn test_partial_signals_are_accepted() {
        let partial = ClientSignals {
            user_agent: None,
            language: Some("en-US".to_string()),
            timezone: None,
        };
        let identity = assert_ok!(derive_identity(&partial));
        assert!(identity.starts_with(IDENTITY_PREFIX));
    }

    #[test]
    fn test_no_signals_is_an_error() {
        assert!(derive_identity(&ClientSignals::default()).is_err());

        let all_blank = ClientSignals {
            user_agent: Some(String::new()),
            language: Some(String::new()),
            timezone: Some(String::new()),
        };
        assert!(derive_identity(&all_blank).is_err());
    }
}
