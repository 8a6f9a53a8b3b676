//! Bearer credential handed to the core by the auth collaborator.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::error::GbpError;

/// Opaque bearer token with an optional expiry instant.
///
/// The core never issues or refreshes credentials; it only reads them.
#[derive(Clone)]
pub struct Credential {
    token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_at: None,
        }
    }

    #[must_use]
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Checks that the token is present and not expired at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`GbpError::Auth`] for an empty token or an expiry at or
    /// before `now`.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), GbpError> {
        if self.token.trim().is_empty() {
            return Err(GbpError::Auth("missing bearer credential".to_string()));
        }
        if self.expires_at.is_some_and(|at| at <= now) {
            return Err(GbpError::Auth("bearer credential expired".to_string()));
        }
        Ok(())
    }

    /// Hex SHA-256 of the token, used to scope cache entries per caller
    /// without keeping the raw token as a key.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.token.as_bytes());
        format!("{digest:x}")
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"[redacted]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
