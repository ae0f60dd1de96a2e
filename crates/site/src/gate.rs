//! Admin access gate.
//!
//! This is a placeholder-grade shared secret compared in plaintext, not an
//! authentication system. Anyone holding the password gets full admin
//! access for the rest of the session; nothing is persisted.

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{info, warn};

use crate::state::Session;

/// Placeholder password shared by every admin.
pub const PLACEHOLDER_PASSWORD: &str = "1234#";

/// Admin access errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Incorrect password. Please try again.")]
    IncorrectPassword,

    #[error("Admin access requires logging in first")]
    NotAuthenticated,
}

/// Checks the shared admin password and flips the session flag.
pub struct AdminGate {
    password: SecretString,
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate")
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Default for AdminGate {
    fn default() -> Self {
        Self::new(SecretString::from(PLACEHOLDER_PASSWORD.to_string()))
    }
}

impl AdminGate {
    #[must_use]
    pub const fn new(password: SecretString) -> Self {
        Self { password }
    }

    /// Check `input` against the password.
    ///
    /// On success the session becomes authenticated. On failure `input` is
    /// cleared so the caller's form starts over; there is no lockout.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::IncorrectPassword` on mismatch.
    pub fn login(&self, session: &mut Session, input: &mut String) -> Result<(), AuthError> {
        if input.as_str() == self.password.expose_secret() {
            session.authenticated = true;
            info!("Admin session started");
            Ok(())
        } else {
            input.clear();
            warn!("Rejected admin password");
            Err(AuthError::IncorrectPassword)
        }
    }

    /// End the admin session.
    pub fn logout(&self, session: &mut Session) {
        session.authenticated = false;
    }

    /// Fail unless the session is authenticated.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` for visitor sessions.
    pub const fn require(&self, session: &Session) -> Result<(), AuthError> {
        if session.authenticated {
            Ok(())
        } else {
            Err(AuthError::NotAuthenticated)
        }
    }
}
