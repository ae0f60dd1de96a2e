//! Unified error handling.
//!
//! Every fallible operation in this crate returns [`SiteError`], which wraps
//! the per-layer errors so callers can match on the layer that failed.

use balaji_core::ValidationError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::gate::AuthError;
use crate::image::ImageError;
use crate::local::LocalStoreError;
use crate::remote::RemoteStoreError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum SiteError {
    /// Admin input is incomplete. Nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Remote catalog operation failed.
    #[error("Remote store error: {0}")]
    Remote(#[from] RemoteStoreError),

    /// Local persisted store operation failed.
    #[error("Local store error: {0}")]
    Local(#[from] LocalStoreError),

    /// Admin access was denied.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Image upload could not be read.
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A messaging link could not be built.
    #[error("Invalid link: {0}")]
    Link(#[from] url::ParseError),

    /// The link opener failed to hand off the link.
    #[error("Could not open link: {0}")]
    Open(String),

    /// Product does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Another catalog mutation is still running.
    #[error("Another change is still being saved")]
    WriteInFlight,

    /// A previous inquiry is still being sent.
    #[error("An inquiry is already being sent")]
    SendInFlight,
}

impl SiteError {
    /// Whether the error came from user input rather than infrastructure.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::Auth(_)
                | Self::NotFound(_)
                | Self::WriteInFlight
                | Self::SendInFlight
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_passes_through() {
        let err = SiteError::from(ValidationError::MissingImage);
        assert_eq!(err.to_string(), "Please select an image");
        assert!(err.is_user_error());
    }

    #[test]
    fn test_auth_message_passes_through() {
        let err = SiteError::from(AuthError::IncorrectPassword);
        assert_eq!(err.to_string(), "Incorrect password. Please try again.");
    }

    #[test]
    fn test_remote_error_is_not_user_error() {
        let err = SiteError::from(RemoteStoreError::RateLimited(5));
        assert!(!err.is_user_error());
    }
}
