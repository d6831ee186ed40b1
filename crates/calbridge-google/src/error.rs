//! Error types for bridge operations.
//!
//! The taxonomy mirrors what the transports need to distinguish: input
//! problems (`Validation`), missing setup (`CredentialsMissing`,
//! `AuthFailed`), credentials the provider no longer accepts
//! (`Unauthorized`), and everything else from the provider.

use thiserror::Error;

use calbridge_core::ValidationError;

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors that can occur while authenticating or talking to the provider.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// No parseable OAuth client credentials were found.
    #[error("credentials missing: {0}")]
    CredentialsMissing(String),

    /// No usable token and no way to obtain one in this environment.
    #[error("{0}")]
    AuthFailed(String),

    /// The provider rejected the credential (expired or revoked grant).
    /// Callers should re-run the interactive auth flow.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The request failed validation before any provider work.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Connection-level failure talking to the provider.
    #[error("network error: {0}")]
    Network(String),

    /// The provider returned a body we could not decode.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// Any other provider failure, surfaced with the provider's message.
    #[error("provider error ({status}): {message}")]
    Provider {
        /// HTTP status from the provider.
        status: u16,
        /// Body or message from the provider.
        message: String,
    },
}

impl BridgeError {
    /// Creates a credentials-missing error.
    pub fn credentials_missing(message: impl Into<String>) -> Self {
        Self::CredentialsMissing(message.into())
    }

    /// Creates an auth-failed error.
    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self::AuthFailed(message.into())
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an invalid-response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Creates a provider error from a status and message.
    pub fn provider(status: u16, message: impl Into<String>) -> Self {
        Self::Provider {
            status,
            message: message.into(),
        }
    }

    /// True when the caller should be told to re-run authentication.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        let err = BridgeError::credentials_missing("no credentials.json");
        assert_eq!(err.to_string(), "credentials missing: no credentials.json");

        let err = BridgeError::auth_failed("no token");
        assert_eq!(err.to_string(), "no token");

        let err = BridgeError::provider(500, "backend exploded");
        assert_eq!(err.to_string(), "provider error (500): backend exploded");
    }

    #[test]
    fn validation_error_passes_through() {
        let err: BridgeError = ValidationError::MissingFields.into();
        assert_eq!(err.to_string(), "title, startISO, endISO required");
    }

    #[test]
    fn unauthorized_classification() {
        assert!(BridgeError::unauthorized("invalid_grant").is_unauthorized());
        assert!(!BridgeError::provider(500, "boom").is_unauthorized());
    }
}
