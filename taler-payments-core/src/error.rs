//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use taler_payments_merchant::MerchantError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Caller lacks the capability required for the operation
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Missing or malformed required field
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The encryption primitive failed; the secret was not stored
    #[error("Encryption failure: {0}")]
    EncryptionFailure(String),

    /// The candidate credentials did not pass the backend handshake
    #[error("Verification failed at stage '{stage}': {message}")]
    VerificationFailure {
        /// First failing handshake stage (`config`/`instance`/`auth`).
        stage: String,
        /// Failure description, never containing a secret.
        message: String,
    },

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Order operation error
    #[error("Order error: {0}")]
    OrderError(String),

    /// Merchant client error (converted from library)
    #[error("{0}")]
    Merchant(#[from] MerchantError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, wrong credentials, etc.);
    /// used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error`
    /// when returning `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::PermissionDenied(_)
            | Self::ValidationError(_)
            | Self::VerificationFailure { .. } => true,
            Self::Merchant(e) => e.is_expected(),
            _ => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_classification() {
        assert!(CoreError::ValidationError("empty base URL".to_string()).is_expected());
        assert!(CoreError::VerificationFailure {
            stage: "auth".to_string(),
            message: "HTTP 401".to_string(),
        }
        .is_expected());
        assert!(!CoreError::StorageError("disk full".to_string()).is_expected());
    }

    #[test]
    fn merchant_errors_delegate_expectedness() {
        let expected = CoreError::Merchant(MerchantError::InvalidCredentials {
            http_status: Some(401),
            raw_hint: None,
        });
        let unexpected = CoreError::Merchant(MerchantError::NetworkError {
            detail: "refused".to_string(),
        });
        assert!(expected.is_expected());
        assert!(!unexpected.is_expected());
    }

    #[test]
    fn display_verification_failure() {
        let e = CoreError::VerificationFailure {
            stage: "config".to_string(),
            message: "HTTP 404".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "Verification failed at stage 'config': HTTP 404"
        );
    }
}
