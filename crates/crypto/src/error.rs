//! Error types for the crypto crate.

use thiserror::Error;

/// Result type alias for crypto operations.
pub type Result<T> = std::result::Result<T, CryptoError>;

/// Errors that can occur while signing or authenticating callbacks.
///
/// [`crate::verify_callback`] never returns these; it collapses every
/// failure into `false`. They surface from the richer
/// [`crate::LoginVerifier::authenticate`] and from query parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Signature verification failed
    #[error("Signature mismatch")]
    SignatureMismatch,

    /// A required callback field is absent
    #[error("Missing callback field: {0}")]
    MissingField(&'static str),

    /// A callback field could not be interpreted
    #[error("Invalid callback field {field}: {reason}")]
    InvalidField {
        /// Field name
        field: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// The same key appeared more than once in a query string
    #[error("Duplicate callback field: {0}")]
    DuplicateField(String),

    /// The callback exceeds the configured size bounds
    #[error("Callback exceeds limits: {0}")]
    LimitExceeded(String),

    /// The callback was signed too long ago (or in the future)
    #[error("Callback expired: issued {age_secs}s ago, max {max_age_secs}s")]
    Expired {
        /// Age of the callback in seconds (negative when issued in the future)
        age_secs: i64,
        /// Maximum accepted age in seconds, 0 when none is configured
        max_age_secs: i64,
    },
}

impl CryptoError {
    /// Short machine-readable name, safe to put in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SignatureMismatch => "signature_mismatch",
            Self::MissingField(_) => "missing_field",
            Self::InvalidField { .. } => "invalid_field",
            Self::DuplicateField(_) => "duplicate_field",
            Self::LimitExceeded(_) => "limit_exceeded",
            Self::Expired { .. } => "expired",
        }
    }
}
