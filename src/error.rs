//! Error types for token generation and verification.

use thiserror::Error;

/// Token operation result type.
pub type TokenResult<T> = Result<T, TokenError>;

/// Errors surfaced by token generation and verification.
///
/// Every failure path maps to exactly one variant; no partial payload is
/// ever returned alongside an error, and no variant carries secret material
/// in its message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Caller supplied unusable arguments (empty secret, non-positive expiry).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Secret cannot satisfy the keyed primitive's key contract.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Token does not split into exactly three segments.
    #[error("malformed token: expected three dot-separated segments")]
    MalformedToken,

    /// Segment is not valid URL-safe base64.
    #[error("malformed segment: invalid transport encoding")]
    MalformedSegment,

    /// Decoded segment bytes are not a JSON mapping.
    #[error("malformed payload: decoded bytes are not a JSON mapping")]
    MalformedPayload,

    /// Signature mismatch. Tampering and a wrong secret are
    /// indistinguishable by design.
    #[error("invalid token signature")]
    InvalidSignature,

    /// Authenticated decryption of the payload segment failed.
    #[error("payload decryption failed")]
    DecryptionFailed,

    /// The token's expiration instant lies in the past.
    #[error("token has expired")]
    TokenExpired,

    /// The decoded payload has no numeric `exp` field.
    #[error("token payload is missing a numeric expiry")]
    MissingExpiry,
}

impl TokenError {
    /// Create an invalid input error.
    #[inline]
    #[must_use]
    pub fn invalid_input(msg: &str) -> Self {
        TokenError::InvalidInput(msg.to_string())
    }

    /// Create an invalid key error.
    #[inline]
    #[must_use]
    pub fn invalid_key(msg: &str) -> Self {
        TokenError::InvalidKey(msg.to_string())
    }
}
