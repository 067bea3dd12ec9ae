//! Public type definitions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON mapping used for both token headers and payloads.
///
/// Headers are transported and signed but never interpreted by the engine;
/// payloads are caller data augmented with the reserved expiry field.
pub type Claims = Map<String, Value>;

/// Reserved payload key holding the expiration instant in unix seconds.
///
/// Stamped into every issued payload; a caller-provided value under this
/// key is overwritten.
pub const EXPIRY_CLAIM: &str = "exp";

/// Issued token string wrapper.
///
/// A token is an immutable, self-contained three-segment value; nothing
/// beyond the secret is needed to verify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(pub String);

impl From<String> for Token {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
