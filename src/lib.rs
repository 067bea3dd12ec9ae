//! Symmetric signed (and optionally encrypted) self-contained tokens.
//!
//! This crate provides two operations:
//! - [`generate_token`]: stamp a payload mapping with an expiry, optionally
//!   encrypt it, sign header and payload with HMAC-SHA256, and assemble a
//!   three-segment token string.
//! - [`verify_token`]: the inverse — authenticate, optionally decrypt, and
//!   recover the payload, rejecting tampered, mis-keyed, or expired tokens.
//!
//! Both operations are stateless, synchronous, and safe to call from any
//! number of threads. Nothing beyond the shared secret is needed to verify
//! a token.
//!
//! ```no_run
//! use serde_json::json;
//! use tokenseal::{Claims, generate_token, verify_token};
//!
//! # fn main() -> tokenseal::TokenResult<()> {
//! let header: Claims = [("alg".into(), json!("HS256")), ("typ".into(), json!("JWT"))]
//!     .into_iter()
//!     .collect();
//! let payload: Claims = [("user_id".into(), json!(12345))].into_iter().collect();
//!
//! let token = generate_token(&header, &payload, "mysecretkey123", 3600, false)?;
//! let claims = verify_token(token.as_ref(), "mysecretkey123", false)?;
//! assert_eq!(claims["user_id"], json!(12345));
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub(crate) mod crypto;
mod engine;
mod error;
mod types;

pub use engine::{generate_token, verify_token};
pub use error::{TokenError, TokenResult};
pub use types::{Claims, EXPIRY_CLAIM, Token};
