//! Keyed primitives consumed by the token engine.

pub mod aes_gcm;
pub mod hmac_sha256;
