//! AES-256-GCM payload confidentiality with HKDF-derived keys.
//!
//! The caller secret is stretched to a 32-byte cipher key with HKDF-SHA256,
//! so secrets of any non-zero length satisfy the cipher's key contract.
//! Each encryption draws a fresh 96-bit nonce; the nonce travels with the
//! ciphertext and is split back off before decryption.

use aes_gcm::{
    Aes256Gcm, KeyInit,
    aead::{Aead, generic_array::GenericArray},
};
use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{TokenError, TokenResult};

/// Nonce length in bytes (96 bits, the AES-GCM standard size).
pub const NONCE_LEN: usize = 12;

const KEY_LEN: usize = 32;
const KEY_INFO: &[u8] = b"tokenseal payload encryption key";

fn derive_key(secret: &[u8]) -> TokenResult<Zeroizing<[u8; KEY_LEN]>> {
    let hk = Hkdf::<Sha256>::new(None, secret);
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    hk.expand(KEY_INFO, key.as_mut())
        .map_err(|_| TokenError::invalid_key("HKDF key derivation failed"))?;
    Ok(key)
}

/// Encrypt plaintext under a key derived from `secret`.
///
/// Returns the fresh nonce and the ciphertext (authentication tag
/// appended by the cipher).
pub fn encrypt(secret: &[u8], plaintext: &[u8]) -> TokenResult<([u8; NONCE_LEN], Vec<u8>)> {
    let key = derive_key(secret)?;
    let cipher = Aes256Gcm::new(GenericArray::from_slice(key.as_ref()));

    let mut nonce = [0u8; NONCE_LEN];
    rand::rng().fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(GenericArray::from_slice(&nonce), plaintext)
        .map_err(|_| TokenError::invalid_key("secret unusable for payload encryption"))?;

    Ok((nonce, ciphertext))
}

/// Decrypt a nonce/ciphertext pair produced by [`encrypt`].
///
/// Fails when the authentication tag does not verify, which covers both
/// tampered ciphertext and a wrong secret.
pub fn decrypt(secret: &[u8], nonce: &[u8; NONCE_LEN], ciphertext: &[u8]) -> TokenResult<Vec<u8>> {
    let key = derive_key(secret)?;
    let cipher = Aes256Gcm::new(GenericArray::from_slice(key.as_ref()));

    cipher
        .decrypt(GenericArray::from_slice(nonce), ciphertext)
        .map_err(|_| TokenError::DecryptionFailed)
}
