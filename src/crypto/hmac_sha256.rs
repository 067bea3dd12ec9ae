//! HMAC-SHA256 signing and constant-time verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{TokenError, TokenResult};

type HmacSha256 = Hmac<Sha256>;

/// Compute the MAC over the signing input.
pub fn sign(secret: &[u8], data: &[u8]) -> TokenResult<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|_| TokenError::invalid_key("secret unusable as HMAC key"))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Recompute the MAC and compare it against the presented signature.
///
/// The comparison is constant-time; length mismatches and byte mismatches
/// are indistinguishable to a timing observer.
pub fn verify(secret: &[u8], data: &[u8], signature: &[u8]) -> TokenResult<()> {
    let expected = sign(secret, data)?;
    if expected.ct_eq(signature).into() {
        Ok(())
    } else {
        Err(TokenError::InvalidSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_matching_signature() {
        let sig = sign(b"secret", b"header.payload").unwrap();
        assert!(verify(b"secret", b"header.payload", &sig).is_ok());
    }

    #[test]
    fn rejects_flipped_byte() {
        let mut sig = sign(b"secret", b"header.payload").unwrap();
        sig[0] ^= 0x01;
        assert_eq!(
            verify(b"secret", b"header.payload", &sig).unwrap_err(),
            TokenError::InvalidSignature
        );
    }

    #[test]
    fn rejects_truncated_signature() {
        let sig = sign(b"secret", b"data").unwrap();
        assert_eq!(
            verify(b"secret", b"data", &sig[..sig.len() - 1]).unwrap_err(),
            TokenError::InvalidSignature
        );
    }

    #[test]
    fn rejects_different_key() {
        let sig = sign(b"secret-a", b"data").unwrap();
        assert_eq!(
            verify(b"secret-b", b"data", &sig).unwrap_err(),
            TokenError::InvalidSignature
        );
    }

    #[test]
    fn mac_output_is_deterministic_and_fixed_length() {
        let a = sign(b"k", b"data").unwrap();
        let b = sign(b"k", b"data").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }
}
