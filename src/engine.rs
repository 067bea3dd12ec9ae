//! Token generation and verification pipelines.
//!
//! Both operations are pure and synchronous: each call only touches its own
//! inputs plus a single wall-clock read, so concurrent use needs no locking.

use chrono::Utc;
use serde_json::Value;

use crate::{
    codec,
    crypto::{aes_gcm, hmac_sha256},
    error::{TokenError, TokenResult},
    types::{Claims, EXPIRY_CLAIM, Token},
};

/// Payload segment as transmitted, selected at generation time.
///
/// The wire format does not self-describe which variant was used; the
/// verifier must be told out-of-band through its `encrypt` argument.
enum PayloadSegment {
    Plain(Vec<u8>),
    Encrypted {
        nonce: [u8; aes_gcm::NONCE_LEN],
        ciphertext: Vec<u8>,
    },
}

impl PayloadSegment {
    fn seal(payload_bytes: Vec<u8>, secret: &[u8], encrypt: bool) -> TokenResult<Self> {
        if encrypt {
            let (nonce, ciphertext) = aes_gcm::encrypt(secret, &payload_bytes)?;
            Ok(Self::Encrypted { nonce, ciphertext })
        } else {
            Ok(Self::Plain(payload_bytes))
        }
    }

    fn from_decoded(bytes: Vec<u8>, encrypted: bool) -> TokenResult<Self> {
        if !encrypted {
            return Ok(Self::Plain(bytes));
        }
        // Anything shorter than nonce plus tag cannot be a valid blob.
        if bytes.len() <= aes_gcm::NONCE_LEN {
            return Err(TokenError::DecryptionFailed);
        }
        let (prefix, ciphertext) = bytes.split_at(aes_gcm::NONCE_LEN);
        let mut nonce = [0u8; aes_gcm::NONCE_LEN];
        nonce.copy_from_slice(prefix);
        Ok(Self::Encrypted {
            nonce,
            ciphertext: ciphertext.to_vec(),
        })
    }

    fn into_segment(self) -> String {
        match self {
            Self::Plain(bytes) => codec::encode_bytes(&bytes),
            Self::Encrypted { nonce, ciphertext } => {
                let mut blob = Vec::with_capacity(nonce.len() + ciphertext.len());
                blob.extend_from_slice(&nonce);
                blob.extend_from_slice(&ciphertext);
                codec::encode_bytes(&blob)
            }
        }
    }

    fn open(self, secret: &[u8]) -> TokenResult<Vec<u8>> {
        match self {
            Self::Plain(bytes) => Ok(bytes),
            Self::Encrypted { nonce, ciphertext } => {
                aes_gcm::decrypt(secret, &nonce, &ciphertext)
            }
        }
    }
}

/// Generate a signed, optionally encrypted, self-contained token.
///
/// The payload is copied and stamped with an `exp` claim of
/// `now + expiry_seconds` before encoding; a caller-provided `exp` is
/// overwritten. The signature covers the header and payload segments
/// exactly as transmitted, so when `encrypt` is set it covers the
/// ciphertext rather than the plaintext.
///
/// # Errors
///
/// `InvalidInput` for an empty secret or non-positive expiry; `InvalidKey`
/// when the secret cannot key the underlying primitives.
pub fn generate_token(
    header: &Claims,
    payload: &Claims,
    secret: impl AsRef<[u8]>,
    expiry_seconds: i64,
    encrypt: bool,
) -> TokenResult<Token> {
    generate_token_at(
        header,
        payload,
        secret.as_ref(),
        expiry_seconds,
        encrypt,
        Utc::now().timestamp(),
    )
}

pub(crate) fn generate_token_at(
    header: &Claims,
    payload: &Claims,
    secret: &[u8],
    expiry_seconds: i64,
    encrypt: bool,
    now: i64,
) -> TokenResult<Token> {
    if secret.is_empty() {
        return Err(TokenError::invalid_input("secret must not be empty"));
    }
    if expiry_seconds <= 0 {
        return Err(TokenError::invalid_input(
            "expiry must be a positive number of seconds",
        ));
    }

    let mut stamped = payload.clone();
    stamped.insert(EXPIRY_CLAIM.to_string(), Value::from(now + expiry_seconds));

    let header_segment = codec::encode(header)?;
    let payload_segment =
        PayloadSegment::seal(codec::to_bytes(&stamped)?, secret, encrypt)?.into_segment();

    let mut signing_input =
        String::with_capacity(header_segment.len() + 1 + payload_segment.len());
    signing_input.push_str(&header_segment);
    signing_input.push('.');
    signing_input.push_str(&payload_segment);

    let signature = hmac_sha256::sign(secret, signing_input.as_bytes())?;
    let signature_segment = codec::encode_bytes(&signature);

    tracing::debug!(encrypted = encrypt, "token issued");

    let mut token = signing_input;
    token.push('.');
    token.push_str(&signature_segment);
    Ok(Token(token))
}

/// Verify a token and recover its payload, `exp` claim included.
///
/// The signature is checked first, in constant time, before any ciphertext
/// or payload bytes are processed; unauthenticated input never reaches the
/// decryption or decoding stages. `encrypt` must match the mode the token
/// was generated with.
///
/// # Errors
///
/// `MalformedToken` / `MalformedSegment` for structural damage,
/// `InvalidSignature` for tampering or a wrong secret, `DecryptionFailed`
/// when the confidentiality layer rejects the payload blob,
/// `MalformedPayload` when decoded bytes are not a mapping, and
/// `TokenExpired` / `MissingExpiry` for expiry violations.
pub fn verify_token(
    token: &str,
    secret: impl AsRef<[u8]>,
    encrypt: bool,
) -> TokenResult<Claims> {
    verify_token_at(token, secret.as_ref(), encrypt, Utc::now().timestamp())
}

pub(crate) fn verify_token_at(
    token: &str,
    secret: &[u8],
    encrypt: bool,
    now: i64,
) -> TokenResult<Claims> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::MalformedToken);
    }
    let (header_segment, payload_segment, signature_segment) = (parts[0], parts[1], parts[2]);

    let signature = codec::decode_bytes(signature_segment)?;
    let mut signing_input =
        String::with_capacity(header_segment.len() + 1 + payload_segment.len());
    signing_input.push_str(header_segment);
    signing_input.push('.');
    signing_input.push_str(payload_segment);
    hmac_sha256::verify(secret, signing_input.as_bytes(), &signature)?;

    // The token is authentic from here on; only now touch the payload.
    let payload_bytes = codec::decode_bytes(payload_segment)?;
    let plaintext = PayloadSegment::from_decoded(payload_bytes, encrypt)?.open(secret)?;
    let payload = codec::parse(&plaintext)?;

    match payload.get(EXPIRY_CLAIM).and_then(Value::as_f64) {
        Some(exp) if (now as f64) > exp => Err(TokenError::TokenExpired),
        Some(_) => {
            tracing::debug!(encrypted = encrypt, "token verified");
            Ok(payload)
        }
        None => Err(TokenError::MissingExpiry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &[u8] = b"mysecretkey123";

    fn header() -> Claims {
        [
            ("alg".to_string(), json!("HS256")),
            ("typ".to_string(), json!("JWT")),
        ]
        .into_iter()
        .collect()
    }

    fn payload() -> Claims {
        [
            ("user_id".to_string(), json!(12345)),
            ("username".to_string(), json!("testuser")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn expiry_is_stamped_relative_to_the_generation_clock() {
        let now = 1_700_000_000;
        let token = generate_token_at(&header(), &payload(), SECRET, 3600, false, now).unwrap();
        let claims = verify_token_at(token.as_ref(), SECRET, false, now).unwrap();
        assert_eq!(claims["exp"], json!(now + 3600));
    }

    #[test]
    fn caller_payload_is_not_mutated_and_exp_is_overwritten() {
        let mut p = payload();
        p.insert("exp".to_string(), json!(1));
        let now = 1_700_000_000;
        let token = generate_token_at(&header(), &p, SECRET, 3600, false, now).unwrap();

        // Caller copy keeps its own value.
        assert_eq!(p["exp"], json!(1));

        let claims = verify_token_at(token.as_ref(), SECRET, false, now).unwrap();
        assert_eq!(claims["exp"], json!(now + 3600));
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = 1_700_000_000;
        let token = generate_token_at(&header(), &payload(), SECRET, 3600, false, now).unwrap();
        assert_eq!(
            verify_token_at(token.as_ref(), SECRET, false, now + 3601).unwrap_err(),
            TokenError::TokenExpired
        );
    }

    #[test]
    fn token_at_the_expiry_boundary_still_verifies() {
        let now = 1_700_000_000;
        let token = generate_token_at(&header(), &payload(), SECRET, 3600, false, now).unwrap();
        assert!(verify_token_at(token.as_ref(), SECRET, false, now + 3600).is_ok());
    }

    #[test]
    fn expired_encrypted_token_is_rejected_after_decryption() {
        let now = 1_700_000_000;
        let token = generate_token_at(&header(), &payload(), SECRET, 60, true, now).unwrap();
        assert_eq!(
            verify_token_at(token.as_ref(), SECRET, true, now + 61).unwrap_err(),
            TokenError::TokenExpired
        );
    }

    #[test]
    fn payload_without_expiry_is_rejected() {
        // Hand-assemble a correctly signed token whose payload lacks `exp`.
        let header_segment = codec::encode(&header()).unwrap();
        let payload_segment = codec::encode(&payload()).unwrap();
        let signing_input = format!("{header_segment}.{payload_segment}");
        let signature = hmac_sha256::sign(SECRET, signing_input.as_bytes()).unwrap();
        let token = format!("{signing_input}.{}", codec::encode_bytes(&signature));

        assert_eq!(
            verify_token_at(&token, SECRET, false, 1_700_000_000).unwrap_err(),
            TokenError::MissingExpiry
        );
    }

    #[test]
    fn non_numeric_expiry_is_rejected() {
        let mut p = payload();
        p.insert("exp".to_string(), json!("tomorrow"));
        let header_segment = codec::encode(&header()).unwrap();
        let payload_segment = codec::encode(&p).unwrap();
        let signing_input = format!("{header_segment}.{payload_segment}");
        let signature = hmac_sha256::sign(SECRET, signing_input.as_bytes()).unwrap();
        let token = format!("{signing_input}.{}", codec::encode_bytes(&signature));

        assert_eq!(
            verify_token_at(&token, SECRET, false, 1_700_000_000).unwrap_err(),
            TokenError::MissingExpiry
        );
    }

    #[test]
    fn fractional_expiry_values_are_accepted() {
        let mut p = payload();
        p.insert("exp".to_string(), json!(1_700_003_600.5));
        let header_segment = codec::encode(&header()).unwrap();
        let payload_segment = codec::encode(&p).unwrap();
        let signing_input = format!("{header_segment}.{payload_segment}");
        let signature = hmac_sha256::sign(SECRET, signing_input.as_bytes()).unwrap();
        let token = format!("{signing_input}.{}", codec::encode_bytes(&signature));

        assert!(verify_token_at(&token, SECRET, false, 1_700_000_000).is_ok());
        assert_eq!(
            verify_token_at(&token, SECRET, false, 1_700_003_601).unwrap_err(),
            TokenError::TokenExpired
        );
    }

    #[test]
    fn signature_covers_the_transmitted_ciphertext() {
        // Swapping the encrypted payload segment for its plaintext encoding
        // must break the signature even though the logical payload matches.
        let now = 1_700_000_000;
        let token = generate_token_at(&header(), &payload(), SECRET, 3600, true, now).unwrap();
        let parts: Vec<&str> = token.as_ref().split('.').collect();

        let mut stamped = payload();
        stamped.insert("exp".to_string(), json!(now + 3600));
        let forged = format!(
            "{}.{}.{}",
            parts[0],
            codec::encode(&stamped).unwrap(),
            parts[2]
        );
        assert_eq!(
            verify_token_at(&forged, SECRET, false, now).unwrap_err(),
            TokenError::InvalidSignature
        );
    }
}
