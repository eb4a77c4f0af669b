//! HMAC-SHA256 and SHA-256 helpers.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::{CryptoError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Length in bytes of a SHA-256 digest (and of an HMAC-SHA256 tag).
pub const DIGEST_LEN: usize = 32;

/// Hash `data` with SHA-256, returning the raw digest.
pub fn sha256(data: &[u8]) -> [u8; DIGEST_LEN] {
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&Sha256::digest(data));
    out
}

/// Compute a raw HMAC-SHA256 tag.
///
/// # Arguments
/// * `key` - Secret key bytes (any length)
/// * `message` - Message to sign
pub fn hmac_sha256_raw(key: &[u8], message: &[u8]) -> [u8; DIGEST_LEN] {
    let mut mac = HmacSha256::new_from_slice(key)
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any size"));
    mac.update(message);
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

/// Generate HMAC-SHA256 signature.
///
/// # Returns
/// Signature as lowercase hex string
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> String {
    hex::encode(hmac_sha256_raw(key, message))
}

/// Verify a signature against an expected value.
///
/// # Arguments
/// * `signature` - The signature to verify (hex-encoded)
/// * `expected` - The expected signature (hex-encoded)
///
/// # Returns
/// Ok(()) if signatures match, Err otherwise
pub fn verify_signature(signature: &str, expected: &str) -> Result<()> {
    if crate::constant_time_compare(signature.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        Err(CryptoError::SignatureMismatch)
    }
}
