//! # SHA-256 Content Hashing
//!
//! Transaction ids and entry fingerprints are SHA-256 digests over the
//! concatenation of their string fields, rendered as lowercase hex.

use sha2::{Digest, Sha256};

use crate::CryptoError;

/// SHA-256 output (256-bit).
pub type Hash = [u8; 32];

/// Hash the concatenation of `parts`.
pub fn sha256_concat(parts: &[&str]) -> Hash {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    hasher.finalize().into()
}

/// Hex digest of the concatenation of `parts`.
pub fn sha256_hex(parts: &[&str]) -> String {
    hex::encode(sha256_concat(parts))
}

/// Decode a hex digest back into 32 bytes.
pub fn digest_from_hex(value: &str) -> Result<Hash, CryptoError> {
    let bytes = hex::decode(value).map_err(|e| CryptoError::InvalidDigest(e.to_string()))?;
    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| CryptoError::InvalidDigest(format!("expected 32 bytes, got {}", bytes.len())))
}
