//! # ECDSA Signatures (secp256k1)
//!
//! Pod identities and transaction signatures.
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - Low-S normalized output
//! - Signatures are over a 32-byte digest (the transaction id), DER encoded
//!   and hex serialized on the wire
//!
//! ## Identity
//!
//! A pod's address is its uncompressed public key (`04 || x || y`) in hex.
//! The private key never leaves the node.

use crate::CryptoError;
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use shared_types::Address;
use zeroize::Zeroize;

/// DER-encoded ECDSA signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Secp256k1Signature(Vec<u8>);

impl Secp256k1Signature {
    /// Parse a hex-encoded DER signature.
    pub fn from_hex(value: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(value).map_err(|_| CryptoError::InvalidSignatureFormat)?;
        Signature::from_der(&bytes).map_err(|_| CryptoError::InvalidSignatureFormat)?;
        Ok(Self(bytes))
    }

    pub fn as_der(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

/// secp256k1 ECDSA keypair.
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

impl Secp256k1KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from secret key bytes (32 bytes).
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        let signing_key =
            SigningKey::from_bytes((&bytes).into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Create from a hex-encoded secret key.
    pub fn from_hex(value: &str) -> Result<Self, CryptoError> {
        let mut decoded = hex::decode(value.trim()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        let result = <[u8; 32]>::try_from(decoded.as_slice())
            .map_err(|_| CryptoError::InvalidKeyLength {
                expected: 32,
                actual: decoded.len(),
            })
            .and_then(Self::from_bytes);
        decoded.zeroize();
        result
    }

    /// The pod address derived from this key.
    pub fn address(&self) -> Address {
        let point = self.signing_key.verifying_key().to_encoded_point(false);
        // An uncompressed SEC1 point is always 65 bytes with prefix 0x04.
        Address::parse(&hex::encode(point.as_bytes()))
            .unwrap_or_else(|_| unreachable!("uncompressed SEC1 point is a valid address"))
    }

    /// Sign a 32-byte digest (deterministic RFC 6979).
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<Secp256k1Signature, CryptoError> {
        let sig: Signature = self
            .signing_key
            .sign_prehash(digest)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        Ok(Secp256k1Signature(sig.to_der().as_bytes().to_vec()))
    }

    /// Secret key as hex (for the wallet key file).
    pub fn to_hex(&self) -> String {
        let mut bytes: [u8; 32] = self.signing_key.to_bytes().into();
        let encoded = hex::encode(bytes);
        bytes.zeroize();
        encoded
    }
}

impl Drop for Secp256k1KeyPair {
    fn drop(&mut self) {
        // Zeroize secret key material
        let mut bytes: [u8; 32] = self.signing_key.to_bytes().into();
        bytes.zeroize();
    }
}

/// Verify a signature over `digest` against the key encoded in `address`.
pub fn verify_digest(
    address: &Address,
    digest: &[u8; 32],
    signature: &Secp256k1Signature,
) -> Result<(), CryptoError> {
    let key_bytes = hex::decode(address.as_str()).map_err(|_| CryptoError::InvalidPublicKey)?;
    let verifying_key =
        VerifyingKey::from_sec1_bytes(&key_bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
    let sig = Signature::from_der(signature.as_der()).map_err(|_| CryptoError::InvalidSignature)?;

    verifying_key
        .verify_prehash(digest, &sig)
        .map_err(|_| CryptoError::SignatureVerificationFailed)
}
