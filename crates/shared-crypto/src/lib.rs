//! # Shared Crypto
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `ecdsa` | secp256k1 | Pod identity, transaction signing |
//! | `hashing` | SHA-256 | Transaction ids and entry fingerprints |
//! | `wallet` | - | Key material on demand |
//!
//! ## Security Properties
//!
//! - **secp256k1**: RFC 6979 deterministic, low-S normalization
//! - Secret key bytes are zeroized after use

#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod hashing;
pub mod wallet;

// Re-exports
pub use ecdsa::{verify_digest, Secp256k1KeyPair, Secp256k1Signature};
pub use errors::CryptoError;
pub use hashing::{digest_from_hex, sha256_concat, sha256_hex, Hash};
pub use wallet::{FileKeyProvider, KeyProvider, StaticKeyProvider};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
