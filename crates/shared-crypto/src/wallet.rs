//! # Wallet Key Provider
//!
//! Signing code asks a `KeyProvider` for key material on demand and never
//! touches storage itself.

use std::fs;
use std::path::{Path, PathBuf};

use shared_types::Address;

use crate::ecdsa::Secp256k1KeyPair;
use crate::CryptoError;

/// Source of the node's identity key.
pub trait KeyProvider: Send + Sync {
    /// The private key used to sign outgoing transactions.
    fn key_pair(&self) -> &Secp256k1KeyPair;

    /// The address matching `key_pair()`.
    fn address(&self) -> Address {
        self.key_pair().address()
    }
}

/// In-memory key, used by tests and ephemeral nodes.
pub struct StaticKeyProvider {
    key_pair: Secp256k1KeyPair,
    address: Address,
}

impl StaticKeyProvider {
    pub fn new(key_pair: Secp256k1KeyPair) -> Self {
        let address = key_pair.address();
        Self { key_pair, address }
    }

    /// A fresh random identity.
    pub fn generate() -> Self {
        Self::new(Secp256k1KeyPair::generate())
    }
}

impl KeyProvider for StaticKeyProvider {
    fn key_pair(&self) -> &Secp256k1KeyPair {
        &self.key_pair
    }

    fn address(&self) -> Address {
        self.address.clone()
    }
}

/// Key stored as a hex string in a file.
pub struct FileKeyProvider {
    path: PathBuf,
    inner: StaticKeyProvider,
}

impl FileKeyProvider {
    /// Load the key at `path`, generating and saving a new one if the file
    /// does not exist.
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self, CryptoError> {
        let path = path.as_ref().to_path_buf();
        let key_pair = if path.exists() {
            let contents =
                fs::read_to_string(&path).map_err(|e| CryptoError::KeyStorage(e.to_string()))?;
            Secp256k1KeyPair::from_hex(&contents)?
        } else {
            let key_pair = Secp256k1KeyPair::generate();
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .map_err(|e| CryptoError::KeyStorage(e.to_string()))?;
                }
            }
            fs::write(&path, key_pair.to_hex())
                .map_err(|e| CryptoError::KeyStorage(e.to_string()))?;
            key_pair
        };

        Ok(Self {
            path,
            inner: StaticKeyProvider::new(key_pair),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyProvider for FileKeyProvider {
    fn key_pair(&self) -> &Secp256k1KeyPair {
        self.inner.key_pair()
    }

    fn address(&self) -> Address {
        self.inner.address()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_provider_address_matches_key() {
        let provider = StaticKeyProvider::generate();
        assert_eq!(provider.address(), provider.key_pair().address());
    }

    #[test]
    fn test_file_provider_creates_then_reloads_same_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys").join("wallet.key");

        let created = FileKeyProvider::load_or_create(&path).unwrap();
        assert!(path.exists());

        let reloaded = FileKeyProvider::load_or_create(&path).unwrap();
        assert_eq!(created.address(), reloaded.address());
    }

    #[test]
    fn test_file_provider_rejects_corrupt_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.key");
        std::fs::write(&path, "not-a-key").unwrap();

        assert!(FileKeyProvider::load_or_create(&path).is_err());
    }
}
