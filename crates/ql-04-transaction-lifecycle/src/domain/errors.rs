use shared_crypto::CryptoError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("quorum not assigned")]
    QuorumNotAssigned,

    #[error("transaction has no id")]
    MissingId,

    #[error("transaction has no signature")]
    MissingSignature,

    #[error("transaction has no hash")]
    MissingHash,

    #[error("transaction id mismatch: carried {carried}, derived {derived}")]
    IdMismatch { carried: String, derived: String },

    #[error("transaction hash mismatch: carried {carried}, derived {derived}")]
    HashMismatch { carried: String, derived: String },

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}
