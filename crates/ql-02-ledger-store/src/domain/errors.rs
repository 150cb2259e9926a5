use shared_types::LedgerEntryError;
use thiserror::Error;

/// Ledger store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("invalid ledger entry: {0}")]
    Entry(#[from] LedgerEntryError),

    #[error("ledger persistence failed: {message}")]
    Persistence { message: String },

    #[error("corrupt ledger file {path}: {message}")]
    Corrupt { path: String, message: String },
}
