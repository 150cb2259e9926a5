//! # Ports Layer
//!
//! The store reads and writes whole ledger snapshots through
//! `LedgerPersistence`. Adapters decide where they live.

use shared_types::{Ledger, LedgerType};

use crate::domain::LedgerError;

/// Durable storage for ledger snapshots (driven port).
pub trait LedgerPersistence: Send + Sync {
    /// Load the stored ledger of `kind`. `Ok(None)` when nothing is stored.
    fn load(&self, kind: LedgerType) -> Result<Option<Ledger>, LedgerError>;

    /// Replace the stored ledger of `ledger.kind()`.
    fn save(&self, ledger: &Ledger) -> Result<(), LedgerError>;
}
