use std::collections::HashMap;

use parking_lot::Mutex;
use shared_types::{Ledger, LedgerType};

use crate::domain::LedgerError;
use crate::ports::LedgerPersistence;

/// Keeps snapshots in memory. Used by tests and ephemeral nodes.
#[derive(Default)]
pub struct InMemoryPersistence {
    ledgers: Mutex<HashMap<LedgerType, Ledger>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerPersistence for InMemoryPersistence {
    fn load(&self, kind: LedgerType) -> Result<Option<Ledger>, LedgerError> {
        Ok(self.ledgers.lock().get(&kind).cloned())
    }

    fn save(&self, ledger: &Ledger) -> Result<(), LedgerError> {
        self.ledgers.lock().insert(ledger.kind(), ledger.clone());
        Ok(())
    }
}
