//! # Ledger Store Service
//!
//! Single writer per ledger kind. Each append persists the new snapshot
//! before it becomes visible, so a failed write leaves memory and disk in
//! agreement.

use std::sync::Arc;

use parking_lot::RwLock;
use shared_types::{Address, Ledger, LedgerType, Transaction};
use tracing::{debug, info};

use crate::adapters::InMemoryPersistence;
use crate::domain::{balance, LedgerError};
use crate::ports::LedgerPersistence;

pub struct LedgerStore {
    owner: RwLock<Ledger>,
    witness: RwLock<Ledger>,
    persistence: Arc<dyn LedgerPersistence>,
}

impl LedgerStore {
    /// Open both ledgers from `persistence`; missing ledgers start empty.
    pub fn open(persistence: Arc<dyn LedgerPersistence>) -> Result<Self, LedgerError> {
        let owner = persistence
            .load(LedgerType::Owner)?
            .unwrap_or_else(|| Ledger::new(LedgerType::Owner));
        let witness = persistence
            .load(LedgerType::Witness)?
            .unwrap_or_else(|| Ledger::new(LedgerType::Witness));

        info!(
            "[ql-02] Ledger store opened: {} owner entries, {} witness entries",
            owner.len(),
            witness.len()
        );
        Ok(Self {
            owner: RwLock::new(owner),
            witness: RwLock::new(witness),
            persistence,
        })
    }

    /// Empty store backed by memory only.
    pub fn in_memory() -> Self {
        Self {
            owner: RwLock::new(Ledger::new(LedgerType::Owner)),
            witness: RwLock::new(Ledger::new(LedgerType::Witness)),
            persistence: Arc::new(InMemoryPersistence::new()),
        }
    }

    fn slot(&self, kind: LedgerType) -> &RwLock<Ledger> {
        match kind {
            LedgerType::Owner => &self.owner,
            LedgerType::Witness => &self.witness,
        }
    }

    /// Snapshot of a ledger.
    pub fn get(&self, kind: LedgerType) -> Ledger {
        self.slot(kind).read().clone()
    }

    /// Append `entry`, persisting the result.
    ///
    /// Returns `Ok(false)` if an entry with the same id is already present.
    pub fn append(&self, entry: &Transaction, kind: LedgerType) -> Result<bool, LedgerError> {
        let mut current = self.slot(kind).write();
        let mut next = current.clone();
        if !next.append(entry)? {
            debug!("[ql-02] Skipping duplicate entry in {:?} ledger", kind);
            return Ok(false);
        }
        self.persistence.save(&next)?;
        *current = next;
        debug!("[ql-02] Appended to {:?} ledger ({} entries)", kind, current.len());
        Ok(true)
    }

    pub fn entry_by_id(&self, id: &str, kind: LedgerType) -> Option<Transaction> {
        self.slot(kind).read().entry_by_id(id).cloned()
    }

    pub fn len(&self, kind: LedgerType) -> usize {
        self.slot(kind).read().len()
    }

    /// Balance of `address` over the owner ledger.
    pub fn balance(&self, address: &Address) -> i128 {
        balance(&self.owner.read(), address)
    }

    /// Seed an empty owner ledger with `genesis`.
    ///
    /// Returns `Ok(false)` and leaves the ledger alone if it already has
    /// entries.
    pub fn seed_genesis(&self, genesis: &Transaction) -> Result<bool, LedgerError> {
        if self.len(LedgerType::Owner) > 0 {
            return Ok(false);
        }
        let seeded = self.append(genesis, LedgerType::Owner)?;
        if seeded {
            info!(
                "[ql-02] Seeded genesis transfer of {} to {}",
                genesis.amount.unwrap_or(0),
                genesis.to.short()
            );
        }
        Ok(seeded)
    }

    /// Clear both ledgers.
    pub fn wipe(&self) -> Result<(), LedgerError> {
        for kind in LedgerType::ALL {
            let mut ledger = self.slot(kind).write();
            let empty = Ledger::new(kind);
            self.persistence.save(&empty)?;
            *ledger = empty;
        }
        info!("[ql-02] Ledgers wiped");
        Ok(())
    }
}
