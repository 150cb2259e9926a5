//! Applying a `TRANSACTION_COMMIT`.

use ql_04_transaction_lifecycle::{verify_hash, verify_id, verify_signature};
use shared_types::{LedgerType, Transaction};
use tracing::{info, warn};

use super::ValidationService;

impl ValidationService {
    /// Store a committed transfer in whichever ledgers it concerns us.
    /// Returns whether anything new was written.
    pub fn apply_commit(&self, tx: &Transaction) -> bool {
        let id = tx.id.clone().unwrap_or_default();
        let verified = verify_id(tx)
            .and_then(|_| verify_signature(tx))
            .and_then(|_| verify_hash(tx));
        if let Err(err) = verified {
            warn!(tx_id = %id, error = %err, "[ql-05] Ignoring unverifiable commit");
            return false;
        }
        let Some(quorum) = tx.quorum() else {
            warn!(tx_id = %id, "[ql-05] Ignoring commit without quorum");
            return false;
        };

        let me = self.address();
        let mut targets = Vec::new();
        if quorum.contains(&me) {
            targets.push(LedgerType::Witness);
        }
        if tx.to == me || tx.from == me {
            targets.push(LedgerType::Owner);
        }

        let mut written = false;
        for kind in targets {
            match self.ledgers.append(tx, kind) {
                Ok(fresh) => written |= fresh,
                Err(err) => {
                    warn!(tx_id = %id, ledger = ?kind, error = %err, "[ql-05] Commit not stored");
                }
            }
        }
        if written {
            info!(tx_id = %id, "[ql-05] Commit stored");
            self.publish_ledger_sizes();
        }
        written
    }
}
