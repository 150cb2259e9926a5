use ql_01_pod_directory::SelectionError;
use ql_02_ledger_store::LedgerError;
use ql_04_transaction_lifecycle::LifecycleError;
use thiserror::Error;

/// Local preconditions that stop a submission before any vote is asked for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("quorum selection failed: {0}")]
    Selection(#[from] SelectionError),

    #[error("could not seal transaction: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("ledger store failed: {0}")]
    Ledger(#[from] LedgerError),
}
