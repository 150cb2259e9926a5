//! Validation service: one instance per node, playing sender, validator and
//! commit recipient.

mod commit;
mod peers;
mod sender;
mod validator;

use std::sync::Arc;

use parking_lot::RwLock;
use ql_01_pod_directory::{PodDirectory, QuorumSelector};
use ql_02_ledger_store::LedgerStore;
use ql_03_transport::PeerTransport;
use shared_crypto::KeyProvider;
use shared_types::{Address, LedgerType};

use crate::domain::ValidationConfig;

pub use sender::SubmissionOutcome;

pub struct ValidationService {
    keys: Arc<dyn KeyProvider>,
    directory: PodDirectory,
    selector: QuorumSelector,
    ledgers: Arc<LedgerStore>,
    transport: Arc<dyn PeerTransport>,
    config: ValidationConfig,
    /// Addresses never picked as witnesses (senders active in a load test).
    witness_exclusions: RwLock<Vec<Address>>,
}

impl ValidationService {
    pub fn new(
        keys: Arc<dyn KeyProvider>,
        directory: PodDirectory,
        ledgers: Arc<LedgerStore>,
        transport: Arc<dyn PeerTransport>,
        config: ValidationConfig,
    ) -> Self {
        let selector = QuorumSelector::new(Arc::new(directory.clone()));
        Self {
            keys,
            directory,
            selector,
            ledgers,
            transport,
            config,
            witness_exclusions: RwLock::new(Vec::new()),
        }
    }

    pub fn address(&self) -> Address {
        self.keys.address()
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn ledgers(&self) -> &Arc<LedgerStore> {
        &self.ledgers
    }

    pub fn directory(&self) -> &PodDirectory {
        &self.directory
    }

    /// Replace the set of addresses kept out of witness slots.
    pub fn set_witness_exclusions(&self, addresses: Vec<Address>) {
        *self.witness_exclusions.write() = addresses;
    }

    pub fn witness_exclusions(&self) -> Vec<Address> {
        self.witness_exclusions.read().clone()
    }

    /// This node's spendable balance per its owner ledger.
    pub fn balance(&self) -> i128 {
        self.ledgers.balance(&self.address())
    }

    fn publish_ledger_sizes(&self) {
        for kind in LedgerType::ALL {
            quorum_telemetry::LEDGER_ENTRIES
                .with_label_values(&[kind.file_stem()])
                .set(self.ledgers.len(kind) as f64);
        }
    }
}
