use std::sync::Arc;

use anyhow::{Context, Result};
use ql_01_pod_directory::PodDirectory;
use ql_02_ledger_store::{JsonFileLedgerPersistence, LedgerStore};
use ql_03_transport::PeerTransport;
use ql_05_validation::ValidationService;
use shared_crypto::{FileKeyProvider, KeyProvider, StaticKeyProvider};
use shared_types::{unix_millis, Address, NetworkLocation, Pod};
use tracing::info;

use super::NodeConfig;

/// Every component of a running node.
pub struct NodeContainer {
    pub config: NodeConfig,
    pub keys: Arc<dyn KeyProvider>,
    pub directory: PodDirectory,
    pub ledgers: Arc<LedgerStore>,
    pub transport: Arc<dyn PeerTransport>,
    pub validation: Arc<ValidationService>,
}

impl NodeContainer {
    /// Build a node that talks to peers through `transport`.
    pub fn new(config: NodeConfig, transport: Arc<dyn PeerTransport>) -> Result<Self> {
        let keys: Arc<dyn KeyProvider> = match &config.wallet.key_file {
            Some(path) => Arc::new(
                FileKeyProvider::load_or_create(path)
                    .with_context(|| format!("Failed to load wallet key {}", path.display()))?,
            ),
            None => Arc::new(StaticKeyProvider::generate()),
        };
        info!(address = %keys.address().short(), "[node] Wallet key ready");

        let ledgers = Arc::new(match &config.storage.data_dir {
            Some(dir) => LedgerStore::open(Arc::new(JsonFileLedgerPersistence::new(dir)))
                .with_context(|| format!("Failed to open ledgers in {}", dir.display()))?,
            None => LedgerStore::in_memory(),
        });

        if config.genesis.seed_on_startup {
            let genesis = ql_04_transaction_lifecycle::genesis_transfer(
                keys.address(),
                config.validation.genesis_amount,
                unix_millis(),
            );
            ledgers
                .seed_genesis(&genesis)
                .context("Failed to seed genesis transfer")?;
        }

        let directory = PodDirectory::new();
        let container = Self {
            validation: Arc::new(ValidationService::new(
                keys.clone(),
                directory.clone(),
                ledgers.clone(),
                transport.clone(),
                config.validation.clone(),
            )),
            config,
            keys,
            directory,
            ledgers,
            transport,
        };
        container.directory.register(container.local_pod());
        Ok(container)
    }

    /// Clear both ledgers, then re-seed genesis if seeding is enabled.
    pub fn wipe_ledgers(&self) -> Result<()> {
        self.ledgers.wipe().context("Failed to wipe ledgers")?;
        if self.config.genesis.seed_on_startup {
            let genesis = ql_04_transaction_lifecycle::genesis_transfer(
                self.address(),
                self.config.validation.genesis_amount,
                unix_millis(),
            );
            self.ledgers
                .seed_genesis(&genesis)
                .context("Failed to re-seed genesis transfer")?;
        }
        Ok(())
    }

    pub fn address(&self) -> Address {
        self.keys.address()
    }

    /// This node's descriptor as advertised to peers.
    pub fn local_pod(&self) -> Pod {
        let network = &self.config.network;
        let location = NetworkLocation {
            public_addr: network.public_addr.unwrap_or(network.listen_addr),
            local_addr: network.local_addr.unwrap_or(network.listen_addr),
        };
        let mut pod = Pod::new(self.address(), network.role, location);
        // Churn may have changed our status; advertise what the directory says.
        if let Some(known) = self.directory.get(&pod.address) {
            pod.status = known.status;
            pod.spawn_timestamp = known.spawn_timestamp;
        }
        pod
    }
}
