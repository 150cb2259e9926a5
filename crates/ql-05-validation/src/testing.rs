//! In-process cluster harness.
//!
//! Every node gets its own key, ledgers and directory; all share one
//! `InMemoryNetwork`, so requests go through the real wire codec and the
//! real validation handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use ql_01_pod_directory::PodDirectory;
use ql_02_ledger_store::LedgerStore;
use ql_03_transport::{InMemoryNetwork, MessageRouter};
use shared_crypto::{KeyProvider, StaticKeyProvider};
use shared_types::{Address, NetworkLocation, Pod, PodRole};

use crate::{ValidationConfig, ValidationHandler, ValidationService};

pub struct TestNode {
    pub pod: Pod,
    pub keys: Arc<dyn KeyProvider>,
    pub service: Arc<ValidationService>,
    pub directory: PodDirectory,
    pub router: Arc<MessageRouter>,
}

impl TestNode {
    pub fn address(&self) -> Address {
        self.pod.address.clone()
    }

    pub fn socket(&self) -> SocketAddr {
        self.pod.location.public_addr
    }
}

pub struct TestCluster {
    pub network: InMemoryNetwork,
    pub nodes: Vec<TestNode>,
}

impl TestCluster {
    /// `regular` regular pods (indices `0..regular`) followed by `partner`
    /// partner pods, each knowing every other.
    pub fn new(regular: usize, partner: usize, config: ValidationConfig) -> Self {
        let network = InMemoryNetwork::new();
        let roles = std::iter::repeat(PodRole::Regular)
            .take(regular)
            .chain(std::iter::repeat(PodRole::Partner).take(partner));

        let identities: Vec<(Arc<dyn KeyProvider>, Pod)> = roles
            .enumerate()
            .map(|(index, role)| {
                let keys: Arc<dyn KeyProvider> = Arc::new(StaticKeyProvider::generate());
                let socket = SocketAddr::from(([127, 0, 0, 1], 20_000 + index as u16));
                let pod = Pod::new(keys.address(), role, NetworkLocation::single(socket));
                (keys, pod)
            })
            .collect();

        let nodes = identities
            .iter()
            .map(|(keys, pod)| {
                let directory = PodDirectory::new();
                for (_, peer) in &identities {
                    directory.register(peer.clone());
                }
                let service = Arc::new(ValidationService::new(
                    keys.clone(),
                    directory.clone(),
                    Arc::new(LedgerStore::in_memory()),
                    Arc::new(network.transport()),
                    config.clone(),
                ));
                let mut router = MessageRouter::new();
                ValidationHandler::register(service.clone(), &mut router);
                let router = Arc::new(router);
                network.register(pod.location.public_addr, router.clone());

                TestNode {
                    pod: pod.clone(),
                    keys: keys.clone(),
                    service,
                    directory,
                    router,
                }
            })
            .collect();

        Self { network, nodes }
    }

    pub fn node(&self, index: usize) -> &TestNode {
        &self.nodes[index]
    }

    pub fn index_of(&self, address: &Address) -> Option<usize> {
        self.nodes.iter().position(|n| n.pod.address == *address)
    }

    /// Seed node `index` with a genesis transfer of `amount`.
    pub fn fund(&self, index: usize, amount: u64) {
        let node = self.node(index);
        let genesis = ql_04_transaction_lifecycle::genesis_transfer(node.address(), amount, 0);
        node.service
            .ledgers()
            .seed_genesis(&genesis)
            .expect("in-memory genesis seeding cannot fail");
    }

    pub fn set_unresponsive(&self, index: usize, unresponsive: bool) {
        self.network
            .set_unresponsive(self.node(index).socket(), unresponsive);
    }

    pub fn disconnect(&self, index: usize) {
        self.network.disconnect(self.node(index).socket());
    }
}
