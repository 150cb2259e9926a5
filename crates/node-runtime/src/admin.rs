//! # Administrative Core
//!
//! What an operator surface (HTTP or otherwise) needs from a node:
//! enumerate pods, start a load test on chosen pods, wipe every ledger.
//! Requests are validated in full before any message leaves the node.

use std::sync::Arc;

use futures::future::join_all;
use rand::seq::SliceRandom;
use shared_types::{Address, PeerMessage, Pod, PodRole, TestConfig};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::container::NodeContainer;
use crate::load_test::LoadTestDriver;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminError {
    #[error("numSenders is {expected} but {supplied} sender addresses were supplied")]
    SenderCountMismatch { expected: usize, supplied: usize },

    #[error("numSenders must be at least 1")]
    NoSenders,

    #[error("{requested} senders requested but only {available} pods can send")]
    NotEnoughPods { requested: usize, available: usize },

    #[error("sender {0} is not a known pod")]
    UnknownSender(String),

    #[error("local ledgers could not be wiped: {0}")]
    Wipe(String),
}

pub struct AdminCore {
    container: Arc<NodeContainer>,
    load_test: Arc<LoadTestDriver>,
    shutdown: watch::Receiver<bool>,
}

impl AdminCore {
    pub fn new(
        container: Arc<NodeContainer>,
        load_test: Arc<LoadTestDriver>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            container,
            load_test,
            shutdown,
        }
    }

    /// Every pod this node knows, itself included.
    pub fn list_pods(&self) -> Vec<Pod> {
        self.container.directory.all()
    }

    /// Validate `request`, pick the senders, and send each of them
    /// `TEST_CONFIG`. Returns the chosen senders.
    pub async fn start_test(&self, request: TestConfig) -> Result<Vec<Address>, AdminError> {
        let senders = self.choose_senders(&request)?;
        let config = TestConfig {
            sender_addresses: senders.clone(),
            ..request
        };
        let me = &self.container.address();

        let notices = senders.iter().map(|sender| {
            let config = config.clone();
            async move {
                if sender == me {
                    if !self.load_test.spawn(config, self.shutdown.clone()) {
                        warn!("[node] Load test already running locally");
                    }
                    return;
                }
                let Some(pod) = self.container.directory.get(sender) else {
                    return;
                };
                let target = pod.location.dial_addr(false);
                if let Err(err) = self
                    .container
                    .transport
                    .send(
                        target,
                        PeerMessage::TestConfig(config),
                        self.container.config.validation.rpc_timeout,
                    )
                    .await
                {
                    warn!(peer = %sender.short(), error = %err, "[node] TEST_CONFIG not delivered");
                }
            }
        });
        join_all(notices).await;

        info!(senders = senders.len(), "[node] Load test dispatched");
        Ok(senders)
    }

    /// Wipe the local ledgers and tell every other pod to do the same.
    /// Returns how many peers acknowledged.
    pub async fn wipe_ledgers(&self) -> Result<usize, AdminError> {
        self.container
            .wipe_ledgers()
            .map_err(|e| AdminError::Wipe(format!("{e:#}")))?;

        let me = self.container.address();
        let timeout = self.container.config.validation.rpc_timeout;
        let peers: Vec<Pod> = self
            .container
            .directory
            .all()
            .into_iter()
            .filter(|pod| pod.address != me)
            .collect();

        let acks = join_all(peers.iter().map(|pod| {
            self.container
                .transport
                .send(pod.location.dial_addr(false), PeerMessage::WipeLedger, timeout)
        }))
        .await;
        let acknowledged = acks.iter().filter(|result| result.is_ok()).count();

        info!(acknowledged, peers = peers.len(), "[node] Ledgers wiped network-wide");
        Ok(acknowledged)
    }

    fn choose_senders(&self, request: &TestConfig) -> Result<Vec<Address>, AdminError> {
        if request.num_senders == 0 {
            return Err(AdminError::NoSenders);
        }
        if !request.sender_addresses.is_empty()
            && request.sender_addresses.len() != request.num_senders
        {
            return Err(AdminError::SenderCountMismatch {
                expected: request.num_senders,
                supplied: request.sender_addresses.len(),
            });
        }

        let eligible: Vec<Address> = self
            .container
            .directory
            .all()
            .into_iter()
            .filter(|pod| matches!(pod.role, PodRole::Regular | PodRole::Partner))
            .map(|pod| pod.address)
            .collect();
        if request.num_senders > eligible.len() {
            return Err(AdminError::NotEnoughPods {
                requested: request.num_senders,
                available: eligible.len(),
            });
        }

        if request.sender_addresses.is_empty() {
            return Ok(eligible
                .choose_multiple(&mut rand::thread_rng(), request.num_senders)
                .cloned()
                .collect());
        }
        if let Some(unknown) = request
            .sender_addresses
            .iter()
            .find(|address| !eligible.contains(address))
        {
            return Err(AdminError::UnknownSender(unknown.short().to_string()));
        }
        Ok(request.sender_addresses.clone())
    }
}
