//! `TEST_CONFIG` and `WIPE_LEDGER`.

use std::sync::Arc;

use async_trait::async_trait;
use ql_03_transport::MessageHandler;
use shared_types::PeerMessage;
use tokio::sync::watch;
use tracing::{error, warn};

use crate::container::NodeContainer;
use crate::load_test::LoadTestDriver;

pub struct ControlHandler {
    container: Arc<NodeContainer>,
    load_test: Arc<LoadTestDriver>,
    shutdown: watch::Receiver<bool>,
}

impl ControlHandler {
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
}

#[async_trait]
impl MessageHandler for ControlHandler {
    async fn handle(&self, message: PeerMessage) -> Option<PeerMessage> {
        match message {
            PeerMessage::TestConfig(config) => {
                if !self.load_test.spawn(config, self.shutdown.clone()) {
                    warn!("[node] Ignoring TEST_CONFIG, a load test is already running");
                }
            }
            PeerMessage::WipeLedger => {
                if let Err(err) = self.container.wipe_ledgers() {
                    error!(error = %format!("{err:#}"), "[node] WIPE_LEDGER failed");
                }
            }
            _ => {}
        }
        None
    }
}
