//! `IDENTITY` and `QUERY_ALL`.

use std::sync::Arc;

use async_trait::async_trait;
use ql_03_transport::MessageHandler;
use shared_types::PeerMessage;
use tracing::debug;

use crate::container::NodeContainer;

pub struct MembershipHandler {
    container: Arc<NodeContainer>,
}

impl MembershipHandler {
    pub fn new(container: Arc<NodeContainer>) -> Self {
        Self { container }
    }
}

#[async_trait]
impl MessageHandler for MembershipHandler {
    async fn handle(&self, message: PeerMessage) -> Option<PeerMessage> {
        let directory = &self.container.directory;
        match message {
            PeerMessage::Identity(pod) => {
                if pod.address != self.container.address() {
                    debug!(peer = %pod.address.short(), role = ?pod.role, "[node] Identity received");
                    directory.register(pod);
                    quorum_telemetry::PODS_KNOWN.set(directory.len() as f64);
                }
                Some(PeerMessage::ResponseIdentity(self.container.local_pod()))
            }
            PeerMessage::QueryAll => Some(PeerMessage::QueryAllResponse(directory.all())),
            _ => None,
        }
    }
}
