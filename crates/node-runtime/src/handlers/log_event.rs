//! `LOG_EVENT`: structured telemetry from peers, re-emitted locally.

use async_trait::async_trait;
use ql_03_transport::MessageHandler;
use shared_types::PeerMessage;
use tracing::info;

#[derive(Default)]
pub struct LogEventHandler;

#[async_trait]
impl MessageHandler for LogEventHandler {
    async fn handle(&self, message: PeerMessage) -> Option<PeerMessage> {
        if let PeerMessage::LogEvent(event) = message {
            info!(
                event = %event.event,
                node = event.node.as_ref().map(|a| a.short()).unwrap_or("-"),
                timestamp = event.timestamp,
                payload = %event.payload,
                "[node] Peer event"
            );
        }
        None
    }
}
