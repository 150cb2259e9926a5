//! # Ports Layer
//!
//! - **Inbound:** `MessageHandler`, implemented by every subsystem that
//!   answers a message kind.
//! - **Outbound:** `PeerTransport`, used to reach other pods.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use shared_types::PeerMessage;

use crate::domain::TransportError;

/// Handles one kind of inbound message.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Process `message`. `None` means "acknowledge without payload".
    async fn handle(&self, message: PeerMessage) -> Option<PeerMessage>;
}

/// Sends messages to other pods.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    /// Send `message` to `peer` and wait up to `timeout` for the reply.
    async fn request(
        &self,
        peer: SocketAddr,
        message: PeerMessage,
        timeout: Duration,
    ) -> Result<PeerMessage, TransportError>;

    /// Fire a message whose reply is only an acknowledgement.
    async fn send(
        &self,
        peer: SocketAddr,
        message: PeerMessage,
        timeout: Duration,
    ) -> Result<(), TransportError> {
        self.request(peer, message, timeout).await.map(|_| ())
    }
}
