//! # Message Router
//!
//! Maps each `MessageKind` to its handler. Built once at startup and then
//! shared read-only.

use std::collections::HashMap;
use std::sync::Arc;

use shared_types::{EnvelopeError, MessageKind, PeerMessage};
use tracing::{debug, warn};

use crate::ports::MessageHandler;

#[derive(Default)]
pub struct MessageRouter {
    handlers: HashMap<MessageKind, Arc<dyn MessageHandler>>,
}

impl MessageRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind`, replacing any previous handler.
    pub fn on(&mut self, kind: MessageKind, handler: Arc<dyn MessageHandler>) -> &mut Self {
        self.handlers.insert(kind, handler);
        self
    }

    pub fn handles(&self, kind: MessageKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Dispatch a decoded message. Messages with no handler are dropped and
    /// answered with `Ack`.
    pub async fn dispatch(&self, message: PeerMessage) -> PeerMessage {
        let kind = message.kind();
        match self.handlers.get(&kind) {
            Some(handler) => {
                debug!("[ql-03] Dispatching {:?}", kind);
                handler.handle(message).await.unwrap_or(PeerMessage::Ack)
            }
            None => {
                warn!("[ql-03] No handler for {:?}, dropping", kind);
                PeerMessage::Ack
            }
        }
    }

    /// Decode and dispatch raw bytes. Returns `None` when the payload could
    /// not be decoded; the caller should close the exchange without a reply.
    pub async fn dispatch_bytes(&self, bytes: &[u8]) -> Option<PeerMessage> {
        match PeerMessage::decode(bytes) {
            Ok(message) => Some(self.dispatch(message).await),
            Err(EnvelopeError::UnknownType(kind)) => {
                warn!("[ql-03] Unknown message type {:?}, dropping", kind);
                None
            }
            Err(err) => {
                warn!("[ql-03] Malformed message dropped: {}", err);
                None
            }
        }
    }
}
