//! Inbound message handlers for the validation protocol.

use std::sync::Arc;

use async_trait::async_trait;
use ql_03_transport::{MessageHandler, MessageRouter};
use shared_types::{MessageKind, PeerMessage};
use tracing::warn;

use crate::service::ValidationService;

/// Answers validation, confirmation and commit messages.
pub struct ValidationHandler {
    service: Arc<ValidationService>,
}

impl ValidationHandler {
    pub fn new(service: Arc<ValidationService>) -> Self {
        Self { service }
    }

    /// Route the three validation message kinds to `service`.
    pub fn register(service: Arc<ValidationService>, router: &mut MessageRouter) {
        let handler: Arc<dyn MessageHandler> = Arc::new(Self::new(service));
        router
            .on(MessageKind::SelectedForValidation, handler.clone())
            .on(MessageKind::TransactionConfirmationRequest, handler.clone())
            .on(MessageKind::TransactionCommit, handler);
    }
}

#[async_trait]
impl MessageHandler for ValidationHandler {
    async fn handle(&self, message: PeerMessage) -> Option<PeerMessage> {
        match message {
            PeerMessage::SelectedForValidation(request) => Some(PeerMessage::ValidationResult(
                self.service.validate(request).await,
            )),
            PeerMessage::TransactionConfirmationRequest(request) => Some(
                PeerMessage::TransactionConfirmationResult(self.service.confirm(&request)),
            ),
            PeerMessage::TransactionCommit(tx) => {
                self.service.apply_commit(&tx);
                None
            }
            other => {
                warn!(kind = ?other.kind(), "[ql-05] Unexpected message for validation handler");
                None
            }
        }
    }
}
