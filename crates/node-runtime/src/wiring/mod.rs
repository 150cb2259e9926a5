//! # Router Wiring
//!
//! | Message | Handler |
//! |---------|---------|
//! | `IDENTITY`, `QUERY_ALL` | `MembershipHandler` |
//! | `SELECTED_FOR_VALIDATION`, `TRANSACTION_CONFIRMATION_REQUEST`, `TRANSACTION_COMMIT` | `ValidationHandler` |
//! | `TEST_CONFIG`, `WIPE_LEDGER` | `ControlHandler` |
//! | `LOG_EVENT` | `LogEventHandler` |
//!
//! Anything else is acknowledged and ignored.

use std::sync::Arc;

use ql_03_transport::{MessageHandler, MessageRouter};
use ql_05_validation::ValidationHandler;
use shared_types::MessageKind;
use tokio::sync::watch;

use crate::container::NodeContainer;
use crate::handlers::{ControlHandler, LogEventHandler, MembershipHandler};
use crate::load_test::LoadTestDriver;

pub fn build_router(
    container: &Arc<NodeContainer>,
    load_test: &Arc<LoadTestDriver>,
    shutdown: watch::Receiver<bool>,
) -> MessageRouter {
    let mut router = MessageRouter::new();

    let membership: Arc<dyn MessageHandler> = Arc::new(MembershipHandler::new(container.clone()));
    router
        .on(MessageKind::Identity, membership.clone())
        .on(MessageKind::QueryAll, membership);

    ValidationHandler::register(container.validation.clone(), &mut router);

    let control: Arc<dyn MessageHandler> = Arc::new(ControlHandler::new(
        container.clone(),
        load_test.clone(),
        shutdown,
    ));
    router
        .on(MessageKind::TestConfig, control.clone())
        .on(MessageKind::WipeLedger, control);

    router.on(MessageKind::LogEvent, Arc::new(LogEventHandler));
    router
}
