//! # Inbound Handlers
//!
//! Node-level message handlers. Validation messages are handled by
//! `ql_05_validation::ValidationHandler`.

pub mod control;
pub mod log_event;
pub mod membership;

pub use control::ControlHandler;
pub use log_event::LogEventHandler;
pub use membership::MembershipHandler;
