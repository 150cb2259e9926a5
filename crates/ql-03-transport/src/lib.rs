//! # Peer Transport
//!
//! **Subsystem ID:** 3
//!
//! Request/response messaging between pods. Every inbound payload is decoded
//! into a `PeerMessage` before it reaches protocol code and is dispatched by
//! kind through a `MessageRouter`. Payloads that fail to decode are logged
//! and dropped.
//!
//! ## Adapters
//!
//! | Adapter | Wire | Use |
//! |---------|------|-----|
//! | `TcpTransport` / `TcpServer` | one JSON line per request, fresh connection | production |
//! | `InMemoryNetwork` | encoded bytes handed to the target router | tests, simulations |
//!
//! Every request is bounded by the caller's timeout. A timed-out request is
//! abandoned, not retried.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryNetwork, InMemoryTransport, TcpServer, TcpTransport};
pub use domain::TransportError;
pub use ports::{MessageHandler, PeerTransport};
pub use service::MessageRouter;
