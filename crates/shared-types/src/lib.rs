//! # Shared Types Crate
//!
//! Domain entities and the peer message envelope shared by every
//! Quorum-Ledger subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: all cross-subsystem types are defined here.
//! - **Validated Identity**: an `Address` cannot exist in memory unless it is
//!   a well-formed uncompressed secp256k1 point.
//! - **Typed Wire Format**: inbound JSON is decoded into the `PeerMessage`
//!   tagged union before it reaches protocol logic.

pub mod entities;
pub mod envelope;
pub mod errors;

pub use entities::*;
pub use envelope::{
    ConfirmationRequest, LogEvent, MessageKind, PeerMessage, TestConfig, ValidationRequest,
};
pub use errors::*;
