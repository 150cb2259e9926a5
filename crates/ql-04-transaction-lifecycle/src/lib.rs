//! # Transaction Lifecycle
//!
//! **Subsystem ID:** 4
//!
//! ```text
//! construct ──▶ assign_quorum ──▶ derive_id ──▶ sign ──▶ derive_hash
//! ```
//!
//! The id covers the quorum, both counterparties and the timestamp, so a
//! transaction cannot be re-pointed at a different quorum without changing
//! its id and invalidating the signature. The hash additionally covers the
//! amount and is the fingerprint witnesses confirm for ledger entries.

pub mod domain;
pub mod service;

pub use domain::{derive_hash, derive_id, LifecycleError};
pub use service::{
    assign_quorum, construct, genesis_transfer, seal, sign, verify_hash, verify_id,
    verify_signature,
};
