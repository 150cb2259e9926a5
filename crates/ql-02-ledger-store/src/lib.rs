//! # Ledger Store
//!
//! **Subsystem ID:** 2
//!
//! Each node owns exactly two ledgers:
//!
//! | Ledger | Persisted `type` | Amounts |
//! |--------|------------------|---------|
//! | Owner (`MY_LEDGER`) | `0` | true values |
//! | Witness (`WITNESS_LEDGER`) | `1` | redacted (`null`) |
//!
//! Entries are append-only and unique by id. Balances are recomputed from
//! the owner view on every call; there is no running counter.
//!
//! ## Architecture
//!
//! - **Domain Layer:** balance formula, block-structure integrity checks
//! - **Ports Layer:** `LedgerPersistence` (driven)
//! - **Service Layer:** `LedgerStore`
//! - **Adapters Layer:** JSON files on disk, in-memory map

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryPersistence, JsonFileLedgerPersistence};
pub use domain::{balance, is_valid_chain, Block, ChainError, LedgerError};
pub use ports::LedgerPersistence;
pub use service::LedgerStore;
