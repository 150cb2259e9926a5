//! # Node Container
//!
//! Holds every component instance of one node and builds them in
//! dependency order:
//!
//! 1. Wallet key (identity)
//! 2. Ledger store (persistence, genesis seeding)
//! 3. Pod directory (self-registration)
//! 4. Validation service (directory + ledgers + transport)

pub mod config;
pub mod node;

pub use config::{load_config, load_config_from, ConfigError, NodeConfig};
pub use node::NodeContainer;
