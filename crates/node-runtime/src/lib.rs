//! # Node Runtime Library
//!
//! Builds and runs one Quorum-Ledger node. The `node-runtime` binary is a
//! thin wrapper around `NodeRuntime`.
//!
//! ## Modules
//!
//! - `container/` - configuration and component construction
//! - `wiring/` - message router assembly
//! - `handlers/` - node-level inbound handlers
//! - `bootstrap` - joining the network
//! - `admin` - operator operations (list pods, start test, wipe)
//! - `load_test` - the load-test driver started by `TEST_CONFIG`

#![allow(clippy::type_complexity)]

pub mod admin;
pub mod bootstrap;
pub mod container;
pub mod handlers;
pub mod load_test;
pub mod runtime;
pub mod wiring;

pub use admin::{AdminCore, AdminError};
pub use container::{load_config, NodeConfig, NodeContainer};
pub use load_test::{LoadTestDriver, LoadTestReport, StopReason};
pub use runtime::NodeRuntime;
