//! # Quorum-Ledger Test Suite
//!
//! Scenarios that span several pods and every component at once.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── validation_benchmarks.rs   # sealing, verification, balances, aggregation
//! └── src/
//!     └── integration/
//!         ├── cluster_flows.rs       # in-process cluster: spend chains, concurrency
//!         └── tcp_network.rs         # real nodes over loopback TCP
//! ```
//!
//! ## Running
//!
//! ```bash
//! cargo test -p ql-tests
//! cargo bench -p ql-tests
//! ```

#[cfg(test)]
mod integration;
