//! # Pod Directory & Validator Selection
//!
//! **Subsystem ID:** 1
//!
//! Every pod keeps an in-memory directory of the peers it knows about. The
//! directory is the single source of membership for every other subsystem:
//! the selector samples quorums from it, the transport removes unreachable
//! peers from it, and the churn emulator flips the local pod's status in it.
//!
//! ## Architecture
//!
//! - **Domain Layer:** pure random selection with exclusion rules
//! - **Ports Layer:** membership view consumed by the quorum selector
//! - **Service Layer:** `PodDirectory` (shared registry) and `QuorumSelector`
//! - **Adapters Layer:** `ChurnEmulator` timer task
//!
//! ## Example
//!
//! ```rust,ignore
//! let directory = PodDirectory::new();
//! directory.register(pod);
//! let quorum = QuorumSelector::new(directory.clone())
//!     .select_quorum(&me, &[], &mut rand::thread_rng())?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{ChurnConfig, ChurnEmulator};
pub use domain::{select, SelectionError, PARTNERS_PER_QUORUM, WITNESSES_PER_QUORUM};
pub use ports::MembershipView;
pub use service::{PodDirectory, QuorumSelector};
