//! # Quorum Validation Protocol
//!
//! **Subsystem ID:** 5
//!
//! Drives a transfer from selection to commit.
//!
//! ## Sender
//!
//! ```text
//! SELECT ──▶ ASSIGN+SIGN ──▶ DISPATCH (4 × SELECTED_FOR_VALIDATION)
//!                                 │ join all, each bounded by rpc_timeout
//!                                 ▼
//!                 COLLECT ──▶ AGGREGATE ──▶ COMMIT (TRANSACTION_COMMIT × 5)
//! ```
//!
//! ## Validator
//!
//! 1. Quorum shape and membership
//! 2. Id re-derivation (short-circuits)
//! 3. Signature (short-circuits)
//! 4. Sender ledger: genesis rule, or per-entry hash confirmation by the
//!    entry's own quorum (local witness ledger for ourselves, nested
//!    `TRANSACTION_CONFIRMATION_REQUEST` for everyone else) plus balance
//! 5. Vote
//!
//! Every failure becomes a `ValidationResult { res: false, reason }`; nothing
//! in this crate unwinds the caller over a bad transaction.

pub mod domain;
pub mod handlers;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use domain::{
    aggregate, Decision, Rejection, TimeoutPolicy, ValidationConfig, ValidationError, Vote,
};
pub use handlers::ValidationHandler;
pub use service::{SubmissionOutcome, ValidationService};
