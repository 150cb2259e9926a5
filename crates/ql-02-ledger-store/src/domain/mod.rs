//! Domain layer: pure ledger arithmetic and format checks.

pub mod balance;
pub mod chain;
pub mod errors;

pub use balance::balance;
pub use chain::{is_valid_chain, Block, ChainError};
pub use errors::LedgerError;
