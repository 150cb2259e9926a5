//! Domain layer: validator sampling.

pub mod errors;
pub mod selector;

pub use errors::SelectionError;
pub use selector::{select, PARTNERS_PER_QUORUM, WITNESSES_PER_QUORUM};
