pub mod digest;
pub mod errors;

pub use digest::{derive_hash, derive_id};
pub use errors::LifecycleError;
