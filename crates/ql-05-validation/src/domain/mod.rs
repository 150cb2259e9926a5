//! Domain layer: configuration, vote aggregation, rejection reasons.

pub mod aggregate;
pub mod config;
pub mod errors;
pub mod rejection;

pub use aggregate::{aggregate, Decision, Vote};
pub use config::{TimeoutPolicy, ValidationConfig};
pub use errors::ValidationError;
pub use rejection::Rejection;
