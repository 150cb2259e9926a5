pub mod errors;

pub use errors::TransportError;
