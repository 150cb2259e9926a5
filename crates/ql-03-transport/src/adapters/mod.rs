//! Transport adapters.

pub mod memory;
pub mod tcp;

pub use memory::{InMemoryNetwork, InMemoryTransport};
pub use tcp::{TcpServer, TcpTransport};
