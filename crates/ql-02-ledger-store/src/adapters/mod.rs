//! Persistence adapters.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileLedgerPersistence;
pub use memory::InMemoryPersistence;
