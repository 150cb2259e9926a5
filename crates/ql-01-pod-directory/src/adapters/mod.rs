//! Adapters: timer-driven tasks over the directory.

pub mod churn;

pub use churn::{ChurnConfig, ChurnEmulator};
