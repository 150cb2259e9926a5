//! # Error Types
//!
//! Errors shared by every subsystem.

use thiserror::Error;

/// Malformed pod address.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid address length: expected {expected} hex chars, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("address is not hex encoded")]
    NotHex,

    #[error("address must be an uncompressed point (prefix 04)")]
    MissingUncompressedPrefix,
}

/// A ledger entry that cannot be stored.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerEntryError {
    #[error("ledger entry has no id")]
    MissingId,

    #[error("unknown ledger type: {0}")]
    UnknownLedgerType(u8),
}

/// An inbound message that could not be decoded into a known variant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    /// Valid envelope, but the `type` tag names no known message.
    #[error("unknown message type: {0}")]
    UnknownType(String),

    /// Not an envelope at all, or the payload does not fit its type.
    #[error("malformed message: {0}")]
    Malformed(String),
}
