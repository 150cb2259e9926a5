use std::net::SocketAddr;
use std::time::Duration;

use shared_types::EnvelopeError;
use thiserror::Error;

/// Why a peer request did not produce a reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// No reply within the deadline; the peer may still be alive.
    #[error("request to {peer} timed out after {after:?}")]
    Timeout { peer: SocketAddr, after: Duration },

    /// Nothing is listening at the peer's address.
    #[error("connection to {peer} refused")]
    ConnectionRefused { peer: SocketAddr },

    /// The peer closed the connection without replying.
    #[error("connection to {peer} closed before a reply")]
    Closed { peer: SocketAddr },

    #[error("i/o error talking to {peer}: {message}")]
    Io { peer: SocketAddr, message: String },

    #[error("undecodable reply: {0}")]
    Codec(#[from] EnvelopeError),
}

impl TransportError {
    /// Whether the peer should be dropped from the directory.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, TransportError::ConnectionRefused { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout { .. })
    }
}
