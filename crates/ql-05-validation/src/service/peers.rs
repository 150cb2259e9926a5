//! Peer calls with the directory bookkeeping every caller needs.

use shared_types::{Address, PeerMessage};
use tracing::{debug, warn};

use super::ValidationService;

/// A peer call that produced no reply.
#[derive(Debug)]
pub(crate) enum CallFailure {
    /// Not in the directory, so there is nowhere to send.
    Unknown,
    /// Refused; the pod has been dropped from the directory.
    Unreachable,
    TimedOut,
    Other(String),
}

impl CallFailure {
    pub(crate) fn describe(&self) -> String {
        match self {
            CallFailure::Unknown => "pod not in directory".to_string(),
            CallFailure::Unreachable => "pod unreachable".to_string(),
            CallFailure::TimedOut => "no reply before timeout".to_string(),
            CallFailure::Other(detail) => detail.clone(),
        }
    }
}

impl ValidationService {
    /// Request/reply with `peer`, bounded by the configured rpc timeout.
    pub(crate) async fn call(
        &self,
        peer: &Address,
        message: PeerMessage,
        prefer_local: bool,
    ) -> Result<PeerMessage, CallFailure> {
        let pod = self.directory.get(peer).ok_or(CallFailure::Unknown)?;
        let target = pod.location.dial_addr(prefer_local);

        match self
            .transport
            .request(target, message, self.config.rpc_timeout)
            .await
        {
            Ok(reply) => Ok(reply),
            Err(err) if err.is_unreachable() => {
                warn!(peer = %peer.short(), error = %err, "[ql-05] Dropping unreachable pod");
                self.directory.remove(peer);
                Err(CallFailure::Unreachable)
            }
            Err(err) if err.is_timeout() => {
                debug!(peer = %peer.short(), "[ql-05] Peer timed out");
                quorum_telemetry::PEER_RPC_TIMEOUTS.inc();
                Err(CallFailure::TimedOut)
            }
            Err(err) => Err(CallFailure::Other(err.to_string())),
        }
    }
}
