//! # Network Join
//!
//! 1. `QUERY_ALL` every bootstrap seed and register what it knows.
//! 2. `IDENTITY` every known pod so it registers us in turn.
//!
//! Step 2 is repeated whenever churn changes our status.

use futures::future::join_all;
use shared_types::{PeerMessage, Pod};
use tracing::{debug, info, warn};

use crate::container::NodeContainer;

/// Join the network through the configured seeds. Returns the directory
/// size afterwards.
pub async fn join_network(container: &NodeContainer) -> usize {
    let me = container.local_pod();
    let timeout = container.config.validation.rpc_timeout;

    for seed in &container.config.network.bootstrap {
        match container
            .transport
            .request(*seed, PeerMessage::QueryAll, timeout)
            .await
        {
            Ok(PeerMessage::QueryAllResponse(pods)) => {
                let mut learned = 0;
                for pod in pods.into_iter().filter(|pod| pod.address != me.address) {
                    if container.directory.register(pod) {
                        learned += 1;
                    }
                }
                info!(%seed, learned, "[node] Membership received from seed");
            }
            Ok(other) => warn!(%seed, kind = ?other.kind(), "[node] Unexpected reply to QUERY_ALL"),
            Err(err) => warn!(%seed, error = %err, "[node] Seed unavailable"),
        }
    }

    announce_identity(container).await;

    let known = container.directory.len();
    quorum_telemetry::PODS_KNOWN.set(known as f64);
    known
}

/// Send our descriptor to every known pod and register what each one sends
/// back. Returns how many peers answered.
pub async fn announce_identity(container: &NodeContainer) -> usize {
    let me = container.local_pod();
    let timeout = container.config.validation.rpc_timeout;
    let peers: Vec<Pod> = container
        .directory
        .all()
        .into_iter()
        .filter(|pod| pod.address != me.address)
        .collect();

    let answers = join_all(peers.into_iter().map(|peer| {
        let announcement = PeerMessage::Identity(me.clone());
        async move {
            match container
                .transport
                .request(peer.location.public_addr, announcement, timeout)
                .await
            {
                Ok(PeerMessage::ResponseIdentity(pod)) if pod.address == peer.address => {
                    container.directory.register(pod);
                    true
                }
                Ok(_) => {
                    debug!(peer = %peer.address.short(), "[node] Ignoring mismatched identity");
                    false
                }
                Err(err) if err.is_unreachable() => {
                    container.directory.remove(&peer.address);
                    false
                }
                Err(err) => {
                    debug!(peer = %peer.address.short(), error = %err, "[node] Identity exchange failed");
                    false
                }
            }
        }
    }))
    .await;

    answers.into_iter().filter(|answered| *answered).count()
}
