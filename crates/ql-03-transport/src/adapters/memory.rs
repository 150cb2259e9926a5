//! # In-Memory Network
//!
//! Routes requests between routers living in the same process. Messages are
//! encoded and decoded on the way through so the wire codec is exercised
//! exactly as over TCP. Nodes can be marked unresponsive to simulate a peer
//! that accepts the request but never answers.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{MessageKind, PeerMessage};
use tracing::debug;

use crate::domain::TransportError;
use crate::ports::PeerTransport;
use crate::service::MessageRouter;

#[derive(Default)]
struct NetworkState {
    routers: HashMap<SocketAddr, Arc<MessageRouter>>,
    unresponsive: HashSet<SocketAddr>,
    delivered: HashMap<MessageKind, usize>,
}

/// Shared switchboard. Clones refer to the same network.
#[derive(Clone, Default)]
pub struct InMemoryNetwork {
    state: Arc<RwLock<NetworkState>>,
}

impl InMemoryNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a router at `addr`, replacing whatever was there.
    pub fn register(&self, addr: SocketAddr, router: Arc<MessageRouter>) {
        self.state.write().routers.insert(addr, router);
    }

    /// Detach `addr`; later requests to it are refused.
    pub fn disconnect(&self, addr: SocketAddr) {
        let mut state = self.state.write();
        state.routers.remove(&addr);
        state.unresponsive.remove(&addr);
    }

    /// Make `addr` swallow requests without answering.
    pub fn set_unresponsive(&self, addr: SocketAddr, unresponsive: bool) {
        let mut state = self.state.write();
        if unresponsive {
            state.unresponsive.insert(addr);
        } else {
            state.unresponsive.remove(&addr);
        }
    }

    /// Number of messages of `kind` handed to a router so far.
    pub fn delivered(&self, kind: MessageKind) -> usize {
        self.state.read().delivered.get(&kind).copied().unwrap_or(0)
    }

    /// A transport sending through this network.
    pub fn transport(&self) -> InMemoryTransport {
        InMemoryTransport {
            network: self.clone(),
        }
    }
}

/// `PeerTransport` over an `InMemoryNetwork`.
#[derive(Clone)]
pub struct InMemoryTransport {
    network: InMemoryNetwork,
}

enum Route {
    Deliver(Arc<MessageRouter>),
    BlackHole,
    Refused,
}

#[async_trait]
impl PeerTransport for InMemoryTransport {
    async fn request(
        &self,
        peer: SocketAddr,
        message: PeerMessage,
        timeout: Duration,
    ) -> Result<PeerMessage, TransportError> {
        let route = {
            let state = self.network.state.read();
            match state.routers.get(&peer) {
                None => Route::Refused,
                Some(_) if state.unresponsive.contains(&peer) => Route::BlackHole,
                Some(router) => Route::Deliver(router.clone()),
            }
        };

        let router = match route {
            Route::Refused => return Err(TransportError::ConnectionRefused { peer }),
            Route::BlackHole => {
                debug!(%peer, "[ql-03] Peer is unresponsive, waiting out the timeout");
                tokio::time::sleep(timeout).await;
                return Err(TransportError::Timeout {
                    peer,
                    after: timeout,
                });
            }
            Route::Deliver(router) => router,
        };

        let bytes = message.encode()?;
        *self
            .network
            .state
            .write()
            .delivered
            .entry(message.kind())
            .or_insert(0) += 1;

        tokio::time::timeout(timeout, deliver(router, bytes, peer))
            .await
            .unwrap_or(Err(TransportError::Timeout {
                peer,
                after: timeout,
            }))
    }
}

async fn deliver(
    router: Arc<MessageRouter>,
    bytes: Vec<u8>,
    peer: SocketAddr,
) -> Result<PeerMessage, TransportError> {
    let reply = router
        .dispatch_bytes(&bytes)
        .await
        .ok_or(TransportError::Closed { peer })?;
    Ok(PeerMessage::decode(&reply.encode()?)?)
}
