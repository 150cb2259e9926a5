//! # TCP Adapter
//!
//! One request per connection: the client writes a single JSON line, the
//! server answers with a single JSON line and closes. A payload that fails
//! to decode gets no reply.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use shared_types::PeerMessage;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::TransportError;
use crate::ports::PeerTransport;
use crate::service::MessageRouter;

/// Upper bound on a single message line.
pub const MAX_MESSAGE_BYTES: u64 = 16 * 1024 * 1024;

/// How long an inbound connection may take to deliver its request line.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Client side: dials a fresh connection per request.
#[derive(Debug, Clone, Default)]
pub struct TcpTransport;

impl TcpTransport {
    pub fn new() -> Self {
        Self
    }
}

fn io_to_transport(peer: SocketAddr, err: io::Error) -> TransportError {
    match err.kind() {
        io::ErrorKind::ConnectionRefused => TransportError::ConnectionRefused { peer },
        io::ErrorKind::UnexpectedEof
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::BrokenPipe => TransportError::Closed { peer },
        _ => TransportError::Io {
            peer,
            message: err.to_string(),
        },
    }
}

async fn exchange(peer: SocketAddr, message: &PeerMessage) -> Result<PeerMessage, TransportError> {
    let mut bytes = message.encode()?;
    bytes.push(b'\n');

    let stream = TcpStream::connect(peer)
        .await
        .map_err(|e| io_to_transport(peer, e))?;
    let (reader, mut writer) = stream.into_split();
    writer
        .write_all(&bytes)
        .await
        .map_err(|e| io_to_transport(peer, e))?;
    writer.flush().await.map_err(|e| io_to_transport(peer, e))?;

    let mut line = Vec::new();
    let read = BufReader::new(reader.take(MAX_MESSAGE_BYTES))
        .read_until(b'\n', &mut line)
        .await
        .map_err(|e| io_to_transport(peer, e))?;
    if read == 0 {
        return Err(TransportError::Closed { peer });
    }
    Ok(PeerMessage::decode(line.trim_ascii_end())?)
}

#[async_trait]
impl PeerTransport for TcpTransport {
    async fn request(
        &self,
        peer: SocketAddr,
        message: PeerMessage,
        timeout: Duration,
    ) -> Result<PeerMessage, TransportError> {
        let request_id = Uuid::new_v4();
        debug!(%request_id, %peer, kind = ?message.kind(), "[ql-03] Sending request");

        match tokio::time::timeout(timeout, exchange(peer, &message)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(%request_id, %peer, "[ql-03] Request timed out after {:?}", timeout);
                Err(TransportError::Timeout {
                    peer,
                    after: timeout,
                })
            }
        }
    }
}

/// Server side: accepts connections and hands each request to the router.
pub struct TcpServer {
    listener: TcpListener,
    router: Arc<MessageRouter>,
    read_timeout: Duration,
}

impl TcpServer {
    pub async fn bind(addr: SocketAddr, router: Arc<MessageRouter>) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            router,
            read_timeout: DEFAULT_READ_TIMEOUT,
        })
    }

    /// Drop connections that have not sent a full request line within
    /// `read_timeout`.
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// The bound address (useful when binding port 0).
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept until `shutdown` flips to `true` or its sender is dropped.
    pub async fn serve(self, mut shutdown: watch::Receiver<bool>) {
        if let Ok(addr) = self.local_addr() {
            info!("[ql-03] Listening on {}", addr);
        }
        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, remote)) => {
                            let router = self.router.clone();
                            let read_timeout = self.read_timeout;
                            tokio::spawn(async move {
                                if let Err(e) = handle_connection(stream, router, read_timeout).await {
                                    debug!(%remote, error = %e, "[ql-03] Inbound connection failed");
                                }
                            });
                        }
                        Err(e) => warn!("[ql-03] Accept failed: {}", e),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("[ql-03] Listener stopped");
    }
}

async fn handle_connection(
    stream: TcpStream,
    router: Arc<MessageRouter>,
    read_timeout: Duration,
) -> io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut line = Vec::new();
    let mut reader = BufReader::new(reader.take(MAX_MESSAGE_BYTES));
    let read = tokio::time::timeout(read_timeout, reader.read_until(b'\n', &mut line))
        .await
        .map_err(|_| {
            io::Error::new(
                io::ErrorKind::TimedOut,
                format!("no request line within {:?}", read_timeout),
            )
        })??;
    if read == 0 {
        return Ok(());
    }

    let Some(reply) = router.dispatch_bytes(line.trim_ascii_end()).await else {
        return Ok(());
    };
    let mut bytes = reply
        .encode()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    bytes.push(b'\n');
    writer.write_all(&bytes).await?;
    writer.shutdown().await
}
