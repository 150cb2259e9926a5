//! Node lifecycle: build, listen, join, churn, shut down.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use ql_01_pod_directory::ChurnEmulator;
use ql_03_transport::{PeerTransport, TcpServer, TcpTransport};
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

use crate::admin::AdminCore;
use crate::bootstrap::{announce_identity, join_network};
use crate::container::{NodeConfig, NodeContainer};
use crate::load_test::LoadTestDriver;
use crate::wiring::build_router;

/// The running node.
pub struct NodeRuntime {
    container: Arc<NodeContainer>,
    load_test: Arc<LoadTestDriver>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl NodeRuntime {
    /// Build a node that talks TCP.
    pub fn new(config: NodeConfig) -> Result<Self> {
        let transport: Arc<dyn PeerTransport> = Arc::new(TcpTransport::new());
        Self::with_transport(config, transport)
    }

    pub fn with_transport(config: NodeConfig, transport: Arc<dyn PeerTransport>) -> Result<Self> {
        let container = Arc::new(NodeContainer::new(config, transport)?);
        let load_test = Arc::new(LoadTestDriver::new(container.clone()));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Ok(Self {
            container,
            load_test,
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// Startup sequence:
    ///
    /// 1. Bind the peer listener and start serving
    /// 2. Start churn emulation (if enabled), announcing each status flip
    ///    to every known pod
    /// 3. Join the network through the bootstrap seeds
    pub async fn start(&self) -> Result<SocketAddr> {
        let config = &self.container.config;
        info!("===========================================");
        info!("  Quorum-Ledger Node v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let router = Arc::new(build_router(
            &self.container,
            &self.load_test,
            self.shutdown_rx.clone(),
        ));
        let server = TcpServer::bind(config.network.listen_addr, router)
            .await
            .with_context(|| format!("Failed to bind {}", config.network.listen_addr))?
            .with_read_timeout(config.validation.rpc_timeout);
        let bound = server.local_addr().context("Listener has no local address")?;
        tokio::spawn(server.serve(self.shutdown_rx.clone()));

        if config.churn.enabled {
            let (changes_tx, mut changes) = mpsc::unbounded_channel();
            let churn = ChurnEmulator::new(
                self.container.directory.clone(),
                self.container.address(),
                config.churn.emulator,
            )
            .with_notifier(changes_tx);
            tokio::spawn(churn.run(self.shutdown_rx.clone()));

            // Ends when the emulator stops and drops its sender.
            let container = self.container.clone();
            tokio::spawn(async move {
                while let Some(status) = changes.recv().await {
                    let reached = announce_identity(&container).await;
                    info!(?status, reached, "Announced status change");
                }
            });
        }

        let known = join_network(&self.container).await;

        info!("Address: {}", self.container.address());
        info!("Role: {:?}", config.network.role);
        info!("Listening: {}", bound);
        info!("Pods known: {}", known);
        info!("Balance: {}", self.container.validation.balance());
        Ok(bound)
    }

    /// Signal every background task to stop.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }
        // Let in-flight requests drain.
        tokio::time::sleep(Duration::from_millis(500)).await;
        info!("Shutdown complete");
    }

    pub fn container(&self) -> Arc<NodeContainer> {
        Arc::clone(&self.container)
    }

    pub fn admin(&self) -> AdminCore {
        AdminCore::new(
            self.container.clone(),
            self.load_test.clone(),
            self.shutdown_rx.clone(),
        )
    }

    pub fn load_test(&self) -> Arc<LoadTestDriver> {
        Arc::clone(&self.load_test)
    }

    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }
}
