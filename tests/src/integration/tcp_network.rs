//! # Loopback TCP Network
//!
//! Full nodes (`NodeRuntime`) talking newline-delimited JSON over loopback
//! TCP: bootstrap through a seed, validate, commit and persist.

#[cfg(test)]
mod tests {
    use std::net::{SocketAddr, TcpListener};
    use std::path::Path;
    use std::time::Duration;

    use futures::future::join_all;
    use node_runtime::{NodeConfig, NodeRuntime};
    use shared_types::{LedgerType, PodRole};
    use tempfile::TempDir;

    /// Reserve a loopback port by binding and releasing it.
    fn free_port() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    }

    fn node_config(
        listen_addr: SocketAddr,
        role: PodRole,
        bootstrap: Vec<SocketAddr>,
        data_dir: Option<&Path>,
    ) -> NodeConfig {
        let mut config = NodeConfig::default();
        config.network.listen_addr = listen_addr;
        config.network.role = role;
        config.network.bootstrap = bootstrap;
        config.storage.data_dir = data_dir.map(Path::to_path_buf);
        config.validation.rpc_timeout = Duration::from_secs(2);
        config.validation.genesis_amount = 500;
        config
    }

    struct TcpNetwork {
        seed: NodeRuntime,
        /// Regular pods 0..=2, partners 3 and 4.
        nodes: Vec<NodeRuntime>,
        /// Ledger directories, seed first.
        dirs: Vec<TempDir>,
    }

    impl TcpNetwork {
        async fn start(persist: bool) -> Self {
            let mut dirs = Vec::new();
            let mut data_dir = || {
                persist.then(|| {
                    let dir = TempDir::new().unwrap();
                    let path = dir.path().to_path_buf();
                    dirs.push(dir);
                    path
                })
            };

            let seed_addr = free_port();
            let seed = NodeRuntime::new(node_config(
                seed_addr,
                PodRole::Seed,
                Vec::new(),
                data_dir().as_deref(),
            ))
            .unwrap();
            seed.start().await.unwrap();

            let roles = [
                PodRole::Regular,
                PodRole::Regular,
                PodRole::Regular,
                PodRole::Partner,
                PodRole::Partner,
            ];
            let mut nodes = Vec::new();
            for role in roles {
                let node = NodeRuntime::new(node_config(
                    free_port(),
                    role,
                    vec![seed_addr],
                    data_dir().as_deref(),
                ))
                .unwrap();
                node.start().await.unwrap();
                nodes.push(node);
            }

            Self {
                seed,
                nodes,
                dirs,
            }
        }

        fn data_dir(&self, index: usize) -> &Path {
            self.dirs[index + 1].path()
        }

        async fn stop(&self) {
            join_all(
                std::iter::once(&self.seed)
                    .chain(&self.nodes)
                    .map(|node| node.shutdown()),
            )
            .await;
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_nodes_join_through_seed() {
        let net = TcpNetwork::start(false).await;

        assert_eq!(net.seed.container().directory.len(), 6);
        for node in &net.nodes {
            assert_eq!(node.container().directory.len(), 6);
        }
        net.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_transfer_and_respend_over_tcp() {
        let net = TcpNetwork::start(false).await;
        let sender = net.nodes[0].container();
        let recipient = net.nodes[1].container();
        let third = net.nodes[2].container();

        let first = sender
            .validation
            .submit(recipient.address(), 100, false)
            .await
            .unwrap();
        assert!(first.committed(), "{:?}", first.decision);
        assert_eq!(sender.validation.balance(), 400);
        assert_eq!(recipient.validation.balance(), 600);

        // More than the genesis allowance: only spendable because the
        // incoming entry is confirmed by its witnesses.
        let second = recipient
            .validation
            .submit(third.address(), 550, false)
            .await
            .unwrap();
        assert!(second.committed(), "{:?}", second.decision);
        assert_eq!(recipient.validation.balance(), 50);
        assert_eq!(third.validation.balance(), 1050);

        net.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_committed_transfer_is_persisted_by_every_party() {
        let net = TcpNetwork::start(true).await;
        let sender = net.nodes[0].container();
        let recipient = net.nodes[1].container();

        let outcome = sender
            .validation
            .submit(recipient.address(), 75, false)
            .await
            .unwrap();
        assert!(outcome.committed(), "{:?}", outcome.decision);
        let id = outcome.transaction.id.clone().unwrap();

        let read = |index: usize, kind: LedgerType| -> serde_json::Value {
            let path = net
                .data_dir(index)
                .join(format!("{}.json", kind.file_stem()));
            serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
        };
        let find = |ledger: &serde_json::Value| -> Option<serde_json::Value> {
            ledger["entries"]
                .as_array()
                .unwrap()
                .iter()
                .find(|entry| entry["id"] == id.as_str())
                .cloned()
        };

        // Both counterparties keep the true amount.
        for index in [0, 1] {
            let entry = find(&read(index, LedgerType::Owner)).unwrap();
            assert_eq!(entry["amount"], 75);
        }

        // Every quorum member keeps a redacted copy.
        for member in outcome.transaction.quorum().unwrap().to_vec() {
            let index = net
                .nodes
                .iter()
                .position(|node| node.container().address() == member)
                .unwrap();
            let entry = find(&read(index, LedgerType::Witness)).unwrap();
            assert!(entry["amount"].is_null());
            assert_eq!(entry["hash"], outcome.transaction.hash.clone().unwrap());
        }

        net.stop().await;
    }
}
