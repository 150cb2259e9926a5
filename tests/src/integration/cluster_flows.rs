//! # Cluster Flows
//!
//! Multi-hop scenarios over the in-process cluster harness. Every request
//! goes through the wire codec and the real validation handlers.
//!
//! ## Flows Tested:
//!
//! 1. **Spend chain**: value received from a peer is spent again, twice,
//!    each hop proving its provenance through nested confirmation
//! 2. **Concurrent transfers**: three senders at once, value is conserved
//! 3. **Lost witness**: an unreachable witness of an incoming entry abstains;
//!    the entry stays spendable unless the policy demands every witness

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::future::join_all;
    use ql_05_validation::testing::TestCluster;
    use ql_05_validation::{TimeoutPolicy, ValidationConfig};
    use shared_types::{Address, LedgerType};

    fn config_with(timeout_policy: TimeoutPolicy) -> ValidationConfig {
        ValidationConfig {
            rpc_timeout: Duration::from_millis(300),
            max_nested_checks: 4,
            timeout_policy,
            min_responses: 3,
            genesis_amount: 500,
        }
    }

    fn config() -> ValidationConfig {
        config_with(TimeoutPolicy::Abstain)
    }

    fn total_balance(cluster: &TestCluster) -> i128 {
        cluster.nodes.iter().map(|n| n.service.balance()).sum()
    }

    // =========================================================================
    // SPEND CHAIN
    // =========================================================================

    /// Regular pods 0..=3, partners 4 and 5. Only node 0 holds a genesis.
    #[tokio::test]
    async fn test_received_value_is_spent_across_three_hops() {
        let cluster = TestCluster::new(4, 2, config());
        cluster.fund(0, 500);

        let hops = [(0usize, 1usize, 300u64), (1, 2, 250), (2, 3, 200)];
        for (from, to, amount) in hops {
            let outcome = cluster
                .node(from)
                .service
                .submit(cluster.node(to).address(), amount, false)
                .await
                .unwrap();
            assert!(
                outcome.committed(),
                "hop {from} -> {to}: {:?}",
                outcome.decision
            );
        }

        assert_eq!(cluster.node(0).service.balance(), 200);
        assert_eq!(cluster.node(1).service.balance(), 50);
        assert_eq!(cluster.node(2).service.balance(), 50);
        assert_eq!(cluster.node(3).service.balance(), 200);
        assert_eq!(total_balance(&cluster), 500);
    }

    #[tokio::test]
    async fn test_spend_beyond_received_value_is_rejected() {
        let cluster = TestCluster::new(4, 2, config());
        cluster.fund(0, 500);

        let first = cluster
            .node(0)
            .service
            .submit(cluster.node(1).address(), 120, false)
            .await
            .unwrap();
        assert!(first.committed());

        let second = cluster
            .node(1)
            .service
            .submit(cluster.node(2).address(), 121, false)
            .await
            .unwrap();

        assert!(!second.committed());
        let reason = second.decision.reason.unwrap();
        assert!(
            reason.contains("insufficient funds: holdings 120, requested 121"),
            "{reason}"
        );
        // Nothing moved.
        assert_eq!(cluster.node(1).service.balance(), 120);
        assert_eq!(cluster.node(2).service.balance(), 0);
    }

    // =========================================================================
    // CONCURRENT TRANSFERS
    // =========================================================================

    #[tokio::test]
    async fn test_concurrent_ring_of_transfers_conserves_value() {
        let cluster = TestCluster::new(4, 2, config());
        for index in 0..3 {
            cluster.fund(index, 500);
        }

        let ring = [(0usize, 1usize), (1, 2), (2, 0)];
        let outcomes = join_all(ring.iter().map(|&(from, to)| {
            cluster
                .node(from)
                .service
                .submit(cluster.node(to).address(), 100, false)
        }))
        .await;

        for outcome in &outcomes {
            let outcome = outcome.as_ref().unwrap();
            assert!(outcome.committed(), "{:?}", outcome.decision);
        }
        for index in 0..3 {
            assert_eq!(cluster.node(index).service.balance(), 500);
        }
        assert_eq!(total_balance(&cluster), 1500);

        // Each committed transfer lands in exactly four witness ledgers.
        let witnessed: usize = cluster
            .nodes
            .iter()
            .map(|n| n.service.ledgers().len(LedgerType::Witness))
            .sum();
        assert_eq!(witnessed, 12);
    }

    // =========================================================================
    // LOST WITNESS
    // =========================================================================

    /// Commit 200 from node 0 to node 1, then cut off a witness of that
    /// entry other than node 1. Returns the lost witness.
    async fn lose_witness_of_incoming(cluster: &TestCluster) -> Address {
        cluster.fund(0, 500);
        let incoming = cluster
            .node(0)
            .service
            .submit(cluster.node(1).address(), 200, false)
            .await
            .unwrap();
        assert!(incoming.committed());

        let quorum = incoming.transaction.quorum().unwrap().to_vec();
        let lost = quorum
            .iter()
            .find(|member| **member != cluster.node(1).address())
            .cloned()
            .unwrap();
        cluster.disconnect(cluster.index_of(&lost).unwrap());
        lost
    }

    #[tokio::test]
    async fn test_unreachable_witness_abstains_from_confirming_its_entry() {
        let cluster = TestCluster::new(4, 2, config());
        let lost = lose_witness_of_incoming(&cluster).await;
        let recipient = if cluster.node(2).address() == lost { 3 } else { 2 };

        let outcome = cluster
            .node(1)
            .service
            .submit(cluster.node(recipient).address(), 50, false)
            .await
            .unwrap();

        assert!(outcome.committed(), "{:?}", outcome.decision);
        assert_eq!(cluster.node(1).service.balance(), 150);
        assert_eq!(cluster.node(recipient).service.balance(), 50);
    }

    #[tokio::test]
    async fn test_unreachable_witness_blocks_its_entry_under_reject_policy() {
        let cluster = TestCluster::new(4, 2, config_with(TimeoutPolicy::Reject));
        let lost = lose_witness_of_incoming(&cluster).await;

        let outcome = cluster
            .node(1)
            .service
            .submit(cluster.node(2).address(), 50, false)
            .await
            .unwrap();

        assert!(!outcome.committed());
        assert!(!outcome.decision.rejections.is_empty());
        let expected = format!("not confirmed by {}", lost.short());
        for rejection in &outcome.decision.rejections {
            assert!(
                rejection.reason_str().contains(&expected),
                "{}",
                rejection.reason_str()
            );
        }
        assert_eq!(cluster.node(1).service.balance(), 200);
    }
}
