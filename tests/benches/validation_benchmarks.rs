//! # Quorum-Ledger Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | ql-04 Transaction Lifecycle | seal, signature and hash verification |
//! | ql-02 Ledger Store | balance over growing owner ledgers |
//! | ql-05 Validation | vote aggregation, full in-process round |

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use ql_05_validation::testing::TestCluster;
use ql_05_validation::{aggregate, TimeoutPolicy, ValidationConfig, Vote};
use shared_crypto::Secp256k1KeyPair;
use shared_types::{Address, Ledger, LedgerType, QuorumMembers, Transaction, ValidationResult};
use std::time::Duration;

fn quorum() -> QuorumMembers {
    QuorumMembers {
        witness_one: Secp256k1KeyPair::generate().address(),
        witness_two: Secp256k1KeyPair::generate().address(),
        partner_one: Secp256k1KeyPair::generate().address(),
        partner_two: Secp256k1KeyPair::generate().address(),
    }
}

fn sealed_transfer(key: &Secp256k1KeyPair, to: &Address, quorum: &QuorumMembers) -> Transaction {
    let mut tx = ql_04_transaction_lifecycle::construct(key.address(), to.clone(), 7, 1);
    ql_04_transaction_lifecycle::assign_quorum(&mut tx, quorum);
    ql_04_transaction_lifecycle::seal(&mut tx, key).unwrap();
    tx
}

// ============================================================================
// QL-04: Transaction Lifecycle
// ============================================================================

fn bench_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("ql-04-transaction-lifecycle");

    let key = Secp256k1KeyPair::generate();
    let to = Secp256k1KeyPair::generate().address();
    let quorum = quorum();
    let sealed = sealed_transfer(&key, &to, &quorum);

    group.bench_function("seal", |b| {
        b.iter(|| black_box(sealed_transfer(&key, &to, &quorum)))
    });
    group.bench_function("verify_signature", |b| {
        b.iter(|| black_box(ql_04_transaction_lifecycle::verify_signature(&sealed).is_ok()))
    });
    group.bench_function("verify_hash", |b| {
        b.iter(|| black_box(ql_04_transaction_lifecycle::verify_hash(&sealed).is_ok()))
    });

    group.finish();
}

// ============================================================================
// QL-02: Ledger Store
// ============================================================================

fn bench_balance(c: &mut Criterion) {
    let mut group = c.benchmark_group("ql-02-ledger-store");

    let key = Secp256k1KeyPair::generate();
    let owner = key.address();
    let peer = Secp256k1KeyPair::generate().address();
    let quorum = quorum();

    for size in [10usize, 100, 1_000] {
        let mut ledger = Ledger::new(LedgerType::Owner);
        ledger
            .append(&ql_04_transaction_lifecycle::genesis_transfer(
                owner.clone(),
                1_000,
                0,
            ))
            .unwrap();
        for i in 1..size {
            let mut tx = sealed_transfer(&key, &peer, &quorum);
            tx.timestamp = i as u64;
            tx.id = Some(format!("entry-{i}"));
            ledger.append(&tx).unwrap();
        }

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("balance", size), &ledger, |b, ledger| {
            b.iter(|| black_box(ql_02_ledger_store::balance(ledger, &owner)))
        });
    }

    group.finish();
}

// ============================================================================
// QL-05: Validation
// ============================================================================

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("ql-05-validation");
    group.measurement_time(Duration::from_secs(10));

    let members: Vec<Address> = quorum().to_vec();
    let votes: Vec<Vote> = members
        .iter()
        .map(|m| Vote::Cast(ValidationResult::approve("bench", m.clone())))
        .collect();
    group.bench_function("aggregate_four_approvals", |b| {
        b.iter(|| black_box(aggregate(&votes, TimeoutPolicy::Abstain, 3)))
    });

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let config = ValidationConfig {
        genesis_amount: 1_000_000,
        ..ValidationConfig::default()
    };

    // Fresh cluster per round so the sender's ledger does not grow.
    group.bench_function("in_process_round", |b| {
        b.iter_batched(
            || {
                let cluster = TestCluster::new(3, 2, config.clone());
                cluster.fund(0, 1_000_000);
                cluster
            },
            |cluster| {
                let recipient = cluster.node(1).address();
                let outcome = runtime
                    .block_on(cluster.node(0).service.submit(recipient, 1, false))
                    .unwrap();
                black_box(outcome.committed())
            },
            BatchSize::PerIteration,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_lifecycle, bench_balance, bench_validation);
criterion_main!(benches);
