//! # Load-Test Driver
//!
//! Started by `TEST_CONFIG`. Until the deadline passes or the owner ledger
//! reaches `max_ledger_length`, the node sends small random amounts to
//! random pods. When senders may not validate, every test sender is kept out
//! of witness slots for the duration of the test.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use shared_types::{Address, LedgerType, PodRole, TestConfig};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::container::NodeContainer;

/// Upper bound for a single random transfer.
pub const MAX_TEST_AMOUNT: u64 = 5;

/// Pause after a submission that could not reach a quorum.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Deadline,
    LedgerFull,
    NoRecipients,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTestReport {
    pub attempted: usize,
    pub committed: usize,
    pub rejected: usize,
    /// Submissions that never reached a quorum.
    pub failed: usize,
    pub stopped_by: StopReason,
}

pub struct LoadTestDriver {
    container: Arc<NodeContainer>,
    running: AtomicBool,
}

impl LoadTestDriver {
    pub fn new(container: Arc<NodeContainer>) -> Self {
        Self {
            container,
            running: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run `config` in the background. Returns `false` if a test is already
    /// running on this node.
    pub fn spawn(self: &Arc<Self>, config: TestConfig, shutdown: watch::Receiver<bool>) -> bool {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }
        let driver = Arc::clone(self);
        tokio::spawn(async move {
            let report = driver.run(config, shutdown).await;
            info!(
                attempted = report.attempted,
                committed = report.committed,
                rejected = report.rejected,
                failed = report.failed,
                stopped_by = ?report.stopped_by,
                "[node] Load test finished"
            );
            driver.running.store(false, Ordering::SeqCst);
        });
        true
    }

    /// Drive one load test to completion.
    pub async fn run(&self, config: TestConfig, shutdown: watch::Receiver<bool>) -> LoadTestReport {
        let validation = &self.container.validation;
        let deadline = Instant::now() + Duration::from_secs(config.duration_secs);
        if !config.senders_as_validators {
            validation.set_witness_exclusions(config.sender_addresses.clone());
        }
        info!(
            duration_secs = config.duration_secs,
            max_ledger_length = config.max_ledger_length,
            local = config.local,
            "[node] Load test started"
        );

        let mut report = LoadTestReport {
            attempted: 0,
            committed: 0,
            rejected: 0,
            failed: 0,
            stopped_by: StopReason::Deadline,
        };

        report.stopped_by = loop {
            if *shutdown.borrow() {
                break StopReason::Shutdown;
            }
            if Instant::now() >= deadline {
                break StopReason::Deadline;
            }
            if config.max_ledger_length > 0
                && self.container.ledgers.len(LedgerType::Owner) >= config.max_ledger_length
            {
                break StopReason::LedgerFull;
            }
            let Some(to) = self.pick_recipient(config.local) else {
                break StopReason::NoRecipients;
            };
            let amount = rand::thread_rng().gen_range(1..=MAX_TEST_AMOUNT);

            report.attempted += 1;
            match validation.submit(to, amount, config.local).await {
                Ok(outcome) if outcome.committed() => report.committed += 1,
                Ok(_) => report.rejected += 1,
                Err(err) => {
                    report.failed += 1;
                    warn!(error = %err, "[node] Load-test transfer not submitted");
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
            }
        };

        if !config.senders_as_validators {
            validation.set_witness_exclusions(Vec::new());
        }
        report
    }

    /// A random online pod other than us; same-host pods only when `local`.
    fn pick_recipient(&self, local: bool) -> Option<Address> {
        let me = self.container.local_pod();
        let candidates: Vec<Address> = self
            .container
            .directory
            .all()
            .into_iter()
            .filter(|pod| pod.address != me.address)
            .filter(|pod| matches!(pod.role, PodRole::Regular | PodRole::Partner))
            .filter(|pod| pod.is_online())
            .filter(|pod| !local || pod.location.local_addr.ip() == me.location.local_addr.ip())
            .map(|pod| pod.address)
            .collect();
        candidates.choose(&mut rand::thread_rng()).cloned()
    }
}
