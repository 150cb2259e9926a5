//! # Churn Emulation
//!
//! Flips the local pod between `Online` and `Busy` at a fixed interval so
//! load tests see peers drop in and out of the candidate pool. Peers only
//! learn about a flip when it is announced, so `run` reports every change
//! to the notifier registered with `with_notifier`.

use std::time::Duration;

use rand::Rng;
use shared_types::{Address, PodStatus};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::service::PodDirectory;

/// Churn timer settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChurnConfig {
    pub interval: Duration,
    /// Chance of flipping on each tick, in `[0, 1]`.
    pub flip_probability: f64,
}

impl Default for ChurnConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            flip_probability: 0.1,
        }
    }
}

pub struct ChurnEmulator {
    directory: PodDirectory,
    local: Address,
    config: ChurnConfig,
    changes: Option<mpsc::UnboundedSender<PodStatus>>,
}

impl ChurnEmulator {
    pub fn new(directory: PodDirectory, local: Address, config: ChurnConfig) -> Self {
        Self {
            directory,
            local,
            config,
            changes: None,
        }
    }

    /// Send the new status on `changes` whenever `run` flips it.
    pub fn with_notifier(mut self, changes: mpsc::UnboundedSender<PodStatus>) -> Self {
        self.changes = Some(changes);
        self
    }

    /// One churn step. Returns the local pod's status afterwards, or `None`
    /// if the pod is not in the directory.
    pub fn tick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<PodStatus> {
        let current = self.directory.get(&self.local)?.status;
        let probability = self.config.flip_probability.clamp(0.0, 1.0);
        if !rng.gen_bool(probability) {
            return Some(current);
        }

        let next = match current {
            PodStatus::Online => PodStatus::Busy,
            PodStatus::Busy => PodStatus::Online,
            PodStatus::Offline => return Some(current),
        };
        self.directory.set_status(&self.local, next);
        debug!("[ql-01] Churn: {:?} -> {:?}", current, next);
        Some(next)
    }

    /// Tick until `shutdown` flips to `true` or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "[ql-01] Churn emulator started (every {:?}, p={})",
            self.config.interval, self.config.flip_probability
        );
        let mut ticker = tokio::time::interval(self.config.interval);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let before = self.directory.get(&self.local).map(|pod| pod.status);
                    let after = self.tick(&mut rand::thread_rng());
                    if let (Some(status), Some(changes)) = (after, &self.changes) {
                        if after != before && changes.send(status).is_err() {
                            debug!("[ql-01] Churn listener gone");
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("[ql-01] Churn emulator stopped");
    }
}
