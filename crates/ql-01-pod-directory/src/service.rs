//! # Directory Service
//!
//! `PodDirectory` is an explicit, injectable store owned by the node
//! process. Clones share the same registry.

use std::sync::Arc;

use parking_lot::RwLock;
use rand::Rng;
use shared_types::{Address, Pod, PodRole, PodStatus, QuorumMembers};
use tracing::{debug, info};

use crate::domain::{select, SelectionError, PARTNERS_PER_QUORUM, WITNESSES_PER_QUORUM};
use crate::ports::MembershipView;

/// In-memory registry of known pods, keyed by address.
#[derive(Clone, Default)]
pub struct PodDirectory {
    pods: Arc<RwLock<Vec<Pod>>>,
}

impl PodDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pod, replacing any entry with the same address.
    ///
    /// Returns `true` when the address was not known before.
    pub fn register(&self, pod: Pod) -> bool {
        let mut pods = self.pods.write();
        match pods.iter().position(|p| p.address == pod.address) {
            Some(index) => {
                pods[index] = pod;
                false
            }
            None => {
                info!("[ql-01] Registered pod {} ({:?})", pod.address.short(), pod.role);
                pods.push(pod);
                true
            }
        }
    }

    /// Membership snapshot.
    pub fn all(&self) -> Vec<Pod> {
        self.pods.read().clone()
    }

    pub fn index_by_address(&self, address: &Address) -> Option<usize> {
        self.pods.read().iter().position(|p| p.address == *address)
    }

    pub fn get(&self, address: &Address) -> Option<Pod> {
        self.pods.read().iter().find(|p| p.address == *address).cloned()
    }

    /// Drop a pod, typically after its connection failed.
    pub fn remove(&self, address: &Address) -> Option<Pod> {
        let mut pods = self.pods.write();
        let index = pods.iter().position(|p| p.address == *address)?;
        let removed = pods.remove(index);
        info!("[ql-01] Removed pod {}", removed.address.short());
        Some(removed)
    }

    /// Update a pod's status. Returns `false` for unknown addresses.
    pub fn set_status(&self, address: &Address, status: PodStatus) -> bool {
        let mut pods = self.pods.write();
        match pods.iter_mut().find(|p| p.address == *address) {
            Some(pod) => {
                debug!("[ql-01] {} is now {:?}", address.short(), status);
                pod.status = status;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.pods.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pods.read().is_empty()
    }

    /// Drop every pod.
    pub fn clear(&self) {
        self.pods.write().clear();
    }
}

impl MembershipView for PodDirectory {
    fn candidates(&self, role: PodRole) -> Vec<Pod> {
        self.pods
            .read()
            .iter()
            .filter(|p| p.role == role && p.is_online())
            .cloned()
            .collect()
    }
}

/// Picks the four validators for a transaction.
#[derive(Clone)]
pub struct QuorumSelector {
    view: Arc<dyn MembershipView>,
}

impl QuorumSelector {
    pub fn new(view: Arc<dyn MembershipView>) -> Self {
        Self { view }
    }

    /// Two online regular pods and two online partner pods, none of them
    /// `me`. Addresses in `exclude_witnesses` are additionally skipped for
    /// the regular slots.
    pub fn select_quorum<R: Rng + ?Sized>(
        &self,
        me: &Address,
        exclude_witnesses: &[Address],
        rng: &mut R,
    ) -> Result<QuorumMembers, SelectionError> {
        let mut witness_exclusions = exclude_witnesses.to_vec();
        witness_exclusions.push(me.clone());

        let witnesses = self.pick(PodRole::Regular, WITNESSES_PER_QUORUM, &witness_exclusions, rng)?;
        let partners = self.pick(PodRole::Partner, PARTNERS_PER_QUORUM, &[me.clone()], rng)?;

        let mut witnesses = witnesses.into_iter().map(|p| p.address);
        let mut partners = partners.into_iter().map(|p| p.address);
        match (witnesses.next(), witnesses.next(), partners.next(), partners.next()) {
            (Some(witness_one), Some(witness_two), Some(partner_one), Some(partner_two)) => {
                Ok(QuorumMembers {
                    witness_one,
                    witness_two,
                    partner_one,
                    partner_two,
                })
            }
            _ => Err(SelectionError::NotEnoughPeers {
                available: 0,
                required: WITNESSES_PER_QUORUM + PARTNERS_PER_QUORUM,
            }),
        }
    }

    fn pick<R: Rng + ?Sized>(
        &self,
        role: PodRole,
        count: usize,
        exclude: &[Address],
        rng: &mut R,
    ) -> Result<Vec<Pod>, SelectionError> {
        let candidates = self.view.candidates(role);
        select(&candidates, count, exclude, rng).map_err(|err| match err {
            SelectionError::NotEnoughPeers {
                available,
                required,
            } => SelectionError::NotEnoughRole {
                role,
                available,
                required,
            },
            other => other,
        })
    }
}
