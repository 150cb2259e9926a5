//! # Ports Layer
//!
//! `MembershipView` is what quorum selection needs from the directory. The
//! directory service implements it; tests can substitute a fixed view.

use shared_types::{Pod, PodRole};

/// Read-only membership snapshot source.
pub trait MembershipView: Send + Sync {
    /// Pods that may currently be selected for `role`.
    fn candidates(&self, role: PodRole) -> Vec<Pod>;
}
