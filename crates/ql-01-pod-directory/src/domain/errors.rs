use shared_types::PodRole;
use thiserror::Error;

/// Quorum selection failures.
///
/// Selection never silently proceeds with fewer validators than requested.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// Fewer eligible candidates than the number requested.
    #[error("not enough peers: {available} eligible, {required} required")]
    NotEnoughPeers { available: usize, required: usize },

    /// Same as `NotEnoughPeers`, naming the role that ran short.
    #[error("not enough {role:?} peers: {available} eligible, {required} required")]
    NotEnoughRole {
        role: PodRole,
        available: usize,
        required: usize,
    },
}
