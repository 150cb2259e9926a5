//! # Random Validator Selector
//!
//! Draws uniformly random indices into the candidate list until `count`
//! distinct, non-excluded candidates are accepted. Eligibility is checked up
//! front so the draw loop always terminates.

use rand::Rng;
use shared_types::{Address, Pod};

use super::errors::SelectionError;

/// Regular-role pods per quorum (`witnessOne`, `witnessTwo`).
pub const WITNESSES_PER_QUORUM: usize = 2;

/// Partner-role pods per quorum (`partnerOne`, `partnerTwo`).
pub const PARTNERS_PER_QUORUM: usize = 2;

/// Pick `count` distinct candidates, skipping any whose address is in
/// `exclude`.
///
/// Each call is independently random; pass a seeded RNG for reproducible
/// tests.
pub fn select<R: Rng + ?Sized>(
    candidates: &[Pod],
    count: usize,
    exclude: &[Address],
    rng: &mut R,
) -> Result<Vec<Pod>, SelectionError> {
    let eligible: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, pod)| !exclude.contains(&pod.address))
        .map(|(index, _)| index)
        .collect();

    if eligible.len() < count {
        return Err(SelectionError::NotEnoughPeers {
            available: eligible.len(),
            required: count,
        });
    }

    let mut chosen: Vec<usize> = Vec::with_capacity(count);
    while chosen.len() < count {
        let index = rng.gen_range(0..candidates.len());
        if chosen.contains(&index) || !eligible.contains(&index) {
            continue;
        }
        chosen.push(index);
    }

    Ok(chosen.into_iter().map(|i| candidates[i].clone()).collect())
}
