//! Folding quorum votes into a decision.
//!
//! Aggregation is a conjunction: one negative vote fails the transfer.
//! Silent members are handled by `TimeoutPolicy`.

use shared_types::{Address, ValidationResult};

use super::config::TimeoutPolicy;

/// What one quorum member contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Vote {
    Cast(ValidationResult),
    /// No usable reply (timeout, refused connection, unknown peer, bad reply).
    Abstained { validator: Address, detail: String },
}

impl Vote {
    pub fn validator(&self) -> &Address {
        match self {
            Vote::Cast(result) => &result.validator,
            Vote::Abstained { validator, .. } => validator,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub approved: bool,
    pub approvals: usize,
    pub rejections: Vec<ValidationResult>,
    pub abstentions: Vec<Address>,
    /// Present whenever `approved` is false.
    pub reason: Option<String>,
}

pub fn aggregate(votes: &[Vote], policy: TimeoutPolicy, min_responses: usize) -> Decision {
    let mut approvals = 0;
    let mut rejections = Vec::new();
    let mut abstentions = Vec::new();

    for vote in votes {
        match vote {
            Vote::Cast(result) if result.res => approvals += 1,
            Vote::Cast(result) => rejections.push(result.clone()),
            Vote::Abstained { validator, .. } => abstentions.push(validator.clone()),
        }
    }

    let reason = if let Some(first) = rejections.first() {
        Some(format!(
            "rejected by {}: {}",
            first.validator.short(),
            first.reason_str()
        ))
    } else if policy == TimeoutPolicy::Reject && !abstentions.is_empty() {
        Some(format!("no vote from {}", abstentions[0].short()))
    } else if approvals < min_responses {
        Some(format!(
            "only {approvals} of {min_responses} required votes arrived"
        ))
    } else {
        None
    };

    Decision {
        approved: reason.is_none(),
        approvals,
        rejections,
        abstentions,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::parse(&format!("04{:0128x}", n)).unwrap()
    }

    fn yes(n: u64) -> Vote {
        Vote::Cast(ValidationResult::approve("t", addr(n)))
    }

    fn no(n: u64) -> Vote {
        Vote::Cast(ValidationResult::reject("t", addr(n), "insufficient funds"))
    }

    fn silent(n: u64) -> Vote {
        Vote::Abstained {
            validator: addr(n),
            detail: "timeout".into(),
        }
    }

    #[test]
    fn test_unanimous_approval() {
        let decision = aggregate(&[yes(1), yes(2), yes(3), yes(4)], TimeoutPolicy::Abstain, 3);
        assert!(decision.approved);
        assert_eq!(decision.approvals, 4);
        assert!(decision.reason.is_none());
    }

    #[test]
    fn test_single_rejection_fails() {
        let decision = aggregate(&[yes(1), yes(2), no(3), yes(4)], TimeoutPolicy::Abstain, 3);
        assert!(!decision.approved);
        assert!(decision.reason.unwrap().contains("insufficient funds"));
    }

    #[test]
    fn test_abstain_policy_passes_on_three_approvals() {
        let decision = aggregate(&[yes(1), silent(2), yes(3), yes(4)], TimeoutPolicy::Abstain, 3);
        assert!(decision.approved);
        assert_eq!(decision.abstentions, vec![addr(2)]);
    }

    #[test]
    fn test_abstain_policy_needs_minimum_responses() {
        let decision = aggregate(&[yes(1), silent(2), silent(3), yes(4)], TimeoutPolicy::Abstain, 3);
        assert!(!decision.approved);
        assert!(decision.reason.unwrap().contains("only 2 of 3"));
    }

    #[test]
    fn test_reject_policy_fails_on_any_silence() {
        let decision = aggregate(&[yes(1), silent(2), yes(3), yes(4)], TimeoutPolicy::Reject, 3);
        assert!(!decision.approved);
        assert!(decision.reason.unwrap().starts_with("no vote from"));
    }

    #[test]
    fn test_no_votes_never_approves() {
        assert!(!aggregate(&[], TimeoutPolicy::Abstain, 3).approved);
    }
}
