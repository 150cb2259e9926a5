use std::str::FromStr;
use std::time::Duration;

/// How a quorum member that never answered counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeoutPolicy {
    /// The silent member casts no vote; the remaining votes decide, subject
    /// to `min_responses`.
    #[default]
    Abstain,
    /// Any silent member fails the transaction.
    Reject,
}

impl FromStr for TimeoutPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "abstain" => Ok(TimeoutPolicy::Abstain),
            "reject" => Ok(TimeoutPolicy::Reject),
            other => Err(format!("unknown timeout policy: {other}")),
        }
    }
}

/// Validation protocol settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationConfig {
    /// Deadline for every peer request, top-level and nested.
    pub rpc_timeout: Duration,
    /// Nested hash confirmations in flight at once per validation.
    pub max_nested_checks: usize,
    pub timeout_policy: TimeoutPolicy,
    /// Votes required for an approval under `TimeoutPolicy::Abstain`.
    pub min_responses: usize,
    /// A lone genesis entry backs transfers strictly below this amount.
    pub genesis_amount: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            rpc_timeout: Duration::from_secs(10),
            max_nested_checks: 16,
            timeout_policy: TimeoutPolicy::Abstain,
            min_responses: 3,
            genesis_amount: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parses_case_insensitively() {
        assert_eq!("Abstain".parse(), Ok(TimeoutPolicy::Abstain));
        assert_eq!(" REJECT ".parse(), Ok(TimeoutPolicy::Reject));
        assert!("maybe".parse::<TimeoutPolicy>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = ValidationConfig::default();
        assert_eq!(config.rpc_timeout, Duration::from_secs(10));
        assert_eq!(config.timeout_policy, TimeoutPolicy::Abstain);
        assert_eq!(config.min_responses, 3);
    }
}
