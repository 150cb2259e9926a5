//! # Node Configuration
//!
//! Unified configuration for every component and runtime parameter.
//!
//! Defaults suit a single local node; `load_config()` applies `QL_*`
//! environment overrides on top.
//!
//! | Variable | Section | Default |
//! |----------|---------|---------|
//! | `QL_LISTEN_ADDR` | network | `0.0.0.0:7400` |
//! | `QL_PUBLIC_ADDR` | network | listen address |
//! | `QL_LOCAL_ADDR` | network | listen address |
//! | `QL_BOOTSTRAP` | network | none (comma separated) |
//! | `QL_ROLE` | network | `regular` |
//! | `QL_DATA_DIR` | storage | none (in-memory ledgers) |
//! | `QL_KEY_FILE` | wallet | none (ephemeral key) |
//! | `QL_RPC_TIMEOUT_SECS` | validation | `10` |
//! | `QL_MAX_NESTED_CHECKS` | validation | `16` |
//! | `QL_TIMEOUT_POLICY` | validation | `abstain` |
//! | `QL_MIN_RESPONSES` | validation | `3` |
//! | `QL_GENESIS_AMOUNT` | validation | `1000` |
//! | `QL_GENESIS_SEED` | genesis | `true` |
//! | `QL_CHURN_INTERVAL_SECS` | churn | `30` |
//! | `QL_CHURN_PROBABILITY` | churn | `0.1` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use ql_01_pod_directory::ChurnConfig;
use ql_05_validation::ValidationConfig;
use quorum_telemetry::TelemetryConfig;
use shared_types::PodRole;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    pub network: NetworkConfig,
    pub storage: StorageConfig,
    pub validation: ValidationConfig,
    pub genesis: GenesisConfig,
    pub churn: ChurnSettings,
    pub wallet: WalletConfig,
    pub telemetry: TelemetryConfig,
}

impl NodeConfig {
    /// Reject combinations that cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.validation.min_responses == 0 || self.validation.min_responses > 4 {
            return Err(ConfigError::Invalid {
                var: "QL_MIN_RESPONSES",
                value: self.validation.min_responses.to_string(),
                reason: "must be between 1 and 4".to_string(),
            });
        }
        if self.validation.max_nested_checks == 0 {
            return Err(ConfigError::Invalid {
                var: "QL_MAX_NESTED_CHECKS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if matches!(self.network.role, PodRole::Dummy) {
            return Err(ConfigError::Invalid {
                var: "QL_ROLE",
                value: "dummy".to_string(),
                reason: "dummy pods are load-test placeholders, not nodes".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Network configuration.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Address the peer listener binds.
    pub listen_addr: SocketAddr,
    /// Address other hosts dial; defaults to `listen_addr`.
    pub public_addr: Option<SocketAddr>,
    /// Address same-host pods dial for `local` transfers.
    pub local_addr: Option<SocketAddr>,
    /// Seed pods queried for membership on startup.
    pub bootstrap: Vec<SocketAddr>,
    pub role: PodRole,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 7400)),
            public_addr: None,
            local_addr: None,
            bootstrap: Vec::new(),
            role: PodRole::Regular,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    /// Directory holding `my_ledger.json` and `witness_ledger.json`.
    /// `None` keeps ledgers in memory.
    pub data_dir: Option<PathBuf>,
}

/// Genesis seeding. The amount is `ValidationConfig::genesis_amount`.
#[derive(Debug, Clone)]
pub struct GenesisConfig {
    /// Seed an empty owner ledger on startup.
    pub seed_on_startup: bool,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            seed_on_startup: true,
        }
    }
}

/// Churn emulation; disabled unless an interval is configured.
#[derive(Debug, Clone, Default)]
pub struct ChurnSettings {
    pub enabled: bool,
    pub emulator: ChurnConfig,
}

/// Wallet configuration.
#[derive(Debug, Clone, Default)]
pub struct WalletConfig {
    /// Hex private key file; created on first start. `None` uses a fresh
    /// key per run.
    pub key_file: Option<PathBuf>,
}

/// Load configuration from the process environment.
pub fn load_config() -> Result<NodeConfig, ConfigError> {
    load_config_from(|var| std::env::var(var).ok())
}

/// Load configuration from an arbitrary variable lookup.
pub fn load_config_from<F>(lookup: F) -> Result<NodeConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = NodeConfig {
        telemetry: TelemetryConfig::from_env(),
        ..NodeConfig::default()
    };

    if let Some(addr) = parsed(&lookup, "QL_LISTEN_ADDR")? {
        config.network.listen_addr = addr;
    }
    config.network.public_addr = parsed(&lookup, "QL_PUBLIC_ADDR")?;
    config.network.local_addr = parsed(&lookup, "QL_LOCAL_ADDR")?;
    if let Some(list) = lookup("QL_BOOTSTRAP") {
        config.network.bootstrap = list
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                entry.parse().map_err(|_| ConfigError::Invalid {
                    var: "QL_BOOTSTRAP",
                    value: entry.to_string(),
                    reason: "not an ip:port pair".to_string(),
                })
            })
            .collect::<Result<_, _>>()?;
    }
    if let Some(role) = lookup("QL_ROLE") {
        config.network.role = parse_role(&role)?;
    }

    config.storage.data_dir = lookup("QL_DATA_DIR").map(PathBuf::from);
    config.wallet.key_file = lookup("QL_KEY_FILE").map(PathBuf::from);

    if let Some(secs) = parsed::<u64, _>(&lookup, "QL_RPC_TIMEOUT_SECS")? {
        config.validation.rpc_timeout = Duration::from_secs(secs);
    }
    if let Some(max) = parsed(&lookup, "QL_MAX_NESTED_CHECKS")? {
        config.validation.max_nested_checks = max;
    }
    if let Some(policy) = lookup("QL_TIMEOUT_POLICY") {
        config.validation.timeout_policy =
            policy.parse().map_err(|reason| ConfigError::Invalid {
                var: "QL_TIMEOUT_POLICY",
                value: policy.clone(),
                reason,
            })?;
    }
    if let Some(min) = parsed(&lookup, "QL_MIN_RESPONSES")? {
        config.validation.min_responses = min;
    }
    if let Some(amount) = parsed(&lookup, "QL_GENESIS_AMOUNT")? {
        config.validation.genesis_amount = amount;
    }
    if let Some(seed) = parsed(&lookup, "QL_GENESIS_SEED")? {
        config.genesis.seed_on_startup = seed;
    }

    if let Some(secs) = parsed::<u64, _>(&lookup, "QL_CHURN_INTERVAL_SECS")? {
        config.churn.enabled = secs > 0;
        config.churn.emulator.interval = Duration::from_secs(secs.max(1));
    }
    if let Some(probability) = parsed::<f64, _>(&lookup, "QL_CHURN_PROBABILITY")? {
        if !(0.0..=1.0).contains(&probability) {
            return Err(ConfigError::Invalid {
                var: "QL_CHURN_PROBABILITY",
                value: probability.to_string(),
                reason: "must be within [0, 1]".to_string(),
            });
        }
        config.churn.emulator.flip_probability = probability;
    }

    config.validate()?;
    Ok(config)
}

fn parsed<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                var,
                value: raw.clone(),
                reason: "could not be parsed".to_string(),
            }),
    }
}

fn parse_role(value: &str) -> Result<PodRole, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "regular" => Ok(PodRole::Regular),
        "partner" => Ok(PodRole::Partner),
        "seed" => Ok(PodRole::Seed),
        "dummy" => Ok(PodRole::Dummy),
        _ => Err(ConfigError::Invalid {
            var: "QL_ROLE",
            value: value.to_string(),
            reason: "expected regular, partner or seed".to_string(),
        }),
    }
}
