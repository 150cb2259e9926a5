//! # Quorum Telemetry
//!
//! Observability for Quorum-Ledger nodes.
//!
//! ## Components
//!
//! - **Logs:** `tracing-subscriber` with an env filter, pretty or JSON output
//! - **Metrics:** Prometheus collectors on a crate-global registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quorum_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `QL_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter directive |
//! | `QL_JSON_LOGS` | `false` | Emit JSON lines instead of pretty text |
//! | `QL_SERVICE_NAME` | `quorum-ledger` | Service name on every log line |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    gather_metrics, register_metrics, HistogramTimer, LEDGER_ENTRIES, NESTED_CONFIRMATIONS,
    PEER_RPC_TIMEOUTS, PODS_KNOWN, TRANSACTIONS_COMMITTED, TRANSACTIONS_REJECTED,
    TRANSACTIONS_SUBMITTED, VALIDATION_DURATION, VALIDATION_REQUESTS_SERVED, VOTES,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Keeps telemetry alive for the lifetime of the process.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry...");
    }
}

/// Register metrics, then install the log subscriber.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    register_metrics()?;
    init_logging(&config)?;
    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
