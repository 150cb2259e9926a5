//! Prometheus metrics for Quorum-Ledger.
//!
//! All metrics follow the naming convention: `ql_<area>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, GaugeVec, Histogram, HistogramOpts,
    Opts, Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // SENDER SIDE
    // =========================================================================

    pub static ref TRANSACTIONS_SUBMITTED: Counter = Counter::new(
        "ql_transactions_submitted_total",
        "Transactions this node started as sender"
    ).expect("metric creation failed");

    pub static ref TRANSACTIONS_COMMITTED: Counter = Counter::new(
        "ql_transactions_committed_total",
        "Transactions approved by their quorum"
    ).expect("metric creation failed");

    /// Failed submissions by stage
    pub static ref TRANSACTIONS_REJECTED: CounterVec = CounterVec::new(
        Opts::new("ql_transactions_rejected_total", "Transactions that did not commit"),
        &["stage"]  // stage: selection/signing/quorum
    ).expect("metric creation failed");

    pub static ref VALIDATION_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "ql_validation_round_duration_seconds",
            "Time from quorum selection to aggregate decision"
        ).buckets(exponential_buckets(0.001, 2.0, 15).unwrap_or_default())
    ).expect("metric creation failed");

    // =========================================================================
    // VALIDATOR SIDE
    // =========================================================================

    pub static ref VALIDATION_REQUESTS_SERVED: Counter = Counter::new(
        "ql_validation_requests_served_total",
        "SELECTED_FOR_VALIDATION requests answered"
    ).expect("metric creation failed");

    /// Votes seen by a sender
    pub static ref VOTES: CounterVec = CounterVec::new(
        Opts::new("ql_votes_total", "Quorum votes by outcome"),
        &["outcome"]  // outcome: approve/reject/abstain
    ).expect("metric creation failed");

    pub static ref NESTED_CONFIRMATIONS: CounterVec = CounterVec::new(
        Opts::new("ql_nested_confirmations_total", "Ledger entry hash confirmations"),
        &["result"]  // result: confirmed/denied/unreachable/local
    ).expect("metric creation failed");

    // =========================================================================
    // NETWORK & STORAGE
    // =========================================================================

    pub static ref PEER_RPC_TIMEOUTS: Counter = Counter::new(
        "ql_peer_rpc_timeouts_total",
        "Peer requests abandoned after the RPC timeout"
    ).expect("metric creation failed");

    pub static ref PODS_KNOWN: Gauge = Gauge::new(
        "ql_pods_known",
        "Pods in the local directory"
    ).expect("metric creation failed");

    pub static ref LEDGER_ENTRIES: GaugeVec = GaugeVec::new(
        Opts::new("ql_ledger_entries", "Entries per local ledger"),
        &["ledger"]  // ledger: owner/witness
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry. Safe to call twice.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(TRANSACTIONS_SUBMITTED.clone()),
        Box::new(TRANSACTIONS_COMMITTED.clone()),
        Box::new(TRANSACTIONS_REJECTED.clone()),
        Box::new(VALIDATION_DURATION.clone()),
        Box::new(VALIDATION_REQUESTS_SERVED.clone()),
        Box::new(VOTES.clone()),
        Box::new(NESTED_CONFIRMATIONS.clone()),
        Box::new(PEER_RPC_TIMEOUTS.clone()),
        Box::new(PODS_KNOWN.clone()),
        Box::new(LEDGER_ENTRIES.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}
