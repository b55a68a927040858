// Path: crates/cynic-telemetry/src/prometheus_sink.rs
//! The concrete Prometheus-backed [`MetricsSink`](crate::sinks::MetricsSink)
//! implementation. Metrics are registered once by [`install`]; every sink
//! method after that only touches already-registered collectors.

use once_cell::sync::OnceCell;
use prometheus::{
    register_gauge, register_histogram, register_histogram_vec, register_int_counter,
    register_int_counter_vec, Gauge, Histogram, HistogramVec, IntCounter, IntCounterVec,
};

use crate::sinks::*;

static JUDGMENTS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static JUDGE_DURATION_SECONDS: OnceCell<Histogram> = OnceCell::new();
static PARTIAL_JUDGMENTS_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static BLOCKS_SEALED_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static HEAD_SLOT: OnceCell<Gauge> = OnceCell::new();
static GOSSIP_FORWARDED_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static GOSSIP_DEDUPED_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static GOSSIP_PEER_COUNT: OnceCell<Gauge> = OnceCell::new();
static GOSSIP_PROPAGATION_MS: OnceCell<Histogram> = OnceCell::new();
static CONSENSUS_ROUNDS_COMMITTED_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static CONSENSUS_EQUIVOCATIONS_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static CONSENSUS_ROUND_DURATION_SECONDS: OnceCell<Histogram> = OnceCell::new();
static ERRORS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();

/// Registers every CYNIC metric with the default Prometheus registry.
/// Must be called exactly once, before any sink method is invoked.
pub fn install() -> Result<(), prometheus::Error> {
    JUDGMENTS_TOTAL.get_or_try_init(|| {
        register_int_counter_vec!("cynic_judgments_total", "Judgments produced, by verdict", &["verdict"])
    })?;
    JUDGE_DURATION_SECONDS
        .get_or_try_init(|| register_histogram!("cynic_judge_duration_seconds", "Duration of judge() calls"))?;
    PARTIAL_JUDGMENTS_TOTAL
        .get_or_try_init(|| register_int_counter!("cynic_partial_judgments_total", "Judgments marked partial"))?;
    BLOCKS_SEALED_TOTAL.get_or_try_init(|| {
        register_int_counter_vec!("cynic_blocks_sealed_total", "Blocks sealed, by kind", &["kind"])
    })?;
    HEAD_SLOT.get_or_try_init(|| register_gauge!("cynic_head_slot", "Current local chain head slot"))?;
    GOSSIP_FORWARDED_TOTAL.get_or_try_init(|| {
        register_int_counter_vec!("cynic_gossip_forwarded_total", "Gossip messages forwarded, by kind", &["kind"])
    })?;
    GOSSIP_DEDUPED_TOTAL
        .get_or_try_init(|| register_int_counter!("cynic_gossip_deduped_total", "Gossip messages suppressed as duplicates"))?;
    GOSSIP_PEER_COUNT.get_or_try_init(|| register_gauge!("cynic_gossip_peer_count", "Current known peer count"))?;
    GOSSIP_PROPAGATION_MS
        .get_or_try_init(|| register_histogram!("cynic_gossip_propagation_ms", "Measured peer round-trip propagation time"))?;
    CONSENSUS_ROUNDS_COMMITTED_TOTAL
        .get_or_try_init(|| register_int_counter!("cynic_consensus_rounds_committed_total", "Consensus rounds reaching Commit"))?;
    CONSENSUS_EQUIVOCATIONS_TOTAL
        .get_or_try_init(|| register_int_counter!("cynic_consensus_equivocations_total", "Detected equivocations"))?;
    CONSENSUS_ROUND_DURATION_SECONDS
        .get_or_try_init(|| register_histogram!("cynic_consensus_round_duration_seconds", "Duration of one consensus round"))?;
    ERRORS_TOTAL.get_or_try_init(|| {
        register_int_counter_vec!("cynic_errors_total", "Errors, by stable error code", &["code"])
    })?;
    Ok(())
}

/// The Prometheus-backed sink; a zero-sized handle over the statics above.
#[derive(Debug, Clone, Copy)]
pub struct PrometheusSink;

macro_rules! get_metric {
    ($metric:ident) => {
        match $metric.get() {
            Some(m) => m,
            None => return,
        }
    };
}

impl JudgmentMetricsSink for PrometheusSink {
    fn inc_judgments_total(&self, verdict: &'static str) {
        get_metric!(JUDGMENTS_TOTAL).with_label_values(&[verdict]).inc();
    }
    fn observe_judge_duration(&self, duration_secs: f64) {
        get_metric!(JUDGE_DURATION_SECONDS).observe(duration_secs);
    }
    fn inc_partial_judgments(&self) {
        get_metric!(PARTIAL_JUDGMENTS_TOTAL).inc();
    }
}

impl ChainMetricsSink for PrometheusSink {
    fn inc_blocks_sealed(&self, kind: &'static str) {
        get_metric!(BLOCKS_SEALED_TOTAL).with_label_values(&[kind]).inc();
    }
    fn set_head_slot(&self, slot: u64) {
        get_metric!(HEAD_SLOT).set(slot as f64);
    }
}

impl GossipMetricsSink for PrometheusSink {
    fn inc_forwarded(&self, kind: &'static str) {
        get_metric!(GOSSIP_FORWARDED_TOTAL).with_label_values(&[kind]).inc();
    }
    fn inc_deduped(&self) {
        get_metric!(GOSSIP_DEDUPED_TOTAL).inc();
    }
    fn set_peer_count(&self, count: usize) {
        get_metric!(GOSSIP_PEER_COUNT).set(count as f64);
    }
    fn observe_propagation_ms(&self, ms: f64) {
        get_metric!(GOSSIP_PROPAGATION_MS).observe(ms);
    }
}

impl ConsensusMetricsSink for PrometheusSink {
    fn inc_rounds_committed(&self) {
        get_metric!(CONSENSUS_ROUNDS_COMMITTED_TOTAL).inc();
    }
    fn inc_equivocations_detected(&self) {
        get_metric!(CONSENSUS_EQUIVOCATIONS_TOTAL).inc();
    }
    fn observe_round_duration(&self, duration_secs: f64) {
        get_metric!(CONSENSUS_ROUND_DURATION_SECONDS).observe(duration_secs);
    }
}

impl ErrorMetricsSink for PrometheusSink {
    fn inc_error(&self, code: &'static str) {
        get_metric!(ERRORS_TOTAL).with_label_values(&[code]).inc();
    }
}

/// Installs the Prometheus metrics and registers [`PrometheusSink`] as the
/// process-wide sink. Idempotent: a second call is a no-op if the sink is
/// already installed.
pub fn init() -> Result<(), prometheus::Error> {
    install()?;
    static HANDLE: PrometheusSink = PrometheusSink;
    let _ = SINK.set(&HANDLE);
    Ok(())
}
