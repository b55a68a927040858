// Path: crates/cynic-telemetry/src/sinks.rs
//! Abstract metrics traits, one per component, plus a no-op default and the
//! static accessors every component calls instead of reaching into a
//! concrete backend directly.

use once_cell::sync::OnceCell;

/// A no-op sink used until a concrete backend is installed.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

/// The globally installed sink, set once at node startup.
pub static SINK: OnceCell<&'static dyn MetricsSink> = OnceCell::new();
static NOP_SINK: NopSink = NopSink;

/// Returns the installed judgment metrics sink, or a no-op.
#[must_use]
pub fn judgment_metrics() -> &'static dyn JudgmentMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Returns the installed chain metrics sink, or a no-op.
#[must_use]
pub fn chain_metrics() -> &'static dyn ChainMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Returns the installed gossip metrics sink, or a no-op.
#[must_use]
pub fn gossip_metrics() -> &'static dyn GossipMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Returns the installed consensus metrics sink, or a no-op.
#[must_use]
pub fn consensus_metrics() -> &'static dyn ConsensusMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Returns the installed error metrics sink, or a no-op.
#[must_use]
pub fn error_metrics() -> &'static dyn ErrorMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Metrics for the judgment engine.
pub trait JudgmentMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the count of judgments produced, labeled by verdict.
    fn inc_judgments_total(&self, verdict: &'static str);
    /// Observes the wall-clock duration of one `judge` call.
    fn observe_judge_duration(&self, duration_secs: f64);
    /// Increments the count of judgments marked partial.
    fn inc_partial_judgments(&self);
}
impl JudgmentMetricsSink for NopSink {
    fn inc_judgments_total(&self, _verdict: &'static str) {}
    fn observe_judge_duration(&self, _duration_secs: f64) {}
    fn inc_partial_judgments(&self) {}
}

/// Metrics for the chain log.
pub trait ChainMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the count of blocks sealed, labeled by kind.
    fn inc_blocks_sealed(&self, kind: &'static str);
    /// Sets the gauge for the current head slot.
    fn set_head_slot(&self, slot: u64);
}
impl ChainMetricsSink for NopSink {
    fn inc_blocks_sealed(&self, _kind: &'static str) {}
    fn set_head_slot(&self, _slot: u64) {}
}

/// Metrics for gossip dissemination.
pub trait GossipMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the count of messages forwarded, labeled by message kind.
    fn inc_forwarded(&self, kind: &'static str);
    /// Increments the count of messages suppressed as round duplicates.
    fn inc_deduped(&self);
    /// Sets the gauge for the current peer count.
    fn set_peer_count(&self, count: usize);
    /// Observes a measured peer round-trip propagation time.
    fn observe_propagation_ms(&self, ms: f64);
}
impl GossipMetricsSink for NopSink {
    fn inc_forwarded(&self, _kind: &'static str) {}
    fn inc_deduped(&self) {}
    fn set_peer_count(&self, _count: usize) {}
    fn observe_propagation_ms(&self, _ms: f64) {}
}

/// Metrics for phi-BFT consensus.
pub trait ConsensusMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the count of rounds reaching `Commit`.
    fn inc_rounds_committed(&self);
    /// Increments the count of detected equivocations.
    fn inc_equivocations_detected(&self);
    /// Observes the duration of one consensus round.
    fn observe_round_duration(&self, duration_secs: f64);
}
impl ConsensusMetricsSink for NopSink {
    fn inc_rounds_committed(&self) {}
    fn inc_equivocations_detected(&self) {}
    fn observe_round_duration(&self, _duration_secs: f64) {}
}

/// Metrics for structured error reporting.
pub trait ErrorMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments a counter for an error, categorized by its stable code.
    fn inc_error(&self, code: &'static str);
}
impl ErrorMetricsSink for NopSink {
    fn inc_error(&self, _code: &'static str) {}
}

/// A unified sink implementing every component trait, the shape a concrete
/// backend (e.g. [`crate::prometheus_sink::PrometheusSink`]) must provide.
pub trait MetricsSink:
    JudgmentMetricsSink + ChainMetricsSink + GossipMetricsSink + ConsensusMetricsSink + ErrorMetricsSink
{
}

impl<T> MetricsSink for T where
    T: JudgmentMetricsSink + ChainMetricsSink + GossipMetricsSink + ConsensusMetricsSink + ErrorMetricsSink
{
}
