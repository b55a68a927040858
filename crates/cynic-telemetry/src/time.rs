// Path: crates/cynic-telemetry/src/time.rs
use std::time::Instant;

use crate::sinks::ConsensusMetricsSink;

/// A RAII scope timer that records its elapsed duration to a
/// [`ConsensusMetricsSink`] when dropped.
pub struct RoundTimer<'a> {
    sink: &'a dyn ConsensusMetricsSink,
    start: Instant,
}

impl<'a> RoundTimer<'a> {
    /// Starts timing a scope against `sink`.
    #[must_use]
    pub fn new(sink: &'a dyn ConsensusMetricsSink) -> Self {
        Self {
            sink,
            start: Instant::now(),
        }
    }
}

impl Drop for RoundTimer<'_> {
    fn drop(&mut self) {
        self.sink.observe_round_duration(self.start.elapsed().as_secs_f64());
    }
}
