// Path: crates/cynic-gossip/src/dedup.rs
use bloomfilter::Bloom;

/// Per-round bloom filter deduplication: a message forwards exactly once
/// per round, regardless of how many peers re-announce it. Sized for
/// [`cynic_constants::GOSSIP_FANOUT`] peers each relaying up to a few
/// hundred items per round; false positives only cost an extra suppressed
/// forward, never a correctness violation, since the underlying chain and
/// knowledge stores are idempotent.
pub struct RoundDedup {
    bloom: Bloom<str>,
}

impl RoundDedup {
    /// Expected number of distinct items per round and the target false
    /// positive rate used to size the filter.
    const EXPECTED_ITEMS: usize = 4096;
    const FALSE_POSITIVE_RATE: f64 = 0.001;

    /// Builds a fresh, empty filter for a new round.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bloom: Bloom::new_for_fp_rate(Self::EXPECTED_ITEMS, Self::FALSE_POSITIVE_RATE),
        }
    }

    /// Checks whether `key` (e.g. a hex block hash) has already been seen
    /// this round, marking it seen either way.
    pub fn check_and_set(&mut self, key: &str) -> bool {
        self.bloom.check_and_set(&key.to_string())
    }
}

impl Default for RoundDedup {
    fn default() -> Self {
        Self::new()
    }
}
