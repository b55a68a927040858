// Path: crates/cynic-gossip/src/peer.rs
use std::collections::BTreeMap;

/// A peer's standing in the local gossip view. Scores start at zero and
/// drift with observed behavior; a peer whose score falls below
/// [`PeerSet::DROP_THRESHOLD`] is evicted and replaced from the discovery
/// pool on the next maintenance tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeerStatus {
    /// Cumulative behavior score.
    pub score: i64,
    /// Last measured round-trip propagation time, if any.
    pub measured_propagation_ms: Option<u64>,
}

impl Default for PeerStatus {
    fn default() -> Self {
        Self {
            score: 0,
            measured_propagation_ms: None,
        }
    }
}

/// A known gossip peer: its libp2p identity plus local scoring state.
#[derive(Debug, Clone, PartialEq)]
pub struct Peer {
    /// Hex-encoded Ed25519 public key identifying the peer at the protocol
    /// level (distinct from its libp2p transport `PeerId`).
    pub pubkey: String,
    /// Local view of this peer's trustworthiness and latency.
    pub status: PeerStatus,
}

impl Peer {
    /// Creates a freshly discovered peer with neutral standing.
    #[must_use]
    pub fn new(pubkey: impl Into<String>) -> Self {
        Self {
            pubkey: pubkey.into(),
            status: PeerStatus::default(),
        }
    }
}

/// The local set of known gossip peers, scored and rankable for fanout
/// selection.
#[derive(Debug, Clone, Default)]
pub struct PeerSet {
    peers: BTreeMap<String, Peer>,
}

impl PeerSet {
    /// Reward for forwarding a message that turned out to be valid.
    pub const REWARD_VALID_DATA: i64 = 1;
    /// Penalty for forwarding a message that failed validation.
    pub const PENALTY_INVALID_DATA: i64 = -3;
    /// Penalty for failing to respond within a round's deadline.
    pub const PENALTY_TIMEOUT: i64 = -1;
    /// Score floor; a peer at or below this is evicted.
    pub const DROP_THRESHOLD: i64 = -10;

    /// Creates an empty peer set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a newly discovered peer if it is not already known.
    pub fn add(&mut self, pubkey: impl Into<String>) {
        let pubkey = pubkey.into();
        self.peers.entry(pubkey.clone()).or_insert_with(|| Peer::new(pubkey));
    }

    /// Applies `delta` to a peer's score, clamping nothing (a peer can go
    /// arbitrarily negative before the next eviction pass removes it).
    pub fn adjust_score(&mut self, pubkey: &str, delta: i64) {
        if let Some(peer) = self.peers.get_mut(pubkey) {
            peer.status.score += delta;
        }
    }

    /// Records a round-trip latency measurement for a peer.
    pub fn record_latency(&mut self, pubkey: &str, rtt_ms: u64) {
        if let Some(peer) = self.peers.get_mut(pubkey) {
            peer.status.measured_propagation_ms = Some(rtt_ms);
        }
    }

    /// Removes every peer at or below [`Self::DROP_THRESHOLD`], returning
    /// their pubkeys so the caller can refill from a discovery pool.
    pub fn evict_scored_out(&mut self) -> Vec<String> {
        let dropped: Vec<String> = self
            .peers
            .iter()
            .filter(|(_, p)| p.status.score <= Self::DROP_THRESHOLD)
            .map(|(k, _)| k.clone())
            .collect();
        for k in &dropped {
            self.peers.remove(k);
        }
        dropped
    }

    /// Returns all known peers ordered by pubkey, for deterministic
    /// iteration in tests and fanout selection.
    #[must_use]
    pub fn peers(&self) -> Vec<&Peer> {
        self.peers.values().collect()
    }

    /// Number of known peers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// Whether no peers are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// The median measured propagation time across peers with a
    /// measurement, used to adapt round timing.
    #[must_use]
    pub fn median_propagation_ms(&self) -> Option<u64> {
        let mut samples: Vec<u64> = self
            .peers
            .values()
            .filter_map(|p| p.status.measured_propagation_ms)
            .collect();
        if samples.is_empty() {
            return None;
        }
        samples.sort_unstable();
        Some(samples[samples.len() / 2])
    }
}
