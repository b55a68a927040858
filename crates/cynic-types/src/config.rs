// Path: crates/cynic-types/src/config.rs
//! Shared configuration structures, deserialized via `serde` from TOML or
//! JSON: one struct per concern, each with a `Default` impl, composed into a
//! single root.

use serde::{Deserialize, Serialize};

use crate::app::{Axiom, Dimension, DimensionOrigin, DimensionThresholds};

/// Timing configuration: the single base multiplier every derived duration
/// scales from. Resolved as a governance-settable knob rather than a
/// compiled-in constant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Milliseconds; all of TICK/MICRO/SLOT/BLOCK/EPOCH/CYCLE derive from
    /// this by fixed φ-power ratios.
    pub timing_base_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            timing_base_ms: cynic_constants::DEFAULT_TIMING_BASE_MS,
        }
    }
}

/// Consensus-tunable knobs that are not themselves φ-derived constants but
/// are still configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsensusConfig {
    /// Minimum distinct voting operators for quorum.
    pub quorum: usize,
    /// Confirmation depth at which a block becomes finalized.
    pub finality_confirmation_depth: u64,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            quorum: cynic_constants::CONSENSUS_QUORUM,
            finality_confirmation_depth: cynic_constants::FINALITY_CONFIRMATION_DEPTH,
        }
    }
}

/// Gossip-layer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GossipConfig {
    /// Peers contacted per push round.
    pub fanout: usize,
    /// Bounded inbound-queue capacity before low-priority shedding kicks in.
    pub channel_capacity: usize,
}

impl Default for GossipConfig {
    fn default() -> Self {
        Self {
            fanout: cynic_constants::GOSSIP_FANOUT,
            channel_capacity: cynic_constants::CHANNEL_CAPACITY,
        }
    }
}

/// Chain-layer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Maximum judgments a sealed block may carry.
    pub max_judgments_per_block: usize,
    /// Maximum knowledge updates a sealed block may carry.
    pub max_knowledge_updates_per_block: usize,
    /// Slots a cycle spans, used to compute retention windows for orphaned
    /// blocks.
    pub slots_per_epoch: u64,
    /// Epochs a cycle spans.
    pub epochs_per_cycle: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            max_judgments_per_block: cynic_constants::MAX_JUDGMENTS_PER_BLOCK,
            max_knowledge_updates_per_block: cynic_constants::MAX_KNOWLEDGE_UPDATES_PER_BLOCK,
            slots_per_epoch: 89,
            epochs_per_cycle: 13,
        }
    }
}

/// The genesis record: axioms are fixed by the type system ([`Axiom::ALL`]);
/// this fixes the seed dimension set and the feature-vector bucketing
/// scheme used for soft-consensus pattern matching. Buckets are fixed-width,
/// `10`-wide score buckets per dimension, concatenated in dimension-name
/// lexicographic order, to keep cosine similarity deterministic across
/// nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genesis {
    /// The dimensions installed at network start, before any governance
    /// proposal runs.
    pub seed_dimensions: Vec<Dimension>,
    /// Width, in score points, of each feature-vector bucket (default 10,
    /// giving 11 buckets over `[0,100]`).
    pub feature_bucket_width: u32,
}

impl Genesis {
    /// A minimal, self-consistent genesis: one META dimension per axiom
    /// enforcing the confidence ceiling, suitable for tests and local
    /// development networks.
    #[must_use]
    pub fn minimal() -> Self {
        let seed_dimensions = Axiom::ALL
            .into_iter()
            .map(|axiom| Dimension {
                name: format!("{axiom:?}_META").to_uppercase(),
                axiom,
                weight_exponent: 0,
                thresholds: DimensionThresholds {
                    accept: 80.0,
                    transform: 50.0,
                    reject: 20.0,
                },
                evaluator_ref: "meta.identity".into(),
                origin: DimensionOrigin::Seed,
                discoverer_pubkey: None,
                is_meta: true,
            })
            .collect();
        Self {
            seed_dimensions,
            feature_bucket_width: 10,
        }
    }
}

/// The root configuration object: one field per subsystem, each
/// independently defaultable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CynicConfig {
    /// Timing base and derived ratios.
    pub timing: TimingConfig,
    /// Consensus quorum and finality knobs.
    pub consensus: ConsensusConfig,
    /// Gossip fanout and queue sizing.
    pub gossip: GossipConfig,
    /// Chain cardinality and retention knobs.
    pub chain: ChainConfig,
    /// The network's genesis record.
    pub genesis: Genesis,
}

impl Default for CynicConfig {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            consensus: ConsensusConfig::default(),
            gossip: GossipConfig::default(),
            chain: ChainConfig::default(),
            genesis: Genesis::minimal(),
        }
    }
}

impl CynicConfig {
    /// Parses a [`CynicConfig`] from a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, crate::error::CynicError> {
        toml::from_str(s).map_err(|e| {
            crate::error::ConfigurationError::InvalidConstant(format!("invalid config toml: {e}"))
                .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_four_seed_dimensions() {
        let cfg = CynicConfig::default();
        assert_eq!(cfg.genesis.seed_dimensions.len(), 4);
        assert!(cfg.genesis.seed_dimensions.iter().all(|d| d.is_meta));
    }

    #[test]
    fn default_timing_base_matches_ratio_kernel_default() {
        let cfg = CynicConfig::default();
        assert_eq!(
            cfg.timing.timing_base_ms,
            cynic_constants::DEFAULT_TIMING_BASE_MS
        );
    }

    #[test]
    fn toml_roundtrip_via_serde() {
        let cfg = CynicConfig::default();
        let s = toml::to_string(&cfg).expect("serialize");
        let back = CynicConfig::from_toml_str(&s).expect("parse");
        assert_eq!(cfg, back);
    }
}
