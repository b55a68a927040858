//! Ready-made domain fixtures: sample dimensions, operators, identities, and
//! configs, so crate test suites don't each hand-roll the same boilerplate.

use cynic_crypto::sign::Ed25519KeyPair;
use cynic_types::app::{Axiom, Dimension, DimensionOrigin, DimensionThresholds, OperatorState};
use cynic_types::config::CynicConfig;

use crate::randomness::TestRng;

/// A deterministic Ed25519 identity derived from `seed`, for tests that need
/// a stable keypair rather than a freshly generated one every run.
pub fn deterministic_keypair(seed: u8) -> Ed25519KeyPair {
    match Ed25519KeyPair::from_seed(&[seed; 32]) {
        Ok(kp) => kp,
        Err(e) => unreachable!("a 32-byte seed always yields a valid keypair: {e}"),
    }
}

/// A small byte payload standing in for an item's content.
#[must_use]
pub fn small_item_bytes() -> &'static [u8] {
    b"a representative test item"
}

/// A 64 KiB, non-constant byte payload, for tests that care about larger
/// item sizes (e.g. hashing throughput, chunked canonical encoding).
#[must_use]
pub fn large_item_bytes() -> Vec<u8> {
    let mut rng = TestRng::new(0xC7_1C);
    let mut buf = vec![0u8; 65536];
    rng.fill_bytes(&mut buf);
    buf
}

/// A non-meta dimension on `axiom` with a given `name` and weight exponent,
/// the shape most dimension-scoring tests need.
#[must_use]
pub fn sample_dimension(name: &str, axiom: Axiom, weight_exponent: i32) -> Dimension {
    Dimension {
        name: name.to_string(),
        axiom,
        weight_exponent,
        thresholds: DimensionThresholds {
            accept: 80.0,
            transform: 50.0,
            reject: 20.0,
        },
        evaluator_ref: format!("{}.v1", name.to_lowercase()),
        origin: DimensionOrigin::Seed,
        discoverer_pubkey: None,
        is_meta: false,
    }
}

/// A seed META dimension for `axiom`, matching what [`CynicConfig::default`]
/// installs at genesis.
#[must_use]
pub fn sample_meta_dimension(axiom: Axiom) -> Dimension {
    Dimension {
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
    }
}

/// An [`OperatorState`] with a deterministic keypair and a given reputation
/// profile, for consensus/chain tests that need several distinct operators.
#[must_use]
pub fn sample_operator(seed: u8, e_score: f64, burn_total: u64, uptime_ratio: f64) -> OperatorState {
    let pubkey = deterministic_keypair(seed).public_key().to_hex();
    let mut op = OperatorState::new(pubkey);
    op.e_score = e_score;
    op.burn_total = burn_total;
    op.uptime_ratio = uptime_ratio;
    op
}

/// The protocol's default config, with a local, fast timing base suitable
/// for tests that don't want to wait on real-world slot/epoch durations.
#[must_use]
pub fn fast_test_config() -> CynicConfig {
    let mut cfg = CynicConfig::default();
    cfg.timing.timing_base_ms = 5;
    cfg
}

#[cfg(test)]
mod tests {
    use super::*;
    use cynic_crypto::sign::SigningKeyPair;

    #[test]
    fn deterministic_keypair_is_stable_across_calls() {
        let a = deterministic_keypair(9);
        let b = deterministic_keypair(9);
        assert_eq!(a.public_key().to_hex(), b.public_key().to_hex());
    }

    #[test]
    fn sample_operator_has_expected_pubkey_and_profile() {
        let op = sample_operator(3, 50.0, 10, 0.9);
        assert_eq!(op.pubkey, deterministic_keypair(3).public_key().to_hex());
        assert_eq!(op.e_score, 50.0);
        assert_eq!(op.burn_total, 10);
    }

    #[test]
    fn fast_test_config_overrides_only_timing() {
        let cfg = fast_test_config();
        assert_eq!(cfg.timing.timing_base_ms, 5);
        assert_eq!(cfg.genesis.seed_dimensions.len(), 4);
    }
}
