// Path: crates/cynic-judgment/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]

//! # CYNIC Judgment Engine
//!
//! Converts an [`Item`] into a signed [`Judgment`] deterministically, given
//! the installed [`Dimension`] set. Evaluators are pure functions of their
//! declared inputs — this crate never lets one reach outside its
//! `(item, context)` arguments.

use std::collections::BTreeMap;

use tracing::warn;

use cynic_crypto::sign::{Ed25519KeyPair, SerializableKey, SigningKeyPair};
use cynic_types::app::{Dimension, Item, ItemHash, Judgment, Verdict};
use cynic_types::error::DimensionError;

/// The opaque bag of context passed to every evaluator alongside the item.
/// Evaluators are expected to treat this as read-only input; the engine
/// itself never mutates it mid-evaluation.
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    /// Arbitrary key/value context data, e.g. feature hints upstream
    /// collaborators attach before calling `submit_item`.
    pub values: BTreeMap<String, String>,
}

/// A pure scoring function installed for one [`Dimension`].
pub trait Evaluator: Send + Sync {
    /// Scores `item` in `[0, 100]` given `ctx`. Must be a pure function of
    /// its inputs: no I/O, no shared mutable state, no wall-clock reads.
    fn evaluate(&self, item: &Item<'_>, ctx: &EvalContext) -> Result<f64, String>;
}

/// Maps each installed dimension's `evaluator_ref` to its [`Evaluator`]
/// implementation. Kept separate from [`Dimension`] itself so dimension
/// records stay serializable for governance proposals.
#[derive(Default)]
pub struct EvaluatorRegistry {
    evaluators: BTreeMap<String, Box<dyn Evaluator>>,
}

impl EvaluatorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs an evaluator under `evaluator_ref`.
    pub fn register(&mut self, evaluator_ref: impl Into<String>, evaluator: Box<dyn Evaluator>) {
        self.evaluators.insert(evaluator_ref.into(), evaluator);
    }

    fn get(&self, evaluator_ref: &str) -> Option<&dyn Evaluator> {
        self.evaluators.get(evaluator_ref).map(AsRef::as_ref)
    }
}

/// Hashes an item's content, producing the `item_hash` a judgment carries
/// instead of the raw bytes.
pub fn item_hash(item: &Item<'_>) -> Result<ItemHash, cynic_crypto::error::IntegrityError> {
    cynic_crypto::sha256(item.content).map(ItemHash::from_bytes)
}

/// Evaluates `item` against `dimensions` using `registry`, signs the result
/// with `keypair`, and returns the assembled [`Judgment`]. Enqueueing the
/// result into the chain's pending batch is the caller's responsibility
/// (typically the node controller).
pub fn judge(
    id: impl Into<String>,
    item: &Item<'_>,
    ctx: &EvalContext,
    dimensions: &[Dimension],
    registry: &EvaluatorRegistry,
    keypair: &Ed25519KeyPair,
    timestamp_ms: u64,
) -> Result<Judgment, DimensionError> {
    let item_hash = item_hash(item)
        .map_err(|e| DimensionError::EvaluatorFailed("item_hash".into(), e.to_string()))?;

    let mut scores: BTreeMap<String, f64> = BTreeMap::new();
    let mut weighted_log_sum = 0.0_f64;
    let mut weight_total = 0.0_f64;
    let mut partial = false;

    for dim in dimensions {
        match registry.get(&dim.evaluator_ref) {
            Some(evaluator) => match evaluator.evaluate(item, ctx) {
                Ok(score) => {
                    let clamped = score.clamp(0.0, 100.0);
                    scores.insert(dim.name.clone(), clamped);
                    let weight = dim.weight();
                    if clamped > 0.0 {
                        weighted_log_sum += weight * (clamped / 100.0).ln();
                    } else {
                        // ln(0) is undefined; a zero score on any weighted
                        // dimension forces the geometric mean to zero.
                        weighted_log_sum = f64::NEG_INFINITY;
                    }
                    weight_total += weight;
                }
                Err(e) => {
                    if dim.is_meta {
                        return Err(DimensionError::MetaEvaluationFailed(dim.name.clone(), e));
                    }
                    warn!(target: "judgment", dimension = %dim.name, error = %e, "dimension evaluator failed, omitting");
                    partial = true;
                }
            },
            None => {
                if dim.is_meta {
                    return Err(DimensionError::MetaEvaluationFailed(
                        dim.name.clone(),
                        "no evaluator registered".to_string(),
                    ));
                }
                partial = true;
            }
        }
    }

    if weight_total <= 0.0 {
        return Err(DimensionError::NoDimensions);
    }

    let global_raw = if weighted_log_sum.is_finite() {
        (weighted_log_sum / weight_total).exp() * 100.0
    } else {
        0.0
    };
    let global_score = global_raw.clamp(0.0, 100.0);

    let confidence = (global_raw / 100.0 * cynic_constants::PHI_INV).min(cynic_constants::PHI_INV);
    let doubt = 1.0 - confidence;
    let verdict = Verdict::from_global_score(global_score);

    let mut unsigned = Judgment {
        id: id.into(),
        item_hash,
        scores,
        global_score,
        confidence,
        doubt,
        verdict,
        partial,
        operator_pubkey: keypair.public_key().to_hex(),
        signature: String::new(),
        timestamp_ms,
    };

    let preimage = unsigned.signing_preimage();
    let signature = keypair
        .sign(&preimage)
        .map_err(|e| DimensionError::EvaluatorFailed("sign".into(), e.to_string()))?;
    unsigned.signature = signature.to_hex();
    Ok(unsigned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cynic_types::app::{Axiom, DimensionOrigin, DimensionThresholds};

    struct ConstEvaluator(f64);
    impl Evaluator for ConstEvaluator {
        fn evaluate(&self, _item: &Item<'_>, _ctx: &EvalContext) -> Result<f64, String> {
            Ok(self.0)
        }
    }

    struct FailingEvaluator;
    impl Evaluator for FailingEvaluator {
        fn evaluate(&self, _item: &Item<'_>, _ctx: &EvalContext) -> Result<f64, String> {
            Err("boom".into())
        }
    }

    fn coherence_dim() -> Dimension {
        Dimension {
            name: "COHERENCE".into(),
            axiom: Axiom::Phi,
            weight_exponent: 1,
            thresholds: DimensionThresholds {
                accept: 80.0,
                transform: 50.0,
                reject: 20.0,
            },
            evaluator_ref: "coherence.v1".into(),
            origin: DimensionOrigin::Seed,
            discoverer_pubkey: None,
            is_meta: false,
        }
    }

    #[test]
    fn single_dimension_geometric_mean_is_its_own_score() {
        let mut registry = EvaluatorRegistry::new();
        registry.register("coherence.v1", Box::new(ConstEvaluator(80.0)));
        let kp = Ed25519KeyPair::generate().expect("keygen");
        let item = Item::new(b"hello");
        let j = judge(
            "j1",
            &item,
            &EvalContext::default(),
            &[coherence_dim()],
            &registry,
            &kp,
            0,
        )
        .expect("judge");
        // A single weighted dimension's geometric mean reduces to the
        // dimension's own score regardless of its weight exponent:
        // (s^w)^(1/w) == s.
        assert!((j.global_score - 80.0).abs() < 1e-6);
        let expected_confidence = (0.80 * cynic_constants::PHI_INV).min(cynic_constants::PHI_INV);
        assert!((j.confidence - expected_confidence).abs() < 1e-6);
        assert!(j.satisfies_confidence_envelope());
    }

    #[test]
    fn missing_non_meta_evaluator_sets_partial() {
        let mut registry = EvaluatorRegistry::new();
        registry.register("coherence.v1", Box::new(FailingEvaluator));
        let mut dims = vec![coherence_dim()];
        dims.push(Dimension {
            name: "OTHER".into(),
            evaluator_ref: "other.v1".into(),
            weight_exponent: 0,
            ..coherence_dim()
        });
        registry.register("other.v1", Box::new(ConstEvaluator(60.0)));
        let kp = Ed25519KeyPair::generate().expect("keygen");
        let item = Item::new(b"x");
        let j = judge(
            "j2",
            &item,
            &EvalContext::default(),
            &dims,
            &registry,
            &kp,
            0,
        )
        .expect("judge");
        assert!(j.partial);
    }

    #[test]
    fn failing_meta_dimension_rejects_judgment() {
        let mut registry = EvaluatorRegistry::new();
        registry.register("meta.v1", Box::new(FailingEvaluator));
        let meta_dim = Dimension {
            is_meta: true,
            evaluator_ref: "meta.v1".into(),
            ..coherence_dim()
        };
        let kp = Ed25519KeyPair::generate().expect("keygen");
        let item = Item::new(b"x");
        let err = judge(
            "j3",
            &item,
            &EvalContext::default(),
            &[meta_dim],
            &registry,
            &kp,
            0,
        )
        .unwrap_err();
        assert!(matches!(err, DimensionError::MetaEvaluationFailed(..)));
    }

    #[test]
    fn zero_weight_total_fails_with_no_dimensions() {
        let registry = EvaluatorRegistry::new();
        let kp = Ed25519KeyPair::generate().expect("keygen");
        let item = Item::new(b"x");
        let err = judge(
            "j4",
            &item,
            &EvalContext::default(),
            &[],
            &registry,
            &kp,
            0,
        )
        .unwrap_err();
        assert!(matches!(err, DimensionError::NoDimensions));
    }

    #[test]
    fn judging_twice_is_deterministic_modulo_signature() {
        let mut registry = EvaluatorRegistry::new();
        registry.register("coherence.v1", Box::new(ConstEvaluator(80.0)));
        let kp = Ed25519KeyPair::generate().expect("keygen");
        let item = Item::new(b"hello");
        let j1 = judge("j1", &item, &EvalContext::default(), &[coherence_dim()], &registry, &kp, 5).expect("judge");
        let j2 = judge("j1", &item, &EvalContext::default(), &[coherence_dim()], &registry, &kp, 5).expect("judge");
        assert_eq!(j1.signing_preimage(), j2.signing_preimage());
    }
}
