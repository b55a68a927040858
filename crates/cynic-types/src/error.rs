// Path: crates/cynic-types/src/error.rs
//! Core error types for the CYNIC protocol.
//!
//! Every component-local error implements [`ErrorCode`] to give it a stable,
//! machine-readable string, and maps onto one variant of [`CynicError`] for
//! cross-crate propagation. No error crosses a network boundary as a stack
//! trace — peers only ever see a [`FailureRecord`].

use thiserror::Error;

/// Assigns a stable, machine-readable string code to an error variant.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors from signature, hash, or Merkle-proof mismatches. Severity: high.
/// Policy: reject the offending object, penalize its source.
#[derive(Debug, Error)]
pub enum IntegrityError {
    /// An Ed25519 signature failed to verify.
    #[error("signature verification failed")]
    InvalidSignature,
    /// A computed hash did not match the claimed/stored value.
    #[error("hash mismatch: expected {expected}, got {got}")]
    HashMismatch {
        /// Hex-encoded expected hash.
        expected: String,
        /// Hex-encoded computed hash.
        got: String,
    },
    /// A Merkle inclusion proof failed to verify against its claimed root.
    #[error("merkle proof did not verify against the claimed root")]
    InvalidMerkleProof,
    /// A cryptographic key was malformed.
    #[error("malformed key: {0}")]
    MalformedKey(String),
}

impl ErrorCode for IntegrityError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidSignature => "INTEGRITY_INVALID_SIGNATURE",
            Self::HashMismatch { .. } => "INTEGRITY_HASH_MISMATCH",
            Self::InvalidMerkleProof => "INTEGRITY_INVALID_MERKLE_PROOF",
            Self::MalformedKey(_) => "INTEGRITY_MALFORMED_KEY",
        }
    }
}

/// Errors from protocol-level violations: wrong slot, missing parent,
/// cardinality exceeded. Severity: medium. Policy: reject; request parents
/// if recoverable.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A block's slot was not the expected successor of its operator's head.
    #[error("unexpected slot: expected {expected}, got {got}")]
    UnexpectedSlot {
        /// The expected slot number.
        expected: u64,
        /// The slot number actually observed.
        got: u64,
    },
    /// A block's `prev_hash` did not match the operator's known head, and no
    /// ancestor was locally available to resolve it.
    #[error("missing parent block {0}")]
    MissingParent(String),
    /// A cardinality limit (judgments per block, knowledge updates per
    /// block, …) was exceeded.
    #[error("cardinality exceeded: {what} has {got}, limit is {limit}")]
    CardinalityExceeded {
        /// Name of the bounded collection.
        what: &'static str,
        /// The limit that was exceeded.
        limit: usize,
        /// The observed size.
        got: usize,
    },
    /// A duplicate block was submitted for a slot that already has one.
    #[error("duplicate block at slot {0}")]
    DuplicateSlot(u64),
    /// A judgment's confidence envelope invariant (`confidence ≤ φ⁻¹`,
    /// `doubt ≥ φ⁻²`) did not hold.
    #[error("judgment {judgment_id} violates the confidence envelope")]
    ConfidenceEnvelopeViolated {
        /// Id of the offending judgment.
        judgment_id: String,
    },
}

impl ErrorCode for ProtocolError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnexpectedSlot { .. } => "PROTOCOL_UNEXPECTED_SLOT",
            Self::MissingParent(_) => "PROTOCOL_MISSING_PARENT",
            Self::CardinalityExceeded { .. } => "PROTOCOL_CARDINALITY_EXCEEDED",
            Self::DuplicateSlot(_) => "PROTOCOL_DUPLICATE_SLOT",
            Self::ConfidenceEnvelopeViolated { .. } => "PROTOCOL_CONFIDENCE_ENVELOPE_VIOLATED",
        }
    }
}

/// Errors from resource exhaustion: queue overflow, disk full. Severity:
/// medium. Policy: shed low-priority work, alert.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// A bounded channel or queue was full and the message was a low-priority
    /// class that gets rejected rather than waited on.
    #[error("queue '{queue}' overflowed at capacity {capacity}")]
    QueueOverflow {
        /// Name of the bounded queue.
        queue: &'static str,
        /// The queue's configured capacity.
        capacity: usize,
    },
    /// The persistent storage backend reported it is out of space.
    #[error("storage exhausted: {0}")]
    StorageExhausted(String),
}

impl ErrorCode for ResourceError {
    fn code(&self) -> &'static str {
        match self {
            Self::QueueOverflow { .. } => "RESOURCE_QUEUE_OVERFLOW",
            Self::StorageExhausted(_) => "RESOURCE_STORAGE_EXHAUSTED",
        }
    }
}

/// Errors from consensus-level faults: equivocation, lockout violation.
/// Severity: high. Policy: zero the offender's epoch weight.
#[derive(Debug, Error)]
pub enum ConsensusFaultError {
    /// A voter signed two conflicting votes in the same epoch.
    #[error("equivocation detected for voter {voter}")]
    Equivocation {
        /// Hex-encoded public key of the offending voter.
        voter: String,
    },
    /// A vote was cast that violates an active exponential lockout.
    #[error("lockout violated: voter {voter} is locked until slot {locked_until}")]
    LockoutViolated {
        /// Hex-encoded public key of the offending voter.
        voter: String,
        /// The slot at which the lockout expires.
        locked_until: u64,
    },
    /// A hard-consensus proposal failed to reach quorum.
    #[error("quorum not met: {got} of required {required} distinct voters")]
    QuorumNotMet {
        /// Distinct voters observed.
        got: usize,
        /// Distinct voters required.
        required: usize,
    },
}

impl ErrorCode for ConsensusFaultError {
    fn code(&self) -> &'static str {
        match self {
            Self::Equivocation { .. } => "CONSENSUS_EQUIVOCATION",
            Self::LockoutViolated { .. } => "CONSENSUS_LOCKOUT_VIOLATED",
            Self::QuorumNotMet { .. } => "CONSENSUS_QUORUM_NOT_MET",
        }
    }
}

/// Transient, retriable errors: network timeout, peer unavailable.
/// Severity: low. Policy: retry with jittered backoff, multipliers
/// `φ, φ², φ³, …`.
#[derive(Debug, Error)]
pub enum TransientError {
    /// A network call exceeded its deadline and was cancelled.
    #[error("deadline exceeded after {0}ms")]
    DeadlineExceeded(u64),
    /// The targeted peer was unreachable.
    #[error("peer unavailable: {0}")]
    PeerUnavailable(String),
}

impl ErrorCode for TransientError {
    fn code(&self) -> &'static str {
        match self {
            Self::DeadlineExceeded(_) => "TRANSIENT_DEADLINE_EXCEEDED",
            Self::PeerUnavailable(_) => "TRANSIENT_PEER_UNAVAILABLE",
        }
    }
}

/// Configuration errors: bad constants, unreadable keys. Severity: fatal at
/// startup.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A constant or ratio failed validation at startup.
    #[error("invalid constant: {0}")]
    InvalidConstant(String),
    /// A key file could not be read or parsed.
    #[error("unreadable key material: {0}")]
    UnreadableKey(String),
}

impl ErrorCode for ConfigurationError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidConstant(_) => "CONFIGURATION_INVALID_CONSTANT",
            Self::UnreadableKey(_) => "CONFIGURATION_UNREADABLE_KEY",
        }
    }
}

/// Per-dimension evaluator errors. Severity: low per-dimension (the
/// judgment carries `partial = true`); high if a META dimension fails (the
/// judgment is rejected).
#[derive(Debug, Error)]
pub enum DimensionError {
    /// A non-META dimension's evaluator returned an error; the dimension is
    /// omitted and the judgment is marked partial.
    #[error("dimension '{0}' evaluation failed: {1}")]
    EvaluatorFailed(String, String),
    /// A META dimension's evaluator returned an error; the judgment fails.
    #[error("meta dimension '{0}' evaluation failed: {1}")]
    MetaEvaluationFailed(String, String),
    /// No dimensions were installed, or the total weight was zero.
    #[error("no dimensions produced a score")]
    NoDimensions,
}

impl ErrorCode for DimensionError {
    fn code(&self) -> &'static str {
        match self {
            Self::EvaluatorFailed(..) => "DIMENSION_EVALUATOR_FAILED",
            Self::MetaEvaluationFailed(..) => "DIMENSION_META_EVALUATION_FAILED",
            Self::NoDimensions => "DIMENSION_NO_DIMENSIONS",
        }
    }
}

/// The unified error type for cross-crate propagation. Each variant wraps one
/// taxonomy class.
#[derive(Debug, Error)]
pub enum CynicError {
    /// See [`IntegrityError`].
    #[error(transparent)]
    Integrity(#[from] IntegrityError),
    /// See [`ProtocolError`].
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    /// See [`ResourceError`].
    #[error(transparent)]
    Resource(#[from] ResourceError),
    /// See [`ConsensusFaultError`].
    #[error(transparent)]
    ConsensusFault(#[from] ConsensusFaultError),
    /// See [`TransientError`].
    #[error(transparent)]
    Transient(#[from] TransientError),
    /// See [`ConfigurationError`].
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// See [`DimensionError`].
    #[error(transparent)]
    Dimension(#[from] DimensionError),
}

impl ErrorCode for CynicError {
    fn code(&self) -> &'static str {
        match self {
            Self::Integrity(e) => e.code(),
            Self::Protocol(e) => e.code(),
            Self::Resource(e) => e.code(),
            Self::ConsensusFault(e) => e.code(),
            Self::Transient(e) => e.code(),
            Self::Configuration(e) => e.code(),
            Self::Dimension(e) => e.code(),
        }
    }
}

impl CynicError {
    /// Whether a client should retry the operation that produced this error.
    /// Only `Transient` errors are retriable; everything else requires
    /// operator or governance intervention.
    #[must_use]
    pub fn retriable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// The structured result external callers receive for a failed call: never a
/// stack trace, always a stable code plus a correlation id for
/// cross-referencing logs.
#[derive(Debug, Clone)]
pub struct FailureRecord {
    /// The stable error code, e.g. `"INTEGRITY_INVALID_SIGNATURE"`.
    pub kind: &'static str,
    /// A human-readable explanation, safe to display to an operator.
    pub reason: String,
    /// Whether the caller should retry.
    pub retriable: bool,
    /// An opaque id correlating this failure with structured logs.
    pub correlation_id: String,
}

impl FailureRecord {
    /// Builds a [`FailureRecord`] from a [`CynicError`] and a correlation id.
    #[must_use]
    pub fn from_error(err: &CynicError, correlation_id: impl Into<String>) -> Self {
        Self {
            kind: err.code(),
            reason: err.to_string(),
            retriable: err.retriable(),
            correlation_id: correlation_id.into(),
        }
    }
}
