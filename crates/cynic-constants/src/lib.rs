// Path: crates/cynic-constants/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]

//! # CYNIC Ratio Kernel
//!
//! Exposes the single source of truth for φ and its derived constants, the
//! Fibonacci table, and the timing base that every other component scales
//! its thresholds and durations from. Nothing outside this crate should
//! compute a φ-power or Fibonacci number independently.

use once_cell::sync::OnceCell;
use thiserror::Error;

/// The golden ratio, φ = (1 + √5) / 2.
pub const PHI: f64 = 1.618_033_988_749_895;
/// φ⁻¹ ≈ 0.618033988749895.
pub const PHI_INV: f64 = 1.0 / PHI;
/// φ⁻² ≈ 0.381966011250105.
pub const PHI_INV_2: f64 = PHI_INV * PHI_INV;
/// φ⁻³ ≈ 0.236067977499790.
pub const PHI_INV_3: f64 = PHI_INV_2 * PHI_INV;
/// φ² ≈ 2.618033988749895.
pub const PHI_SQ: f64 = PHI * PHI;

/// Number of entries in the memoized Fibonacci table, `F(0)..=F(16)`.
pub const FIBONACCI_TABLE_LEN: usize = 17;

/// The Fibonacci sequence, `F(0)=0, F(1)=1, …, F(16)=987`.
pub const FIBONACCI: [u64; FIBONACCI_TABLE_LEN] = {
    let mut table = [0u64; FIBONACCI_TABLE_LEN];
    table[1] = 1;
    let mut i = 2;
    while i < FIBONACCI_TABLE_LEN {
        table[i] = table[i - 1] + table[i - 2];
        i += 1;
    }
    table
};

/// Returns `F(n)` for `n` within the memoized table range.
///
/// # Panics
/// Panics if `n >= FIBONACCI_TABLE_LEN`; all call sites in this workspace use
/// constant, in-range indices (the largest named Fibonacci number used by the
/// protocol is `F(11) = 89`).
#[must_use]
pub fn fib(n: usize) -> u64 {
    FIBONACCI[n]
}

/// Errors raised while establishing the process-wide ratio kernel.
#[derive(Debug, Error)]
pub enum ConstantsError {
    /// The ratio kernel was already initialized with a different timing base;
    /// constants are immutable after init and this is a fatal startup error.
    #[error("ratio kernel already initialized with timing_base_ms={existing}, cannot reinitialize with {attempted}")]
    AlreadyInitialized {
        /// The timing base the kernel was first initialized with.
        existing: u64,
        /// The timing base a later call attempted to use.
        attempted: u64,
    },
    /// A non-positive timing base was supplied.
    #[error("timing base must be a positive number of milliseconds, got {0}")]
    InvalidTimingBase(u64),
}

/// The durations derived from a timing base, in integer milliseconds,
/// rounded to the nearest millisecond. Ratios between these fields never
/// change; only the base multiplier does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratios {
    /// The configured timing base, in milliseconds.
    pub timing_base_ms: u64,
    /// `base · φ⁻³`.
    pub tick_ms: u64,
    /// `base · φ⁻²`.
    pub micro_ms: u64,
    /// `base · φ⁻¹`.
    pub slot_ms: u64,
    /// `base`.
    pub block_ms: u64,
    /// `base · φ`.
    pub epoch_ms: u64,
    /// `base · φ²`.
    pub cycle_ms: u64,
}

/// Default timing base in milliseconds, giving a slot duration of roughly 61.8ms.
pub const DEFAULT_TIMING_BASE_MS: u64 = 100;

impl Ratios {
    fn from_base(timing_base_ms: u64) -> Result<Self, ConstantsError> {
        if timing_base_ms == 0 {
            return Err(ConstantsError::InvalidTimingBase(timing_base_ms));
        }
        let base = timing_base_ms as f64;
        Ok(Self {
            timing_base_ms,
            tick_ms: (base * PHI_INV_3).round() as u64,
            micro_ms: (base * PHI_INV_2).round() as u64,
            slot_ms: (base * PHI_INV).round() as u64,
            block_ms: timing_base_ms,
            epoch_ms: (base * PHI).round() as u64,
            cycle_ms: (base * PHI_SQ).round() as u64,
        })
    }
}

static RATIOS: OnceCell<Ratios> = OnceCell::new();

/// Initializes the process-wide ratio kernel with the given timing base.
///
/// Must be called at most once per process (with a consistent value if
/// called more than once, e.g. from test harnesses); subsequent calls with a
/// different base are a fatal `ConstantsError::AlreadyInitialized`.
pub fn init(timing_base_ms: u64) -> Result<Ratios, ConstantsError> {
    let ratios = Ratios::from_base(timing_base_ms)?;
    match RATIOS.get() {
        Some(existing) if *existing == ratios => Ok(*existing),
        Some(existing) => Err(ConstantsError::AlreadyInitialized {
            existing: existing.timing_base_ms,
            attempted: timing_base_ms,
        }),
        None => {
            // OnceCell::set only fails on a racing concurrent initializer;
            // in that case the winner's value is authoritative.
            let _ = RATIOS.set(ratios);
            Ok(*RATIOS.get().unwrap_or(&ratios))
        }
    }
}

/// Returns the process-wide ratios, initializing them with the default
/// timing base if no prior call to [`init`] has happened yet.
#[must_use]
pub fn ratios() -> Ratios {
    match RATIOS.get() {
        Some(r) => *r,
        None => init(DEFAULT_TIMING_BASE_MS).unwrap_or(Ratios {
            timing_base_ms: DEFAULT_TIMING_BASE_MS,
            tick_ms: 24,
            micro_ms: 38,
            slot_ms: 62,
            block_ms: 100,
            epoch_ms: 162,
            cycle_ms: 262,
        }),
    }
}

/// The confidence ceiling, `φ⁻¹`, never to be exceeded.
pub const CONFIDENCE_CEILING: f64 = PHI_INV;
/// The doubt floor, `φ⁻²`, never to be undercut.
pub const DOUBT_FLOOR: f64 = PHI_INV_2;
/// The hard-consensus agreement threshold, `φ⁻¹`.
pub const CONSENSUS_THRESHOLD: f64 = PHI_INV;
/// The pattern-emergence cosine-similarity threshold, `φ⁻¹`.
pub const PATTERN_SIMILARITY_THRESHOLD: f64 = PHI_INV;
/// The pattern-strength archival floor, `φ⁻³`, over a full epoch.
pub const PATTERN_STRENGTH_FLOOR: f64 = PHI_INV_3;
/// Minimum distinct-operator sources for a pattern to be confirmed.
pub const MIN_PATTERN_SOURCES: usize = 3;
/// Maximum judgments per sealed block, `F(11)`.
pub const MAX_JUDGMENTS_PER_BLOCK: usize = 89;
/// Maximum knowledge updates per sealed block, `F(9)`.
pub const MAX_KNOWLEDGE_UPDATES_PER_BLOCK: usize = 34;
/// Gossip fanout per round, `F(7)`.
pub const GOSSIP_FANOUT: usize = 13;
/// Consensus finality confirmation depth, `F(7)`.
pub const FINALITY_CONFIRMATION_DEPTH: u64 = 13;
/// Minimum distinct voting operators for quorum, `F(5)`.
pub const CONSENSUS_QUORUM: usize = 5;
/// Default bounded inter-component channel capacity, `F(10)`.
pub const CHANNEL_CAPACITY: usize = 55;
