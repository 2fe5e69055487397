//!
//! Transition classification between two states
//!
//! ```text
//! Step:  ACGTA -> CGTAC   (window slides by one base)
//! Skip:  ACGTA -> GTACC   (window slides by two bases)
//! Stay:  ACGTA -> stay
//! ```
//!
use super::error::DecodeError;
use super::params::check_k_range;
use crate::common::{StateCode, STAY};
use serde::{Deserialize, Serialize};

///
/// Kind of transition between two consecutive states
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionType {
    Forbidden,
    Stay,
    Skip,
    Step,
}

impl TransitionType {
    /// Number of bases this transition appends to the decoded sequence
    pub fn n_new_bases(self) -> usize {
        match self {
            TransitionType::Step => 1,
            TransitionType::Skip => 2,
            TransitionType::Stay | TransitionType::Forbidden => 0,
        }
    }
}

impl std::fmt::Display for TransitionType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            TransitionType::Forbidden => "forbidden",
            TransitionType::Stay => "stay",
            TransitionType::Skip => "skip",
            TransitionType::Step => "step",
        };
        write!(f, "{}", s)
    }
}

/// `2^b - 1`
#[inline]
fn mask(bits: usize) -> StateCode {
    (1 << bits) - 1
}

///
/// Classify the transition `prev -> next` of k-mer state codes
/// (with stay numbering).
///
/// Nothing originates from the stay marker, and every k-mer may move
/// into it. Between two k-mers, Step has priority over Skip because for
/// small k some pairs match both bit patterns.
///
/// `k` should be in `1..=MAX_K`; `KmerTransitions::new` checks it.
///
pub fn classify(prev: StateCode, next: StateCode, k: usize) -> TransitionType {
    if prev == STAY {
        return TransitionType::Forbidden;
    }
    if next == STAY {
        return TransitionType::Stay;
    }
    let p = prev - 1;
    let n = next - 1;
    if (p & mask(2 * k - 2)) == (n >> 2) {
        TransitionType::Step
    } else if k >= 2 && (p & mask(2 * k - 4)) == (n >> 4) {
        TransitionType::Skip
    } else {
        TransitionType::Forbidden
    }
}

///
/// Rule that decides the transition type between two states.
///
/// The decoder scans every (source, destination) pair through this rule,
/// so a rule must be a pure function of its arguments.
///
pub trait TransitionRule {
    fn classify(&self, prev: StateCode, next: StateCode) -> TransitionType;
}

///
/// Default rule: k-mer overlap classification of `classify`
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KmerTransitions {
    k: usize,
}

impl KmerTransitions {
    /// Fails with `InvalidConfig` unless `k` is in `1..=MAX_K`
    pub fn new(k: usize) -> Result<Self, DecodeError> {
        check_k_range(k)?;
        Ok(KmerTransitions { k })
    }
    pub fn k(&self) -> usize {
        self.k
    }
}

impl TransitionRule for KmerTransitions {
    fn classify(&self, prev: StateCode, next: StateCode) -> TransitionType {
        classify(prev, next, self.k)
    }
}

/// Any `Fn(prev, next) -> TransitionType` closure is a rule
impl<F> TransitionRule for F
where
    F: Fn(StateCode, StateCode) -> TransitionType,
{
    fn classify(&self, prev: StateCode, next: StateCode) -> TransitionType {
        self(prev, next)
    }
}

//
// Tests
//
