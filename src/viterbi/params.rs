//!
//! DecoderParams: k, renormalization interval and transition weights
//!
use super::error::DecodeError;
use super::transition::TransitionType;
use crate::common::MAX_K;
use serde::{Deserialize, Serialize};
use std::path::Path;

///
/// Relative (not normalized) weight of each transition type.
///
/// `Forbidden` is always weighted 0 and is not configurable.
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionWeights {
    pub stay: f64,
    pub skip: f64,
    pub step: f64,
}

impl TransitionWeights {
    pub fn new(stay: f64, skip: f64, step: f64) -> Self {
        TransitionWeights { stay, skip, step }
    }
    /// weight of the transition type
    #[inline]
    pub fn weight(&self, ty: TransitionType) -> f64 {
        match ty {
            TransitionType::Forbidden => 0.0,
            TransitionType::Stay => self.stay,
            TransitionType::Skip => self.skip,
            TransitionType::Step => self.step,
        }
    }
}

impl Default for TransitionWeights {
    fn default() -> Self {
        TransitionWeights {
            stay: 0.01,
            skip: 0.01,
            step: 0.1,
        }
    }
}

///
/// `k` fits into the 2-bit packed state code
///
pub fn check_k_range(k: usize) -> Result<(), DecodeError> {
    if k < 1 || k > MAX_K {
        return Err(DecodeError::InvalidConfig(format!(
            "k={} is not in 1..={}",
            k, MAX_K
        )));
    }
    Ok(())
}

///
/// How the stay marker fills the DP table in each column.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StayFill {
    /// Only the best source k-mer into the stay marker gets a stay cell.
    /// Ties go to the lowest source.
    BestSource,
    /// Every source k-mer gets its own stay cell.
    EverySource,
}

impl Default for StayFill {
    fn default() -> Self {
        StayFill::BestSource
    }
}

///
/// Parameters of a decode call
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecoderParams {
    /// k of k-mer
    pub k: usize,
    ///
    /// DP columns at positive multiples of this interval are renormalized
    pub norm_interval: usize,
    #[serde(default)]
    pub weights: TransitionWeights,
    #[serde(default)]
    pub stay_fill: StayFill,
}

impl DecoderParams {
    pub fn new(k: usize, norm_interval: usize, weights: TransitionWeights) -> DecoderParams {
        DecoderParams {
            k,
            norm_interval,
            weights,
            stay_fill: StayFill::default(),
        }
    }
    /// Default weights with the given k and renormalization interval
    pub fn with_k(k: usize, norm_interval: usize) -> DecoderParams {
        DecoderParams::new(k, norm_interval, TransitionWeights::default())
    }
    /// 5-mer decoding, renormalized every 4 events
    pub fn default() -> DecoderParams {
        DecoderParams::with_k(5, 4)
    }
    ///
    /// Configuration that never uses stays (stay weight is 0), so the
    /// stay row of the posteriors is ignored.
    ///
    pub fn without_stays(k: usize, norm_interval: usize) -> DecoderParams {
        let weights = TransitionWeights {
            stay: 0.0,
            ..TransitionWeights::default()
        };
        DecoderParams::new(k, norm_interval, weights)
    }
    /// Replace the stay fill policy
    pub fn stay_fill(mut self, stay_fill: StayFill) -> DecoderParams {
        self.stay_fill = stay_fill;
        self
    }
    ///
    /// Check the ranges of k, norm_interval and weights.
    ///
    pub fn validate(&self) -> Result<(), DecodeError> {
        check_k_range(self.k)?;
        if self.norm_interval < 1 {
            return Err(DecodeError::InvalidConfig(
                "norm_interval should be >= 1".to_string(),
            ));
        }
        let w = &self.weights;
        for (name, value) in [("stay", w.stay), ("skip", w.skip), ("step", w.step)].iter() {
            if !value.is_finite() || *value < 0.0 {
                return Err(DecodeError::InvalidConfig(format!(
                    "weight of {} should be a non-negative finite number, but {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
    ///
    /// Load the params from JSON file
    ///
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<DecoderParams, DecodeError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let params: DecoderParams = serde_json::from_reader(reader)?;
        Ok(params)
    }
}

impl std::fmt::Display for DecoderParams {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "k: {}", self.k)?;
        writeln!(f, "norm_interval: {}", self.norm_interval)?;
        writeln!(f, "w_stay: {}", self.weights.stay)?;
        writeln!(f, "w_skip: {}", self.weights.skip)?;
        writeln!(f, "w_step: {}", self.weights.step)?;
        write!(f, "stay_fill: {:?}", self.stay_fill)
    }
}
