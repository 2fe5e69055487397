//!
//! Error types of decoding
//!
use super::stitch::StitchError;
use thiserror::Error;

/// Errors that can occur while configuring or running a decode
///
/// None of them is retried internally. `NormalizationUnderflow` and
/// `UnreachableState` are fatal for the decode call they come from.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// k, norm_interval or a weight is out of range
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// posterior matrix has wrong shape or contains invalid values
    #[error("invalid posterior matrix: {0}")]
    InvalidPosterior(String),
    /// renormalized column summed to zero
    #[error("impossible transition in posteriors or underflow, around event {t}")]
    NormalizationUnderflow { t: usize },
    /// dp column became infinite or NaN
    #[error("dp value overflowed at event {t}")]
    NumericOverflow { t: usize },
    /// backtrace reached a cell that was never filled
    #[error("no valid predecessor in backtrace table at event {t}")]
    UnreachableState { t: usize },
    #[error("stitch error: {0}")]
    Stitch(#[from] StitchError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
