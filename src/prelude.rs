//!
//! globally-available parts
//!
pub use crate::common::{Sequence, StateCode, STAY};
pub use crate::viterbi::{
    decode, DecodeError, DecodeResult, DecoderParams, PosteriorMatrix, TransitionType,
    TransitionWeights,
};
