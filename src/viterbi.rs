//!
//! Stay-aware Viterbi decoding of k-mer posteriors
//!
//! # Overview of calculation
//!
//! P[s][t] : posterior of state s at event t (s=0 is stay, s=1..=4^k are k-mers)
//!
//! Forward (`forward`)
//! V[r][t]
//!  = max prob of a path that is in k-mer `r+1` at event t
//!    (stays folded into the k-mer that stayed)
//!  renormalized at every `norm_interval` events
//!
//! Backtrace (`backtrace`)
//!  path[n-1] = argmax_r V[r][n-1]
//!  path[t-1] = B[path[t]][t-1]
//!
//! Stitch (`stitch`)
//!  first k-mer + last base of each step + last two bases of each skip
//!
pub mod backtrace;
pub mod decoder;
pub mod error;
pub mod forward;
pub mod mocks;
pub mod params;
pub mod posterior;
pub mod stitch;
pub mod table;
pub mod transition;

pub use backtrace::{determine_path, ViterbiPath};
pub use decoder::{decode, decode_many, decode_with_rule, viterbi_path, DecodeResult};
pub use error::DecodeError;
pub use forward::run_viterbi;
pub use params::{DecoderParams, StayFill, TransitionWeights};
pub use posterior::PosteriorMatrix;
pub use stitch::{stitch_kmers, StitchError};
pub use table::ViterbiTables;
pub use transition::{classify, KmerTransitions, TransitionRule, TransitionType};
