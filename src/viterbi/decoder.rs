//!
//! Decoder: posteriors -> tables -> path -> sequence
//!
use super::backtrace::{determine_path, ViterbiPath};
use super::error::DecodeError;
use super::forward::run_viterbi;
use super::params::DecoderParams;
use super::posterior::PosteriorMatrix;
use super::stitch::stitch_kmers;
use super::transition::{KmerTransitions, TransitionRule, TransitionType};
use crate::common::{sequence_to_string, StateCode};
use crate::kmer;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

///
/// Result of decoding one read
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeResult {
    /// most likely k-mer states, one per event
    pub path: Vec<StateCode>,
    /// transitions between consecutive states of `path`
    pub transitions: Vec<TransitionType>,
    /// stitched base sequence
    pub sequence: String,
}

impl DecodeResult {
    /// k-mer strings of the path
    pub fn kmers(&self, k: usize) -> Vec<String> {
        self.path.iter().map(|&code| kmer::decode(code, k)).collect()
    }
    /// number of (step, skip, stay) transitions
    pub fn transition_counts(&self) -> (usize, usize, usize) {
        self.transitions
            .iter()
            .fold((0, 0, 0), |(step, skip, stay), ty| match ty {
                TransitionType::Step => (step + 1, skip, stay),
                TransitionType::Skip => (step, skip + 1, stay),
                TransitionType::Stay => (step, skip, stay + 1),
                TransitionType::Forbidden => (step, skip, stay),
            })
    }
}

///
/// Run the Viterbi tables and the backtrace, without stitching.
///
pub fn viterbi_path<R>(
    posteriors: &PosteriorMatrix,
    rule: &R,
    params: &DecoderParams,
) -> Result<ViterbiPath, DecodeError>
where
    R: TransitionRule + ?Sized,
{
    let tables = run_viterbi(posteriors, rule, params)?;
    determine_path(&tables)
}

///
/// Decode with a custom transition rule.
///
pub fn decode_with_rule<R>(
    posteriors: &PosteriorMatrix,
    rule: &R,
    params: &DecoderParams,
) -> Result<DecodeResult, DecodeError>
where
    R: TransitionRule + ?Sized,
{
    let ViterbiPath { path, transitions } = viterbi_path(posteriors, rule, params)?;
    let seq = stitch_kmers(&path, &transitions, params.k)?;
    let sequence = sequence_to_string(&seq).to_string();
    debug!(
        "decoded {} events into {} bases",
        posteriors.n_events(),
        sequence.len()
    );
    Ok(DecodeResult {
        path,
        transitions,
        sequence,
    })
}

///
/// Decode the most likely base sequence of the posteriors
/// using the k-mer overlap transitions of `params.k`.
///
pub fn decode(
    posteriors: &PosteriorMatrix,
    params: &DecoderParams,
) -> Result<DecodeResult, DecodeError> {
    decode_with_rule(posteriors, &KmerTransitions::new(params.k)?, params)
}

///
/// Decode independent reads in parallel.
///
/// Results are in the same order as `reads`. A failed read does not
/// stop the others.
///
pub fn decode_many(
    reads: &[PosteriorMatrix],
    params: &DecoderParams,
) -> Vec<Result<DecodeResult, DecodeError>> {
    info!("decoding {} reads", reads.len());
    reads
        .par_iter()
        .map(|posteriors| decode(posteriors, params))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::STAY;
    use crate::viterbi::params::StayFill;

    ///
    /// 2-mer example with stays:
    /// AA at t=0, then stays, and a weak AC at the end
    ///
    fn stay_example() -> PosteriorMatrix {
        let mut p = PosteriorMatrix::zeros(2, 4);
        p.set(1, 0, 0.9);
        p.set(STAY, 1, 0.9);
        p.set(1, 1, 0.05);
        p.set(2, 1, 0.05);
        p.set(2, 3, 0.1);
        p.set(STAY, 2, 0.9);
        p.set(STAY, 3, 0.9);
        p.set(5, 2, 0.1);
        p
    }

    #[test]
    fn decode_stay_example() {
        let p = stay_example();
        for &fill in [StayFill::BestSource, StayFill::EverySource].iter() {
            let params = DecoderParams::with_k(2, 1).stay_fill(fill);
            let r = decode(&p, &params).unwrap();
            assert_eq!(r.kmers(2), vec!["AA", "AA", "AA", "AC"]);
            assert_eq!(
                r.transitions,
                vec![TransitionType::Stay, TransitionType::Stay, TransitionType::Step]
            );
            assert_eq!(r.sequence, "AAC");
            assert_eq!(r.transition_counts(), (1, 0, 2));
        }
    }

    #[test]
    fn decode_rejects_wrong_k() {
        let p = stay_example();
        let r = decode(&p, &DecoderParams::with_k(3, 1));
        assert!(matches!(r, Err(DecodeError::InvalidPosterior(_))));
        let r = decode(&p, &DecoderParams::with_k(2, 0));
        assert!(matches!(r, Err(DecodeError::InvalidConfig(_))));
    }

    #[test]
    fn decode_result_json() {
        let p = stay_example();
        let r = decode(&p, &DecoderParams::with_k(2, 1)).unwrap();
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"sequence\":\"AAC\""));
        let r2: DecodeResult = serde_json::from_str(&json).unwrap();
        assert_eq!(r, r2);
    }
}
