//!
//! Stitch a k-mer path into a base sequence
//!
//! ```text
//! AAAAA -(step)-> AAAAG -(stay)-> AAAAG -(skip)-> AAGGC
//!
//! AAAAA
//!      G
//!       (nothing)
//!       GC
//! = AAAAAGGC
//! ```
//!
use super::transition::TransitionType;
use crate::common::{Sequence, StateCode, STAY};
use crate::kmer::codec::decode_bases;
use itertools::izip;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StitchError {
    #[error("path of length {n_path} does not align with {n_transitions} transitions")]
    LengthMismatch { n_path: usize, n_transitions: usize },
    #[error("forbidden transition at {index} in the path")]
    ForbiddenTransition { index: usize },
    #[error("stay marker at {index} in the path")]
    StayInPath { index: usize },
}

///
/// Reconstruct the base sequence from a k-mer path (with stay numbering)
/// and the transitions between consecutive k-mers.
///
/// The first k-mer gives the first k bases. Each step adds the last base of
/// the next k-mer, each skip adds its last two bases, and a stay adds nothing.
///
pub fn stitch_kmers(
    path: &[StateCode],
    transitions: &[TransitionType],
    k: usize,
) -> Result<Sequence, StitchError> {
    if path.is_empty() || transitions.len() + 1 != path.len() {
        return Err(StitchError::LengthMismatch {
            n_path: path.len(),
            n_transitions: transitions.len(),
        });
    }
    if let Some(index) = path.iter().position(|&code| code == STAY) {
        return Err(StitchError::StayInPath { index });
    }

    let n_bases = k + transitions.iter().map(|ty| ty.n_new_bases()).sum::<usize>();
    let mut seq: Sequence = Vec::with_capacity(n_bases);
    seq.extend(decode_bases(path[0] - 1, k));

    for (i, (&next, &ty)) in izip!(&path[1..], transitions).enumerate() {
        let next = next - 1;
        match ty {
            TransitionType::Step => seq.extend(decode_bases(next & 0b11, 1)),
            TransitionType::Skip => seq.extend(decode_bases(next & 0b1111, 2)),
            TransitionType::Stay => {}
            TransitionType::Forbidden => {
                return Err(StitchError::ForbiddenTransition { index: i });
            }
        }
    }
    debug_assert_eq!(seq.len(), n_bases);
    Ok(seq)
}
