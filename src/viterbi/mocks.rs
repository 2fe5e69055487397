//!
//! Synthetic reads for testing
//!
//! A base sequence is walked with random steps, skips and stays, and each
//! event gets probability 1 on exactly one state (a k-mer or the stay marker).
//!
use super::posterior::PosteriorMatrix;
use super::transition::{classify, TransitionType};
use crate::common::{Sequence, StateCode, STAY};
use crate::kmer::codec::encode;
use crate::random_seq;
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;

///
/// Posteriors with the true path that generated them
///
#[derive(Debug, Clone)]
pub struct MockRead {
    pub posteriors: PosteriorMatrix,
    /// labels of each event, stay marker included
    pub labels: Vec<StateCode>,
    /// k-mer path, a k-mer that stayed repeated
    pub path: Vec<StateCode>,
    pub transitions: Vec<TransitionType>,
    pub sequence: Sequence,
}

///
/// One-hot posteriors: `P[labels[t]][t] = 1` and 0 elsewhere.
///
pub fn one_hot_posteriors(k: usize, labels: &[StateCode]) -> PosteriorMatrix {
    let mut p = PosteriorMatrix::zeros(k, labels.len());
    for (t, &label) in labels.iter().enumerate() {
        p.set(label, t, 1.0);
    }
    p
}

fn code_at(seq: &[u8], pos: usize, k: usize) -> StateCode {
    let kmer = std::str::from_utf8(&seq[pos..pos + k]).unwrap();
    encode(kmer, k).unwrap()
}

///
/// Walk `seq` (ACGT only, length >= k) from the first k-mer to the last one.
///
/// Before each move a stay is inserted with probability `p_stay`. A move is
/// a skip with probability `p_skip` when the two k-mers are classified as a
/// skip, otherwise a step.
///
pub fn mock_read_from_seq(seq: &[u8], k: usize, p_stay: f64, p_skip: f64, seed: u64) -> MockRead {
    assert!(seq.len() >= k);
    assert!((0.0..1.0).contains(&p_stay));
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    let mut pos = 0;
    let mut current = code_at(seq, 0, k);
    let mut labels = vec![current];
    let mut path = vec![current];
    let mut transitions = Vec::new();

    while pos + k < seq.len() {
        if rng.gen_bool(p_stay) {
            labels.push(STAY);
            path.push(current);
            transitions.push(TransitionType::Stay);
            continue;
        }
        let skipped = if pos + k + 1 < seq.len() && rng.gen_bool(p_skip) {
            let next = code_at(seq, pos + 2, k);
            if classify(current, next, k) == TransitionType::Skip {
                Some(next)
            } else {
                None
            }
        } else {
            None
        };
        let (next, ty) = match skipped {
            Some(next) => {
                pos += 2;
                (next, TransitionType::Skip)
            }
            None => {
                pos += 1;
                (code_at(seq, pos, k), TransitionType::Step)
            }
        };
        labels.push(next);
        path.push(next);
        transitions.push(ty);
        current = next;
    }

    MockRead {
        posteriors: one_hot_posteriors(k, &labels),
        labels,
        path,
        transitions,
        sequence: seq.to_vec(),
    }
}

///
/// Random sequence of `length` bases walked by `mock_read_from_seq`
///
pub fn mock_random_read(length: usize, k: usize, p_stay: f64, p_skip: f64, seed: u64) -> MockRead {
    let seq = random_seq::generate(length, seed);
    mock_read_from_seq(&seq, k, p_stay, p_skip, seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viterbi::stitch::stitch_kmers;

    #[test]
    fn mock_read_is_consistent() {
        let r = mock_random_read(40, 3, 0.2, 0.3, 7);
        assert_eq!(r.labels.len(), r.posteriors.n_events());
        assert_eq!(r.path.len(), r.labels.len());
        assert_eq!(r.transitions.len(), r.path.len() - 1);
        assert_eq!(r.posteriors.as_array().sum(), r.labels.len() as f64);
        // each recorded move agrees with the classifier
        for (i, &ty) in r.transitions.iter().enumerate() {
            match ty {
                TransitionType::Stay => assert_eq!(r.path[i], r.path[i + 1]),
                _ => assert_eq!(classify(r.path[i], r.path[i + 1], 3), ty),
            }
        }
        let seq = stitch_kmers(&r.path, &r.transitions, 3).unwrap();
        assert_eq!(seq, r.sequence);
    }

    #[test]
    fn mock_read_without_stays_and_skips() {
        let r = mock_read_from_seq(b"AAAAAGGCAC", 5, 0.0, 0.0, 0);
        // AAAAA AAAAG AAAGG AAGGC AGGCA GGCAC
        assert_eq!(r.path, vec![1, 3, 11, 42, 165, 658]);
        assert!(r.transitions.iter().all(|&ty| ty == TransitionType::Step));
    }
}
