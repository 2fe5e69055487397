//!
//! Forward pass of the stay-aware Viterbi algorithm
//!
//! ```text
//! V[s][0] = P[s][0]
//!
//! V[d][t] = P[d][t] * max_{s} V[s][t-1] w(s -> d)     (d: k-mer)
//! V[s][t] = P[0][t] *         V[s][t-1] w(s -> stay)  (s: k-mer that stayed)
//! ```
//!
//! where `w` is the weight of the transition type. A stay does not have
//! its own row. It is written into the row of the k-mer that stayed, and
//! a step/skip into the same k-mer overrides it only if strictly more
//! probable.
//!
use super::error::DecodeError;
use super::params::{DecoderParams, StayFill, TransitionWeights};
use super::posterior::PosteriorMatrix;
use super::table::ViterbiTables;
use super::transition::{TransitionRule, TransitionType};
use crate::common::{StateCode, STAY};
use log::{debug, trace};

///
/// Fill the dp, backtrace and transition tables for the posteriors.
///
/// The number of k-mer states is `posteriors.n_states() - 1`, which should
/// be `4^k` for the k of `params` (checked).
///
pub fn run_viterbi<R>(
    posteriors: &PosteriorMatrix,
    rule: &R,
    params: &DecoderParams,
) -> Result<ViterbiTables, DecodeError>
where
    R: TransitionRule + ?Sized,
{
    params.validate()?;
    posteriors.check_k(params.k)?;

    let n_kmers = posteriors.n_states() - 1;
    let n_events = posteriors.n_events();
    let mut tables = ViterbiTables::new(n_kmers, n_events);

    // first event
    for s in 1..=n_kmers {
        tables.dp[[s - 1, 0]] = posteriors.get(s as StateCode, 0);
    }

    for t in 1..n_events {
        // stay marker first, then every k-mer
        for d in 0..=n_kmers as StateCode {
            if d == STAY && params.stay_fill == StayFill::EverySource {
                fill_every_stay(&mut tables, posteriors, rule, &params.weights, t);
                continue;
            }
            let (s, prob, ty) = match best_source(&tables, rule, &params.weights, d, t) {
                Some(best) => best,
                None => continue,
            };
            let value = prob * posteriors.get(d, t);
            if d == STAY {
                let row = s as usize - 1;
                tables.dp[[row, t]] = value;
                if value != 0.0 {
                    tables.backtrace[[row, t - 1]] = Some(s);
                    tables.transitions[[row, t - 1]] = Some(TransitionType::Stay);
                }
            } else {
                let row = d as usize - 1;
                if value > tables.dp[[row, t]] {
                    tables.set(row, t, value, s, ty);
                }
            }
        }
        trace!("t={} best_row={}", t, tables.argmax(t));

        if tables.dp.column(t).iter().any(|v| !v.is_finite()) {
            return Err(DecodeError::NumericOverflow { t });
        }
        if t % params.norm_interval == 0 {
            normalize(&mut tables, t)?;
        }
    }

    Ok(tables)
}

///
/// Best source k-mer into the destination `d` at event `t`.
///
/// Returns `(source, candidate probability, transition type)`.
/// Sources are scanned in ascending order and only a strictly greater
/// candidate replaces the current best, so the lowest source wins ties.
/// `None` if no source has a positive candidate.
///
fn best_source<R>(
    tables: &ViterbiTables,
    rule: &R,
    weights: &TransitionWeights,
    d: StateCode,
    t: usize,
) -> Option<(StateCode, f64, TransitionType)>
where
    R: TransitionRule + ?Sized,
{
    let mut best: Option<(StateCode, f64, TransitionType)> = None;
    let mut max_prob = 0.0;
    for s in 1..=tables.n_kmers() as StateCode {
        let ty = rule.classify(s, d);
        let w = weights.weight(ty);
        if w == 0.0 {
            continue;
        }
        let prob = tables.dp[[s as usize - 1, t - 1]] * w;
        if prob > max_prob {
            max_prob = prob;
            best = Some((s, prob, ty));
        }
    }
    best
}

///
/// Stay cells for every k-mer at event `t`:
/// `V[s][t] = V[s][t-1] * w(s -> stay) * P[0][t]`
///
fn fill_every_stay<R>(
    tables: &mut ViterbiTables,
    posteriors: &PosteriorMatrix,
    rule: &R,
    weights: &TransitionWeights,
    t: usize,
) where
    R: TransitionRule + ?Sized,
{
    let p_stay = posteriors.get(STAY, t);
    for s in 1..=tables.n_kmers() as StateCode {
        let w = weights.weight(rule.classify(s, STAY));
        if w == 0.0 {
            continue;
        }
        let row = s as usize - 1;
        let value = tables.dp[[row, t - 1]] * w * p_stay;
        tables.dp[[row, t]] = value;
        if value != 0.0 {
            tables.backtrace[[row, t - 1]] = Some(s);
            tables.transitions[[row, t - 1]] = Some(TransitionType::Stay);
        }
    }
}

///
/// Divide the column `t` by its sum.
///
fn normalize(tables: &mut ViterbiTables, t: usize) -> Result<(), DecodeError> {
    let total: f64 = tables.dp.column(t).sum();
    if total == 0.0 {
        return Err(DecodeError::NormalizationUnderflow { t });
    }
    debug!("normalize t={} total={}", t, total);
    tables.dp.column_mut(t).mapv_inplace(|v| v / total);
    Ok(())
}

//
// Tests
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kmer::encode;
    use crate::viterbi::transition::KmerTransitions;

    fn c(kmer: &str) -> StateCode {
        encode(kmer, kmer.len()).unwrap()
    }

    #[test]
    fn first_column_is_copied() {
        let mut p = PosteriorMatrix::zeros(1, 1);
        p.set(0, 0, 0.9);
        p.set(1, 0, 0.1);
        p.set(4, 0, 0.7);
        let rule = KmerTransitions::new(1).unwrap();
        let tables = run_viterbi(&p, &rule, &DecoderParams::with_k(1, 1)).unwrap();
        assert_eq!(tables.dp.column(0).to_vec(), vec![0.1, 0.0, 0.0, 0.7]);
    }

    #[test]
    fn stay_is_written_into_row_of_source() {
        // AA at t=0, stay at t=1
        let k = 2;
        let mut p = PosteriorMatrix::zeros(k, 2);
        p.set(c("AA"), 0, 0.9);
        p.set(STAY, 1, 0.9);
        let rule = KmerTransitions::new(k).unwrap();
        let tables = run_viterbi(&p, &rule, &DecoderParams::with_k(k, 100)).unwrap();
        let row = c("AA") as usize - 1;
        assert_abs_diff_eq!(tables.dp[[row, 1]], 0.9 * 0.01 * 0.9);
        assert_eq!(tables.backtrace[[row, 0]], Some(c("AA")));
        assert_eq!(tables.transitions[[row, 0]], Some(TransitionType::Stay));
        // nothing else is reachable
        let n_filled = tables.backtrace.iter().filter(|b| b.is_some()).count();
        assert_eq!(n_filled, 1);
    }

    #[test]
    fn step_overrides_stay_only_if_strictly_greater() {
        // k=1, every pair of 1-mers is a step.
        // A(1) at t=0, then stay and A compete for row of A at t=1.
        let k = 1;
        let rule = KmerTransitions::new(k).unwrap();
        let params = DecoderParams::new(k, 100, TransitionWeights::new(0.1, 0.0, 0.1));

        // equal: stay (written first) is kept
        let mut p = PosteriorMatrix::zeros(k, 2);
        p.set(1, 0, 1.0);
        p.set(STAY, 1, 0.5);
        p.set(1, 1, 0.5);
        let tables = run_viterbi(&p, &rule, &params).unwrap();
        assert_eq!(tables.transitions[[0, 0]], Some(TransitionType::Stay));
        assert_abs_diff_eq!(tables.dp[[0, 1]], 0.05);

        // strictly greater: step replaces stay
        p.set(1, 1, 0.6);
        let tables = run_viterbi(&p, &rule, &params).unwrap();
        assert_eq!(tables.transitions[[0, 0]], Some(TransitionType::Step));
        assert_eq!(tables.backtrace[[0, 0]], Some(1));
        assert_abs_diff_eq!(tables.dp[[0, 1]], 0.06);
    }

    #[test]
    fn tie_goes_to_lowest_source() {
        // C(2) and G(3) equally likely at t=0; both step into T(4).
        let k = 1;
        let rule = KmerTransitions::new(k).unwrap();
        let mut p = PosteriorMatrix::zeros(k, 2);
        p.set(2, 0, 0.5);
        p.set(3, 0, 0.5);
        p.set(4, 1, 1.0);
        let tables = run_viterbi(&p, &rule, &DecoderParams::with_k(k, 100)).unwrap();
        assert_eq!(tables.backtrace[[3, 0]], Some(2));
    }

    #[test]
    fn stay_fill_best_source_vs_every_source() {
        // two k-mers tie as best source into the stay marker
        let k = 1;
        let rule = KmerTransitions::new(k).unwrap();
        let mut p = PosteriorMatrix::zeros(k, 2);
        p.set(2, 0, 0.5);
        p.set(3, 0, 0.5);
        p.set(STAY, 1, 1.0);

        let best = DecoderParams::with_k(k, 100);
        let tables = run_viterbi(&p, &rule, &best).unwrap();
        assert_eq!(tables.backtrace[[1, 0]], Some(2));
        assert_eq!(tables.backtrace[[2, 0]], None);
        assert_eq!(tables.dp[[2, 1]], 0.0);

        let every = DecoderParams::with_k(k, 100).stay_fill(StayFill::EverySource);
        let tables = run_viterbi(&p, &rule, &every).unwrap();
        assert_eq!(tables.backtrace[[1, 0]], Some(2));
        assert_eq!(tables.backtrace[[2, 0]], Some(3));
        assert_abs_diff_eq!(tables.dp[[1, 1]], tables.dp[[2, 1]]);
    }

    #[test]
    fn normalized_columns_sum_to_one() {
        let k = 1;
        let rule = KmerTransitions::new(k).unwrap();
        let p = PosteriorMatrix::from_rows(vec![
            vec![0.1, 0.2, 0.3, 0.1, 0.2],
            vec![0.3, 0.2, 0.3, 0.1, 0.2],
            vec![0.1, 0.4, 0.2, 0.5, 0.1],
            vec![0.2, 0.2, 0.1, 0.1, 0.3],
            vec![0.4, 0.2, 0.4, 0.2, 0.2],
        ])
        .unwrap();
        let tables = run_viterbi(&p, &rule, &DecoderParams::with_k(k, 2)).unwrap();
        assert_abs_diff_eq!(tables.dp.column(2).sum(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(tables.dp.column(4).sum(), 1.0, epsilon = 1e-12);
        assert!(tables.dp.column(1).sum() < 1.0);
        assert!(tables.dp.iter().all(|v| v.is_finite() && *v >= 0.0));
    }

    #[test]
    fn zero_column_underflows_at_that_event() {
        let k = 2;
        let rule = KmerTransitions::new(k).unwrap();
        let mut p = PosteriorMatrix::zeros(k, 4);
        p.set(c("AC"), 0, 1.0);
        p.set(c("CG"), 1, 1.0);
        // column 2 has no mass at all
        p.set(c("GT"), 3, 1.0);
        let r = run_viterbi(&p, &rule, &DecoderParams::with_k(k, 1));
        assert!(matches!(r, Err(DecodeError::NormalizationUnderflow { t: 2 })));
    }

    #[test]
    fn overflowing_column_is_reported_at_that_event() {
        let k = 1;
        let rule = KmerTransitions::new(k).unwrap();
        let params = DecoderParams::new(k, 1, TransitionWeights::new(0.01, 0.0, 1e10));
        let mut p = PosteriorMatrix::zeros(k, 3);
        p.set(1, 0, 1e300);
        p.set(1, 1, 1e300);
        p.set(1, 2, 1.0);
        let r = run_viterbi(&p, &rule, &params);
        assert!(matches!(r, Err(DecodeError::NumericOverflow { t: 1 })));
    }

    #[test]
    fn matrix_without_events_is_rejected() {
        let k = 2;
        let rule = KmerTransitions::new(k).unwrap();
        let p = PosteriorMatrix::zeros(k, 0);
        let r = run_viterbi(&p, &rule, &DecoderParams::with_k(k, 1));
        assert!(matches!(r, Err(DecodeError::InvalidPosterior(_))));
    }
}
