//!
//! Table definitions
//!
//! ## ViterbiTables
//!
//! For k-mer row `r` (state code `r + 1`) and event `t`
//!
//! * `dp[r, t]`: (renormalized) best path probability ending in state `r + 1` at `t`
//! * `backtrace[r, t - 1]`: previous state on that best path
//! * `transitions[r, t - 1]`: the transition used to reach `r + 1` at `t`
//!
//! The stay marker has no row. A stay at `t` is stored in the row of the
//! k-mer that stayed.
//!
use super::transition::TransitionType;
use crate::common::StateCode;
use ndarray::Array2;

#[derive(Debug, Clone)]
pub struct ViterbiTables {
    /// `n_kmers x n_events`
    pub dp: Array2<f64>,
    /// `n_kmers x (n_events - 1)`, `None` if never reached
    pub backtrace: Array2<Option<StateCode>>,
    /// `n_kmers x (n_events - 1)`, `None` if never reached
    pub transitions: Array2<Option<TransitionType>>,
}

impl ViterbiTables {
    /// zero/empty tables
    pub fn new(n_kmers: usize, n_events: usize) -> Self {
        let n_steps = n_events.saturating_sub(1);
        ViterbiTables {
            dp: Array2::zeros((n_kmers, n_events)),
            backtrace: Array2::from_elem((n_kmers, n_steps), None),
            transitions: Array2::from_elem((n_kmers, n_steps), None),
        }
    }
    pub fn n_kmers(&self) -> usize {
        self.dp.nrows()
    }
    pub fn n_events(&self) -> usize {
        self.dp.ncols()
    }
    ///
    /// Record that k-mer row `row` at event `t` (>= 1) is reached from `prev` by `ty`
    /// with the probability `value`.
    ///
    #[inline]
    pub fn set(&mut self, row: usize, t: usize, value: f64, prev: StateCode, ty: TransitionType) {
        self.dp[[row, t]] = value;
        self.backtrace[[row, t - 1]] = Some(prev);
        self.transitions[[row, t - 1]] = Some(ty);
    }
    ///
    /// Row of the maximum dp value at event `t`. The first one on ties.
    ///
    pub fn argmax(&self, t: usize) -> usize {
        let mut best = 0;
        for (row, &value) in self.dp.column(t).iter().enumerate() {
            if value > self.dp[[best, t]] {
                best = row;
            }
        }
        best
    }
}
