//!
//! Backtrace of the Viterbi tables into the most likely k-mer path
//!
use super::error::DecodeError;
use super::table::ViterbiTables;
use super::transition::TransitionType;
use crate::common::StateCode;

///
/// Most likely path of k-mer states and the transitions between them.
///
/// `transitions[i]` is the transition from `path[i]` to `path[i + 1]`.
/// Stays never appear in `path`: a k-mer that stayed is repeated.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViterbiPath {
    pub path: Vec<StateCode>,
    pub transitions: Vec<TransitionType>,
}

impl ViterbiPath {
    pub fn len(&self) -> usize {
        self.path.len()
    }
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

///
/// Backtrack from the most likely k-mer at the last event.
///
/// Ties of the last column are broken by the lowest k-mer.
/// Fails with `UnreachableState` at the event whose backtrace cell is empty.
///
pub fn determine_path(tables: &ViterbiTables) -> Result<ViterbiPath, DecodeError> {
    let n_events = tables.n_events();
    if n_events == 0 {
        return Err(DecodeError::InvalidPosterior(
            "tables have no events".to_string(),
        ));
    }
    let last = tables.argmax(n_events - 1);

    let mut path: Vec<StateCode> = Vec::with_capacity(n_events);
    let mut transitions: Vec<TransitionType> = Vec::with_capacity(n_events - 1);
    path.push(last as StateCode + 1);

    // walk backwards, then reverse
    let mut row = last;
    for t in (1..n_events).rev() {
        let prev = tables.backtrace[[row, t - 1]].ok_or(DecodeError::UnreachableState { t })?;
        let ty = tables.transitions[[row, t - 1]].ok_or(DecodeError::UnreachableState { t })?;
        path.push(prev);
        transitions.push(ty);
        row = prev as usize - 1;
    }
    path.reverse();
    transitions.reverse();

    debug_assert_eq!(path.len(), n_events);
    debug_assert_eq!(transitions.len(), n_events - 1);
    Ok(ViterbiPath { path, transitions })
}
