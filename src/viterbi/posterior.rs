//!
//! PosteriorMatrix: per-event emission likelihoods of every state
//!
//! ```text
//!            event 0   event 1   ...
//! stay    [  P[0][0]   P[0][1]   ... ]
//! k-mer 1 [  P[1][0]   P[1][1]   ... ]
//! ...
//! k-mer 4^k
//! ```
//!
use super::error::DecodeError;
use crate::common::{n_states, StateCode};
use ndarray::{Array2, ArrayView1};
use std::path::Path;

///
/// `states x events` matrix of non-negative finite likelihoods.
///
/// Values need not be normalized per column. Products of likelihoods and
/// weights over `norm_interval` events must stay within `f64`, otherwise
/// decoding fails with `NumericOverflow`.
///
#[derive(Debug, Clone, PartialEq)]
pub struct PosteriorMatrix(Array2<f64>);

impl PosteriorMatrix {
    ///
    /// Wrap an array after checking it is non-empty and every entry
    /// is a non-negative finite number.
    ///
    pub fn new(array: Array2<f64>) -> Result<PosteriorMatrix, DecodeError> {
        let (n_states, n_events) = array.dim();
        if n_states == 0 || n_events == 0 {
            return Err(DecodeError::InvalidPosterior(format!(
                "empty matrix of shape {}x{}",
                n_states, n_events
            )));
        }
        if let Some(((s, t), v)) = array
            .indexed_iter()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(DecodeError::InvalidPosterior(format!(
                "P[{}][{}]={} is not a non-negative finite value",
                s, t, v
            )));
        }
        Ok(PosteriorMatrix(array))
    }
    ///
    /// Construct from rows, `rows[state][event]`
    ///
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<PosteriorMatrix, DecodeError> {
        let n_states = rows.len();
        let n_events = rows.first().map_or(0, |row| row.len());
        if let Some(s) = rows.iter().position(|row| row.len() != n_events) {
            return Err(DecodeError::InvalidPosterior(format!(
                "row {} has {} events but row 0 has {}",
                s,
                rows[s].len(),
                n_events
            )));
        }
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let array = Array2::from_shape_vec((n_states, n_events), flat)
            .map_err(|e| DecodeError::InvalidPosterior(e.to_string()))?;
        PosteriorMatrix::new(array)
    }
    ///
    /// All-zero matrix for k-mers of size k, to be filled by `set`.
    ///
    pub fn zeros(k: usize, n_events: usize) -> PosteriorMatrix {
        PosteriorMatrix(Array2::zeros((n_states(k), n_events)))
    }
    ///
    /// Load from JSON file containing an array of rows
    ///
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<PosteriorMatrix, DecodeError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let rows: Vec<Vec<f64>> = serde_json::from_reader(reader)?;
        PosteriorMatrix::from_rows(rows)
    }
    /// Number of rows (stay row included)
    pub fn n_states(&self) -> usize {
        self.0.nrows()
    }
    /// Number of events (columns)
    pub fn n_events(&self) -> usize {
        self.0.ncols()
    }
    /// `P[state][event]`
    #[inline]
    pub fn get(&self, state: StateCode, event: usize) -> f64 {
        self.0[[state as usize, event]]
    }
    ///
    /// Overwrite `P[state][event]`.
    ///
    /// Panics on negative or non-finite values.
    ///
    pub fn set(&mut self, state: StateCode, event: usize, value: f64) {
        assert!(value.is_finite() && value >= 0.0);
        self.0[[state as usize, event]] = value;
    }
    /// Likelihoods of all states at the event
    pub fn column(&self, event: usize) -> ArrayView1<'_, f64> {
        self.0.column(event)
    }
    /// Underlying array
    pub fn as_array(&self) -> &Array2<f64> {
        &self.0
    }
    ///
    /// Check that the matrix has `4^k + 1` rows and at least one event.
    ///
    pub fn check_k(&self, k: usize) -> Result<(), DecodeError> {
        if self.n_events() == 0 {
            return Err(DecodeError::InvalidPosterior(
                "matrix has no events".to_string(),
            ));
        }
        if self.n_states() != n_states(k) {
            return Err(DecodeError::InvalidPosterior(format!(
                "{} rows but k={} needs 4^k+1={} rows",
                self.n_states(),
                k,
                n_states(k)
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posterior_from_rows() {
        let p = PosteriorMatrix::from_rows(vec![
            vec![0.0, 0.5, 0.0],
            vec![0.3, 0.2, 0.3],
            vec![0.1, 0.4, 0.2],
            vec![0.2, 0.2, 0.1],
            vec![0.4, 0.2, 0.4],
        ])
        .unwrap();
        assert_eq!(p.n_states(), 5);
        assert_eq!(p.n_events(), 3);
        assert_eq!(p.get(2, 1), 0.4);
        assert_eq!(p.column(0).to_vec(), vec![0.0, 0.3, 0.1, 0.2, 0.4]);
        assert!(p.check_k(1).is_ok());
        assert!(matches!(p.check_k(2), Err(DecodeError::InvalidPosterior(_))));
    }

    #[test]
    fn posterior_rejects_invalid() {
        let ragged = PosteriorMatrix::from_rows(vec![vec![0.1, 0.2], vec![0.1]]);
        assert!(matches!(ragged, Err(DecodeError::InvalidPosterior(_))));
        let empty = PosteriorMatrix::from_rows(vec![vec![], vec![]]);
        assert!(matches!(empty, Err(DecodeError::InvalidPosterior(_))));
        let negative = PosteriorMatrix::from_rows(vec![vec![0.1, -0.2]]);
        assert!(matches!(negative, Err(DecodeError::InvalidPosterior(_))));
        let nan = PosteriorMatrix::from_rows(vec![vec![f64::NAN]]);
        assert!(matches!(nan, Err(DecodeError::InvalidPosterior(_))));
    }

    #[test]
    fn posterior_zeros_and_set() {
        let mut p = PosteriorMatrix::zeros(2, 4);
        assert_eq!(p.n_states(), 17);
        assert_eq!(p.n_events(), 4);
        p.set(3, 2, 1.0);
        assert_eq!(p.get(3, 2), 1.0);
        assert_eq!(p.as_array().sum(), 1.0);
    }

    #[test]
    fn posterior_without_events_fails_check() {
        let p = PosteriorMatrix::zeros(2, 0);
        assert_eq!(p.n_events(), 0);
        assert!(matches!(p.check_k(2), Err(DecodeError::InvalidPosterior(_))));
    }
}
