pub mod common;
pub mod kmer;
pub mod prelude;
pub mod random_seq;
pub mod utils;
pub mod viterbi;

#[macro_use]
extern crate approx;
