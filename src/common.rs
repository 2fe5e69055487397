//!
//! Common type definitions shared by the codec and the decoder
//!

/// Integer code of a decoder state.
///
/// `0` is the stay marker and `v + 1` is the k-mer whose 2-bit packed
/// value is `v`.
pub type StateCode = u32;

/// Stay marker in the "with stay" numbering
pub const STAY: StateCode = 0;

/// Type of DNA sequence
pub type Sequence = Vec<u8>;

/// Convert Sequence(Vec<u8>) into &str
/// useful in displaying
pub fn sequence_to_string(seq: &Sequence) -> &str {
    std::str::from_utf8(seq).unwrap_or("<non-utf8>")
}

///
/// Array of valid DNA bases, in the order of their 2-bit codes
///
pub const VALID_BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];

///
/// Largest k supported by the 32-bit state code.
///
/// `4^15 + 1` still fits in `u32`, and the classifier masks need `2k` bits.
///
pub const MAX_K: usize = 15;

///
/// Number of k-mers `4^k` (states other than the stay marker)
///
pub fn n_kmers(k: usize) -> usize {
    1 << (2 * k)
}

///
/// Number of rows of a posterior matrix `4^k + 1` (k-mers plus the stay row)
///
pub fn n_states(k: usize) -> usize {
    n_kmers(k) + 1
}
