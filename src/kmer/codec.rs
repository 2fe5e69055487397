//!
//! k-mer codec
//!
//! A k-mer `s = s[0] s[1] ... s[k-1]` is packed two bits per base
//!
//! ```text
//! value = s[0]*(4^(k-1)) + s[1]*(4^(k-2)) + ... + s[k-1]*(4^0)
//! ```
//!
//! with `A=0, C=1, G=2, T=3`.
//!
//! * "no stay" numbering: the code is `value` itself, in `[0, 4^k)`.
//! * "with stay" numbering: the code is `value + 1`, and `0` is the stay marker.
//!
use crate::common::{n_kmers, Sequence, StateCode, STAY, VALID_BASES};
use thiserror::Error;

/// String representation of the stay marker
pub const STAY_STR: &str = "stay";

/// Failures of encoding a base string into a code
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("k-mer `{kmer}` has length {len} but k={k}")]
    LengthMismatch { kmer: String, len: usize, k: usize },
    #[error("informal base `{base}` in k-mer `{kmer}`")]
    InvalidBase { kmer: String, base: char },
}

fn encode_base(base: u8) -> Option<StateCode> {
    match base {
        b'A' | b'a' => Some(0),
        b'C' | b'c' => Some(1),
        b'G' | b'g' => Some(2),
        b'T' | b't' => Some(3),
        _ => None,
    }
}

fn decode_base(code: StateCode) -> u8 {
    VALID_BASES[(code & 0b11) as usize]
}

///
/// Unpack `k` bases from the low `2k` bits of `value`, first base
/// taken from the most significant pair.
///
pub fn decode_bases(value: StateCode, k: usize) -> Sequence {
    (0..k)
        .map(|i| decode_base(value >> (2 * i)))
        .rev()
        .collect()
}

///
/// Decode a dense (no stay) k-mer value in `[0, 4^k)` into its bases
///
pub fn decode_nostay(value: StateCode, k: usize) -> String {
    debug_assert!((value as usize) < n_kmers(k));
    decode_bases(value, k).into_iter().map(|b| b as char).collect()
}

///
/// Encode `k` bases into the dense (no stay) value in `[0, 4^k)`
///
pub fn encode_nostay(kmer: &str, k: usize) -> Result<StateCode, CodecError> {
    if kmer.len() != k {
        return Err(CodecError::LengthMismatch {
            kmer: kmer.to_string(),
            len: kmer.len(),
            k,
        });
    }
    kmer.bytes().try_fold(0, |acc, base| match encode_base(base) {
        Some(code) => Ok((acc << 2) | code),
        None => Err(CodecError::InvalidBase {
            kmer: kmer.to_string(),
            base: base as char,
        }),
    })
}

///
/// Decode a state code of the "with stay" numbering.
///
/// `0` is `"stay"`, otherwise `code - 1` is decoded as a k-mer.
///
pub fn decode(code: StateCode, k: usize) -> String {
    if code == STAY {
        STAY_STR.to_string()
    } else {
        decode_nostay(code - 1, k)
    }
}

///
/// Encode into a state code of the "with stay" numbering.
///
/// `"stay"` is `0`, otherwise the k-mer value plus one.
///
pub fn encode(kmer: &str, k: usize) -> Result<StateCode, CodecError> {
    if kmer == STAY_STR {
        Ok(STAY)
    } else {
        encode_nostay(kmer, k).map(|value| value + 1)
    }
}

//
// Tests
//
