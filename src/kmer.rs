//!
//! k-mer representations
//!
//! * `codec`: integer code <-> base string, with and without the stay marker
//!
pub mod codec;

pub use codec::{decode, decode_nostay, encode, encode_nostay, CodecError};
