//! Binary codec for the question/answer contract's query results.
//!
//! Records use the contract's nested encoding: big-endian fixed-width
//! integers, `u32` length prefixes for byte strings and big integers, a
//! one-byte discriminant for enums and options.

mod cursor;
mod encode;
mod error;
mod record;
pub mod top;

use base64::{engine::general_purpose::STANDARD, Engine};

pub use cursor::Cursor;
pub use encode::{encode_answer, encode_question};
pub use error::CodecError;
pub use record::{decode_answer, decode_question, DecodeOptions, Decoder, Record, StatusPolicy};

/// Decode one base64 `returnData` item (standard alphabet, padded).
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, CodecError> {
    Ok(STANDARD.decode(encoded)?)
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
