//! Top-level encodings used by scalar contract views.
//!
//! Unlike nested fields, a top-level value owns the whole buffer, so
//! integers drop their leading zeros and carry no length prefix.

use stacktoken_types::{Address, ADDRESS_LEN};

use crate::CodecError;

/// Minimal big-endian bytes; the empty buffer is zero.
pub fn decode_top_u64(bytes: &[u8]) -> Result<u64, CodecError> {
    if bytes.len() > 8 {
        return Err(CodecError::IntegerOverflow {
            len: bytes.len(),
            max: 8,
        });
    }
    Ok(bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
}

pub fn encode_top_u64(v: u64) -> Vec<u8> {
    let bytes = v.to_be_bytes();
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    bytes[first..].to_vec()
}

/// Empty (or a lone zero byte) is false, a single `0x01` is true.
pub fn decode_top_bool(bytes: &[u8]) -> Result<bool, CodecError> {
    match bytes {
        [] | [0] => Ok(false),
        [1] => Ok(true),
        [other] => Err(CodecError::InvalidBool(*other)),
        _ => Err(CodecError::IntegerOverflow {
            len: bytes.len(),
            max: 1,
        }),
    }
}

pub fn decode_top_address(bytes: &[u8]) -> Result<Address, CodecError> {
    let raw: [u8; ADDRESS_LEN] = bytes
        .try_into()
        .map_err(|_| CodecError::InvalidAddressLength(bytes.len()))?;
    Ok(Address::from_bytes(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_u64_strips_leading_zeros() {
        assert_eq!(encode_top_u64(0), Vec::<u8>::new());
        assert_eq!(encode_top_u64(5), vec![5]);
        assert_eq!(encode_top_u64(0x0102), vec![1, 2]);
        assert_eq!(decode_top_u64(&[]).unwrap(), 0);
        assert_eq!(decode_top_u64(&[1, 2]).unwrap(), 0x0102);
        assert_eq!(decode_top_u64(&u64::MAX.to_be_bytes()).unwrap(), u64::MAX);
    }

    #[test]
    fn top_u64_rejects_nine_bytes() {
        assert_eq!(
            decode_top_u64(&[1; 9]),
            Err(CodecError::IntegerOverflow { len: 9, max: 8 })
        );
    }

    #[test]
    fn top_bool() {
        assert!(!decode_top_bool(&[]).unwrap());
        assert!(!decode_top_bool(&[0]).unwrap());
        assert!(decode_top_bool(&[1]).unwrap());
        assert_eq!(decode_top_bool(&[2]), Err(CodecError::InvalidBool(2)));
        assert!(decode_top_bool(&[0, 1]).is_err());
    }

    #[test]
    fn top_address_length() {
        assert_eq!(decode_top_address(&[9u8; 32]).unwrap().as_bytes(), &[9u8; 32]);
        assert_eq!(
            decode_top_address(&[9u8; 33]),
            Err(CodecError::InvalidAddressLength(33))
        );
    }
}
