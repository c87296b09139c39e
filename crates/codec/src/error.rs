use thiserror::Error;

/// Reasons a single record (or scalar value) failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Fewer bytes remain than the field requires.
    #[error("unexpected end of input at offset {offset}: need {need} bytes, have {have}")]
    UnexpectedEof {
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("unsupported fixed integer width {0}")]
    UnsupportedWidth(usize),

    #[error("string field is not valid utf-8")]
    InvalidUtf8,

    #[error("invalid enum tag {tag:#04x} for {type_name}")]
    InvalidEnumTag { tag: u8, type_name: &'static str },

    /// Status ordinal outside the known table, under [`StatusPolicy::Reject`](crate::StatusPolicy::Reject).
    #[error("unknown question status ordinal {0}")]
    UnknownStatus(u8),

    #[error("invalid boolean byte {0:#04x}")]
    InvalidBool(u8),

    #[error("timestamp of {0} seconds overflows milliseconds")]
    TimestampOverflow(u64),

    #[error("integer of {len} bytes does not fit in {max} bytes")]
    IntegerOverflow { len: usize, max: usize },

    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("address must be 32 bytes, got {0}")]
    InvalidAddressLength(usize),

    #[error("length {0} does not fit in a u32 prefix")]
    LengthOverflow(usize),
}
