use std::fmt;
use std::str::FromStr;

use stacktoken_types::{Answer, Question, QuestionStatus};

use crate::{decode_base64, encode_answer, encode_question, CodecError, Cursor};

/// What to do with a status ordinal outside `Created..=Expired`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Keep the record and surface the raw ordinal as `QuestionStatus::Unknown`.
    #[default]
    Flag,
    /// Fail the record with `CodecError::UnknownStatus`.
    Reject,
}

impl FromStr for StatusPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flag" => Ok(StatusPolicy::Flag),
            "reject" => Ok(StatusPolicy::Reject),
            other => Err(format!("unknown status policy {other:?} (expected flag|reject)")),
        }
    }
}

impl fmt::Display for StatusPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusPolicy::Flag => f.write_str("flag"),
            StatusPolicy::Reject => f.write_str("reject"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    pub status_policy: StatusPolicy,
}

/// A contract struct with a fixed nested layout.
pub trait Record: Sized {
    /// Name used in logs and reports.
    const KIND: &'static str;

    /// Smallest possible encoding: empty strings and amounts, absent options.
    const MIN_SIZE: usize;

    fn decode(cursor: &mut Cursor<'_>, options: &DecodeOptions) -> Result<Self, CodecError>;

    fn encode(&self) -> Result<Vec<u8>, CodecError>;
}

fn read_status(
    cursor: &mut Cursor<'_>,
    policy: StatusPolicy,
) -> Result<QuestionStatus, CodecError> {
    match cursor.read_enum_byte(&QuestionStatus::KNOWN, "QuestionStatus") {
        Ok(status) => Ok(status),
        Err(CodecError::InvalidEnumTag { tag, .. }) => match policy {
            StatusPolicy::Flag => Ok(QuestionStatus::Unknown(tag)),
            StatusPolicy::Reject => Err(CodecError::UnknownStatus(tag)),
        },
        Err(e) => Err(e),
    }
}

/// Read one Question. Field order is fixed by the contract ABI; bytes after
/// the last field are left in the cursor.
pub fn decode_question(
    cursor: &mut Cursor<'_>,
    options: &DecodeOptions,
) -> Result<Question, CodecError> {
    let question_id = cursor.read_u64()?;
    let creator = cursor.read_address()?;
    let title = cursor.read_utf8_string()?;
    let description = cursor.read_utf8_string()?;
    let deadline = cursor.read_timestamp_ms()?;
    let locked_amount = cursor.read_big_uint()?;
    let created_at = cursor.read_timestamp_ms()?;
    let status = read_status(cursor, options.status_policy)?;
    let approved_answer_id = cursor.read_optional_u64()?;

    Ok(Question {
        question_id,
        creator,
        title,
        description,
        deadline,
        locked_amount,
        created_at,
        status,
        approved_answer_id,
    })
}

/// Read one Answer. Trailing bytes are left in the cursor.
pub fn decode_answer(cursor: &mut Cursor<'_>) -> Result<Answer, CodecError> {
    let answer_id = cursor.read_u64()?;
    let question_id = cursor.read_u64()?;
    let creator = cursor.read_address()?;
    let title = cursor.read_utf8_string()?;
    let description = cursor.read_utf8_string()?;
    let created_at = cursor.read_timestamp_ms()?;
    let votes = cursor.read_u32()?;
    let approved = cursor.read_bool()?;

    Ok(Answer {
        answer_id,
        question_id,
        creator,
        title,
        description,
        created_at,
        votes,
        approved,
    })
}

impl Record for Question {
    const KIND: &'static str = "question";
    // id + creator + title + description + deadline + amount + created_at + status + option flag
    const MIN_SIZE: usize = 8 + 32 + 4 + 4 + 8 + 4 + 8 + 1 + 1;

    fn decode(cursor: &mut Cursor<'_>, options: &DecodeOptions) -> Result<Self, CodecError> {
        decode_question(cursor, options)
    }

    fn encode(&self) -> Result<Vec<u8>, CodecError> {
        encode_question(self)
    }
}

impl Record for Answer {
    const KIND: &'static str = "answer";
    // answer_id + question_id + creator + title + description + created_at + votes + approved
    const MIN_SIZE: usize = 8 + 8 + 32 + 4 + 4 + 8 + 4 + 1;

    fn decode(cursor: &mut Cursor<'_>, _options: &DecodeOptions) -> Result<Self, CodecError> {
        decode_answer(cursor)
    }

    fn encode(&self) -> Result<Vec<u8>, CodecError> {
        encode_answer(self)
    }
}

/// Stateless record decoder. Cheap to copy into every task that needs one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn with_status_policy(status_policy: StatusPolicy) -> Self {
        Self::new(DecodeOptions { status_policy })
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode one record from raw bytes.
    pub fn decode<T: Record>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        if bytes.len() < T::MIN_SIZE {
            return Err(CodecError::UnexpectedEof {
                offset: 0,
                need: T::MIN_SIZE,
                have: bytes.len(),
            });
        }
        let mut cursor = Cursor::new(bytes);
        T::decode(&mut cursor, &self.options)
    }

    /// Decode one record from a base64 query-response item.
    pub fn decode_base64<T: Record>(&self, encoded: &str) -> Result<T, CodecError> {
        let bytes = decode_base64(encoded)?;
        self.decode(&bytes)
    }
}
