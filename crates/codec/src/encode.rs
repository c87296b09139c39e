use stacktoken_types::{Address, Amount, Answer, Question, TimestampMs};

use crate::CodecError;

fn write_u8(out: &mut Vec<u8>, v: u8) {
    out.push(v);
}

fn write_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn write_u64(out: &mut Vec<u8>, v: u64) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn write_address(out: &mut Vec<u8>, v: &Address) {
    out.extend_from_slice(v.as_bytes());
}

fn write_bytes(out: &mut Vec<u8>, b: &[u8]) -> Result<(), CodecError> {
    let len_u32: u32 = b
        .len()
        .try_into()
        .map_err(|_| CodecError::LengthOverflow(b.len()))?;
    write_u32(out, len_u32);
    out.extend_from_slice(b);
    Ok(())
}

fn write_big_uint(out: &mut Vec<u8>, v: &Amount) -> Result<(), CodecError> {
    write_bytes(out, &v.to_be_bytes())
}

fn write_timestamp(out: &mut Vec<u8>, v: TimestampMs) {
    write_u64(out, v.as_secs());
}

fn write_optional_u64(out: &mut Vec<u8>, v: Option<u64>) {
    match v {
        None => write_u8(out, 0),
        Some(v) => {
            write_u8(out, 1);
            write_u64(out, v);
        }
    }
}

/// Nested encoding of a Question, in contract field order.
///
/// Timestamps are written as whole seconds; sub-second precision is dropped.
pub fn encode_question(q: &Question) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    write_u64(&mut out, q.question_id);
    write_address(&mut out, &q.creator);
    write_bytes(&mut out, q.title.as_bytes())?;
    write_bytes(&mut out, q.description.as_bytes())?;
    write_timestamp(&mut out, q.deadline);
    write_big_uint(&mut out, &q.locked_amount)?;
    write_timestamp(&mut out, q.created_at);
    write_u8(&mut out, q.status.ordinal());
    write_optional_u64(&mut out, q.approved_answer_id);
    Ok(out)
}

/// Nested encoding of an Answer, in contract field order.
pub fn encode_answer(a: &Answer) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    write_u64(&mut out, a.answer_id);
    write_u64(&mut out, a.question_id);
    write_address(&mut out, &a.creator);
    write_bytes(&mut out, a.title.as_bytes())?;
    write_bytes(&mut out, a.description.as_bytes())?;
    write_timestamp(&mut out, a.created_at);
    write_u32(&mut out, a.votes);
    write_u8(&mut out, u8::from(a.approved));
    Ok(out)
}
