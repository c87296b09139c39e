use serde::{Serialize, Serializer};
use stacktoken_codec::{decode_base64, CodecError, Decoder, Record};
use tracing::{debug, warn};

/// First 8 bytes of blake3 over the rejected input, hex encoded.
pub fn fingerprint(bytes: &[u8]) -> String {
    let hash = blake3::hash(bytes);
    let mut s = String::with_capacity(16);
    for b in &hash.as_bytes()[..8] {
        s.push_str(&format!("{:02x}", b));
    }
    s
}

fn display<S: Serializer>(e: &CodecError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(e)
}

/// One record of a batch that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFailure {
    /// Position in the input batch.
    pub index: usize,
    #[serde(serialize_with = "display")]
    pub error: CodecError,
    pub fingerprint: String,
}

/// Decoded records in input order, plus the records that were dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutcome<T> {
    pub records: Vec<T>,
    pub failed: Vec<RecordFailure>,
}

impl<T> BatchOutcome<T> {
    fn with_capacity(n: usize) -> Self {
        Self {
            records: Vec::with_capacity(n),
            failed: Vec::new(),
        }
    }

    pub fn failed_indices(&self) -> Vec<usize> {
        self.failed.iter().map(|f| f.index).collect()
    }

    /// True if no record was dropped.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of input buffers, decoded or not.
    pub fn total(&self) -> usize {
        self.records.len() + self.failed.len()
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }
}

fn collect<T: Record>(
    results: impl ExactSizeIterator<Item = Result<T, (CodecError, String)>>,
) -> BatchOutcome<T> {
    let mut outcome = BatchOutcome::with_capacity(results.len());
    for (index, res) in results.enumerate() {
        match res {
            Ok(record) => outcome.records.push(record),
            Err((error, fingerprint)) => {
                warn!(
                    kind = T::KIND,
                    index,
                    %fingerprint,
                    %error,
                    "dropping malformed record"
                );
                outcome.failed.push(RecordFailure {
                    index,
                    error,
                    fingerprint,
                });
            }
        }
    }
    debug!(
        kind = T::KIND,
        decoded = outcome.records.len(),
        dropped = outcome.failed.len(),
        "decoded batch"
    );
    outcome
}

/// Decode every buffer independently; a bad buffer never aborts the batch.
pub fn decode_batch<T, B>(decoder: &Decoder, buffers: &[B]) -> BatchOutcome<T>
where
    T: Record,
    B: AsRef<[u8]>,
{
    collect(buffers.iter().map(|buf| {
        let bytes = buf.as_ref();
        decoder
            .decode::<T>(bytes)
            .map_err(|e| (e, fingerprint(bytes)))
    }))
}

/// Like [`decode_batch`], for base64 `returnData` items. Invalid base64 is
/// reported as a failure of that item only.
pub fn decode_batch_base64<T, S>(decoder: &Decoder, items: &[S]) -> BatchOutcome<T>
where
    T: Record,
    S: AsRef<str>,
{
    collect(items.iter().map(|item| {
        let text = item.as_ref();
        match decode_base64(text) {
            Ok(bytes) => decoder
                .decode::<T>(&bytes)
                .map_err(|e| (e, fingerprint(&bytes))),
            Err(e) => Err((e, fingerprint(text.as_bytes()))),
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use stacktoken_codec::{encode_base64, encode_question, StatusPolicy};
    use stacktoken_types::{Address, Amount, Answer, Question, QuestionStatus, TimestampMs};

    fn question(id: u64) -> Question {
        Question {
            question_id: id,
            creator: Address::from_bytes([id as u8; 32]),
            title: format!("question {id}"),
            description: "details".into(),
            deadline: TimestampMs::from_millis(1_700_000_000_000),
            locked_amount: Amount::from(id * 1_000),
            created_at: TimestampMs::from_millis(1_600_000_000_000),
            status: QuestionStatus::Created,
            approved_answer_id: None,
        }
    }

    #[test]
    fn truncated_middle_record_is_isolated() {
        let first = encode_question(&question(1)).unwrap();
        let mut second = encode_question(&question(2)).unwrap();
        second.truncate(30);
        let third = encode_question(&question(3)).unwrap();

        let outcome: BatchOutcome<Question> =
            decode_batch(&Decoder::default(), &[first, second, third]);

        let ids: Vec<u64> = outcome.records.iter().map(|q| q.question_id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(outcome.failed_indices(), vec![1]);
        assert!(matches!(
            outcome.failed[0].error,
            CodecError::UnexpectedEof { .. }
        ));
        assert_eq!(outcome.failed[0].fingerprint.len(), 16);
        assert_eq!(outcome.total(), 3);
        assert!(!outcome.is_complete());
    }

    #[test]
    fn base64_batch_isolates_bad_text_and_unknown_status() {
        let good = encode_base64(&encode_question(&question(5)).unwrap());
        let mut odd = question(6);
        odd.status = QuestionStatus::Unknown(99);
        let odd = encode_base64(&encode_question(&odd).unwrap());
        let items = vec![good, "@@@".to_string(), odd];

        let flagged: BatchOutcome<Question> = decode_batch_base64(&Decoder::default(), &items);
        assert_eq!(flagged.records.len(), 2);
        assert_eq!(flagged.records[1].status, QuestionStatus::Unknown(99));
        assert_eq!(flagged.failed_indices(), vec![1]);
        assert!(matches!(
            flagged.failed[0].error,
            CodecError::InvalidBase64(_)
        ));

        let strict = Decoder::with_status_policy(StatusPolicy::Reject);
        let rejected: BatchOutcome<Question> = decode_batch_base64(&strict, &items);
        assert_eq!(rejected.records.len(), 1);
        assert_eq!(rejected.failed_indices(), vec![1, 2]);
        assert_eq!(rejected.failed[1].error, CodecError::UnknownStatus(99));
    }

    #[test]
    fn empty_batch() {
        let outcome: BatchOutcome<Answer> = decode_batch::<Answer, Vec<u8>>(&Decoder::default(), &[]);
        assert!(outcome.records.is_empty());
        assert!(outcome.is_complete());
    }

    #[test]
    fn fingerprint_is_stable() {
        assert_eq!(fingerprint(b"abc"), fingerprint(b"abc"));
        assert_ne!(fingerprint(b"abc"), fingerprint(b"abd"));
    }

    #[test]
    fn failure_serializes_error_text() {
        let failure = RecordFailure {
            index: 4,
            error: CodecError::InvalidBool(7),
            fingerprint: fingerprint(b"x"),
        };
        let v = serde_json::to_value(&failure).unwrap();
        assert_eq!(v["index"], 4);
        assert_eq!(v["error"], "invalid boolean byte 0x07");
    }
}
