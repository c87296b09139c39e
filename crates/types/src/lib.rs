use std::fmt;
use std::str::FromStr;

use bech32::{Bech32, Hrp};
use num_bigint::BigUint;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Raw length of an on-chain account or contract address.
pub const ADDRESS_LEN: usize = 32;

/// Human-readable prefix of bech32 addresses on the target chain.
pub const ADDRESS_HRP: &str = "erd";

/// Implied decimal places of the native token's smallest unit.
pub const TOKEN_DECIMALS: u32 = 18;

pub type QuestionId = u64;
pub type AnswerId = u64;

#[derive(Debug, Error)]
pub enum AddressError {
    #[error("invalid bech32 address: {0}")]
    Bech32(#[from] bech32::DecodeError),
    #[error("unexpected address prefix {found:?}, expected \"erd\"")]
    WrongPrefix { found: String },
    #[error("address must be 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// A 32-byte public address.
///
/// Renders as checksummed bech32 text (`erd1…`) through `Display` and serde.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub const ZERO: Self = Self([0u8; ADDRESS_LEN]);

    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    pub fn to_bech32(&self) -> String {
        self.to_string()
    }

    /// Parse `erd1…` text back into raw bytes.
    pub fn from_bech32(s: &str) -> Result<Self, AddressError> {
        let (hrp, data) = bech32::decode(s)?;
        if hrp != Hrp::parse_unchecked(ADDRESS_HRP) {
            return Err(AddressError::WrongPrefix {
                found: hrp.to_string(),
            });
        }
        let bytes: [u8; ADDRESS_LEN] = data
            .as_slice()
            .try_into()
            .map_err(|_| AddressError::InvalidLength(data.len()))?;
        Ok(Self(bytes))
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bech32(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        bech32::encode_to_fmt::<Bech32, _>(f, Hrp::parse_unchecked(ADDRESS_HRP), &self.0)
            .map_err(|_| fmt::Error)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A token amount in the smallest on-chain unit, without precision limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigUint);

impl Amount {
    pub fn zero() -> Self {
        Self(BigUint::default())
    }

    /// Interpret `bytes` as a big-endian unsigned integer. Empty input is zero.
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        Self(BigUint::from_bytes_be(bytes))
    }

    /// Minimal big-endian bytes; zero encodes as an empty slice.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        if self.is_zero() {
            Vec::new()
        } else {
            self.0.to_bytes_be()
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0.bits() == 0
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Format in display units, shifting the decimal point left by `decimals`.
    ///
    /// Trailing fractional zeros are trimmed: 1.5 tokens with 18 decimals
    /// prints as `1.5`, one whole token as `1`.
    pub fn to_display(&self, decimals: u32) -> String {
        let digits = self.0.to_str_radix(10);
        let scale = decimals as usize;
        if scale == 0 {
            return digits;
        }

        let (int_part, frac_part) = if digits.len() > scale {
            let (i, f) = digits.split_at(digits.len() - scale);
            (i.to_string(), f.to_string())
        } else {
            ("0".to_string(), format!("{digits:0>scale$}"))
        };

        let frac_part = frac_part.trim_end_matches('0');
        if frac_part.is_empty() {
            int_part
        } else {
            format!("{int_part}.{frac_part}")
        }
    }
}

impl From<u64> for Amount {
    fn from(v: u64) -> Self {
        Self(BigUint::from(v))
    }
}

impl From<BigUint> for Amount {
    fn from(v: BigUint) -> Self {
        Self(v)
    }
}

impl FromStr for Amount {
    type Err = num_bigint::ParseBigIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<BigUint>().map(Self)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

/// Milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TimestampMs(u64);

impl TimestampMs {
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// Convert on-chain seconds. `None` if the result does not fit in u64.
    pub fn from_secs(secs: u64) -> Option<Self> {
        secs.checked_mul(1000).map(Self)
    }

    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Whole seconds, as stored on chain.
    pub const fn as_secs(&self) -> u64 {
        self.0 / 1000
    }
}

/// Lifecycle state of a question as stored by the contract.
///
/// `Unknown` carries an ordinal this client does not know about, typically
/// written by a newer contract version. It is never folded into a known state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionStatus {
    Created,
    Answered,
    AnswerApproved,
    Expired,
    Unknown(u8),
}

impl QuestionStatus {
    /// Known states, indexed by wire ordinal.
    pub const KNOWN: [QuestionStatus; 4] = [
        QuestionStatus::Created,
        QuestionStatus::Answered,
        QuestionStatus::AnswerApproved,
        QuestionStatus::Expired,
    ];

    pub fn ordinal(&self) -> u8 {
        match self {
            QuestionStatus::Created => 0,
            QuestionStatus::Answered => 1,
            QuestionStatus::AnswerApproved => 2,
            QuestionStatus::Expired => 3,
            QuestionStatus::Unknown(v) => *v,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuestionStatus::Created => "Created",
            QuestionStatus::Answered => "Answered",
            QuestionStatus::AnswerApproved => "AnswerApproved",
            QuestionStatus::Expired => "Expired",
            QuestionStatus::Unknown(_) => "Unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, QuestionStatus::Unknown(_))
    }

    /// Still accepting answers (before the deadline is taken into account).
    pub fn is_open(&self) -> bool {
        matches!(self, QuestionStatus::Created | QuestionStatus::Answered)
    }
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionStatus::Unknown(v) => write!(f, "Unknown({v})"),
            known => f.write_str(known.label()),
        }
    }
}

impl Serialize for QuestionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn decimal_string<S: Serializer>(v: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(v)
}

/// One posted question with its locked reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(serialize_with = "decimal_string")]
    pub question_id: QuestionId,
    pub creator: Address,
    pub title: String,
    pub description: String,
    pub deadline: TimestampMs,
    pub locked_amount: Amount,
    pub created_at: TimestampMs,
    pub status: QuestionStatus,
    pub approved_answer_id: Option<AnswerId>,
}

impl Question {
    /// Status as the contract reports it for display: an open question whose
    /// deadline has passed shows as `Expired` even before it is refunded.
    pub fn effective_status(&self, now: TimestampMs) -> QuestionStatus {
        if self.status.is_open() && now >= self.deadline {
            QuestionStatus::Expired
        } else {
            self.status
        }
    }

    pub fn is_open(&self, now: TimestampMs) -> bool {
        self.status.is_open() && self.deadline > now
    }
}

/// One answer submitted against a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    #[serde(serialize_with = "decimal_string")]
    pub answer_id: AnswerId,
    #[serde(serialize_with = "decimal_string")]
    pub question_id: QuestionId,
    pub creator: Address,
    pub title: String,
    pub description: String,
    pub created_at: TimestampMs,
    pub votes: u32,
    pub approved: bool,
}

/// Aggregate counters exposed by the contract's stats view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractStats {
    pub total_questions: u64,
    pub total_answers: u64,
    pub paused: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_BECH32: &str = "erd1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq6gq4hu";

    fn sample_question(status: QuestionStatus) -> Question {
        Question {
            question_id: 7,
            creator: Address::ZERO,
            title: "t".into(),
            description: "d".into(),
            deadline: TimestampMs::from_millis(2_000_000),
            locked_amount: Amount::from(1u64),
            created_at: TimestampMs::from_millis(1_000_000),
            status,
            approved_answer_id: None,
        }
    }

    #[test]
    fn zero_address_renders_as_system_address() {
        assert_eq!(Address::ZERO.to_bech32(), ZERO_BECH32);
    }

    #[test]
    fn address_bech32_roundtrip() {
        let addr = Address::from_bytes([0x11u8; 32]);
        let text = addr.to_string();
        assert!(text.starts_with("erd1"));
        assert_eq!(text.parse::<Address>().unwrap(), addr);
    }

    #[test]
    fn address_rejects_foreign_prefix() {
        let hrp = Hrp::parse_unchecked("bc");
        let other = bech32::encode::<Bech32>(hrp, &[0u8; 32]).unwrap();
        let err = Address::from_bech32(&other).unwrap_err();
        assert!(matches!(err, AddressError::WrongPrefix { .. }));
    }

    #[test]
    fn address_rejects_wrong_length() {
        let hrp = Hrp::parse_unchecked(ADDRESS_HRP);
        let short = bech32::encode::<Bech32>(hrp, &[0u8; 20]).unwrap();
        assert!(matches!(
            Address::from_bech32(&short),
            Err(AddressError::InvalidLength(20))
        ));
    }

    #[test]
    fn amount_display_units() {
        let one_and_half: Amount = "1500000000000000000".parse().unwrap();
        assert_eq!(one_and_half.to_display(TOKEN_DECIMALS), "1.5");

        let one: Amount = "1000000000000000000".parse().unwrap();
        assert_eq!(one.to_display(TOKEN_DECIMALS), "1");

        let tenth: Amount = "100000000000000000".parse().unwrap();
        assert_eq!(tenth.to_display(TOKEN_DECIMALS), "0.1");

        assert_eq!(Amount::from(1u64).to_display(TOKEN_DECIMALS), "0.000000000000000001");
        assert_eq!(Amount::zero().to_display(TOKEN_DECIMALS), "0");
        assert_eq!(Amount::from(42u64).to_display(0), "42");
    }

    #[test]
    fn amount_zero_has_empty_bytes() {
        assert!(Amount::zero().to_be_bytes().is_empty());
        assert!(Amount::from_be_bytes(&[]).is_zero());
        assert_eq!(Amount::from(258u64).to_be_bytes(), vec![1, 2]);
    }

    #[test]
    fn timestamp_conversion() {
        let ts = TimestampMs::from_secs(1_700_000_000).unwrap();
        assert_eq!(ts.as_millis(), 1_700_000_000_000);
        assert_eq!(ts.as_secs(), 1_700_000_000);
        assert_eq!(TimestampMs::from_secs(u64::MAX), None);
    }

    #[test]
    fn status_ordinals() {
        for (i, s) in QuestionStatus::KNOWN.iter().enumerate() {
            assert_eq!(s.ordinal() as usize, i);
            assert!(s.is_known());
        }
        let unknown = QuestionStatus::Unknown(99);
        assert_eq!(unknown.ordinal(), 99);
        assert!(!unknown.is_known());
        assert_eq!(unknown.to_string(), "Unknown(99)");
    }

    #[test]
    fn effective_status_marks_overdue_open_questions_expired() {
        let q = sample_question(QuestionStatus::Answered);
        let before = TimestampMs::from_millis(1_999_999);
        let at = TimestampMs::from_millis(2_000_000);

        assert_eq!(q.effective_status(before), QuestionStatus::Answered);
        assert_eq!(q.effective_status(at), QuestionStatus::Expired);
        assert!(q.is_open(before));
        assert!(!q.is_open(at));

        let approved = sample_question(QuestionStatus::AnswerApproved);
        assert_eq!(approved.effective_status(at), QuestionStatus::AnswerApproved);
        assert!(!approved.is_open(before));
    }

    #[test]
    fn question_json_shape() {
        let mut q = sample_question(QuestionStatus::Created);
        q.approved_answer_id = Some(3);
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(v["questionId"], "7");
        assert_eq!(v["creator"], ZERO_BECH32);
        assert_eq!(v["deadline"], 2_000_000);
        assert_eq!(v["lockedAmount"], "1");
        assert_eq!(v["status"], "Created");
        assert_eq!(v["approvedAnswerId"], 3);
    }
}
