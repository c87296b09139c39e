use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use stacktoken_codec::{
    decode_base64,
    top::{decode_top_address, decode_top_bool, decode_top_u64},
    Decoder,
};
use stacktoken_types::{Address, Answer, ContractStats, Question};
use tracing::debug;

use crate::{decode_batch_base64, BatchOutcome, QueryError, QueryResponse};

/// Read-only endpoints of the question/answer contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    AllOpenQuestions,
    QuestionsByStatus,
    ExpiredQuestions,
    AnswersForQuestion,
    QuestionDetails,
    TotalQuestions,
    TotalAnswers,
    IsPaused,
    Owner,
    ContractStats,
}

impl View {
    pub const ALL: [View; 10] = [
        View::AllOpenQuestions,
        View::QuestionsByStatus,
        View::ExpiredQuestions,
        View::AnswersForQuestion,
        View::QuestionDetails,
        View::TotalQuestions,
        View::TotalAnswers,
        View::IsPaused,
        View::Owner,
        View::ContractStats,
    ];

    /// Endpoint name as exposed in the contract ABI.
    pub fn endpoint(&self) -> &'static str {
        match self {
            View::AllOpenQuestions => "getAllOpenQuestions",
            View::QuestionsByStatus => "getQuestionsByStatus",
            View::ExpiredQuestions => "getExpiredQuestions",
            View::AnswersForQuestion => "getAnswersForQuestion",
            View::QuestionDetails => "getQuestionDetails",
            View::TotalQuestions => "getTotalQuestions",
            View::TotalAnswers => "getTotalAnswers",
            View::IsPaused => "isPaused",
            View::Owner => "getOwner",
            View::ContractStats => "getContractStats",
        }
    }
}

impl FromStr for View {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|v| v.endpoint() == s)
            .ok_or_else(|| QueryError::UnknownView(s.to_string()))
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

/// Typed result of any view, for callers that dispatch on the endpoint name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ViewOutput {
    Questions(BatchOutcome<Question>),
    Answers(BatchOutcome<Answer>),
    QuestionDetails(Option<Question>),
    Count(u64),
    Flag(bool),
    Address(Address),
    Stats(ContractStats),
}

/// Maps contract view responses onto typed values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewDecoder {
    decoder: Decoder,
}

impl ViewDecoder {
    pub fn new(decoder: Decoder) -> Self {
        Self { decoder }
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// `getAllOpenQuestions`, `getQuestionsByStatus`, `getExpiredQuestions`:
    /// one Question per return item.
    pub fn questions(&self, resp: &QueryResponse) -> Result<BatchOutcome<Question>, QueryError> {
        resp.ensure_ok()?;
        Ok(decode_batch_base64(&self.decoder, &resp.return_data))
    }

    /// `getAnswersForQuestion`: one Answer per return item.
    pub fn answers(&self, resp: &QueryResponse) -> Result<BatchOutcome<Answer>, QueryError> {
        resp.ensure_ok()?;
        Ok(decode_batch_base64(&self.decoder, &resp.return_data))
    }

    /// `getQuestionDetails`: no return item means the id does not exist.
    ///
    /// A malformed record is an error here since there is no batch to drop
    /// it from.
    pub fn question_details(&self, resp: &QueryResponse) -> Result<Option<Question>, QueryError> {
        const VIEW: &str = "getQuestionDetails";
        resp.ensure_ok()?;
        let Some(item) = resp.return_data.first() else {
            debug!(view = VIEW, "no such question");
            return Ok(None);
        };
        self.decoder
            .decode_base64(item)
            .map(Some)
            .map_err(|source| QueryError::Codec {
                view: VIEW,
                index: 0,
                source,
            })
    }

    pub fn total_questions(&self, resp: &QueryResponse) -> Result<u64, QueryError> {
        scalar(resp, View::TotalQuestions, 0, decode_top_u64)
    }

    pub fn total_answers(&self, resp: &QueryResponse) -> Result<u64, QueryError> {
        scalar(resp, View::TotalAnswers, 0, decode_top_u64)
    }

    pub fn is_paused(&self, resp: &QueryResponse) -> Result<bool, QueryError> {
        scalar(resp, View::IsPaused, 0, decode_top_bool)
    }

    pub fn owner(&self, resp: &QueryResponse) -> Result<Address, QueryError> {
        scalar(resp, View::Owner, 0, decode_top_address)
    }

    /// `getContractStats`: total questions, total answers, paused flag.
    pub fn contract_stats(&self, resp: &QueryResponse) -> Result<ContractStats, QueryError> {
        Ok(ContractStats {
            total_questions: scalar(resp, View::ContractStats, 0, decode_top_u64)?,
            total_answers: scalar(resp, View::ContractStats, 1, decode_top_u64)?,
            paused: scalar(resp, View::ContractStats, 2, decode_top_bool)?,
        })
    }

    pub fn decode(&self, view: View, resp: &QueryResponse) -> Result<ViewOutput, QueryError> {
        Ok(match view {
            View::AllOpenQuestions | View::QuestionsByStatus | View::ExpiredQuestions => {
                ViewOutput::Questions(self.questions(resp)?)
            }
            View::AnswersForQuestion => ViewOutput::Answers(self.answers(resp)?),
            View::QuestionDetails => ViewOutput::QuestionDetails(self.question_details(resp)?),
            View::TotalQuestions => ViewOutput::Count(self.total_questions(resp)?),
            View::TotalAnswers => ViewOutput::Count(self.total_answers(resp)?),
            View::IsPaused => ViewOutput::Flag(self.is_paused(resp)?),
            View::Owner => ViewOutput::Address(self.owner(resp)?),
            View::ContractStats => ViewOutput::Stats(self.contract_stats(resp)?),
        })
    }
}

fn scalar<T>(
    resp: &QueryResponse,
    view: View,
    index: usize,
    decode: fn(&[u8]) -> Result<T, stacktoken_codec::CodecError>,
) -> Result<T, QueryError> {
    resp.ensure_ok()?;
    let view_name = view.endpoint();
    let item = resp
        .return_data
        .get(index)
        .ok_or(QueryError::MissingReturnData {
            view: view_name,
            expected: index + 1,
            got: resp.return_data.len(),
        })?;
    decode_base64(item)
        .and_then(|bytes| decode(&bytes))
        .map_err(|source| QueryError::Codec {
            view: view_name,
            index,
            source,
        })
}
