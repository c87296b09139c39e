use stacktoken_codec::CodecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    /// The VM answered with something other than `ok`.
    #[error("contract returned {code}: {message}")]
    ContractError { code: String, message: String },

    /// The gateway itself failed before the VM produced a result.
    #[error("gateway returned {code}: {message}")]
    Gateway { code: String, message: String },

    #[error("{view}: expected {expected} return items, got {got}")]
    MissingReturnData {
        view: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{view}: return item {index}: {source}")]
    Codec {
        view: &'static str,
        index: usize,
        #[source]
        source: CodecError,
    },

    #[error("unknown view {0:?}")]
    UnknownView(String),

    #[error("malformed query response: {0}")]
    Json(#[from] serde_json::Error),
}
