use serde::{Deserialize, Deserializer, Serialize};

use crate::QueryError;

pub const RETURN_CODE_OK: &str = "ok";

fn ok_code() -> String {
    RETURN_CODE_OK.to_string()
}

// The proxy sends `null` instead of an empty list for views returning nothing.
fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let items: Option<Vec<Option<String>>> = Option::deserialize(d)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

/// Result of a read-only contract query: one base64 item per returned value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub return_data: Vec<String>,
    pub return_code: String,
    #[serde(default)]
    pub return_message: String,
}

#[derive(Deserialize)]
struct ProxyInner {
    data: QueryResponse,
}

// gateway: {"data":{"data":{...}},"error":"","code":"successful"}
#[derive(Deserialize)]
struct Envelope {
    data: Option<ProxyInner>,
    #[serde(default)]
    error: String,
    #[serde(default)]
    code: String,
}

impl QueryResponse {
    pub fn new(return_data: Vec<String>) -> Self {
        Self {
            return_data,
            return_code: ok_code(),
            return_message: String::new(),
        }
    }

    /// Parse either the gateway envelope or the bare query result.
    ///
    /// An envelope carrying an error or no data fails with
    /// [`QueryError::Gateway`]; a bare result must carry `returnCode`.
    pub fn from_json(text: &str) -> Result<Self, QueryError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if value.get("data").is_none() {
            return Ok(serde_json::from_value(value)?);
        }
        let envelope: Envelope = serde_json::from_value(value)?;
        match envelope.data {
            Some(inner) if envelope.error.is_empty() => Ok(inner.data),
            _ => Err(QueryError::Gateway {
                code: envelope.code,
                message: envelope.error,
            }),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.return_code == RETURN_CODE_OK
    }

    pub fn ensure_ok(&self) -> Result<(), QueryError> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(QueryError::ContractError {
                code: self.return_code.clone(),
                message: self.return_message.clone(),
            })
        }
    }
}
