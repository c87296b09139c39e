//! Turning contract query responses into typed records.
//!
//! The transport that produces a [`QueryResponse`] lives elsewhere; this
//! crate only sees the ordered list of base64 items it returned.

mod batch;
mod error;
mod response;
mod views;

pub use batch::{decode_batch, decode_batch_base64, fingerprint, BatchOutcome, RecordFailure};
pub use error::QueryError;
pub use response::{QueryResponse, RETURN_CODE_OK};
pub use views::{View, ViewDecoder, ViewOutput};
