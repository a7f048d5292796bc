//! Record error types.

use thiserror::Error;

/// Errors raised while naming or decoding records.
#[derive(Debug, Error)]
pub enum RecordError {
    /// A tag name outside the closed record tag set.
    #[error("unknown record tag: {0}")]
    UnknownTag(String),

    /// A record could not be encoded or decoded as JSON.
    #[error("record serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
