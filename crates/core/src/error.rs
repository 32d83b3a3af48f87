use thiserror::Error;

/// Expected, user-facing calculator failures. Neither is retried; the caller
/// reports the message and keeps no partial result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("missing expected row: {0}")]
    MissingLineItem(String),
    #[error("error processing the statement: {0}")]
    Processing(String),
}

impl CalcError {
    pub fn processing(detail: impl Into<String>) -> Self {
        Self::Processing(detail.into())
    }
}
