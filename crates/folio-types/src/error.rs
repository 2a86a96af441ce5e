use thiserror::Error;

/// Errors produced by type parsing and validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid integer: {0}")]
    InvalidInteger(String),

    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("empty content identifier")]
    EmptyContentId,

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("serialization error: {0}")]
    Serialization(String),
}
