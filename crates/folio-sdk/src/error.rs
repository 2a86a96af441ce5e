use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("content error: {0}")]
    Content(#[from] folio_content::ContentError),

    #[error("query error: {0}")]
    Query(#[from] folio_query::QueryError),

    #[error("ledger error: {0}")]
    Ledger(#[from] folio_ledger::LedgerError),

    #[error("like error: {0}")]
    Likes(#[from] folio_likes::LikeError),

    #[error("invalid value: {0}")]
    Type(#[from] folio_types::TypeError),
}

pub type SdkResult<T> = Result<T, SdkError>;
