use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("indexer returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("query failed: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("could not decode query result: {0}")]
    Decode(String),

    #[error("indexer unavailable")]
    Unavailable,
}

impl From<reqwest::Error> for QueryError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            QueryError::Decode(e.to_string())
        } else {
            QueryError::Transport(e.to_string())
        }
    }
}

pub type QueryResult<T> = Result<T, QueryError>;
