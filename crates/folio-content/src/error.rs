use folio_types::{ContentId, TypeError};

/// Errors from content store operations.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The requested content was not found.
    #[error("content not found: {0}")]
    NotFound(ContentId),

    /// The content exists but is not the expected document.
    #[error("invalid document {cid}: {reason}")]
    InvalidDocument { cid: ContentId, reason: String },

    /// Serialization of an outgoing document failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The gateway answered with a non-success status.
    #[error("gateway returned {status}: {message}")]
    Gateway { status: u16, message: String },

    /// Upload succeeded but no content id could be read from the response.
    #[error("upload response carried no content id")]
    MissingContentId,

    #[error(transparent)]
    Type(#[from] TypeError),
}

impl From<reqwest::Error> for ContentError {
    fn from(e: reqwest::Error) -> Self {
        ContentError::Transport(e.to_string())
    }
}

/// Result alias for content store operations.
pub type ContentResult<T> = Result<T, ContentError>;
