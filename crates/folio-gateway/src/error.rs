use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use folio_content::ContentError;
use folio_types::TypeError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("no file provided")]
    NoFile,

    #[error("invalid content id: {0}")]
    InvalidCid(#[from] TypeError),

    #[error("document upload failed: {0}")]
    Upload(ContentError),

    #[error("file upload failed: {0}")]
    FileUpload(ContentError),

    #[error("fetch failed: {0}")]
    Fetch(ContentError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("config error: {0}")]
    Config(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::NoFile | GatewayError::InvalidCid(_) => StatusCode::BAD_REQUEST,
            GatewayError::Fetch(ContentError::NotFound(_)) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the browser; the underlying cause is only logged.
    pub fn public_message(&self) -> &'static str {
        match self {
            GatewayError::NoFile => "No file provided",
            GatewayError::InvalidCid(_) => "Invalid content id",
            GatewayError::Upload(_) => "Failed to upload data",
            GatewayError::FileUpload(_) => "Failed to upload file",
            GatewayError::Fetch(_) => "Failed to fetch data",
            GatewayError::Io(_) | GatewayError::Internal(_) | GatewayError::Config(_) => {
                "Internal server error"
            }
        }
    }

    pub(crate) fn log(&self) {
        if self.status().is_server_error() {
            tracing::error!(error = %self, "gateway request failed");
        } else {
            tracing::debug!(error = %self, "gateway request refused");
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        self.log();
        let body = Json(json!({ "error": self.public_message() }));
        (self.status(), body).into_response()
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
