use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Json, Response};
use bytes::Bytes;
use folio_content::{ContentError, ContentStore};
use folio_types::ContentId;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{GatewayError, GatewayResult};

/// Store shared by every route.
pub type SharedStore = Arc<dyn ContentStore>;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub cid: ContentId,
}

pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "name": "folio-gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /.well-known/farcaster.json`
pub async fn manifest(document: Arc<Value>) -> Json<Value> {
    Json(document.as_ref().clone())
}

/// `POST /api/ipfs`: pin a JSON document. A body that is not JSON fails the
/// same way a failed pin does.
pub async fn upload_json(
    State(store): State<SharedStore>,
    body: Bytes,
) -> GatewayResult<Json<UploadResponse>> {
    let body: Value = serde_json::from_slice(&body)
        .map_err(|e| GatewayError::Upload(ContentError::Serialization(e.to_string())))?;
    let cid = store.put_json(&body).await.map_err(GatewayError::Upload)?;
    tracing::info!(%cid, "document pinned");
    Ok(Json(UploadResponse { cid }))
}

/// `POST /api/ipfs/image`: pin the raw request body. Answers with the bare
/// cid as a JSON string.
pub async fn upload_image(
    State(store): State<SharedStore>,
    body: Bytes,
) -> GatewayResult<Json<ContentId>> {
    if body.is_empty() {
        return Err(GatewayError::NoFile);
    }
    let size = body.len();
    let cid = store.put_bytes(body).await.map_err(GatewayError::FileUpload)?;
    tracing::info!(%cid, size, "file pinned");
    Ok(Json(cid))
}

/// `GET /api/ipfs/:cid`
pub async fn fetch_json(
    State(store): State<SharedStore>,
    Path(cid): Path<String>,
) -> GatewayResult<Json<Value>> {
    let cid = ContentId::from_uri(&cid)?;
    let doc = store.get_json(&cid).await.map_err(GatewayError::Fetch)?;
    Ok(Json(doc))
}

/// `GET /api/ipfs/image/:cid`. Failures answer with an empty body so an
/// `<img>` tag simply shows nothing.
pub async fn fetch_image(State(store): State<SharedStore>, Path(cid): Path<String>) -> Response {
    let result = match ContentId::from_uri(&cid) {
        Ok(cid) => store.get_bytes(&cid).await.map_err(GatewayError::Fetch),
        Err(e) => Err(GatewayError::from(e)),
    };
    match result {
        Ok(bytes) => bytes.into_response(),
        Err(e) => {
            e.log();
            e.status().into_response()
        }
    }
}
