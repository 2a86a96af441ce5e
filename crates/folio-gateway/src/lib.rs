//! HTTP gateway for the Folio content store.
//!
//! Browsers cannot hold the pinning service credentials, so uploads and
//! reads of book metadata, review metadata and cover images go through this
//! proxy. Any [`ContentStore`](folio_content::ContentStore) can back it.
//!
//! | Route | Behaviour |
//! |-------|-----------|
//! | `POST /api/ipfs` | store a JSON document, answer `{ "cid": ... }` |
//! | `POST /api/ipfs/image` | store the raw body, answer the cid as a JSON string |
//! | `GET /api/ipfs/:cid` | the JSON document |
//! | `GET /api/ipfs/image/:cid` | the raw bytes |
//! | `GET /v1/health` | liveness |
//! | `GET /.well-known/farcaster.json` | mini-app manifest from [`ManifestConfig`] |

pub mod config;
pub mod error;
pub mod handler;
pub mod manifest;
pub mod router;
pub mod server;

pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use manifest::ManifestConfig;
pub use server::FolioGateway;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use folio_content::{ContentStore, InMemoryContentStore};
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn app() -> (axum::Router, Arc<InMemoryContentStore>) {
        let store = Arc::new(InMemoryContentStore::new());
        let router = router::build_router(store.clone(), &GatewayConfig::default());
        (router, store)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (app, _) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn upload_then_fetch_json() {
        let (app, store) = app();
        let doc = json!({"name": "Dune", "description": "Spice"});
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/ipfs")
                    .header("content-type", "application/json")
                    .body(Body::from(doc.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let cid = body_json(response).await["cid"]
            .as_str()
            .unwrap()
            .to_string();
        assert_eq!(store.len(), 1);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/ipfs/{cid}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(body_json(response).await, doc);
    }

    #[tokio::test]
    async fn upload_then_fetch_image() {
        let (app, _) = app();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/ipfs/image")
                    .body(Body::from(vec![0x89, b'P', b'N', b'G']))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let cid = body_json(response).await.as_str().unwrap().to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/ipfs/image/{cid}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], &[0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn empty_image_is_rejected() {
        let (app, store) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/ipfs/image")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "No file provided");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn missing_content() {
        let (app, _) = app();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/ipfs/bafkmissing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Failed to fetch data");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/ipfs/image/bafkmissing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn malformed_upload_is_an_upload_failure() {
        let (app, store) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/ipfs")
                    .header("content-type", "application/json")
                    .body(Body::from("{\"name\": "))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Failed to upload data"})
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn serves_manifest() {
        let config = GatewayConfig {
            manifest: ManifestConfig {
                header: Some("h".into()),
                payload: Some("p".into()),
                signature: Some("s".into()),
                name: Some("Folio".into()),
                description: Some(String::new()),
                home_url: Some("https://folio.example".into()),
                ..ManifestConfig::default()
            },
            ..GatewayConfig::default()
        };
        let app = router::build_router(Arc::new(InMemoryContentStore::new()), &config);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/.well-known/farcaster.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let doc = body_json(response).await;
        assert_eq!(
            doc["accountAssociation"],
            json!({"header": "h", "payload": "p", "signature": "s"})
        );
        assert_eq!(doc["frame"]["version"], "1");
        assert_eq!(doc["frame"]["name"], "Folio");
        assert_eq!(doc["frame"]["webhookUrl"], "https://folio.example/api/webhook");
        assert!(doc["frame"].get("description").is_none());
        assert!(doc["frame"].get("tags").is_none());
    }

    #[tokio::test]
    async fn non_json_blob_is_a_fetch_failure() {
        let (app, store) = app();
        let cid = store
            .put_bytes(bytes::Bytes::from_static(b"\x89PNG"))
            .await
            .unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/ipfs/{cid}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Failed to fetch data");
    }
}
