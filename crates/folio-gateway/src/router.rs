use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::handler::{self, SharedStore};

/// Build the axum router with all gateway endpoints.
pub fn build_router(store: SharedStore, config: &GatewayConfig) -> Router {
    let manifest = Arc::new(config.manifest.to_document());
    let router = Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route(
            "/.well-known/farcaster.json",
            get(move || handler::manifest(manifest.clone())),
        )
        .route("/api/ipfs", post(handler::upload_json))
        .route("/api/ipfs/image", post(handler::upload_image))
        .route("/api/ipfs/image/:cid", get(handler::fetch_image))
        .route("/api/ipfs/:cid", get(handler::fetch_json))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(store);

    if config.permissive_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
