use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::handler::SharedStore;
use crate::router::build_router;

/// Content gateway server.
pub struct FolioGateway {
    config: GatewayConfig,
    store: SharedStore,
}

impl FolioGateway {
    pub fn new(config: GatewayConfig, store: SharedStore) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.store.clone(), &self.config)
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> GatewayResult<TcpListener> {
        Ok(TcpListener::bind(self.config.bind_addr).await?)
    }

    /// Bind and serve until Ctrl-C.
    pub async fn serve(self) -> GatewayResult<()> {
        let listener = self.bind().await?;
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener until Ctrl-C.
    pub async fn serve_on(self, listener: TcpListener) -> GatewayResult<()> {
        let addr: SocketAddr = listener.local_addr()?;
        let app = self.router();
        tracing::info!("folio gateway listening on {addr}");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| GatewayError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for ctrl-c; serving until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

impl std::fmt::Debug for FolioGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolioGateway")
            .field("config", &self.config)
            .finish()
    }
}
