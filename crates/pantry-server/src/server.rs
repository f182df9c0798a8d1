use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::timeout::TimeoutLayer;

use pantry_service::ProduceService;
use pantry_store::InMemoryProduceStore;

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::router::{build_router, AppState};
use crate::seed;

/// Produce inventory HTTP server.
pub struct ProduceServer {
    config: ServerConfig,
    service: ProduceService,
    cancel: CancellationToken,
}

impl ProduceServer {
    /// Create a server over a fresh in-memory store.
    pub fn new(config: ServerConfig) -> Self {
        let store = Arc::new(InMemoryProduceStore::new());
        Self::with_service(config, ProduceService::new(store))
    }

    /// Create a server over an existing service, for custom store backends
    /// and tests.
    pub fn with_service(config: ServerConfig, service: ProduceService) -> Self {
        Self {
            config,
            service,
            cancel: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn service(&self) -> &ProduceService {
        &self.service
    }

    /// Token that stops the server; cancelling it also cuts short any
    /// in-flight batch waits.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> Router {
        build_router(AppState {
            service: self.service.clone(),
            cancel: self.cancel.clone(),
        })
    }

    /// Load the seed file (if configured) and serve requests until a
    /// termination signal arrives or the cancellation token fires.
    pub async fn serve(self) -> ServerResult<()> {
        if let Some(path) = self.config.seed_path.clone() {
            seed::load_seed(&self.service, &path, &self.cancel).await?;
        }

        let app = self
            .router()
            .layer(TimeoutLayer::new(self.config.request_timeout()));
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "produce service listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(self.cancel.clone()))
            .await?;
        tracing::info!("produce service shut down");
        Ok(())
    }
}

/// Resolves when a termination signal arrives or the token fires. Either
/// way the token ends up cancelled, so collectors waiting on workers stop
/// waiting too.
async fn shutdown_signal(cancel: CancellationToken) {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("termination signal received");
            cancel.cancel();
        }
        _ = cancel.cancelled() => {}
    }
}
