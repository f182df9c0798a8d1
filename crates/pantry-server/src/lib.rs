//! HTTP server for the pantry produce service.
//!
//! Exposes the produce inventory over a small REST surface:
//!
//! - `GET /v1/status` -- liveness check
//! - `POST /v1/produce` -- add one record or a batch of records
//! - `GET /v1/produce` -- list all records
//! - `DELETE /v1/produce/{code}` -- delete one record by code
//! - `POST /v1/reset` -- discard all records
//!
//! This crate owns only HTTP mechanics: wire DTOs, routing, status-code
//! mapping, seed loading, and shutdown. All inventory semantics live in
//! `pantry-service` and below.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod seed;
pub mod server;
pub mod wire;

pub use config::ServerConfig;
pub use error::{ApiError, ServerError, ServerResult};
pub use router::{build_router, AppState};
pub use server::ProduceServer;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn status_endpoint() {
        let server = ProduceServer::new(ServerConfig::default());
        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .uri("/v1/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = ProduceServer::new(ServerConfig::default());
        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .uri("/v1/nonsense")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
    }
}
