use axum::routing::{delete, get, post};
use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use pantry_service::ProduceService;

use crate::handler;

/// Shared handler state: the service plus the server-wide cancellation
/// token threaded into every call that can wait on the store.
#[derive(Clone)]
pub struct AppState {
    pub service: ProduceService,
    pub cancel: CancellationToken,
}

/// Build the axum router with all produce endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/status", get(handler::get_status))
        .route(
            "/v1/produce",
            post(handler::add_produce).get(handler::list_produce),
        )
        .route("/v1/produce/:code", delete(handler::delete_produce))
        .route("/v1/reset", post(handler::reset))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
