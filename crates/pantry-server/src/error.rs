use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use pantry_service::ServiceError;
use pantry_store::StoreError;

use crate::wire::StatusResponse;

/// Errors from server assembly and startup.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("seed file error: {0}")]
    Seed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// HTTP status for a service error. This is the single place the error
/// taxonomy meets REST semantics.
pub fn error_status(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::InvalidFormat(_) => StatusCode::BAD_REQUEST,
        ServiceError::Store(StoreError::AlreadyExists(_)) => StatusCode::CONFLICT,
        ServiceError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
        ServiceError::Cancelled | ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// HTTP status for one batch-add item outcome.
pub fn outcome_status(outcome: &Result<(), ServiceError>) -> StatusCode {
    match outcome {
        Ok(()) => StatusCode::CREATED,
        Err(err) => error_status(err),
    }
}

/// Response wrapper for handlers that surface a single service error.
///
/// Bad-request responses carry a JSON status body naming the cause; the
/// other statuses are self-explanatory and go out bare.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = error_status(&self.0);
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
        }
        if status == StatusCode::BAD_REQUEST {
            return (
                status,
                Json(StatusResponse {
                    status: self.0.to_string(),
                }),
            )
                .into_response();
        }
        status.into_response()
    }
}
