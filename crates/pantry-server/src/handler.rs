use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use pantry_types::Produce;

use crate::error::{outcome_status, ApiError};
use crate::router::AppState;
use crate::wire::{AddItemStatus, AddRequest, StatusResponse};

/// Liveness check handler.
pub async fn get_status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "produce service is up and running".to_owned(),
    })
}

/// Add one record or a batch of records.
///
/// A single item answers with its own status: 201 on success, otherwise
/// the mapped error status. A batch answers 201 with no body when every
/// item succeeded; on any failure it answers 200 with a per-item status
/// list, since a partial success has no single honest status code.
pub async fn add_produce(
    State(state): State<AppState>,
    Json(request): Json<AddRequest>,
) -> Response {
    let items = request.into_items();
    if items.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(StatusResponse {
                status: "at least one item must be specified to add".to_owned(),
            }),
        )
            .into_response();
    }

    let results = state.service.add_batch(items, &state.cancel).await;

    if let [only] = results.as_slice() {
        return match &only.outcome {
            Ok(()) => StatusCode::CREATED.into_response(),
            Err(err) => ApiError(err.clone()).into_response(),
        };
    }

    if results.iter().all(|result| result.outcome.is_ok()) {
        return StatusCode::CREATED.into_response();
    }

    let body: Vec<AddItemStatus> = results
        .into_iter()
        .map(|result| AddItemStatus {
            produce_code: result.code,
            status_code: outcome_status(&result.outcome).as_u16(),
            error: result.outcome.err().map(|err| err.to_string()),
        })
        .collect();
    (StatusCode::OK, Json(body)).into_response()
}

/// List all records. An empty inventory is an ordinary empty array.
pub async fn list_produce(
    State(state): State<AppState>,
) -> Result<Json<Vec<Produce>>, ApiError> {
    let items = state.service.list_all(&state.cancel).await?;
    Ok(Json(items))
}

/// Delete the record named by the trailing path segment.
pub async fn delete_produce(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.service.delete(&code, &state.cancel).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Discard every record.
pub async fn reset(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.service.clear()?;
    Ok(StatusCode::OK)
}
