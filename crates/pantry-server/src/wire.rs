use serde::{Deserialize, Serialize};

use pantry_types::Produce;

/// Body of `POST /v1/produce`: either `{"items": [...]}` or, as a
/// convenience, a single bare record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AddRequest {
    Batch { items: Vec<Produce> },
    Single(Produce),
}

impl AddRequest {
    pub fn into_items(self) -> Vec<Produce> {
        match self {
            AddRequest::Batch { items } => items,
            AddRequest::Single(item) => vec![item],
        }
    }
}

/// Per-item entry in a mixed-outcome add response, carrying the HTTP
/// status that item would have received on its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddItemStatus {
    pub produce_code: String,
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Generic status body, used for the liveness endpoint and bad-request
/// causes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
}
