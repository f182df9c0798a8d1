use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use pantry_service::ProduceService;
use pantry_types::Produce;

use crate::error::{ServerError, ServerResult};

/// Load seed records from a JSON file and apply them through the ordinary
/// batch-add path, so they face the same validation and uniqueness checks
/// as any client request.
///
/// A missing or unreadable file is a warning, not an error; a file that
/// does not parse as a record array is a startup error. Returns how many
/// records were actually created.
pub async fn load_seed(
    service: &ProduceService,
    path: &Path,
    cancel: &CancellationToken,
) -> ServerResult<usize> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(path = %path.display(), %err, "cannot open seed file");
            return Ok(0);
        }
    };

    let items: Vec<Produce> = serde_json::from_slice(&bytes)
        .map_err(|err| ServerError::Seed(format!("{}: {err}", path.display())))?;
    let total = items.len();

    let results = service.add_batch(items, cancel).await;
    let mut loaded = 0usize;
    for result in &results {
        match &result.outcome {
            Ok(()) => loaded += 1,
            Err(err) => warn!(code = %result.code, %err, "seed item rejected"),
        }
    }

    if loaded == 0 {
        warn!(path = %path.display(), "no seed items loaded");
    } else {
        info!(path = %path.display(), loaded, total, "seed items loaded");
    }
    Ok(loaded)
}
