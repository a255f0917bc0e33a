//! Simulated enhancement endpoint.

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::simulation::ProcessingResult;
use crate::validation::{parse_processing_request, ValidationError};

const MALFORMED: &str = "Invalid processing request";

/// `POST /api/process`
pub async fn process_image(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ProcessingResult>, ApiError> {
    let value: Value =
        serde_json::from_slice(&body).map_err(|_| ValidationError::malformed(MALFORMED))?;

    let request = parse_processing_request(&value)
        .inspect_err(|e| metrics::record_validation_failure("processing_request", e.check))?;

    let delay = state.config().simulation.processing_delay();
    let result = state.engine.process(&request, delay).await;

    tracing::info!(
        file_id = %request.file_id,
        edits = result.edits.len(),
        processing_time = %result.metadata.processing_time,
        "Processing complete"
    );
    Ok(Json(result))
}
