//! API Handlers
use axum::{http::StatusCode, Json};
use obsgate_core::{ingest_batch, ObservationValidator, OBSGATE_VERSION};
use serde_json::{json, Map, Value};

use crate::metrics;

/// Ingest a batch of candidate Observation resources.
///
/// The body must be a JSON array of objects; anything else is rejected by
/// the extractor before this handler runs. A well-formed batch always gets
/// an OperationOutcome back: plain on 200, wrapped as the error detail on
/// 400.
pub async fn ingest_observations(
    Json(records): Json<Vec<Map<String, Value>>>,
) -> (StatusCode, Json<Value>) {
    let report = ingest_batch(&records, &ObservationValidator);
    metrics::observe_batch(&report);
    tracing::info!(
        records = records.len(),
        successes = report.successes(),
        failures = report.failures(),
        "batch ingested"
    );

    if report.is_clean() {
        (StatusCode::OK, Json(json!(report.into_outcome())))
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": report.into_outcome() })),
        )
    }
}

pub async fn root() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "message": "FHIR Observation ingestion service is running. \
                        POST batches to /api/data-pipeline/ingest/Observation."
        })),
    )
}

pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "version": OBSGATE_VERSION })),
    )
}

pub async fn metrics_endpoint() -> (StatusCode, String) {
    match metrics::encode() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
