//! Batch ingestion pipeline: per-record validation loop and report assembly
//!
//! Records are evaluated strictly in input order and every record produces
//! exactly one issue, successes included. No per-record outcome can abort
//! the batch.

use crate::error::ObsgateError;
use crate::outcome::{BatchReport, Issue, Narrative, OperationOutcome};
use crate::validate::{RecordValidator, ValidationOutcome, Violation};
use serde_json::{Map, Value};

/// The only resource type this pipeline ingests
pub const SUPPORTED_RESOURCE_TYPE: &str = "Observation";

/// Diagnostics attached when the type tag is absent or wrong
const TYPE_TAG_DIAGNOSTICS: &str =
    "Validation failed: Resource missing or incorrect 'resourceType'.";

/// Evaluate every record in the batch and assemble the aggregated report.
///
/// The success counter and the informational issue are updated in the same
/// arm; counts are never recomputed from the issue list.
pub fn ingest_batch(
    records: &[Map<String, Value>],
    validator: &dyn RecordValidator,
) -> BatchReport {
    let mut successes = 0usize;
    let mut issues = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        // Type-tag check comes first; the validator is never consulted for
        // records that are not Observations.
        if record.get("resourceType").and_then(Value::as_str) != Some(SUPPORTED_RESOURCE_TYPE) {
            issues.push(Issue::structure_failure(index, TYPE_TAG_DIAGNOSTICS));
            continue;
        }

        match validator.validate(record) {
            ValidationOutcome::Conforms => {
                successes += 1;
                issues.push(Issue::success(index));
            }
            ValidationOutcome::SchemaViolation(violations) => {
                match render_diagnostics(&violations) {
                    Ok(diagnostics) => issues.push(Issue::structure_failure(index, diagnostics)),
                    Err(e) => issues.push(Issue::exception_failure(index, &e.to_string())),
                }
            }
            ValidationOutcome::InternalFault(fault) => {
                tracing::warn!(index, %fault, "record processing faulted");
                issues.push(Issue::exception_failure(index, &fault));
            }
        }
    }

    let failures = issues.len() - successes;
    tracing::debug!(
        records = records.len(),
        successes,
        failures,
        "batch evaluated"
    );

    let text = Narrative::generated(format!(
        "<div>Batch Ingestion Report: {successes} Successes, {failures} Failures</div>"
    ));
    BatchReport::new(OperationOutcome::new(issues, text), successes, failures)
}

fn render_diagnostics(violations: &[Violation]) -> Result<String, ObsgateError> {
    let listing = serde_json::to_string_pretty(violations)
        .map_err(|e| ObsgateError::Serialize(e.to_string()))?;
    Ok(format!("Validation failed. Errors: {listing}"))
}
