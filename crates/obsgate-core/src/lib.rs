//! Obsgate Core: outcome model, structural validator, and batch pipeline
//!
//! Everything reproducible about the ingestion service lives here; the HTTP
//! surface in `obsgate-api` is a thin shell over [`pipeline::ingest_batch`].

pub mod error;
pub mod outcome;
pub mod pipeline;
pub mod validate;

pub use error::ObsgateError;
pub use outcome::{BatchReport, Issue, IssueCode, IssueSeverity, Narrative, OperationOutcome};
pub use pipeline::{ingest_batch, SUPPORTED_RESOURCE_TYPE};
pub use validate::{ObservationValidator, RecordValidator, ValidationOutcome, Violation};

/// Version reported by the health endpoint
pub const OBSGATE_VERSION: &str = env!("CARGO_PKG_VERSION");
