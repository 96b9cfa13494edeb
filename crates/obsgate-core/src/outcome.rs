//! Outcome types for batch ingestion reporting
//!
//! One [`Issue`] per input record, collected into a FHIR-style
//! [`OperationOutcome`] with a generated narrative.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a single report issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// Successful ingestion
    Information,
    /// Recoverable validation failure
    Error,
    /// Unexpected processing fault
    Fatal,
}

/// Issue type code, paired with the severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCode {
    Informational,
    Structure,
    Exception,
}

/// Human-readable summary for one issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDetails {
    pub text: String,
}

/// One line item in the aggregated report, corresponding 1:1 with an
/// input record at the same index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: IssueSeverity,
    pub code: IssueCode,
    pub details: IssueDetails,
    /// Machine-readable detail, present only on validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
}

impl Issue {
    /// Informational issue for a record that validated and was ingested
    pub fn success(index: usize) -> Self {
        Self {
            severity: IssueSeverity::Information,
            code: IssueCode::Informational,
            details: IssueDetails {
                text: format!("Index {index}: Observation validated and successfully ingested."),
            },
            diagnostics: None,
        }
    }

    /// Structural failure (type-tag mismatch or schema violation)
    pub fn structure_failure(index: usize, diagnostics: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Error,
            code: IssueCode::Structure,
            details: IssueDetails {
                text: format!("Index {index}: Resource failed validation."),
            },
            diagnostics: Some(diagnostics.into()),
        }
    }

    /// Non-schema fault contained to one record
    pub fn exception_failure(index: usize, fault: &str) -> Self {
        Self {
            severity: IssueSeverity::Fatal,
            code: IssueCode::Exception,
            details: IssueDetails {
                text: format!("Index {index}: Pipeline execution failed. Error: {fault}"),
            },
            diagnostics: None,
        }
    }

    /// A record is successful iff its issue is informational
    pub fn is_success(&self) -> bool {
        self.severity == IssueSeverity::Information
    }
}

/// Generated narrative carried on the outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    pub status: String,
    pub div: String,
}

impl Narrative {
    pub fn generated(div: impl Into<String>) -> Self {
        Self {
            status: "generated".to_string(),
            div: div.into(),
        }
    }
}

/// The single aggregated response resource for a whole batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    #[serde(rename = "resourceType")]
    pub resource_type: String,
    pub issue: Vec<Issue>,
    pub text: Narrative,
}

impl OperationOutcome {
    pub fn new(issue: Vec<Issue>, text: Narrative) -> Self {
        Self {
            resource_type: "OperationOutcome".to_string(),
            issue,
            text,
        }
    }
}

/// Assembled result of one batch: the outcome resource plus the counts
/// accumulated alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    outcome: OperationOutcome,
    successes: usize,
    failures: usize,
}

impl BatchReport {
    pub fn new(outcome: OperationOutcome, successes: usize, failures: usize) -> Self {
        Self {
            outcome,
            successes,
            failures,
        }
    }

    pub fn outcome(&self) -> &OperationOutcome {
        &self.outcome
    }

    pub fn into_outcome(self) -> OperationOutcome {
        self.outcome
    }

    pub fn successes(&self) -> usize {
        self.successes
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    /// True iff every issue represents a success. Kept as a length
    /// comparison against the success count so failure is declared exactly
    /// when at least one non-informational issue exists.
    pub fn is_clean(&self) -> bool {
        self.outcome.issue.len() == self.successes
    }
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IssueSeverity::Information => write!(f, "information"),
            IssueSeverity::Error => write!(f, "error"),
            IssueSeverity::Fatal => write!(f, "fatal"),
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IssueCode::Informational => write!(f, "informational"),
            IssueCode::Structure => write!(f, "structure"),
            IssueCode::Exception => write!(f, "exception"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_issue() {
        let issue = Issue::success(3);
        assert!(issue.is_success());
        assert_eq!(issue.code, IssueCode::Informational);
        assert_eq!(
            issue.details.text,
            "Index 3: Observation validated and successfully ingested."
        );
        assert!(issue.diagnostics.is_none());
    }

    #[test]
    fn test_structure_failure_issue() {
        let issue = Issue::structure_failure(0, "Validation failed: bad shape");
        assert!(!issue.is_success());
        assert_eq!(issue.severity, IssueSeverity::Error);
        assert_eq!(issue.code, IssueCode::Structure);
        assert_eq!(issue.details.text, "Index 0: Resource failed validation.");
        assert!(issue.diagnostics.is_some());
    }

    #[test]
    fn test_exception_issue_has_no_diagnostics() {
        let issue = Issue::exception_failure(7, "backend unavailable");
        assert_eq!(issue.severity, IssueSeverity::Fatal);
        assert_eq!(issue.code, IssueCode::Exception);
        assert_eq!(
            issue.details.text,
            "Index 7: Pipeline execution failed. Error: backend unavailable"
        );
        assert!(issue.diagnostics.is_none());
    }

    #[test]
    fn test_outcome_serialization_shape() {
        let outcome = OperationOutcome::new(
            vec![Issue::success(0)],
            Narrative::generated("<div>Batch Ingestion Report: 1 Successes, 0 Failures</div>"),
        );
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["resourceType"], "OperationOutcome");
        assert_eq!(json["issue"][0]["severity"], "information");
        assert_eq!(json["issue"][0]["code"], "informational");
        assert_eq!(json["text"]["status"], "generated");
        // diagnostics is omitted entirely on success, not null
        assert!(json["issue"][0].get("diagnostics").is_none());
    }

    #[test]
    fn test_is_clean_compares_lengths() {
        let clean = BatchReport::new(
            OperationOutcome::new(vec![Issue::success(0)], Narrative::generated("<div></div>")),
            1,
            0,
        );
        assert!(clean.is_clean());

        let dirty = BatchReport::new(
            OperationOutcome::new(
                vec![Issue::success(0), Issue::structure_failure(1, "bad")],
                Narrative::generated("<div></div>"),
            ),
            1,
            1,
        );
        assert!(!dirty.is_clean());
    }
}
