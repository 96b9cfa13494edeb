//! Structural validation of candidate Observation records
//!
//! The validator is a trait seam so the pipeline can be exercised with test
//! doubles; [`ObservationValidator`] is the production implementation,
//! enforcing a fixed subset of the FHIR R4 Observation shape. It assumes the
//! `resourceType` tag has already been checked by the caller.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Observation.status value set (FHIR R4)
const STATUS_CODES: &[&str] = &[
    "registered",
    "preliminary",
    "final",
    "amended",
    "corrected",
    "cancelled",
    "entered-in-error",
    "unknown",
];

/// Top-level fields the schema knows about; anything else is rejected
const KNOWN_FIELDS: &[&str] = &[
    "resourceType",
    "id",
    "status",
    "category",
    "code",
    "subject",
    "encounter",
    "effectiveDateTime",
    "issued",
    "valueQuantity",
    "valueString",
    "valueBoolean",
    "valueInteger",
];

/// The value[x] choice fields; at most one may be present
const VALUE_FIELDS: &[&str] = &[
    "valueQuantity",
    "valueString",
    "valueBoolean",
    "valueInteger",
];

/// One field-level structural finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Path of the offending field (e.g. "code.coding[0].system")
    pub path: String,
    /// The constraint that was not met
    pub constraint: String,
    /// What was actually found (a JSON type name, a value, or "absent")
    pub observed: String,
}

impl Violation {
    pub fn new(
        path: impl Into<String>,
        constraint: impl Into<String>,
        observed: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            constraint: constraint.into(),
            observed: observed.into(),
        }
    }
}

/// Tagged result of validating one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The record satisfies the required shape
    Conforms,
    /// The record violates the shape; findings in document order
    SchemaViolation(Vec<Violation>),
    /// A fault unrelated to the record's shape
    InternalFault(String),
}

impl ValidationOutcome {
    pub fn is_conforming(&self) -> bool {
        matches!(self, ValidationOutcome::Conforms)
    }

    /// The violations if this is a schema failure
    pub fn violations(&self) -> &[Violation] {
        match self {
            ValidationOutcome::SchemaViolation(violations) => violations,
            _ => &[],
        }
    }
}

/// Seam between the pipeline and the structural schema engine
pub trait RecordValidator: Send + Sync {
    fn validate(&self, record: &Map<String, Value>) -> ValidationOutcome;
}

/// Production validator for the FHIR R4 Observation structural subset
#[derive(Debug, Default, Clone, Copy)]
pub struct ObservationValidator;

impl RecordValidator for ObservationValidator {
    fn validate(&self, record: &Map<String, Value>) -> ValidationOutcome {
        let mut violations = Vec::new();

        check_status(record, &mut violations);
        check_code(record, &mut violations);

        if let Some(id) = record.get("id") {
            check_string("id", id, &mut violations);
        }
        if let Some(category) = record.get("category") {
            check_category(category, &mut violations);
        }
        for field in ["subject", "encounter"] {
            if let Some(value) = record.get(field) {
                check_reference(field, value, &mut violations);
            }
        }
        for field in ["effectiveDateTime", "issued"] {
            if let Some(value) = record.get(field) {
                check_string(field, value, &mut violations);
            }
        }
        check_value_choice(record, &mut violations);

        for key in record.keys() {
            if !KNOWN_FIELDS.contains(&key.as_str()) {
                violations.push(Violation::new(key, "unexpected field", "present"));
            }
        }

        if violations.is_empty() {
            ValidationOutcome::Conforms
        } else {
            ValidationOutcome::SchemaViolation(violations)
        }
    }
}

fn check_status(record: &Map<String, Value>, out: &mut Vec<Violation>) {
    match record.get("status") {
        None => out.push(Violation::new("status", "required field", "absent")),
        Some(Value::String(code)) => {
            if !STATUS_CODES.contains(&code.as_str()) {
                out.push(Violation::new(
                    "status",
                    format!("one of {}", STATUS_CODES.join("|")),
                    code.clone(),
                ));
            }
        }
        Some(other) => out.push(Violation::new("status", "string", json_type(other))),
    }
}

fn check_code(record: &Map<String, Value>, out: &mut Vec<Violation>) {
    match record.get("code") {
        None => out.push(Violation::new("code", "required field", "absent")),
        Some(value) => check_codeable_concept("code", value, out),
    }
}

fn check_category(value: &Value, out: &mut Vec<Violation>) {
    match value {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                check_codeable_concept(&format!("category[{i}]"), item, out);
            }
        }
        other => out.push(Violation::new("category", "array", json_type(other))),
    }
}

fn check_codeable_concept(path: &str, value: &Value, out: &mut Vec<Violation>) {
    let Some(concept) = value.as_object() else {
        out.push(Violation::new(path, "object", json_type(value)));
        return;
    };

    if let Some(coding) = concept.get("coding") {
        match coding {
            Value::Array(entries) => {
                for (i, entry) in entries.iter().enumerate() {
                    let entry_path = format!("{path}.coding[{i}]");
                    let Some(entry) = entry.as_object() else {
                        out.push(Violation::new(entry_path, "object", json_type(entry)));
                        continue;
                    };
                    for field in ["system", "code", "display"] {
                        if let Some(v) = entry.get(field) {
                            check_string(&format!("{entry_path}.{field}"), v, out);
                        }
                    }
                }
            }
            other => out.push(Violation::new(
                format!("{path}.coding"),
                "array",
                json_type(other),
            )),
        }
    }
    if let Some(text) = concept.get("text") {
        check_string(&format!("{path}.text"), text, out);
    }
}

fn check_reference(path: &str, value: &Value, out: &mut Vec<Violation>) {
    let Some(reference) = value.as_object() else {
        out.push(Violation::new(path, "object", json_type(value)));
        return;
    };
    for field in ["reference", "display"] {
        if let Some(v) = reference.get(field) {
            check_string(&format!("{path}.{field}"), v, out);
        }
    }
}

fn check_value_choice(record: &Map<String, Value>, out: &mut Vec<Violation>) {
    let present: Vec<&str> = VALUE_FIELDS
        .iter()
        .copied()
        .filter(|f| record.contains_key(*f))
        .collect();
    if present.len() > 1 {
        out.push(Violation::new(
            "value[x]",
            "at most one value[x] field",
            present.join(", "),
        ));
    }

    if let Some(quantity) = record.get("valueQuantity") {
        check_quantity(quantity, out);
    }
    if let Some(v) = record.get("valueString") {
        check_string("valueString", v, out);
    }
    if let Some(v) = record.get("valueBoolean") {
        if !v.is_boolean() {
            out.push(Violation::new("valueBoolean", "boolean", json_type(v)));
        }
    }
    if let Some(v) = record.get("valueInteger") {
        if !v.is_i64() && !v.is_u64() {
            out.push(Violation::new("valueInteger", "integer", json_type(v)));
        }
    }
}

fn check_quantity(value: &Value, out: &mut Vec<Violation>) {
    let Some(quantity) = value.as_object() else {
        out.push(Violation::new("valueQuantity", "object", json_type(value)));
        return;
    };
    if let Some(v) = quantity.get("value") {
        if !v.is_number() {
            out.push(Violation::new(
                "valueQuantity.value",
                "number",
                json_type(v),
            ));
        }
    }
    for field in ["unit", "system", "code"] {
        if let Some(v) = quantity.get(field) {
            check_string(&format!("valueQuantity.{field}"), v, out);
        }
    }
}

fn check_string(path: &str, value: &Value, out: &mut Vec<Violation>) {
    if !value.is_string() {
        out.push(Violation::new(path, "string", json_type(value)));
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
