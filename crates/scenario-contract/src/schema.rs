// crates/scenario-contract/src/schema.rs
// ============================================================================
// Module: Scenario Document Schema
// Description: JSON Schema for the wire-level scenario document.
// Purpose: Give `import-scenario` a structural check before attempting to
//          deserialize into `ScenarioDocument` (`spec.md` §4.5 `import`).
// Dependencies: jsonschema, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This schema is deliberately permissive about `metadata`/`chain` internals
//! (those are enforced by strongly-typed deserialization, which rejects
//! malformed action variants on its own) and strict about the handful of
//! top-level fields every document must carry.

use std::sync::OnceLock;

use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while validating a document against the scenario schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The document failed one or more schema checks.
    #[error("document failed schema validation: {0}")]
    Invalid(String),
}

const SCHEMA_SOURCE: &str = r#"{
    "$schema": "https://json-schema.org/draft/2020-12/schema",
    "type": "object",
    "required": ["name", "version", "created_at", "updated_at", "metadata", "chain"],
    "properties": {
        "name": { "type": "string", "minLength": 1 },
        "version": { "type": "integer", "minimum": 1 },
        "created_at": { "type": "string" },
        "updated_at": { "type": "string" },
        "metadata": { "type": "object" },
        "chain": { "type": "array" }
    }
}"#;

fn compiled_schema() -> &'static Validator {
    static SCHEMA: OnceLock<Validator> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        let schema: Value =
            serde_json::from_str(SCHEMA_SOURCE).expect("schema literal is valid JSON");
        jsonschema::validator_for(&schema).expect("schema literal is a valid JSON Schema")
    })
}

/// Validates a raw document value against the scenario document schema.
///
/// # Errors
///
/// Returns [`SchemaError::Invalid`] with every validation error message
/// joined by `"; "` when `document` does not conform.
pub fn validate_document(document: &Value) -> Result<(), SchemaError> {
    let schema = compiled_schema();
    let errors: Vec<String> = schema
        .iter_errors(document)
        .map(|e| e.to_string())
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::Invalid(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::validate_document;

    #[test]
    fn rejects_missing_required_field() {
        let doc = serde_json::json!({
            "name": "login_flow",
            "version": 1,
            "created_at": "2026-07-27T00:00:00Z",
            "metadata": {},
            "chain": []
        });
        // missing `updated_at`
        assert!(validate_document(&doc).is_err());
    }

    #[test]
    fn accepts_minimal_valid_document() {
        let doc = serde_json::json!({
            "name": "login_flow",
            "version": 1,
            "created_at": "2026-07-27T00:00:00Z",
            "updated_at": "2026-07-27T00:00:00Z",
            "metadata": {},
            "chain": []
        });
        assert!(validate_document(&doc).is_ok());
    }
}
