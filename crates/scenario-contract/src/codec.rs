// crates/scenario-contract/src/codec.rs
// ============================================================================
// Module: Export/Import Codec
// Description: The portable textual form used by `export-scenario` and
//              `import-scenario`.
// Purpose: Serialize a scenario (and optionally its secrets) to one
//          self-describing text blob, and parse it back.
// Dependencies: scenario-core, serde_json, thiserror, crate::document,
//               crate::schema
// ============================================================================

//! ## Overview
//! The portable form is a single JSON object with a `scenario` field (the
//! [`ScenarioDocument`]) and an optional `secrets` field (`spec.md` §4.5
//! `export`/`import`, `include_secrets` flag). It is textual rather than a
//! bespoke binary format so it can be diffed and reviewed like the rest of a
//! version-controlled repository.

use scenario_core::SecretsRecord;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::document::ScenarioDocument;
use crate::schema::SchemaError;
use crate::schema::validate_document;

/// Errors raised while exporting or importing a portable scenario document.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The text was not valid JSON.
    #[error("malformed export text: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The embedded scenario document failed schema validation.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// The portable text envelope produced by `export-scenario`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Envelope {
    /// The exported scenario document.
    scenario: ScenarioDocument,
    /// The exported secrets, present only when requested and non-empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    secrets: Option<SecretsRecord>,
}

/// Serializes `document` (and optionally `secrets`) to the portable text form.
#[must_use]
pub fn export_to_text(document: &ScenarioDocument, secrets: Option<&SecretsRecord>) -> String {
    let envelope = Envelope {
        scenario: document.clone(),
        secrets: secrets.cloned(),
    };
    // Pretty-printed so exported scenarios are reviewable in source control.
    serde_json::to_string_pretty(&envelope).unwrap_or_default()
}

/// Parses the portable text form back into a document and optional secrets.
///
/// # Errors
///
/// Returns [`CodecError::Malformed`] when `text` is not valid JSON, or
/// [`CodecError::Schema`] when the embedded scenario document fails schema
/// validation.
pub fn import_from_text(text: &str) -> Result<(ScenarioDocument, Option<SecretsRecord>), CodecError> {
    let raw: serde_json::Value = serde_json::from_str(text)?;
    let scenario_value = raw.get("scenario").cloned().unwrap_or(raw.clone());
    validate_document(&scenario_value)?;
    let envelope: Envelope = if raw.get("scenario").is_some() {
        serde_json::from_value(raw)?
    } else {
        Envelope {
            scenario: serde_json::from_value(scenario_value)?,
            secrets: None,
        }
    };
    Ok((envelope.scenario, envelope.secrets))
}

#[cfg(test)]
mod tests {
    use super::export_to_text;
    use super::import_from_text;
    use scenario_core::Metadata;
    use scenario_core::ParameterName;
    use scenario_core::Scenario;
    use scenario_core::ScenarioName;
    use scenario_core::SecretsRecord;
    use scenario_core::Timestamp;

    use crate::document::ScenarioDocument;

    fn sample() -> ScenarioDocument {
        let ts = Timestamp::parse("2026-07-27T00:00:00Z").unwrap();
        ScenarioDocument::from_scenario(Scenario {
            name: ScenarioName::new("login_flow").unwrap(),
            version: 1,
            created_at: ts,
            updated_at: ts,
            metadata: Metadata::default(),
            chain: Vec::new(),
        })
    }

    #[test]
    fn export_then_import_round_trips_with_secrets() {
        let mut secrets = SecretsRecord::new();
        secrets.insert(ParameterName::new("password").unwrap(), "hunter2");
        let text = export_to_text(&sample(), Some(&secrets));
        let (doc, back_secrets) = import_from_text(&text).unwrap();
        assert_eq!(doc, sample());
        assert_eq!(back_secrets, Some(secrets));
    }

    #[test]
    fn export_without_secrets_imports_with_none() {
        let text = export_to_text(&sample(), None);
        let (_doc, secrets) = import_from_text(&text).unwrap();
        assert!(secrets.is_none());
    }

    #[test]
    fn import_rejects_malformed_json() {
        assert!(import_from_text("{not json").is_err());
    }
}
