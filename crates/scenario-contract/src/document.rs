// crates/scenario-contract/src/document.rs
// ============================================================================
// Module: Scenario Document
// Description: The bit-exact wire form of a scenario, with unknown-field
//              preservation.
// Purpose: Let storage round-trip documents written by newer or foreign
//          tooling without dropping fields it does not understand.
// Dependencies: scenario-core, serde, serde_json
// ============================================================================

//! ## Overview
//! `spec.md` §6: "Unknown fields are preserved on load and round-tripped on
//! save." [`ScenarioDocument`] captures every top-level field it does not
//! itself model into `extra`, via `#[serde(flatten)]`, and re-emits them
//! unchanged on serialization.

use std::collections::BTreeMap;

use scenario_core::Scenario;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// The wire-level scenario document (`spec.md` §6).
///
/// # Invariants
/// - `extra` never contains a key also used by [`Scenario`]'s own fields;
///   [`ScenarioDocument::from_scenario`] and [`ScenarioDocument::into_scenario`]
///   keep the two disjoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDocument {
    /// The modeled scenario fields.
    #[serde(flatten)]
    pub scenario: Scenario,
    /// Fields present in the document that this crate's version does not
    /// model, preserved verbatim for round-tripping.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ScenarioDocument {
    /// Wraps a [`Scenario`] with no extra fields.
    #[must_use]
    pub fn from_scenario(scenario: Scenario) -> Self {
        Self {
            scenario,
            extra: BTreeMap::new(),
        }
    }

    /// Discards extra fields and returns the modeled [`Scenario`].
    #[must_use]
    pub fn into_scenario(self) -> Scenario {
        self.scenario
    }
}

#[cfg(test)]
mod tests {
    use super::ScenarioDocument;
    use scenario_core::Metadata;
    use scenario_core::Scenario;
    use scenario_core::ScenarioName;
    use scenario_core::Timestamp;

    fn sample() -> Scenario {
        let ts = Timestamp::parse("2026-07-27T00:00:00Z").unwrap();
        Scenario {
            name: ScenarioName::new("login_flow").unwrap(),
            version: 1,
            created_at: ts,
            updated_at: ts,
            metadata: Metadata::default(),
            chain: Vec::new(),
        }
    }

    #[test]
    fn unknown_top_level_fields_round_trip_unchanged() {
        let mut json = serde_json::to_value(ScenarioDocument::from_scenario(sample())).unwrap();
        json.as_object_mut()
            .unwrap()
            .insert("future_field".to_string(), serde_json::json!(["a", "b"]));
        let doc: ScenarioDocument = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(
            doc.extra.get("future_field"),
            Some(&serde_json::json!(["a", "b"]))
        );
        let back = serde_json::to_value(doc).unwrap();
        assert_eq!(back, json);
    }
}
