// crates/scenario-core/src/secrets.rs
// ============================================================================
// Module: Secrets Record
// Description: The literal-value counterpart to a scenario's secret params.
// Purpose: Keep secret values out of the `Scenario` type entirely.
// Dependencies: serde, crate::ids
// ============================================================================

//! ## Overview
//! A [`SecretsRecord`] lives in storage separate from its scenario
//! (`spec.md` §3). It is a plain key-value mapping with no additional
//! metadata (`spec.md` §6 "Secrets document format").

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::ids::ParameterName;

/// For a given scenario, a mapping from parameter name to literal secret value.
///
/// # Invariants
/// - Never embedded in a [`crate::scenario::Scenario`]; always stored and
///   loaded separately (`spec.md` §3 invariant 4).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretsRecord(BTreeMap<ParameterName, String>);

impl SecretsRecord {
    /// Creates an empty secrets record.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns true when no secrets are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of recorded secrets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Inserts or overwrites a secret value for `name`.
    pub fn insert(&mut self, name: ParameterName, value: impl Into<String>) {
        self.0.insert(name, value.into());
    }

    /// Looks up the literal value for `name`.
    #[must_use]
    pub fn get(&self, name: &ParameterName) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Iterates over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&ParameterName, &str)> {
        self.0.iter().map(|(k, v)| (k, v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::SecretsRecord;
    use crate::ids::ParameterName;

    #[test]
    fn insert_and_get_round_trip() {
        let mut secrets = SecretsRecord::new();
        secrets.insert(ParameterName::new("password").unwrap(), "hunter2");
        assert_eq!(secrets.get(&ParameterName::new("password").unwrap()), Some("hunter2"));
        assert_eq!(secrets.len(), 1);
    }

    #[test]
    fn serializes_as_plain_map_with_no_metadata() {
        let mut secrets = SecretsRecord::new();
        secrets.insert(ParameterName::new("email").unwrap(), "user@example.com");
        let json = serde_json::to_value(&secrets).unwrap();
        assert_eq!(json, serde_json::json!({"email": "user@example.com"}));
    }
}
