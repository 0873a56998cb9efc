// crates/scenario-store/src/secrets_store.rs
// ============================================================================
// Module: Secrets Store
// Description: Per-scenario secret value persistence, kept out of the
//              scenario document's own storage path.
// Purpose: Enforce `spec.md` §3 invariant 4 — secrets are never embedded in
//          or loaded alongside a scenario by default.
// Dependencies: scenario-core, serde_json, crate::config, crate::error
// ============================================================================

//! ## Overview
//! Secrets live under a separate directory ([`StoreConfig::secrets_dir`])
//! with its own version-control excluder. Loading a scenario never reads
//! this directory; only an explicit [`SecretsStore::load`] or an
//! `include_secrets` export does.

use scenario_core::ParameterName;
use scenario_core::ScenarioName;
use scenario_core::SecretsRecord;

use crate::config::StoreConfig;
use crate::error::StoreError;

/// Reads and writes per-scenario secret values.
#[derive(Debug, Clone)]
pub struct SecretsStore {
    config: StoreConfig,
}

impl SecretsStore {
    /// Builds a secrets store rooted at `config`.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Saves `secrets` for `name`, overwriting any existing file. Writing an
    /// empty record removes the file instead of persisting an empty object.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on filesystem failure.
    pub fn save(&self, name: &ScenarioName, secrets: &SecretsRecord) -> Result<(), StoreError> {
        let path = self.config.secrets_file(name.as_str());
        if secrets.is_empty() {
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
            return Ok(());
        }
        std::fs::create_dir_all(self.config.secrets_dir())?;
        let json = serde_json::to_string_pretty(secrets).unwrap_or_default();
        let tmp = path.with_extension("secrets.json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &path)?;
        tracing::debug!(scenario = %name, count = secrets.len(), "secrets saved");
        Ok(())
    }

    /// Loads the secrets record for `name`, or an empty one if none is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the stored file is not valid JSON,
    /// or [`StoreError::Io`] on other filesystem failure.
    pub fn load(&self, name: &ScenarioName) -> Result<SecretsRecord, StoreError> {
        let path = self.config.secrets_file(name.as_str());
        if !path.exists() {
            return Ok(SecretsRecord::new());
        }
        let text = std::fs::read_to_string(&path)?;
        serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
            name: name.as_str().to_string(),
            source,
        })
    }

    /// Removes the secrets file for `name`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on filesystem failure.
    pub fn delete(&self, name: &ScenarioName) -> Result<(), StoreError> {
        let path = self.config.secrets_file(name.as_str());
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Sets a single secret value for `name`, creating the record if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on filesystem failure.
    pub fn set_one(
        &self,
        name: &ScenarioName,
        parameter: ParameterName,
        value: impl Into<String>,
    ) -> Result<(), StoreError> {
        let mut secrets = self.load(name)?;
        secrets.insert(parameter, value);
        self.save(name, &secrets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> (tempfile::TempDir, StoreConfig) {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::new(dir.path());
        (dir, config)
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, config) = config();
        let store = SecretsStore::new(config);
        let name = ScenarioName::new("login_flow").unwrap();
        let mut secrets = SecretsRecord::new();
        secrets.insert(ParameterName::new("password").unwrap(), "hunter2");
        store.save(&name, &secrets).unwrap();
        let back = store.load(&name).unwrap();
        assert_eq!(back, secrets);
    }

    #[test]
    fn load_with_nothing_stored_returns_empty() {
        let (_dir, config) = config();
        let store = SecretsStore::new(config);
        let name = ScenarioName::new("never_recorded").unwrap();
        assert!(store.load(&name).unwrap().is_empty());
    }

    #[test]
    fn saving_empty_record_removes_any_existing_file() {
        let (_dir, config) = config();
        let store = SecretsStore::new(config);
        let name = ScenarioName::new("login_flow").unwrap();
        let mut secrets = SecretsRecord::new();
        secrets.insert(ParameterName::new("password").unwrap(), "hunter2");
        store.save(&name, &secrets).unwrap();
        store.save(&name, &SecretsRecord::new()).unwrap();
        assert!(store.load(&name).unwrap().is_empty());
    }

    #[test]
    fn set_one_merges_into_existing_record() {
        let (_dir, config) = config();
        let store = SecretsStore::new(config);
        let name = ScenarioName::new("login_flow").unwrap();
        store
            .set_one(&name, ParameterName::new("password").unwrap(), "hunter2")
            .unwrap();
        store
            .set_one(&name, ParameterName::new("otp").unwrap(), "123456")
            .unwrap();
        let back = store.load(&name).unwrap();
        assert_eq!(back.len(), 2);
    }
}
