// crates/scenario-store/src/fs_store.rs
// ============================================================================
// Module: Scenario Store
// Description: One-file-per-scenario persistence with a cached index.
// Purpose: Implement `spec.md` §4.5's save/load/delete/rename/list/search/
//          stats/validate/export/import operations.
// Dependencies: scenario-core, scenario-contract, crate::config,
//               crate::index, crate::secrets_store, crate::error
// ============================================================================

//! ## Overview
//! One plain JSON file per scenario plus a cached index, rather than a
//! single durable database file: corrupt or missing files are surfaced as
//! errors, never silently skipped, and writes are atomic (write-temp, then
//! rename) the same way [`crate::index::Index::save`] and
//! [`crate::secrets_store::SecretsStore::save`] are.

use std::collections::BTreeSet;

use scenario_contract::ScenarioDocument;
use scenario_contract::codec;
use scenario_core::Scenario;
use scenario_core::ScenarioName;
use scenario_core::SecretsRecord;

use crate::config::StoreConfig;
use crate::config::ensure_layout;
use crate::error::StoreError;
use crate::index::Index;
use crate::index::ScenarioSummary;
use crate::index::StoreStats;
use crate::secrets_store::SecretsStore;

/// The scenario store: scenario documents, their cached index, and their
/// separately-kept secrets.
#[derive(Debug)]
pub struct ScenarioStore {
    config: StoreConfig,
    index: Index,
    secrets: SecretsStore,
}

impl ScenarioStore {
    /// Opens a store rooted at `config`, creating its directory layout and
    /// loading (or rebuilding) its index.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on filesystem failure.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        ensure_layout(&config)?;
        let index = match Index::load(&config) {
            Ok(index) => index,
            Err(StoreError::Corrupt { .. }) => {
                tracing::warn!("index file corrupt, rebuilding from scenario files");
                Index::rebuild(&config)?
            }
            Err(other) => return Err(other),
        };
        Ok(Self {
            secrets: SecretsStore::new(config.clone()),
            config,
            index,
        })
    }

    /// Saves `scenario`, overwriting any prior version under the same name.
    /// Bumps `version` relative to the previously stored copy, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invariant`] if `chain` is empty or the
    /// scenario's own invariants (no literal secrets in `chain`) fail, or
    /// [`StoreError::Io`] on filesystem failure.
    pub fn save(&mut self, mut scenario: Scenario) -> Result<(), StoreError> {
        if scenario.chain.is_empty() {
            return Err(StoreError::Invariant(scenario_core::CoreError::EmptyChain {
                name: scenario.name.to_string(),
            }));
        }
        scenario.validate_no_literal_secrets()?;
        let path = self.config.scenario_file(scenario.name.as_str());
        if let Some(existing) = self.index.get(&scenario.name) {
            scenario.version = existing.version + 1;
            if let Ok(previous) = self.load(&scenario.name) {
                scenario.created_at = previous.created_at;
            }
        }
        let document = ScenarioDocument::from_scenario(scenario.clone());
        let json = serde_json::to_string_pretty(&document).unwrap_or_default();
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &path)?;
        self.index.upsert(ScenarioSummary::from_scenario(&scenario));
        self.index.save(&self.config)?;
        tracing::debug!(scenario = %scenario.name, version = scenario.version, "scenario saved");
        Ok(())
    }

    /// Loads the scenario stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such scenario is stored, or
    /// [`StoreError::Corrupt`]/[`StoreError::Io`] on read failure.
    pub fn load(&self, name: &ScenarioName) -> Result<Scenario, StoreError> {
        let path = self.config.scenario_file(name.as_str());
        if !path.exists() {
            return Err(StoreError::NotFound(name.as_str().to_string()));
        }
        let text = std::fs::read_to_string(&path)?;
        let document: ScenarioDocument = serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
            name: name.as_str().to_string(),
            source,
        })?;
        Ok(document.into_scenario())
    }

    /// Deletes the scenario and its secrets stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such scenario is stored.
    pub fn delete(&mut self, name: &ScenarioName) -> Result<(), StoreError> {
        let path = self.config.scenario_file(name.as_str());
        if !path.exists() {
            return Err(StoreError::NotFound(name.as_str().to_string()));
        }
        std::fs::remove_file(&path)?;
        self.secrets.delete(name)?;
        self.index.remove(name);
        self.index.save(&self.config)?;
        tracing::debug!(scenario = %name, "scenario deleted");
        Ok(())
    }

    /// Renames a stored scenario, moving its document and secrets file and
    /// updating the embedded `name` field.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if `from` does not exist, or
    /// [`StoreError::AlreadyExists`] if `to` is already taken.
    pub fn rename(&mut self, from: &ScenarioName, to: ScenarioName) -> Result<(), StoreError> {
        if self.index.get(&to).is_some() {
            return Err(StoreError::AlreadyExists(to.as_str().to_string()));
        }
        let mut scenario = self.load(from)?;
        let secrets = self.secrets.load(from)?;
        scenario.name = to.clone();
        let old_path = self.config.scenario_file(from.as_str());
        self.save(scenario)?;
        std::fs::remove_file(&old_path)?;
        self.index.remove(from);
        if !secrets.is_empty() {
            self.secrets.save(&to, &secrets)?;
        }
        self.secrets.delete(from)?;
        self.index.save(&self.config)?;
        Ok(())
    }

    /// Lists every stored scenario's summary, sorted by name.
    #[must_use]
    pub fn list(&self) -> Vec<&ScenarioSummary> {
        self.index.list()
    }

    /// Loads the secrets record stored alongside `name`, or an empty one if
    /// none was ever recorded. Used only by reads that explicitly opt into
    /// `include_secrets`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the stored secrets file is not
    /// valid JSON, or [`StoreError::Io`] on other filesystem failure.
    pub fn secrets(&self, name: &ScenarioName) -> Result<SecretsRecord, StoreError> {
        self.secrets.load(name)
    }

    /// Searches stored scenarios by name, description, or tag substring.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&ScenarioSummary> {
        self.index.search(query)
    }

    /// Computes aggregate statistics over every stored scenario.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        self.index.stats()
    }

    /// Validates a stored scenario's placeholder and dependency invariants
    /// against the rest of the store (`spec.md` §3 invariant 2, §4.6).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`], [`StoreError::UnknownDependency`],
    /// or [`StoreError::Invariant`] as appropriate.
    pub fn validate(&self, name: &ScenarioName) -> Result<(), StoreError> {
        let scenario = self.load(name)?;
        scenario.validate_no_literal_secrets()?;
        let mut available_outputs = BTreeSet::new();
        for edge in &scenario.metadata.dependencies {
            let Some(target) = self.index.get(&edge.scenario) else {
                if edge.optional {
                    continue;
                }
                return Err(StoreError::UnknownDependency {
                    scenario: name.as_str().to_string(),
                    target: edge.scenario.as_str().to_string(),
                });
            };
            for mapping in &edge.parameters {
                available_outputs.insert(mapping.parameter.as_str().to_string());
            }
            let _ = target;
        }
        scenario.validate_placeholders(&available_outputs)?;
        Ok(())
    }

    /// Exports a stored scenario to the portable text form, optionally
    /// including its secrets.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if `name` is not stored.
    pub fn export(&self, name: &ScenarioName, include_secrets: bool) -> Result<String, StoreError> {
        let scenario = self.load(name)?;
        let document = ScenarioDocument::from_scenario(scenario);
        let secrets = if include_secrets {
            let record = self.secrets.load(name)?;
            if record.is_empty() { None } else { Some(record) }
        } else {
            None
        };
        Ok(codec::export_to_text(&document, secrets.as_ref()))
    }

    /// Imports a scenario (and optional secrets) from the portable text
    /// form, saving it under its embedded name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Codec`] if `text` is malformed, or
    /// [`StoreError::Invariant`]/[`StoreError::Io`] from the underlying save.
    pub fn import(&mut self, text: &str) -> Result<ScenarioName, StoreError> {
        let (document, secrets) = codec::import_from_text(text)?;
        let scenario = document.into_scenario();
        let name = scenario.name.clone();
        self.save(scenario)?;
        if let Some(secrets) = secrets.filter(|s: &SecretsRecord| !s.is_empty()) {
            self.secrets.save(&name, &secrets)?;
        }
        Ok(name)
    }
}
