// crates/scenario-store/src/index.rs
// ============================================================================
// Module: Scenario Index
// Description: A cached, searchable summary of every stored scenario.
// Purpose: Answer `list`/`search`/`stats` without reading every scenario
//          document off disk (`spec.md` §4.5).
// Dependencies: scenario-core, serde_json, crate::config, crate::error
// ============================================================================

//! ## Overview
//! The index is a denormalized aggregate, rebuilt from the scenario
//! directory if it goes missing or fails to parse — it is a cache, never
//! the source of truth. [`Index::rebuild`] exists for exactly that recovery
//! path.

use std::collections::BTreeMap;

use scenario_core::Scenario;
use scenario_core::ScenarioName;
use scenario_core::Tag;
use scenario_core::Timestamp;
use serde::Deserialize;
use serde::Serialize;

use crate::config::StoreConfig;
use crate::error::StoreError;

/// A cached summary of one stored scenario, enough to answer `list` and
/// `search` without a full document read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    /// The scenario's name.
    pub name: ScenarioName,
    /// The scenario's version counter.
    pub version: u64,
    /// The scenario's description, if any.
    pub description: Option<String>,
    /// The scenario's tags.
    pub tags: Vec<Tag>,
    /// When the scenario was last saved.
    pub updated_at: Timestamp,
    /// Number of actions in the chain.
    pub action_count: usize,
    /// Names of scenarios this one depends on.
    pub dependencies: Vec<ScenarioName>,
}

impl ScenarioSummary {
    /// Builds a summary from a full [`Scenario`].
    #[must_use]
    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self {
            name: scenario.name.clone(),
            version: scenario.version,
            description: scenario.metadata.description.clone(),
            tags: scenario.metadata.tags.clone(),
            updated_at: scenario.updated_at,
            action_count: scenario.chain.len(),
            dependencies: scenario
                .metadata
                .dependencies
                .iter()
                .map(|d| d.scenario.clone())
                .collect(),
        }
    }

    fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        if self.name.as_str().to_lowercase().contains(&query) {
            return true;
        }
        if self
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&query))
        {
            return true;
        }
        self.tags.iter().any(|t| t.as_str().to_lowercase().contains(&query))
    }
}

/// Aggregate counts over every stored scenario (`spec.md` §4.5 `stats`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreStats {
    /// Number of stored scenarios.
    pub total_scenarios: usize,
    /// Sum of every scenario's action count.
    pub total_actions: usize,
    /// Count of stored scenarios per tag.
    pub by_tag: BTreeMap<String, usize>,
}

/// The in-memory index, persisted as one JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Index {
    entries: BTreeMap<ScenarioName, ScenarioSummary>,
}

impl Index {
    /// An empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Loads the index file, or builds an empty one if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the file exists but is not valid
    /// JSON, or [`StoreError::Io`] on other filesystem failure.
    pub fn load(config: &StoreConfig) -> Result<Self, StoreError> {
        let path = config.index_file();
        if !path.exists() {
            return Ok(Self::new());
        }
        let text = std::fs::read_to_string(&path)?;
        serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
            name: "index".to_string(),
            source,
        })
    }

    /// Persists the index to its file, atomically.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on filesystem failure.
    pub fn save(&self, config: &StoreConfig) -> Result<(), StoreError> {
        std::fs::create_dir_all(&config.base_dir)?;
        let json = serde_json::to_string_pretty(self).unwrap_or_default();
        let path = config.index_file();
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Rebuilds the index from every scenario document on disk, discarding
    /// whatever was previously cached. Used to recover from a missing or
    /// corrupt index file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the scenarios directory cannot be read.
    /// Individual documents that fail to parse are skipped and logged
    /// rather than aborting the rebuild.
    pub fn rebuild(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut index = Self::new();
        let dir = config.scenarios_dir();
        if !dir.exists() {
            return Ok(index);
        }
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "skipping unreadable scenario file during rebuild");
                    continue;
                }
            };
            match serde_json::from_str::<Scenario>(&text) {
                Ok(scenario) => index.upsert(ScenarioSummary::from_scenario(&scenario)),
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "skipping unparseable scenario file during rebuild");
                }
            }
        }
        Ok(index)
    }

    /// Inserts or replaces the summary for its scenario name.
    pub fn upsert(&mut self, summary: ScenarioSummary) {
        self.entries.insert(summary.name.clone(), summary);
    }

    /// Removes the entry for `name`, if any.
    pub fn remove(&mut self, name: &ScenarioName) {
        self.entries.remove(name);
    }

    /// Looks up the summary for `name`.
    #[must_use]
    pub fn get(&self, name: &ScenarioName) -> Option<&ScenarioSummary> {
        self.entries.get(name)
    }

    /// Returns every summary, sorted by name.
    #[must_use]
    pub fn list(&self) -> Vec<&ScenarioSummary> {
        self.entries.values().collect()
    }

    /// Returns summaries whose name, description, or tags contain `query`,
    /// case-insensitively.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&ScenarioSummary> {
        self.entries.values().filter(|s| s.matches_query(query)).collect()
    }

    /// Computes aggregate statistics over the indexed scenarios.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        let mut by_tag = BTreeMap::new();
        let mut total_actions = 0;
        for summary in self.entries.values() {
            total_actions += summary.action_count;
            for tag in &summary.tags {
                *by_tag.entry(tag.as_str().to_string()).or_insert(0) += 1;
            }
        }
        StoreStats {
            total_scenarios: self.entries.len(),
            total_actions,
            by_tag,
        }
    }
}
