// crates/scenario-mcp/src/router.rs
// ============================================================================
// Module: Tool Router
// Description: A thin wrapper dispatching the exposed tool surface's named
//              operations onto `scenario-store` and `scenario-exec`.
// Purpose: `spec.md` §6 exposed tool surface.
// Dependencies: scenario-core, scenario-contract, scenario-exec,
//               scenario-store, tokio, tracing
// ============================================================================

//! ## Overview
//! [`ToolRouter`] is session wiring, not a transport: it owns a store and
//! the host-implemented execution boundaries ([`PageDriver`], [`SmartFinder`])
//! and exposes one async method per named operation in `spec.md` §6's table.
//! It does not speak any wire protocol itself — a caller hands it already-
//! decoded argument structs and gets back already-typed result structs; the
//! router sits in front of storage and execution without owning the
//! transport that reaches it.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use scenario_core::ScenarioName;
use scenario_core::SecretsRecord;
use scenario_exec::Executor;
use scenario_exec::ExecutorConfig;
use scenario_exec::ExecutorError;
use scenario_exec::PageDriver;
use scenario_exec::SmartFinder;
use scenario_store::ScenarioStore;
use tokio::sync::Mutex;

use crate::error::ToolError;
use crate::types::DeleteScenarioArgs;
use crate::types::DeleteScenarioResult;
use crate::types::EnableRecorderResult;
use crate::types::ExecuteScenarioArgs;
use crate::types::ExecuteScenarioResult;
use crate::types::ExportScenarioArgs;
use crate::types::ExportScenarioResult;
use crate::types::GetScenarioInfoArgs;
use crate::types::GetScenarioInfoResult;
use crate::types::ImportScenarioArgs;
use crate::types::ImportScenarioResult;
use crate::types::ListScenariosResult;
use crate::types::ScenarioRunSummary;
use crate::types::SearchScenariosArgs;
use crate::types::SearchScenariosResult;

/// Dispatches the exposed tool surface onto a store and a pair of
/// host-implemented execution boundaries.
///
/// # Invariants
/// - Every store mutation goes through the single internal lock, so
///   concurrent tool calls never race on the index or a scenario file.
pub struct ToolRouter<'a> {
    store: Mutex<ScenarioStore>,
    driver: &'a dyn PageDriver,
    finder: &'a dyn SmartFinder,
    exec_config: ExecutorConfig,
    recorder_enabled: AtomicBool,
}

impl<'a> ToolRouter<'a> {
    /// Builds a router over an opened store and the host's execution
    /// boundaries.
    #[must_use]
    pub fn new(
        store: ScenarioStore,
        driver: &'a dyn PageDriver,
        finder: &'a dyn SmartFinder,
        exec_config: ExecutorConfig,
    ) -> Self {
        Self {
            store: Mutex::new(store),
            driver,
            finder,
            exec_config,
            recorder_enabled: AtomicBool::new(false),
        }
    }

    /// `enable-recorder`: arms the host's in-page recording bridge. Never fails.
    pub fn enable_recorder(&self) -> EnableRecorderResult {
        let was_enabled = self.recorder_enabled.swap(true, Ordering::SeqCst);
        let message = if was_enabled {
            "recorder already enabled".to_string()
        } else {
            "recorder enabled".to_string()
        };
        tracing::debug!(was_enabled, "enable-recorder called");
        EnableRecorderResult {
            success: true,
            message,
        }
    }

    /// `execute-scenario`: resolves and runs a scenario's dependency chain.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Id`] for a malformed `name`, or
    /// [`ToolError::Executor`] for resolution, guard, or playback failures.
    pub async fn execute_scenario(
        &self,
        args: ExecuteScenarioArgs,
    ) -> Result<ExecuteScenarioResult, ToolError> {
        let root = ScenarioName::new(args.name)?;
        let store = self.store.lock().await;
        let executor = Executor::new(self.driver, self.finder, self.exec_config);
        match executor
            .execute(&store, &root, args.parameters, args.execute_dependencies)
            .await
        {
            Ok(report) => Ok(ExecuteScenarioResult {
                results: report.results.iter().map(summarize_run).collect(),
                final_variables: report.final_variables,
            }),
            Err(ExecutorError::Playback {
                diagnostic,
                results_so_far,
                ..
            }) => Err(ToolError::Playback {
                ran: results_so_far.iter().map(summarize_run).collect(),
                diagnostic,
            }),
            Err(other) => Err(ToolError::Executor(other)),
        }
    }

    /// `list-scenarios`: every stored scenario's index summary.
    pub async fn list_scenarios(&self) -> ListScenariosResult {
        let store = self.store.lock().await;
        ListScenariosResult {
            scenarios: store.list().into_iter().cloned().collect(),
        }
    }

    /// `search-scenarios`: filters stored summaries by text and/or tags.
    pub async fn search_scenarios(&self, args: SearchScenariosArgs) -> SearchScenariosResult {
        let store = self.store.lock().await;
        let mut scenarios: Vec<_> = match &args.text {
            Some(text) => store.search(text).into_iter().cloned().collect(),
            None => store.list().into_iter().cloned().collect(),
        };
        if let Some(tags) = &args.tags {
            scenarios.retain(|summary| {
                tags.iter()
                    .any(|tag| summary.tags.iter().any(|t| t.as_str() == tag))
            });
        }
        SearchScenariosResult { scenarios }
    }

    /// `get-scenario-info`: a stored scenario's full document, optionally
    /// with its secret values.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Id`] for a malformed `name`, or
    /// [`ToolError::Store`] if no such scenario is stored.
    pub async fn get_scenario_info(
        &self,
        args: GetScenarioInfoArgs,
    ) -> Result<GetScenarioInfoResult, ToolError> {
        let name = ScenarioName::new(args.name)?;
        let store = self.store.lock().await;
        let scenario = store.load(&name)?;
        let secrets = if args.include_secrets {
            let record = store.secrets(&name)?;
            if record.is_empty() {
                None
            } else {
                Some(secrets_to_map(&record))
            }
        } else {
            None
        };
        Ok(GetScenarioInfoResult {
            scenario: serde_json::to_value(&scenario).unwrap_or(serde_json::Value::Null),
            secrets,
        })
    }

    /// `delete-scenario`: removes a stored scenario and its secrets.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Id`] for a malformed `name`.
    pub async fn delete_scenario(
        &self,
        args: DeleteScenarioArgs,
    ) -> Result<DeleteScenarioResult, ToolError> {
        let name = ScenarioName::new(args.name)?;
        let mut store = self.store.lock().await;
        match store.delete(&name) {
            Ok(()) => Ok(DeleteScenarioResult { success: true }),
            Err(scenario_store::StoreError::NotFound(_)) => Ok(DeleteScenarioResult { success: false }),
            Err(other) => Err(other.into()),
        }
    }

    /// `import-scenario`: saves a scenario from its portable text form.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::AlreadyExists`] if the embedded name is already
    /// stored and `overwrite` was not set, or [`ToolError::Codec`] /
    /// [`ToolError::Store`] for malformed text or a storage failure.
    pub async fn import_scenario(
        &self,
        args: ImportScenarioArgs,
    ) -> Result<ImportScenarioResult, ToolError> {
        let (document, _secrets) = scenario_contract::codec::import_from_text(&args.text)?;
        let name = document.scenario.name.clone();
        let mut store = self.store.lock().await;
        if !args.overwrite && store.load(&name).is_ok() {
            return Err(ToolError::AlreadyExists(name.to_string()));
        }
        let name = store.import(&args.text)?;
        Ok(ImportScenarioResult {
            name: name.to_string(),
            success: true,
        })
    }

    /// `export-scenario`: serializes a stored scenario to its portable text form.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Id`] for a malformed `name`, or
    /// [`ToolError::Store`] if no such scenario is stored.
    pub async fn export_scenario(
        &self,
        args: ExportScenarioArgs,
    ) -> Result<ExportScenarioResult, ToolError> {
        let name = ScenarioName::new(args.name)?;
        let store = self.store.lock().await;
        let text = store.export(&name, args.include_secrets)?;
        Ok(ExportScenarioResult { text })
    }
}

fn summarize_run(result: &scenario_exec::ScenarioExecutionResult) -> ScenarioRunSummary {
    ScenarioRunSummary {
        scenario: result.scenario.to_string(),
        status: match result.status {
            scenario_exec::ExecutionStatus::Success => "success",
            scenario_exec::ExecutionStatus::Skipped => "skipped",
        },
        outputs: result.outputs.clone(),
    }
}

fn secrets_to_map(record: &SecretsRecord) -> std::collections::BTreeMap<String, String> {
    record
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use scenario_core::Action;
    use scenario_core::ActionKind;
    use scenario_core::ElementInfo;
    use scenario_core::RecordingTimestamp;
    use scenario_core::Scenario;
    use scenario_core::SelectorRecord;
    use scenario_core::Timestamp;
    use scenario_exec::DriverError;
    use scenario_exec::NoopSmartFinder;
    use scenario_exec::PageReadiness;
    use scenario_store::StoreConfig;
    use serde_json::Value;

    use super::*;

    struct StubDriver;

    #[async_trait]
    impl PageDriver for StubDriver {
        async fn navigate(&self, _url: &str) -> Result<(), DriverError> {
            Ok(())
        }
        async fn click(&self, _selector: &str) -> Result<(), DriverError> {
            Ok(())
        }
        async fn type_text(
            &self,
            _selector: &str,
            _text: &str,
            _clear_first: bool,
            _delay: Option<std::time::Duration>,
        ) -> Result<(), DriverError> {
            Ok(())
        }
        async fn select(
            &self,
            _selector: &str,
            _mode: &scenario_core::SelectMode,
        ) -> Result<(), DriverError> {
            Ok(())
        }
        async fn hover(&self, _selector: &str) -> Result<(), DriverError> {
            Ok(())
        }
        async fn key_press(
            &self,
            _key: &scenario_core::KeyName,
            _modifiers: &[scenario_core::KeyModifier],
        ) -> Result<(), DriverError> {
            Ok(())
        }
        async fn scroll(&self, _selector: Option<&str>, _dx: i32, _dy: i32) -> Result<(), DriverError> {
            Ok(())
        }
        async fn upload_file(&self, _selector: &str, _file_path: &str) -> Result<(), DriverError> {
            Ok(())
        }
        async fn pointer_move(&self, _point: scenario_exec::driver::Point) -> Result<(), DriverError> {
            Ok(())
        }
        async fn pointer_press(&self) -> Result<(), DriverError> {
            Ok(())
        }
        async fn pointer_release(&self) -> Result<(), DriverError> {
            Ok(())
        }
        async fn wait_for_selector(
            &self,
            _selector: &str,
            _timeout: std::time::Duration,
        ) -> Result<(), DriverError> {
            Ok(())
        }
        async fn wait_fixed(&self, _duration: std::time::Duration) {}
        async fn evaluate(&self, _expression: &str) -> Result<Value, DriverError> {
            Ok(Value::Null)
        }
        async fn cookies(&self) -> Result<Vec<(String, String)>, DriverError> {
            Ok(Vec::new())
        }
        async fn current_url(&self) -> Result<String, DriverError> {
            Ok("https://example.test/".to_string())
        }
        async fn title(&self) -> Result<String, DriverError> {
            Ok("Example".to_string())
        }
        async fn element_exists(&self, _selector: &str) -> Result<bool, DriverError> {
            Ok(true)
        }
        async fn read_attribute(
            &self,
            _selector: &str,
            _attribute: &str,
        ) -> Result<Option<String>, DriverError> {
            Ok(None)
        }
        async fn read_attribute_all(
            &self,
            _selector: &str,
            _attribute: &str,
        ) -> Result<Vec<String>, DriverError> {
            Ok(Vec::new())
        }
        async fn looks_authenticated(&self) -> Result<bool, DriverError> {
            Ok(true)
        }
        async fn readiness(&self) -> Result<PageReadiness, DriverError> {
            Ok(PageReadiness::default())
        }
        async fn describe_element(
            &self,
            _selector: &str,
        ) -> Result<Option<scenario_core::ElementInfo>, DriverError> {
            Ok(None)
        }
        async fn element_state(
            &self,
            _selector: &str,
        ) -> Result<Option<scenario_exec::driver::ElementState>, DriverError> {
            Ok(None)
        }
        async fn active_element(&self) -> Result<Option<String>, DriverError> {
            Ok(None)
        }
        async fn open_overlays(&self) -> Result<Vec<String>, DriverError> {
            Ok(Vec::new())
        }
    }

    fn new_router() -> (tempfile::TempDir, ToolRouter<'static>) {
        let dir = tempfile::tempdir().unwrap();
        let store = ScenarioStore::open(StoreConfig::new(dir.path())).unwrap();
        let driver: &'static StubDriver = Box::leak(Box::new(StubDriver));
        let finder: &'static NoopSmartFinder = Box::leak(Box::new(NoopSmartFinder));
        (dir, ToolRouter::new(store, driver, finder, ExecutorConfig::default()))
    }

    fn sample(name: &str) -> Scenario {
        let ts = Timestamp::parse("2026-07-27T00:00:00Z").unwrap();
        Scenario {
            name: ScenarioName::new(name).unwrap(),
            version: 1,
            created_at: ts,
            updated_at: ts,
            metadata: scenario_core::Metadata::default(),
            chain: vec![Action::new(
                RecordingTimestamp::new(0),
                ActionKind::Click {
                    selector: SelectorRecord::new("#submit", Vec::new(), ElementInfo::default()),
                    text: None,
                    href: None,
                    requires_wait: false,
                },
            )],
        }
    }

    #[tokio::test]
    async fn enable_recorder_reports_first_and_subsequent_calls() {
        let (_dir, router) = new_router();
        let first = router.enable_recorder();
        assert!(first.success);
        assert_eq!(first.message, "recorder enabled");
        let second = router.enable_recorder();
        assert_eq!(second.message, "recorder already enabled");
    }

    #[tokio::test]
    async fn list_and_search_reflect_stored_scenarios() {
        let (_dir, router) = new_router();
        {
            let mut store = router.store.lock().await;
            store.save(sample("login_flow")).unwrap();
        }
        let listed = router.list_scenarios().await;
        assert_eq!(listed.scenarios.len(), 1);

        let found = router
            .search_scenarios(SearchScenariosArgs {
                text: Some("login".to_string()),
                tags: None,
            })
            .await;
        assert_eq!(found.scenarios.len(), 1);

        let missed = router
            .search_scenarios(SearchScenariosArgs {
                text: Some("nonexistent".to_string()),
                tags: None,
            })
            .await;
        assert!(missed.scenarios.is_empty());
    }

    #[tokio::test]
    async fn get_scenario_info_omits_secrets_unless_requested() {
        let (_dir, router) = new_router();
        {
            let mut store = router.store.lock().await;
            store.save(sample("login_flow")).unwrap();
        }
        let info = router
            .get_scenario_info(GetScenarioInfoArgs {
                name: "login_flow".to_string(),
                include_secrets: false,
            })
            .await
            .unwrap();
        assert!(info.secrets.is_none());
    }

    #[tokio::test]
    async fn delete_scenario_reports_failure_for_unknown_name() {
        let (_dir, router) = new_router();
        let result = router
            .delete_scenario(DeleteScenarioArgs {
                name: "never_recorded".to_string(),
            })
            .await
            .unwrap();
        assert!(!result.success);
    }

    #[tokio::test]
    async fn export_then_import_round_trips_through_router() {
        let (_dir, router) = new_router();
        {
            let mut store = router.store.lock().await;
            store.save(sample("login_flow")).unwrap();
        }
        let exported = router
            .export_scenario(ExportScenarioArgs {
                name: "login_flow".to_string(),
                include_secrets: false,
            })
            .await
            .unwrap();

        let (_other_dir, other_router) = new_router();
        let imported = other_router
            .import_scenario(ImportScenarioArgs {
                text: exported.text,
                overwrite: false,
            })
            .await
            .unwrap();
        assert_eq!(imported.name, "login_flow");
        assert!(imported.success);
    }

    #[tokio::test]
    async fn import_without_overwrite_rejects_existing_name() {
        let (_dir, router) = new_router();
        {
            let mut store = router.store.lock().await;
            store.save(sample("login_flow")).unwrap();
        }
        let exported = router
            .export_scenario(ExportScenarioArgs {
                name: "login_flow".to_string(),
                include_secrets: false,
            })
            .await
            .unwrap();
        let result = router
            .import_scenario(ImportScenarioArgs {
                text: exported.text,
                overwrite: false,
            })
            .await;
        assert!(matches!(result, Err(ToolError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn execute_scenario_runs_its_chain() {
        let (_dir, router) = new_router();
        {
            let mut store = router.store.lock().await;
            store.save(sample("login_flow")).unwrap();
        }
        let result = router
            .execute_scenario(ExecuteScenarioArgs {
                name: "login_flow".to_string(),
                parameters: std::collections::BTreeMap::new(),
                execute_dependencies: true,
            })
            .await
            .unwrap();
        assert_eq!(result.results.len(), 1);
        assert_eq!(result.results[0].status, "success");
    }
}
