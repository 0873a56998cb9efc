// crates/scenario-exec/tests/conditional_dependency.rs
// Integration coverage for a dependency edge guarded by `is_authenticated`
// with `skip_if = true`: the prerequisite is skipped when the page already
// looks authenticated, and only the root scenario actually runs.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use scenario_core::Action;
use scenario_core::ActionKind;
use scenario_core::DependencyEdge;
use scenario_core::ElementInfo;
use scenario_core::Guard;
use scenario_core::GuardKind;
use scenario_core::KeyModifier;
use scenario_core::KeyName;
use scenario_core::Metadata;
use scenario_core::RecordingTimestamp;
use scenario_core::Scenario;
use scenario_core::ScenarioName;
use scenario_core::SelectMode;
use scenario_core::SelectorRecord;
use scenario_core::Timestamp;
use scenario_exec::driver::ElementState;
use scenario_exec::driver::Point;
use scenario_exec::DriverError;
use scenario_exec::ExecutionStatus;
use scenario_exec::Executor;
use scenario_exec::ExecutorConfig;
use scenario_exec::NoopSmartFinder;
use scenario_exec::PageDriver;
use scenario_exec::PageReadiness;
use scenario_store::ScenarioStore;
use scenario_store::StoreConfig;
use serde_json::Value;

struct AuthenticatedDriver;

#[async_trait]
impl PageDriver for AuthenticatedDriver {
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
        _delay: Option<Duration>,
    ) -> Result<(), DriverError> {
        Ok(())
    }
    async fn select(&self, _selector: &str, _mode: &SelectMode) -> Result<(), DriverError> {
        Ok(())
    }
    async fn hover(&self, _selector: &str) -> Result<(), DriverError> {
        Ok(())
    }
    async fn key_press(&self, _key: &KeyName, _modifiers: &[KeyModifier]) -> Result<(), DriverError> {
        Ok(())
    }
    async fn scroll(&self, _selector: Option<&str>, _dx: i32, _dy: i32) -> Result<(), DriverError> {
        Ok(())
    }
    async fn upload_file(&self, _selector: &str, _file_path: &str) -> Result<(), DriverError> {
        Ok(())
    }
    async fn pointer_move(&self, _point: Point) -> Result<(), DriverError> {
        Ok(())
    }
    async fn pointer_press(&self) -> Result<(), DriverError> {
        Ok(())
    }
    async fn pointer_release(&self) -> Result<(), DriverError> {
        Ok(())
    }
    async fn wait_for_selector(&self, _selector: &str, _timeout: Duration) -> Result<(), DriverError> {
        Ok(())
    }
    async fn wait_fixed(&self, _duration: Duration) {}
    async fn evaluate(&self, _expression: &str) -> Result<Value, DriverError> {
        Ok(Value::Null)
    }
    async fn cookies(&self) -> Result<Vec<(String, String)>, DriverError> {
        Ok(Vec::new())
    }
    async fn current_url(&self) -> Result<String, DriverError> {
        Ok("https://example.test/account".to_string())
    }
    async fn title(&self) -> Result<String, DriverError> {
        Ok("Account".to_string())
    }
    async fn element_exists(&self, _selector: &str) -> Result<bool, DriverError> {
        Ok(true)
    }
    async fn read_attribute(&self, _selector: &str, _attribute: &str) -> Result<Option<String>, DriverError> {
        Ok(None)
    }
    async fn read_attribute_all(&self, _selector: &str, _attribute: &str) -> Result<Vec<String>, DriverError> {
        Ok(Vec::new())
    }
    async fn looks_authenticated(&self) -> Result<bool, DriverError> {
        Ok(true)
    }
    async fn readiness(&self) -> Result<PageReadiness, DriverError> {
        Ok(PageReadiness::default())
    }
    async fn describe_element(&self, _selector: &str) -> Result<Option<ElementInfo>, DriverError> {
        Ok(None)
    }
    async fn element_state(&self, _selector: &str) -> Result<Option<ElementState>, DriverError> {
        Ok(None)
    }
    async fn active_element(&self) -> Result<Option<String>, DriverError> {
        Ok(None)
    }
    async fn open_overlays(&self) -> Result<Vec<String>, DriverError> {
        Ok(Vec::new())
    }
}

fn selector(primary: &str) -> SelectorRecord {
    SelectorRecord::new(primary, Vec::new(), ElementInfo::default())
}

fn click_chain(selector_primary: &str) -> Vec<Action> {
    vec![Action::new(
        RecordingTimestamp::new(0),
        ActionKind::Click {
            selector: selector(selector_primary),
            text: None,
            href: None,
            requires_wait: false,
        },
    )]
}

fn bare_scenario(name: &str, metadata: Metadata, chain: Vec<Action>) -> Scenario {
    let ts = Timestamp::parse("2026-07-27T00:00:00Z").unwrap();
    Scenario {
        name: ScenarioName::new(name).unwrap(),
        version: 1,
        created_at: ts,
        updated_at: ts,
        metadata,
        chain,
    }
}

#[tokio::test]
async fn authenticated_prerequisite_is_skipped_and_only_root_runs() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ScenarioStore::open(StoreConfig::new(dir.path())).unwrap();

    store
        .save(bare_scenario("login_flow", Metadata::default(), click_chain("#login")))
        .unwrap();

    let checkout_metadata = Metadata {
        dependencies: vec![DependencyEdge {
            scenario: ScenarioName::new("login_flow").unwrap(),
            optional: false,
            parameters: Vec::new(),
            condition: Some(Guard {
                kind: GuardKind::IsAuthenticated,
                skip_if: true,
            }),
        }],
        ..Metadata::default()
    };
    store
        .save(bare_scenario(
            "checkout_flow",
            checkout_metadata,
            click_chain("#checkout"),
        ))
        .unwrap();

    let driver = AuthenticatedDriver;
    let finder = NoopSmartFinder;
    let executor = Executor::new(&driver, &finder, ExecutorConfig::default());
    let root = ScenarioName::new("checkout_flow").unwrap();

    let report = executor
        .execute(&store, &root, BTreeMap::new(), true)
        .await
        .unwrap();

    let executed: Vec<_> = report
        .results
        .iter()
        .filter(|r| matches!(r.status, ExecutionStatus::Success))
        .map(|r| r.scenario.to_string())
        .collect();
    assert_eq!(executed, vec!["checkout_flow".to_string()]);

    let skipped: Vec<_> = report
        .results
        .iter()
        .filter(|r| matches!(r.status, ExecutionStatus::Skipped))
        .map(|r| r.scenario.to_string())
        .collect();
    assert_eq!(skipped, vec!["login_flow".to_string()]);
}
