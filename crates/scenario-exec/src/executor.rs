// crates/scenario-exec/src/executor.rs
// ============================================================================
// Module: Executor
// Description: Drives a resolved dependency plan's scenarios through a
//              `PageDriver`, substituting parameters, retrying with selector
//              fallback and smart-finder recovery, and collecting outputs.
// Purpose: `spec.md` §4.6 execution, §5 settlement, §7 failure diagnostics.
// Dependencies: scenario-core, scenario-store, crate::graph, crate::guard,
//               crate::driver, crate::diagnostics, tokio, tracing
// ============================================================================

//! ## Overview
//! [`Executor::execute`] resolves `root`'s dependency plan, then walks it in
//! dependency-first order. Each node may be skipped by its edge's guard;
//! otherwise its chain runs action by action, with parameter substitution
//! drawn from a single flat variable namespace that accumulates caller
//! input, parameter defaults, and upstream outputs as execution proceeds.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::time::Duration;
use std::time::Instant;

use scenario_core::Action;
use scenario_core::ActionKind;
use scenario_core::DragEndpoint;
use scenario_core::OutputTransform;
use scenario_core::Scenario;
use scenario_core::ScenarioName;
use scenario_core::action::SelectMode;
use scenario_core::action::WaitSpec;
use scenario_core::placeholder;
use scenario_core::selector::ElementInfo;
use scenario_store::ScenarioStore;

use crate::diagnostics;
use crate::diagnostics::AttemptRecord;
use crate::diagnostics::AttemptSource;
use crate::diagnostics::FailureDiagnostic;
use crate::driver::DriverError;
use crate::driver::PageDriver;
use crate::driver::Point;
use crate::driver::SmartFinder;
use crate::graph;
use crate::graph::GraphError;
use crate::guard;
use crate::guard::GuardContext;
use crate::guard::GuardError;

/// Tunable limits for settlement waits and retry behavior (`spec.md` §4.6, §5).
#[derive(Debug, Clone, Copy)]
pub struct ExecutorConfig {
    /// Number of recorded-selector attempts before falling back to the smart finder.
    pub max_retries: u32,
    /// Delay between failed attempts.
    pub retry_wait: Duration,
    /// Cap on waiting for in-flight animations to settle after a click.
    pub animation_wait_cap: Duration,
    /// Cap on waiting for the network to go idle after a click.
    pub network_idle_wait_cap: Duration,
    /// Cap on waiting for DOM mutations to quiesce after a click.
    pub dom_quiescence_wait_cap: Duration,
    /// Maximum number of smart-finder candidates to try as a last resort.
    pub smart_finder_max_results: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_wait: Duration::from_secs(1),
            animation_wait_cap: Duration::from_secs(3),
            network_idle_wait_cap: Duration::from_secs(5),
            dom_quiescence_wait_cap: Duration::from_secs(3),
            smart_finder_max_results: 5,
        }
    }
}

/// The outcome of running one scenario within a plan.
#[derive(Debug, Clone)]
pub enum ExecutionStatus {
    /// The scenario's chain ran to completion.
    Success,
    /// The scenario's edge guard evaluated to "skip".
    Skipped,
}

/// One scenario's result within an [`ExecutionReport`].
#[derive(Debug, Clone)]
pub struct ScenarioExecutionResult {
    /// The scenario that ran (or was skipped).
    pub scenario: ScenarioName,
    /// Whether it ran or was skipped.
    pub status: ExecutionStatus,
    /// Outputs it produced, empty if skipped.
    pub outputs: BTreeMap<String, String>,
}

/// The full result of an [`Executor::execute`] call that completed without
/// a playback failure.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    /// Per-scenario results, in execution order.
    pub results: Vec<ScenarioExecutionResult>,
    /// The flat variable namespace as it stood after the root scenario ran,
    /// including every parameter, default, and upstream output.
    pub final_variables: BTreeMap<String, String>,
}

/// Errors raised while resolving or executing a scenario plan.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// Dependency resolution failed (cycle, unknown target, store failure).
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// A guard failed to evaluate against the page.
    #[error(transparent)]
    Guard(#[from] GuardError),
    /// An action exhausted every selector, fallback, and smart-finder
    /// candidate without succeeding.
    #[error("scenario `{scenario}` action #{action_index} ({action_label}) failed after {attempts} attempt(s)")]
    Playback {
        /// The scenario whose chain failed.
        scenario: ScenarioName,
        /// The failing action's index within that scenario's chain.
        action_index: usize,
        /// The failing action's kind label.
        action_label: &'static str,
        /// Number of attempts made before giving up.
        attempts: usize,
        /// The structured diagnostic.
        diagnostic: Box<FailureDiagnostic>,
        /// Results for scenarios that completed before the failure.
        results_so_far: Vec<ScenarioExecutionResult>,
    },
}

/// Drives scenario execution against a [`PageDriver`] and [`SmartFinder`].
pub struct Executor<'a> {
    driver: &'a dyn PageDriver,
    finder: &'a dyn SmartFinder,
    config: ExecutorConfig,
}

impl<'a> Executor<'a> {
    /// Builds an executor over the given boundaries and configuration.
    #[must_use]
    pub fn new(driver: &'a dyn PageDriver, finder: &'a dyn SmartFinder, config: ExecutorConfig) -> Self {
        Self { driver, finder, config }
    }

    /// Resolves `root`'s dependency plan and executes it.
    ///
    /// When `execute_dependencies` is `false`, the full plan is still
    /// resolved and validated (so referential errors surface up front), but
    /// only `root` itself is executed.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::Graph`] if resolution fails,
    /// [`ExecutorError::Guard`] if a guard query fails, or
    /// [`ExecutorError::Playback`] if an action cannot be completed.
    pub async fn execute(
        &self,
        store: &ScenarioStore,
        root: &ScenarioName,
        input_parameters: BTreeMap<String, String>,
        execute_dependencies: bool,
    ) -> Result<ExecutionReport, ExecutorError> {
        let plan = graph::resolve(store, root)?;
        let plan = if execute_dependencies { plan } else { plan.root_only() };

        let mut available = input_parameters;
        let mut results = Vec::new();

        for node in plan.order {
            if let Some(edge) = &node.edge {
                if let Some(condition) = &edge.condition {
                    let url = self.driver.current_url().await.unwrap_or_default();
                    let title = self.driver.title().await.unwrap_or_default();
                    let ctx = GuardContext {
                        url: &url,
                        title: &title,
                        variables: &available,
                    };
                    let should_run = guard::should_run(condition, &ctx, self.driver).await?;
                    if !should_run {
                        tracing::debug!(scenario = %node.scenario.name, "dependency skipped by guard");
                        results.push(ScenarioExecutionResult {
                            scenario: node.scenario.name.clone(),
                            status: ExecutionStatus::Skipped,
                            outputs: BTreeMap::new(),
                        });
                        continue;
                    }
                }
            }

            let mut local_vars = available.clone();
            seed_defaults(&node.scenario, &mut local_vars);

            let outputs = match self.run_chain(&node.scenario, &mut local_vars, &mut results).await {
                Ok(outputs) => outputs,
                Err(error) => return Err(error),
            };

            if let Some(edge) = &node.edge {
                for mapping in &edge.parameters {
                    if let Some(value) = outputs.get(mapping.from_output.as_str()) {
                        let transformed = apply_transform(value, mapping.transform);
                        available.insert(mapping.parameter.to_string(), transformed);
                    }
                }
            }
            available.extend(outputs.iter().map(|(k, v)| (k.clone(), v.clone())));

            results.push(ScenarioExecutionResult {
                scenario: node.scenario.name.clone(),
                status: ExecutionStatus::Success,
                outputs,
            });
        }

        Ok(ExecutionReport {
            results,
            final_variables: available,
        })
    }

    async fn run_chain(
        &self,
        scenario: &Scenario,
        local_vars: &mut BTreeMap<String, String>,
        results_so_far: &mut Vec<ScenarioExecutionResult>,
    ) -> Result<BTreeMap<String, String>, ExecutorError> {
        let mut outputs = BTreeMap::new();
        for (index, action) in scenario.chain.iter().enumerate() {
            let substituted = substitute_parameters(action, local_vars);
            match self.run_action(index, &substituted).await {
                Ok(Some((name, value))) => {
                    outputs.insert(name.clone(), value.clone());
                    local_vars.insert(name, value);
                }
                Ok(None) => {}
                Err(diagnostic) => {
                    return Err(ExecutorError::Playback {
                        scenario: scenario.name.clone(),
                        action_index: index,
                        action_label: action.kind.label(),
                        attempts: diagnostic.attempts.len(),
                        diagnostic: Box::new(diagnostic),
                        results_so_far: std::mem::take(results_so_far),
                    });
                }
            }
        }
        Ok(outputs)
    }

    async fn run_action(&self, action_index: usize, action: &Action) -> Result<Option<(String, String)>, FailureDiagnostic> {
        let mut kind = action.kind.clone();
        let mut attempts = Vec::new();

        if kind.selector().is_none() {
            return match self.dispatch_once(&kind, None).await {
                Ok(value) => Ok(value),
                Err(error) => {
                    attempts.push(AttemptRecord {
                        selector: String::new(),
                        source: AttemptSource::Primary,
                        error: error.to_string(),
                    });
                    let page = diagnostics::capture_page_context(self.driver, "").await;
                    Err(diagnostics::build_diagnostic(action_index, page, attempts))
                }
            };
        }

        for attempt in 0..self.config.max_retries {
            let selector_str = kind.selector().expect("checked above").primary.clone();
            let source = if attempt == 0 { AttemptSource::Primary } else { AttemptSource::Fallback };
            match self.dispatch_once(&kind, Some(&selector_str)).await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    attempts.push(AttemptRecord {
                        selector: selector_str,
                        source,
                        error: error.to_string(),
                    });
                    if attempt + 1 < self.config.max_retries {
                        if let Some(selector) = kind.selector_mut() {
                            selector.promote_next_fallback();
                        }
                        tokio::time::sleep(self.config.retry_wait).await;
                    }
                }
            }
        }

        if let Some(candidate_result) = self.try_smart_finder(&mut kind, &mut attempts).await {
            return candidate_result;
        }

        let last_selector = kind.selector().map(|s| s.primary.clone()).unwrap_or_default();
        let page = diagnostics::capture_page_context(self.driver, &last_selector).await;
        Err(diagnostics::build_diagnostic(action_index, page, attempts))
    }

    async fn try_smart_finder(
        &self,
        kind: &mut ActionKind,
        attempts: &mut Vec<AttemptRecord>,
    ) -> Option<Result<Option<(String, String)>, FailureDiagnostic>> {
        let info = kind.selector()?.element_info.clone();
        let description = describe_for_finder(&info);
        let candidates = self
            .finder
            .find(&description, self.config.smart_finder_max_results)
            .await
            .ok()?;

        for candidate in candidates {
            if let Some(selector) = kind.selector_mut() {
                selector.primary = candidate.selector.clone();
            }
            match self.dispatch_once(kind, Some(&candidate.selector)).await {
                Ok(value) => return Some(Ok(value)),
                Err(error) => {
                    attempts.push(AttemptRecord {
                        selector: candidate.selector,
                        source: AttemptSource::SmartFinder,
                        error: error.to_string(),
                    });
                }
            }
        }
        None
    }

    async fn dispatch_once(
        &self,
        kind: &ActionKind,
        selector: Option<&str>,
    ) -> Result<Option<(String, String)>, DriverError> {
        let driver = self.driver;
        match kind {
            ActionKind::Click { requires_wait, .. } => {
                let selector = selector.expect("click carries a selector");
                driver.click(selector).await?;
                if *requires_wait {
                    self.settle_after_click().await;
                }
                Ok(None)
            }
            ActionKind::Type { text, clear_first, .. } => {
                let selector = selector.expect("type carries a selector");
                driver.type_text(selector, text, *clear_first, None).await?;
                Ok(None)
            }
            ActionKind::Select { mode, .. } => {
                let selector = selector.expect("select carries a selector");
                driver.select(selector, mode).await?;
                Ok(None)
            }
            ActionKind::Scroll { scroll_x, scroll_y, .. } => {
                let selector = selector.expect("scroll carries a selector");
                driver
                    .scroll(Some(selector), saturating_offset(*scroll_x), saturating_offset(*scroll_y))
                    .await?;
                Ok(None)
            }
            ActionKind::Hover { .. } => {
                let selector = selector.expect("hover carries a selector");
                driver.hover(selector).await?;
                Ok(None)
            }
            ActionKind::Keypress { key, modifiers } => {
                driver.key_press(key, modifiers).await?;
                Ok(None)
            }
            ActionKind::Wait { spec } => match spec {
                WaitSpec::Duration { ms } => {
                    driver.wait_fixed(Duration::from_millis(*ms)).await;
                    Ok(None)
                }
                WaitSpec::Selector { timeout_ms, .. } => {
                    let selector = selector.expect("wait-for-selector carries a selector");
                    driver.wait_for_selector(selector, Duration::from_millis(*timeout_ms)).await?;
                    Ok(None)
                }
            },
            ActionKind::Upload { file_path, .. } => {
                let selector = selector.expect("upload carries a selector");
                driver.upload_file(selector, file_path).await?;
                Ok(None)
            }
            ActionKind::Drag { source, target } => {
                let source_point = self.resolve_point(source).await?;
                let target_point = self.resolve_point(target).await?;
                driver.pointer_move(source_point).await?;
                driver.pointer_press().await?;
                driver.pointer_move(target_point).await?;
                driver.pointer_release().await?;
                Ok(None)
            }
            ActionKind::Navigate { url, .. } => {
                driver.navigate(url).await?;
                Ok(None)
            }
            ActionKind::Extract {
                attribute,
                multiple,
                output_name,
                ..
            } => {
                let selector = selector.expect("extract carries a selector");
                let attribute = attribute.as_deref().unwrap_or("text");
                if *multiple {
                    let values = driver.read_attribute_all(selector, attribute).await?;
                    Ok(Some((output_name.clone(), values.join(","))))
                } else {
                    let value = driver.read_attribute(selector, attribute).await?.unwrap_or_default();
                    Ok(Some((output_name.clone(), value)))
                }
            }
        }
    }

    async fn resolve_point(&self, endpoint: &DragEndpoint) -> Result<Point, DriverError> {
        match endpoint {
            DragEndpoint::Coordinates { x, y } => Ok(Point { x: *x, y: *y }),
            DragEndpoint::Selector { selector } => {
                let state = self
                    .driver
                    .element_state(&selector.primary)
                    .await?
                    .ok_or_else(|| DriverError::ElementNotFound(selector.primary.clone()))?;
                let bbox = state.bounding_box.ok_or_else(|| DriverError::NotActionable {
                    selector: selector.primary.clone(),
                    reason: "element has no layout".to_string(),
                })?;
                Ok(Point {
                    x: bbox.x + bbox.width / 2.0,
                    y: bbox.y + bbox.height / 2.0,
                })
            }
        }
    }

    async fn settle_after_click(&self) {
        wait_while(self.driver, self.config.animation_wait_cap, |r| r.animating).await;
        wait_while(self.driver, self.config.network_idle_wait_cap, |r| !r.network_idle).await;
        wait_while(self.driver, self.config.dom_quiescence_wait_cap, |r| !r.dom_quiescent).await;
    }
}

async fn wait_while<F>(driver: &dyn PageDriver, cap: Duration, unsettled: F)
where
    F: Fn(&crate::driver::PageReadiness) -> bool,
{
    let start = Instant::now();
    loop {
        let readiness = match driver.readiness().await {
            Ok(readiness) => readiness,
            Err(_) => return,
        };
        if !unsettled(&readiness) || start.elapsed() >= cap {
            return;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

/// Rounds and clamps a recorded scroll offset into the driver's `i32` range,
/// rather than truncating via a bare `as` cast (which would silently wrap on
/// overflow).
#[allow(
    clippy::cast_possible_truncation,
    reason = "clamped to i32::MIN..=i32::MAX immediately above, so the cast cannot truncate"
)]
fn saturating_offset(value: f64) -> i32 {
    value.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

fn seed_defaults(scenario: &Scenario, local_vars: &mut BTreeMap<String, String>) {
    for (name, spec) in &scenario.metadata.parameters {
        if local_vars.contains_key(name.as_str()) {
            continue;
        }
        if let Some(default) = &spec.default {
            local_vars.insert(name.to_string(), json_value_to_string(default));
        }
    }
}

fn json_value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn apply_transform(value: &str, transform: Option<OutputTransform>) -> String {
    match transform {
        Some(OutputTransform::Lowercase) => value.to_lowercase(),
        Some(OutputTransform::Uppercase) => value.to_uppercase(),
        Some(OutputTransform::Trim) => value.trim().to_string(),
        Some(OutputTransform::Identity) | None => value.to_string(),
    }
}

fn substitute_parameters(action: &Action, variables: &BTreeMap<String, String>) -> Action {
    let mut action = action.clone();
    match &mut action.kind {
        ActionKind::Type { text, .. } => *text = substitute(text, variables),
        ActionKind::Upload { file_path, .. } => *file_path = substitute(file_path, variables),
        ActionKind::Navigate { url, .. } => *url = substitute(url, variables),
        ActionKind::Select {
            mode: SelectMode::Native { value, .. },
            ..
        } => *value = substitute(value, variables),
        _ => {}
    }
    action
}

fn substitute(text: &str, variables: &BTreeMap<String, String>) -> String {
    placeholder::substitute(text, |name| variables.get(name).map(|v| Cow::Borrowed(v.as_str())))
}

fn describe_for_finder(info: &ElementInfo) -> String {
    let mut parts = Vec::new();
    if let Some(label) = &info.aria_label {
        parts.push(label.clone());
    }
    if let Some(text) = &info.text {
        parts.push(text.clone());
    }
    if let Some(placeholder) = &info.placeholder {
        parts.push(placeholder.clone());
    }
    if parts.is_empty() {
        parts.push(info.tag.clone());
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use scenario_core::ElementInfo;
    use scenario_core::Metadata;
    use scenario_core::RecordingTimestamp;
    use scenario_core::SelectorRecord;
    use scenario_core::Timestamp;

    use crate::driver::FindCandidate;
    use crate::driver::PageReadiness;

    struct FakeDriver {
        fail_until: Mutex<BTreeMap<String, u32>>,
    }

    impl FakeDriver {
        fn new() -> Self {
            Self {
                fail_until: Mutex::new(BTreeMap::new()),
            }
        }

        fn fail_selector_times(&self, selector: &str, times: u32) {
            self.fail_until.lock().unwrap().insert(selector.to_string(), times);
        }

        fn consume_failure(&self, selector: &str) -> bool {
            let mut map = self.fail_until.lock().unwrap();
            if let Some(count) = map.get_mut(selector) {
                if *count > 0 {
                    *count -= 1;
                    return true;
                }
            }
            false
        }
    }

    #[async_trait::async_trait]
    impl PageDriver for FakeDriver {
        async fn navigate(&self, _url: &str) -> Result<(), DriverError> {
            Ok(())
        }
        async fn click(&self, selector: &str) -> Result<(), DriverError> {
            if self.consume_failure(selector) {
                return Err(DriverError::ElementNotFound(selector.to_string()));
            }
            Ok(())
        }
        async fn type_text(&self, _s: &str, _t: &str, _c: bool, _d: Option<Duration>) -> Result<(), DriverError> {
            Ok(())
        }
        async fn select(&self, _s: &str, _m: &SelectMode) -> Result<(), DriverError> {
            Ok(())
        }
        async fn hover(&self, _s: &str) -> Result<(), DriverError> {
            Ok(())
        }
        async fn key_press(&self, _k: &scenario_core::KeyName, _m: &[scenario_core::KeyModifier]) -> Result<(), DriverError> {
            Ok(())
        }
        async fn scroll(&self, _s: Option<&str>, _dx: i32, _dy: i32) -> Result<(), DriverError> {
            Ok(())
        }
        async fn upload_file(&self, _s: &str, _f: &str) -> Result<(), DriverError> {
            Ok(())
        }
        async fn pointer_move(&self, _p: Point) -> Result<(), DriverError> {
            Ok(())
        }
        async fn pointer_press(&self) -> Result<(), DriverError> {
            Ok(())
        }
        async fn pointer_release(&self) -> Result<(), DriverError> {
            Ok(())
        }
        async fn wait_for_selector(&self, _s: &str, _t: Duration) -> Result<(), DriverError> {
            Ok(())
        }
        async fn wait_fixed(&self, _d: Duration) {}
        async fn evaluate(&self, _e: &str) -> Result<serde_json::Value, DriverError> {
            Ok(serde_json::Value::Null)
        }
        async fn cookies(&self) -> Result<Vec<(String, String)>, DriverError> {
            Ok(Vec::new())
        }
        async fn current_url(&self) -> Result<String, DriverError> {
            Ok("https://example.com".to_string())
        }
        async fn title(&self) -> Result<String, DriverError> {
            Ok("Example".to_string())
        }
        async fn element_exists(&self, _s: &str) -> Result<bool, DriverError> {
            Ok(true)
        }
        async fn read_attribute(&self, _s: &str, _a: &str) -> Result<Option<String>, DriverError> {
            Ok(Some("value".to_string()))
        }
        async fn read_attribute_all(&self, _s: &str, _a: &str) -> Result<Vec<String>, DriverError> {
            Ok(vec!["a".to_string(), "b".to_string()])
        }
        async fn looks_authenticated(&self) -> Result<bool, DriverError> {
            Ok(false)
        }
        async fn readiness(&self) -> Result<PageReadiness, DriverError> {
            Ok(PageReadiness {
                animating: false,
                network_idle: true,
                dom_quiescent: true,
            })
        }
        async fn describe_element(&self, _s: &str) -> Result<Option<ElementInfo>, DriverError> {
            Ok(None)
        }
        async fn element_state(&self, _s: &str) -> Result<Option<crate::driver::ElementState>, DriverError> {
            Ok(None)
        }
        async fn active_element(&self) -> Result<Option<String>, DriverError> {
            Ok(None)
        }
        async fn open_overlays(&self) -> Result<Vec<String>, DriverError> {
            Ok(Vec::new())
        }
    }

    struct FakeFinder {
        candidates: Vec<FindCandidate>,
    }

    #[async_trait::async_trait]
    impl SmartFinder for FakeFinder {
        async fn find(&self, _d: &str, _m: usize) -> Result<Vec<FindCandidate>, DriverError> {
            Ok(self.candidates.clone())
        }
    }

    fn selector(primary: &str, fallbacks: Vec<&str>) -> SelectorRecord {
        SelectorRecord::new(primary, fallbacks.into_iter().map(str::to_string).collect(), ElementInfo::default())
    }

    fn click_action(ts: u64, sel: SelectorRecord) -> Action {
        Action::new(
            RecordingTimestamp::new(ts),
            ActionKind::Click {
                selector: sel,
                text: None,
                href: None,
                requires_wait: false,
            },
        )
    }

    fn bare_scenario(name: &str, chain: Vec<Action>) -> Scenario {
        Scenario {
            name: ScenarioName::new(name).unwrap(),
            version: 1,
            created_at: Timestamp::parse("2026-07-27T00:00:00Z").unwrap(),
            updated_at: Timestamp::parse("2026-07-27T00:00:00Z").unwrap(),
            metadata: Metadata::default(),
            chain,
        }
    }

    #[tokio::test]
    async fn successful_click_requires_no_retry() {
        let driver = FakeDriver::new();
        let finder = FakeFinder { candidates: Vec::new() };
        let executor = Executor::new(&driver, &finder, ExecutorConfig::default());
        let action = click_action(0, selector("#submit", Vec::new()));
        let result = executor.run_action(0, &action).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn fallback_selector_recovers_after_primary_fails() {
        let driver = FakeDriver::new();
        driver.fail_selector_times("#stale", 1);
        let finder = FakeFinder { candidates: Vec::new() };
        let executor = Executor::new(&driver, &finder, ExecutorConfig::default());
        let action = click_action(0, selector("#stale", vec![".btn-primary"]));
        let result = executor.run_action(0, &action).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn smart_finder_recovers_when_every_recorded_selector_fails() {
        let driver = FakeDriver::new();
        driver.fail_selector_times("#stale", 10);
        driver.fail_selector_times(".btn-primary", 10);
        let finder = FakeFinder {
            candidates: vec![FindCandidate {
                selector: "button[data-role=submit]".to_string(),
                confidence: 0.9,
                element_info: None,
            }],
        };
        let mut config = ExecutorConfig::default();
        config.retry_wait = Duration::from_millis(1);
        let executor = Executor::new(&driver, &finder, config);
        let action = click_action(0, selector("#stale", vec![".btn-primary"]));
        let result = executor.run_action(0, &action).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn exhausted_recovery_yields_diagnostic() {
        let driver = FakeDriver::new();
        driver.fail_selector_times("#stale", 10);
        let finder = FakeFinder { candidates: Vec::new() };
        let mut config = ExecutorConfig::default();
        config.retry_wait = Duration::from_millis(1);
        let executor = Executor::new(&driver, &finder, config);
        let action = click_action(0, selector("#stale", Vec::new()));
        let result = executor.run_action(0, &action).await;
        assert!(result.is_err());
        let diagnostic = result.unwrap_err();
        assert_eq!(diagnostic.attempts.len(), 3);
    }

    #[tokio::test]
    async fn extract_action_feeds_output() {
        let driver = FakeDriver::new();
        let finder = FakeFinder { candidates: Vec::new() };
        let executor = Executor::new(&driver, &finder, ExecutorConfig::default());
        let action = Action::new(
            RecordingTimestamp::new(0),
            ActionKind::Extract {
                selector: selector("#total", Vec::new()),
                attribute: None,
                multiple: false,
                output_name: "total".to_string(),
            },
        );
        let result = executor.run_action(0, &action).await.unwrap();
        assert_eq!(result, Some(("total".to_string(), "value".to_string())));
    }

    #[tokio::test]
    async fn whole_chain_runs_and_collects_outputs() {
        let driver = FakeDriver::new();
        let finder = FakeFinder { candidates: Vec::new() };
        let executor = Executor::new(&driver, &finder, ExecutorConfig::default());
        let chain = vec![
            click_action(0, selector("#start", Vec::new())),
            Action::new(
                RecordingTimestamp::new(1),
                ActionKind::Extract {
                    selector: selector("#result", Vec::new()),
                    attribute: None,
                    multiple: false,
                    output_name: "result".to_string(),
                },
            ),
        ];
        let scenario = bare_scenario("checkout", chain);
        let mut vars = BTreeMap::new();
        let mut results_so_far = Vec::new();
        let outputs = executor.run_chain(&scenario, &mut vars, &mut results_so_far).await.unwrap();
        assert_eq!(outputs.get("result"), Some(&"value".to_string()));
    }

    #[test]
    fn saturating_offset_clamps_out_of_range_scroll_targets() {
        assert_eq!(saturating_offset(1_200.0), 1_200);
        assert_eq!(saturating_offset(f64::from(i32::MAX) + 100.0), i32::MAX);
        assert_eq!(saturating_offset(f64::from(i32::MIN) - 100.0), i32::MIN);
        assert_eq!(saturating_offset(-50.4), -50);
    }
}
