// crates/scenario-mcp/src/types.rs
// ============================================================================
// Module: Tool Surface Types
// Description: JSON-shaped argument and result types for every operation in
//              the exposed tool surface.
// Purpose: `spec.md` §6 operation table.
// Dependencies: scenario-core, scenario-store, serde
// ============================================================================

//! ## Overview
//! Every operation in the tool table takes a plain struct of arguments and
//! returns a plain struct of results; both serialize directly to and from
//! JSON with no envelope beyond what `spec.md` §6 documents.

use std::collections::BTreeMap;

use scenario_store::ScenarioSummary;
use serde::Deserialize;
use serde::Serialize;

/// The seven named operations in the exposed tool surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ToolName {
    /// `enable-recorder`.
    EnableRecorder,
    /// `execute-scenario`.
    ExecuteScenario,
    /// `list-scenarios`.
    ListScenarios,
    /// `search-scenarios`.
    SearchScenarios,
    /// `get-scenario-info`.
    GetScenarioInfo,
    /// `delete-scenario`.
    DeleteScenario,
    /// `import-scenario`.
    ImportScenario,
    /// `export-scenario`.
    ExportScenario,
}

impl ToolName {
    /// Returns the wire name used by callers, matching `spec.md` §6's table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnableRecorder => "enable-recorder",
            Self::ExecuteScenario => "execute-scenario",
            Self::ListScenarios => "list-scenarios",
            Self::SearchScenarios => "search-scenarios",
            Self::GetScenarioInfo => "get-scenario-info",
            Self::DeleteScenario => "delete-scenario",
            Self::ImportScenario => "import-scenario",
            Self::ExportScenario => "export-scenario",
        }
    }
}

/// Result of `enable-recorder`.
#[derive(Debug, Clone, Serialize)]
pub struct EnableRecorderResult {
    /// Whether the call succeeded.
    pub success: bool,
    /// A human-readable status message.
    pub message: String,
}

/// Arguments for `execute-scenario`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteScenarioArgs {
    /// The root scenario to run.
    pub name: String,
    /// Caller-supplied input parameters, keyed by parameter name.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    /// Whether to run the scenario's resolved dependency chain as well.
    #[serde(default = "default_true")]
    pub execute_dependencies: bool,
}

const fn default_true() -> bool {
    true
}

/// One scenario's outcome within an `execute-scenario` response.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioRunSummary {
    /// The scenario that ran or was skipped.
    pub scenario: String,
    /// `"success"` or `"skipped"`.
    pub status: &'static str,
    /// Outputs it produced, empty if skipped.
    pub outputs: BTreeMap<String, String>,
}

/// Result of a successful `execute-scenario` call.
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteScenarioResult {
    /// Every scenario that ran or was skipped, in execution order.
    pub results: Vec<ScenarioRunSummary>,
    /// The flat variable namespace as it stood when the root scenario finished.
    pub final_variables: BTreeMap<String, String>,
}

/// Result of `list-scenarios`.
#[derive(Debug, Clone, Serialize)]
pub struct ListScenariosResult {
    /// Every stored scenario's index summary.
    pub scenarios: Vec<ScenarioSummary>,
}

/// Arguments for `search-scenarios`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchScenariosArgs {
    /// A substring to match against name, description, or tags.
    pub text: Option<String>,
    /// Tags a result must carry at least one of.
    pub tags: Option<Vec<String>>,
}

/// Result of `search-scenarios`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchScenariosResult {
    /// Summaries matching the query.
    pub scenarios: Vec<ScenarioSummary>,
}

/// Arguments for `get-scenario-info`.
#[derive(Debug, Clone, Deserialize)]
pub struct GetScenarioInfoArgs {
    /// The scenario to fetch.
    pub name: String,
    /// Whether to include its secret values alongside the document.
    #[serde(default)]
    pub include_secrets: bool,
}

/// Result of `get-scenario-info`.
#[derive(Debug, Clone, Serialize)]
pub struct GetScenarioInfoResult {
    /// The full scenario document.
    pub scenario: serde_json::Value,
    /// Secret values, present only when `include_secrets` was set and at
    /// least one secret is recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets: Option<BTreeMap<String, String>>,
}

/// Arguments for `delete-scenario`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteScenarioArgs {
    /// The scenario to delete.
    pub name: String,
}

/// Result of `delete-scenario`.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteScenarioResult {
    /// Whether the scenario was found and deleted.
    pub success: bool,
}

/// Arguments for `import-scenario`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportScenarioArgs {
    /// The portable text form (`spec.md` §4.5 `export`/`import`).
    pub text: String,
    /// When `false` (the default), importing over an existing name fails.
    #[serde(default)]
    pub overwrite: bool,
}

/// Result of `import-scenario`.
#[derive(Debug, Clone, Serialize)]
pub struct ImportScenarioResult {
    /// The imported scenario's name.
    pub name: String,
    /// Whether the import succeeded.
    pub success: bool,
}

/// Arguments for `export-scenario`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportScenarioArgs {
    /// The scenario to export.
    pub name: String,
    /// Whether to embed its secret values in the exported text.
    #[serde(default)]
    pub include_secrets: bool,
}

/// Result of `export-scenario`.
#[derive(Debug, Clone, Serialize)]
pub struct ExportScenarioResult {
    /// The portable text form.
    pub text: String,
}

/// The shape of every error response (`spec.md` §6: "Error responses carry
/// a textual message; structured diagnostic for failed executions is
/// embedded verbatim").
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// A human-readable error message.
    pub message: String,
    /// The full playback diagnostic, present only for `execute-scenario`
    /// failures that exhausted retry/fallback/smart-finder recovery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<serde_json::Value>,
    /// Scenarios that ran to completion (or were skipped) before the
    /// failure, present only for `execute-scenario` failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ran: Option<Vec<ScenarioRunSummary>>,
}
