// crates/scenario-mcp/src/lib.rs
// ============================================================================
// Module: Scenario Forge MCP
// Description: The exposed tool surface — session wiring over the store and
//              executor crates.
// Purpose: Own everything named in `spec.md` §6's operation table.
// Dependencies: scenario-core, scenario-contract, scenario-exec,
//               scenario-store, tokio, tracing
// ============================================================================

//! ## Overview
//! This crate owns no transport. It is the glue between a caller that has
//! already decoded a named operation's JSON arguments and the rest of the
//! workspace: [`router::ToolRouter`] dispatches each operation in `spec.md`
//! §6's table onto a [`scenario_store::ScenarioStore`] and a
//! [`scenario_exec::Executor`].

pub mod error;
pub mod router;
pub mod types;

pub use error::ToolError;
pub use router::ToolRouter;
pub use types::DeleteScenarioArgs;
pub use types::DeleteScenarioResult;
pub use types::EnableRecorderResult;
pub use types::ErrorResponse;
pub use types::ExecuteScenarioArgs;
pub use types::ExecuteScenarioResult;
pub use types::ExportScenarioArgs;
pub use types::ExportScenarioResult;
pub use types::GetScenarioInfoArgs;
pub use types::GetScenarioInfoResult;
pub use types::ImportScenarioArgs;
pub use types::ImportScenarioResult;
pub use types::ListScenariosResult;
pub use types::ScenarioRunSummary;
pub use types::SearchScenariosArgs;
pub use types::SearchScenariosResult;
pub use types::ToolName;
