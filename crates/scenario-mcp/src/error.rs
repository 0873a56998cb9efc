// crates/scenario-mcp/src/error.rs
// ============================================================================
// Module: Tool Router Errors
// Description: The error surface the tool router raises, and its mapping
//              onto `spec.md` §6's error response shape.
// Purpose: Keep every tool call's failure mode typed while still producing
//          the textual-message-plus-embedded-diagnostic response §6 and §7
//          require.
// Dependencies: scenario-core, scenario-contract, scenario-exec,
//               scenario-store, thiserror, serde_json
// ============================================================================

//! ## Overview
//! `spec.md` §7's propagation policy is already enforced inside
//! `scenario-exec`; this module's job is narrower: fold whatever comes back
//! — a bad identifier, a storage failure, a resolution or playback error —
//! into one [`ErrorResponse`] shape every tool call can return.

use scenario_exec::ExecutorError;
use scenario_exec::FailureDiagnostic;

use crate::types::ErrorResponse;
use crate::types::ScenarioRunSummary;

/// Errors raised while dispatching a tool call.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// `name` (or another identifier argument) was not a valid identifier.
    #[error(transparent)]
    Id(#[from] scenario_core::IdError),
    /// A store operation failed.
    #[error(transparent)]
    Store(#[from] scenario_store::StoreError),
    /// The portable text form failed to parse or validate.
    #[error(transparent)]
    Codec(#[from] scenario_contract::CodecError),
    /// Dependency resolution or guard evaluation failed.
    #[error(transparent)]
    Executor(#[from] ExecutorError),
    /// An action exhausted every selector, fallback, and smart-finder
    /// candidate; carries the scenarios that ran before the failure and
    /// the full diagnostic.
    #[error("scenario execution failed")]
    Playback {
        /// Scenarios that ran (or were skipped) before the failure.
        ran: Vec<ScenarioRunSummary>,
        /// The full failure diagnostic.
        diagnostic: Box<FailureDiagnostic>,
    },
    /// `import-scenario` was called without `overwrite` against an existing name.
    #[error("a scenario named `{0}` already exists")]
    AlreadyExists(String),
}

impl ToolError {
    /// Converts this error into the wire-level error response shape
    /// (`spec.md` §6/§7).
    #[must_use]
    pub fn into_response(self) -> ErrorResponse {
        match self {
            Self::Playback { ran, diagnostic } => ErrorResponse {
                message: format!(
                    "action #{} failed after {} selector attempt(s)",
                    diagnostic.action_index,
                    diagnostic.attempts.len()
                ),
                diagnostic: Some(serde_json::to_value(&*diagnostic).unwrap_or(serde_json::Value::Null)),
                ran: Some(ran),
            },
            other => ErrorResponse {
                message: other.to_string(),
                diagnostic: None,
                ran: None,
            },
        }
    }
}
