// crates/scenario-store/src/error.rs
// ============================================================================
// Module: Store Errors
// Description: The failure modes of scenario and secrets persistence.
// Purpose: Give every storage operation a typed, fail-closed error surface.
// Dependencies: thiserror, scenario-core, scenario-contract
// ============================================================================

//! ## Overview
//! Every variant here corresponds to a concrete, recoverable failure named
//! in `spec.md` §4.5 (not-found, name collision, corrupt document, I/O).
//! Nothing here panics or silently drops a write — persistence failures are
//! fail-closed, surfaced as typed errors rather than skipped.

use scenario_contract::CodecError;
use scenario_core::CoreError;
use scenario_core::IdError;
use thiserror::Error;

/// Errors raised while saving, loading, or managing scenarios and secrets.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No scenario is stored under this name.
    #[error("no scenario named `{0}`")]
    NotFound(String),
    /// A scenario already exists under the destination name.
    #[error("a scenario named `{0}` already exists")]
    AlreadyExists(String),
    /// The name was not a valid scenario identifier.
    #[error(transparent)]
    Id(#[from] IdError),
    /// The stored document violated a core invariant.
    #[error(transparent)]
    Invariant(#[from] CoreError),
    /// The stored document's text failed export/import codec checks.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// A dependency edge named a scenario that does not exist in this store.
    #[error("scenario `{scenario}` depends on unknown scenario `{target}`")]
    UnknownDependency {
        /// The dependent scenario.
        scenario: String,
        /// The missing dependency target.
        target: String,
    },
    /// A dependency cycle was detected among stored scenarios.
    #[error("dependency cycle detected: {0}")]
    DependencyCycle(String),
    /// An underlying filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A stored file's contents were not valid JSON.
    #[error("corrupt stored document for `{name}`: {source}")]
    Corrupt {
        /// The scenario whose file is corrupt.
        name: String,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}
