// crates/scenario-core/src/error.rs
// ============================================================================
// Module: Core Errors
// Description: Validation errors raised while constructing or checking
//              scenario data.
// Purpose: Give callers stable, matchable error variants instead of strings.
// Dependencies: thiserror, crate::ids
// ============================================================================

//! ## Overview
//! `CoreError` covers validation failures intrinsic to the data model
//! itself (invariant 2 from `spec.md` §3: every placeholder must be
//! declared or supplied). Storage-, recording-, and execution-specific
//! errors live in their own crates.

use thiserror::Error;

use crate::ids::IdError;

/// Errors raised while validating scenario data against `spec.md` §3 invariants.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An identifier failed construction-time validation.
    #[error("invalid identifier: {0}")]
    Id(#[from] IdError),
    /// A scenario was saved with an empty chain (`spec.md` §8 boundary behaviour).
    #[error("scenario `{name}` has an empty chain, which is rejected at save")]
    EmptyChain {
        /// The scenario's name.
        name: String,
    },
    /// A `{{name}}` placeholder in the chain is neither a declared parameter
    /// nor a declared dependency output (`spec.md` §3 invariant 2).
    #[error(
        "placeholder `{{{{{placeholder}}}}}` in scenario `{scenario}` is not a declared \
         parameter or a dependency output"
    )]
    UndeclaredPlaceholder {
        /// The scenario's name.
        scenario: String,
        /// The undeclared placeholder name.
        placeholder: String,
    },
    /// A scenario's chain contained a literal secret value instead of a
    /// placeholder (`spec.md` §3 invariant 1).
    #[error("scenario `{scenario}` chain contains a literal secret value for `{parameter}`")]
    LiteralSecretInChain {
        /// The scenario's name.
        scenario: String,
        /// The parameter whose literal value leaked into the chain.
        parameter: String,
    },
}

#[cfg(test)]
mod tests {
    use super::CoreError;

    #[test]
    fn error_messages_are_stable_and_human_readable() {
        let err = CoreError::EmptyChain {
            name: "login_flow".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "scenario `login_flow` has an empty chain, which is rejected at save"
        );
    }
}
