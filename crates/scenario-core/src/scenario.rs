// crates/scenario-core/src/scenario.rs
// ============================================================================
// Module: Scenario
// Description: The persistent, replayable recording and its metadata.
// Purpose: Define `Scenario`, its metadata, dependency edges, and guards.
// Dependencies: serde, crate::action, crate::ids, crate::time
// ============================================================================

//! ## Overview
//! A [`Scenario`] is the unit of storage and replay (`spec.md` §3). Its
//! `chain` never contains secret values, only `{{param}}` placeholders
//! (invariant 1); every placeholder in `chain` must be declared in
//! `metadata.parameters` or supplied by a dependency's outputs
//! (invariant 2).

use serde::Deserialize;
use serde::Serialize;

use crate::action::Action;
use crate::ids::OutputName;
use crate::ids::ParameterName;
use crate::ids::ScenarioName;
use crate::ids::Tag;
use crate::time::Timestamp;

/// The declared type of a scenario parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    /// A plain string value.
    String,
    /// A boolean value.
    Boolean,
    /// A numeric value.
    Number,
    /// A secret value (password, token, …) — never stored in the chain.
    Secret,
}

/// The declaration of one scenario parameter (`spec.md` §3 `metadata.parameters`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// The parameter's declared type.
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    /// Whether the parameter must be supplied (no default and not optional).
    pub required: bool,
    /// A default value, serialized as-is; only meaningful when not required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// A human-readable description shown to authors and agents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A named output a scenario produces for downstream dependents (`spec.md` §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    /// The output's name, bound into dependents' `available_parameters`.
    pub name: OutputName,
    /// A human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A transform applied when mapping a producer output to a dependent parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputTransform {
    /// Pass the value through unchanged.
    Identity,
    /// Lowercase a string value.
    Lowercase,
    /// Uppercase a string value.
    Uppercase,
    /// Trim leading/trailing whitespace from a string value.
    Trim,
}

/// A parameter mapping on a [`DependencyEdge`]: which dependent parameter
/// receives which producer output, with an optional transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyParameterMapping {
    /// The dependent scenario's parameter name.
    pub parameter: ParameterName,
    /// The producer scenario's output name.
    pub from_output: OutputName,
    /// An optional transform applied to the output value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<OutputTransform>,
}

/// One of the fixed guard kinds a dependency `condition` may name (`spec.md` §4.6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuardKind {
    /// True iff the page looks authenticated (storage key, cookie, or logout control).
    IsAuthenticated,
    /// True iff a named context variable exists.
    HasData {
        /// The variable name to check.
        key: String,
    },
    /// True iff the current URL contains a literal or matches a regex.
    UrlMatches {
        /// The literal substring or regex pattern.
        pattern: String,
    },
    /// True iff querying the selector returns a node.
    ElementExists {
        /// The selector string to query.
        selector: String,
    },
    /// True iff a named context variable exists (alias used by some authors
    /// for `HasData`; kept distinct per `spec.md`'s guard table).
    VariableExists {
        /// The variable name to check.
        name: String,
    },
    /// A restricted boolean expression evaluated against `url`/`title`/`variables`.
    Custom {
        /// The expression source.
        expr: String,
    },
}

/// A guard attached to a [`DependencyEdge`] (`spec.md` §4.6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guard {
    /// The guard condition to evaluate.
    #[serde(flatten)]
    pub kind: GuardKind,
    /// When true, a truthy guard result means *skip* this dependency rather
    /// than run it.
    #[serde(default)]
    pub skip_if: bool,
}

/// An edge from one scenario to a prerequisite scenario (`spec.md` §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// The prerequisite scenario's name.
    pub scenario: ScenarioName,
    /// Whether resolution may proceed if this dependency is missing.
    #[serde(default)]
    pub optional: bool,
    /// Parameter mappings supplying the dependency's inputs from this
    /// scenario's (or an upstream dependency's) outputs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<DependencyParameterMapping>,
    /// An optional guard controlling whether this dependency runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Guard>,
}

/// Free-form scenario metadata (`spec.md` §3).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// A human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// A set of search tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    /// The URL recorded at Start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_url: Option<String>,
    /// The URL recorded at Stop-and-Save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_url: Option<String>,
    /// Declared parameters, keyed by name.
    #[serde(default, skip_serializing_if = "std::collections::BTreeMap::is_empty")]
    pub parameters: std::collections::BTreeMap<ParameterName, ParameterSpec>,
    /// Named outputs this scenario produces, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<OutputSpec>,
    /// Dependency edges, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<DependencyEdge>,
}

/// A named, persistent recording of an interaction flow (`spec.md` §3).
///
/// # Invariants
/// - `chain` never contains secret values; only `{{param_name}}` placeholders.
/// - Every `{{name}}` placeholder in `chain` is declared in
///   `metadata.parameters` or produced by a dependency's outputs.
/// - A scenario saved with `chain = []` is rejected at the storage boundary
///   (`spec.md` §8 boundary behaviour), not here: this type can represent an
///   empty chain so that load/validate code can still inspect it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// The scenario's unique storage key.
    pub name: ScenarioName,
    /// A monotonically increasing version, bumped on every save.
    pub version: u64,
    /// When this scenario was first saved.
    pub created_at: Timestamp,
    /// When this scenario was last saved.
    pub updated_at: Timestamp,
    /// Free-form metadata.
    pub metadata: Metadata,
    /// The ordered, optimised action chain.
    pub chain: Vec<Action>,
}

impl Scenario {
    /// Returns the dependency edge targeting `target`, if one exists.
    #[must_use]
    pub fn dependency_on(&self, target: &ScenarioName) -> Option<&DependencyEdge> {
        self.metadata
            .dependencies
            .iter()
            .find(|edge| &edge.scenario == target)
    }

    /// Returns every placeholder name referenced anywhere in `chain`,
    /// without deduplicating.
    #[must_use]
    pub fn chain_placeholders(&self) -> Vec<&str> {
        self.chain
            .iter()
            .flat_map(|action| action.kind.placeholder_bearing_strings())
            .flat_map(crate::placeholder::find_placeholders)
            .collect()
    }

    /// Validates invariant 2 from `spec.md` §3: every `{{name}}` placeholder
    /// in `chain` is declared in `metadata.parameters` or present in
    /// `available_outputs` (the union of this scenario's dependencies'
    /// declared outputs, supplied by the caller since resolving them
    /// requires the scenario index).
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::CoreError::UndeclaredPlaceholder`] for the
    /// first placeholder that is neither declared nor supplied.
    pub fn validate_placeholders(
        &self,
        available_outputs: &std::collections::BTreeSet<String>,
    ) -> Result<(), crate::error::CoreError> {
        for placeholder in self.chain_placeholders() {
            let declared = self
                .metadata
                .parameters
                .keys()
                .any(|p| p.as_str() == placeholder);
            let supplied = available_outputs.contains(placeholder);
            if !declared && !supplied {
                return Err(crate::error::CoreError::UndeclaredPlaceholder {
                    scenario: self.name.to_string(),
                    placeholder: placeholder.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Validates invariant 1 from `spec.md` §3: `chain` contains no secret
    /// *values*, only placeholders. A `type` action's `text` is suspect
    /// only when `is_secret` is true but `text` is not itself a bare
    /// `{{param}}` placeholder.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::CoreError::LiteralSecretInChain`] when a
    /// secret-flagged action's text is not a bare placeholder.
    pub fn validate_no_literal_secrets(&self) -> Result<(), crate::error::CoreError> {
        for action in &self.chain {
            if let crate::action::ActionKind::Type {
                text,
                is_secret,
                param_name,
                ..
            } = &action.kind
            {
                if *is_secret {
                    let expected = param_name
                        .as_ref()
                        .map(|name| format!("{{{{{name}}}}}"));
                    if expected.as_deref() != Some(text.as_str()) {
                        return Err(crate::error::CoreError::LiteralSecretInChain {
                            scenario: self.name.to_string(),
                            parameter: param_name.clone().unwrap_or_default(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
