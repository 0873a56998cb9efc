// crates/scenario-core/src/ids.rs
// ============================================================================
// Module: Scenario Forge Identifiers
// Description: Opaque, validated newtype identifiers used across the core.
// Purpose: Give scenario names, parameter names, output names, and tags
//          stable wire forms and construction-time validation.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Identifiers here are thin wrappers over `String`. Validation happens once,
//! at construction, so downstream code can rely on the invariants documented
//! on each type rather than re-checking them.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Errors raised when constructing an identifier from a raw string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The raw string was empty.
    #[error("identifier must not be empty")]
    Empty,
    /// The raw string did not match the identifier's required shape.
    #[error("identifier `{raw}` is not a valid {kind}")]
    InvalidShape {
        /// The kind of identifier that rejected the value.
        kind: &'static str,
        /// The raw value that was rejected.
        raw: String,
    },
}

/// Returns true when `name` matches `[A-Za-z_][A-Za-z0-9_]*`, the parameter
/// placeholder grammar from `spec.md` §6.
fn is_placeholder_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Scenario name: the unique storage key for a scenario (`spec.md` §3).
///
/// # Invariants
/// - Non-empty.
/// - Contains no path separators, so it is always safe as a filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioName(String);

impl ScenarioName {
    /// Builds a scenario name, rejecting empty strings and path separators.
    ///
    /// # Errors
    ///
    /// Returns [`IdError`] if `raw` is empty or contains `/`, `\`, or `..`.
    pub fn new(raw: impl Into<String>) -> Result<Self, IdError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(IdError::Empty);
        }
        if raw.contains(['/', '\\']) || raw.contains("..") {
            return Err(IdError::InvalidShape {
                kind: "scenario name",
                raw,
            });
        }
        Ok(Self(raw))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScenarioName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parameter name: a `{{name}}` placeholder identifier.
///
/// # Invariants
/// - Matches `[A-Za-z_][A-Za-z0-9_]*` (`spec.md` §6 wire-level syntax).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterName(String);

impl ParameterName {
    /// Builds a parameter name, rejecting anything outside the placeholder grammar.
    ///
    /// # Errors
    ///
    /// Returns [`IdError`] if `raw` does not match `[A-Za-z_][A-Za-z0-9_]*`.
    pub fn new(raw: impl Into<String>) -> Result<Self, IdError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(IdError::Empty);
        }
        if !is_placeholder_name(&raw) {
            return Err(IdError::InvalidShape {
                kind: "parameter name",
                raw,
            });
        }
        Ok(Self(raw))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Output name: a named value a scenario produces for downstream dependents.
///
/// # Invariants
/// - Matches `[A-Za-z_][A-Za-z0-9_]*`, the same grammar as parameter names,
///   since outputs are substituted into placeholders by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputName(String);

impl OutputName {
    /// Builds an output name.
    ///
    /// # Errors
    ///
    /// Returns [`IdError`] if `raw` does not match `[A-Za-z_][A-Za-z0-9_]*`.
    pub fn new(raw: impl Into<String>) -> Result<Self, IdError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(IdError::Empty);
        }
        if !is_placeholder_name(&raw) {
            return Err(IdError::InvalidShape {
                kind: "output name",
                raw,
            });
        }
        Ok(Self(raw))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutputName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A free-form scenario tag used for search and indexing.
///
/// # Invariants
/// - Non-empty; comparisons are case-insensitive via [`Tag::normalized`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    /// Builds a tag, rejecting empty strings.
    ///
    /// # Errors
    ///
    /// Returns [`IdError`] if `raw` is empty.
    pub fn new(raw: impl Into<String>) -> Result<Self, IdError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(IdError::Empty);
        }
        Ok(Self(raw))
    }

    /// Returns the tag as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a lowercase copy used for case-insensitive matching.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
