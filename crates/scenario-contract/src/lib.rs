// crates/scenario-contract/src/lib.rs
// ============================================================================
// Module: Scenario Forge Contract
// Description: The wire-level scenario document format, its JSON Schema, and
//              the portable export/import codec.
// Purpose: Give storage, MCP, and third-party tooling one interoperable
//          document shape, bit-exact where interoperability matters
//          (`spec.md` §6).
// Dependencies: scenario-core, serde, serde_json, jsonschema, thiserror
// ============================================================================

//! ## Overview
//! This crate is the interoperability boundary: [`document::ScenarioDocument`]
//! preserves unknown fields round-trip (`spec.md` §6), [`schema`] validates
//! documents against the scenario JSON Schema, and [`codec`] implements the
//! portable textual export/import form used by the storage layer's
//! `export`/`import` operations (`spec.md` §4.5).

pub mod codec;
pub mod document;
pub mod schema;

pub use codec::CodecError;
pub use document::ScenarioDocument;
pub use schema::SchemaError;
pub use schema::validate_document;
