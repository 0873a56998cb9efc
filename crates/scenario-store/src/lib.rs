// crates/scenario-store/src/lib.rs
// ============================================================================
// Module: Scenario Forge Store
// Description: File-backed persistence for scenarios, their cached index,
//              and their separately-kept secrets.
// Purpose: Own everything named in `spec.md` component C5.
// Dependencies: scenario-core, scenario-contract, tracing
// ============================================================================

//! ## Overview
//! This crate has no recording or execution concerns — those live in
//! `scenario-recorder` and `scenario-exec`. It owns one thing: turning a
//! [`scenario_core::Scenario`] into durable files and back, plus the cached
//! [`index::Index`] that makes `list`/`search`/`stats` cheap.

pub mod config;
pub mod error;
pub mod fs_store;
pub mod index;
pub mod secrets_store;

pub use config::StoreConfig;
pub use config::ensure_layout;
pub use error::StoreError;
pub use fs_store::ScenarioStore;
pub use index::Index;
pub use index::ScenarioSummary;
pub use index::StoreStats;
pub use secrets_store::SecretsStore;
