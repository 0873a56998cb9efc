// crates/scenario-core/src/lib.rs
// ============================================================================
// Module: Scenario Forge Core
// Description: Canonical data model shared by every Scenario Forge crate.
// Purpose: Define selectors, actions, scenarios, and the errors they raise.
// Dependencies: serde, serde_json, thiserror, time
// ============================================================================

//! ## Overview
//! This crate defines the data shapes described in `spec.md` §3: selector
//! records, actions, scenarios, dependency edges, and secrets records. It is
//! deliberately free of I/O — recording, storage, and execution crates build
//! on these types but own their own side effects.

pub mod action;
pub mod error;
pub mod ids;
pub mod placeholder;
pub mod scenario;
pub mod secrets;
pub mod selector;
pub mod time;

pub use action::Action;
pub use action::ActionKind;
pub use action::CustomSelectStep;
pub use action::DragEndpoint;
pub use action::KeyModifier;
pub use action::KeyName;
pub use action::NavigateWaitCondition;
pub use action::SelectMode;
pub use action::WaitSpec;
pub use error::CoreError;
pub use ids::OutputName;
pub use ids::ParameterName;
pub use ids::ScenarioName;
pub use ids::Tag;
pub use scenario::DependencyEdge;
pub use scenario::DependencyParameterMapping;
pub use scenario::Guard;
pub use scenario::GuardKind;
pub use scenario::Metadata;
pub use scenario::OutputSpec;
pub use scenario::OutputTransform;
pub use scenario::ParameterSpec;
pub use scenario::ParameterType;
pub use scenario::Scenario;
pub use secrets::SecretsRecord;
pub use selector::ElementInfo;
pub use selector::SelectorRecord;
pub use time::RecordingTimestamp;
pub use time::Timestamp;
