// crates/scenario-recorder/src/lib.rs
// ============================================================================
// Module: Scenario Forge Recorder
// Description: Live selector synthesis, secret classification, and the
//              in-page recording state machine.
// Purpose: Turn host-reported DOM events into an optimised, replayable
//          action chain (`spec.md` components C1–C4).
// Dependencies: scenario-core, tracing
// ============================================================================

//! ## Overview
//! This crate owns everything that runs while a scenario is being recorded:
//! the [`dom::DomQuery`] boundary and node snapshots the host feeds in, the
//! selector synthesiser, the secret classifier, the recorder state machine,
//! and the action optimiser the recorder runs at save time. It has no
//! storage or execution concerns — those live in `scenario-store` and
//! `scenario-exec`.

pub mod classifier;
pub mod dom;
pub mod optimizer;
pub mod recorder;
pub mod selector_synth;
pub mod snapshot;

pub use classifier::Classification;
pub use classifier::FieldSignals;
pub use classifier::SecretKind;
pub use classifier::classify_field;
pub use classifier::is_auth_form;
pub use dom::DomNode;
pub use dom::DomQuery;
pub use dom::NodeId;
pub use dom::ParentSummary;
pub use optimizer::optimise;
pub use recorder::DomEvent;
pub use recorder::RecorderError;
pub use recorder::RecorderSession;
pub use recorder::RecorderState;
pub use selector_synth::is_stable_class;
pub use selector_synth::synthesise;
pub use snapshot::RecorderSnapshot;
pub use snapshot::SnapshotStore;
