// crates/scenario-exec/src/lib.rs
// ============================================================================
// Module: Scenario Forge Executor
// Description: Dependency resolution and replay of recorded scenarios
//              against a host-implemented page driver.
// Purpose: Own everything named in `spec.md` component C6.
// Dependencies: scenario-core, scenario-store, async-trait, tokio, tracing
// ============================================================================

//! ## Overview
//! This crate never touches a page directly — it drives the [`driver::PageDriver`]
//! and [`driver::SmartFinder`] boundaries a host implements. [`executor::Executor`]
//! ties together dependency resolution ([`graph`]), guard evaluation
//! ([`guard`]), and per-action retry/recovery with structured failure
//! reporting ([`diagnostics`]).

pub mod diagnostics;
pub mod driver;
pub mod executor;
pub mod graph;
pub mod guard;

pub use diagnostics::AttemptRecord;
pub use diagnostics::AttemptSource;
pub use diagnostics::FailureDiagnostic;
pub use diagnostics::PageContext;
pub use driver::DriverError;
pub use driver::FindCandidate;
pub use driver::NoopSmartFinder;
pub use driver::PageDriver;
pub use driver::PageReadiness;
pub use driver::SmartFinder;
pub use executor::ExecutionReport;
pub use executor::ExecutionStatus;
pub use executor::Executor;
pub use executor::ExecutorConfig;
pub use executor::ExecutorError;
pub use executor::ScenarioExecutionResult;
pub use graph::GraphError;
pub use graph::PlanNode;
pub use graph::ResolutionPlan;
pub use graph::ScenarioSource;
pub use guard::GuardContext;
pub use guard::GuardError;
