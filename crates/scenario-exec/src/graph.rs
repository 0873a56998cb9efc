// crates/scenario-exec/src/graph.rs
// ============================================================================
// Module: Dependency Graph Resolution
// Description: Builds a topological execution plan from a scenario's
//              declared dependencies, rejecting cycles and unknown targets.
// Purpose: C6 dependency resolution (`spec.md` §4.6).
// Dependencies: scenario-core, scenario-store
// ============================================================================

//! ## Overview
//! Resolution is a depth-first post-order walk: a scenario's dependencies
//! are resolved (and appear earlier in the plan) before the scenario itself.
//! Cycle detection uses the classic `visiting`/`visited` two-set DFS —
//! `visiting` holds the current recursion stack, `visited` holds finished
//! nodes. A node reappearing in `visiting` is a cycle.

use std::collections::BTreeSet;

use scenario_core::DependencyEdge;
use scenario_core::Scenario;
use scenario_core::ScenarioName;
use scenario_store::ScenarioStore;
use scenario_store::StoreError;

/// One node of a resolved execution plan, in dependency-first order.
#[derive(Debug, Clone)]
pub struct PlanNode {
    /// The resolved scenario.
    pub scenario: Scenario,
    /// The edge that pulled this scenario in, or `None` for the root.
    pub edge: Option<DependencyEdge>,
}

/// A fully resolved, cycle-free, dependency-first execution order.
#[derive(Debug, Clone)]
pub struct ResolutionPlan {
    /// Nodes in the order they should execute: dependencies before dependents.
    pub order: Vec<PlanNode>,
}

impl ResolutionPlan {
    /// The root scenario (the last node in dependency-first order).
    #[must_use]
    pub fn root(&self) -> Option<&PlanNode> {
        self.order.last()
    }

    /// Restricts the plan to just its root, dropping every dependency node.
    /// Used when the caller asked not to execute dependencies; resolution
    /// and validation still ran over the full graph beforehand.
    #[must_use]
    pub fn root_only(mut self) -> Self {
        if let Some(root) = self.order.pop() {
            self.order = vec![root];
        }
        self
    }
}

/// A source of scenario documents by name, used to walk dependency edges.
pub trait ScenarioSource {
    /// Loads a scenario by name.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Lookup`] if the underlying store fails for a
    /// reason other than "not found".
    fn load_scenario(&self, name: &ScenarioName) -> Result<Option<Scenario>, GraphError>;
}

impl ScenarioSource for ScenarioStore {
    fn load_scenario(&self, name: &ScenarioName) -> Result<Option<Scenario>, GraphError> {
        match self.load(name) {
            Ok(scenario) => Ok(Some(scenario)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(source) => Err(GraphError::Lookup {
                scenario: name.clone(),
                source,
            }),
        }
    }
}

/// Errors raised while resolving a dependency graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The root scenario itself does not exist.
    #[error("scenario `{0}` not found")]
    RootNotFound(ScenarioName),
    /// A dependency cycle was detected while walking the graph.
    #[error("dependency cycle: `{from}` depends (directly or transitively) on `{to}`, which depends back on `{from}`")]
    Cycle {
        /// The scenario whose dependency walk discovered the cycle.
        from: ScenarioName,
        /// The scenario already on the recursion stack.
        to: ScenarioName,
    },
    /// A non-optional dependency edge names a scenario that does not exist.
    #[error("scenario `{scenario}` depends on unknown scenario `{target}`")]
    UnknownDependency {
        /// The dependent scenario.
        scenario: ScenarioName,
        /// The missing target.
        target: ScenarioName,
    },
    /// The backing store failed while loading a dependency.
    #[error("failed to load scenario `{scenario}`")]
    Lookup {
        /// The scenario that failed to load.
        scenario: ScenarioName,
        /// The underlying store error.
        #[source]
        source: StoreError,
    },
}

/// Resolves the full dependency-first execution plan for `root`.
///
/// # Errors
///
/// Returns [`GraphError::RootNotFound`], [`GraphError::Cycle`],
/// [`GraphError::UnknownDependency`], or [`GraphError::Lookup`].
pub fn resolve<S: ScenarioSource>(
    source: &S,
    root: &ScenarioName,
) -> Result<ResolutionPlan, GraphError> {
    let root_scenario = source
        .load_scenario(root)?
        .ok_or_else(|| GraphError::RootNotFound(root.clone()))?;

    let mut visiting = BTreeSet::new();
    let mut visited = BTreeSet::new();
    let mut order = Vec::new();

    visit(source, root, None, root_scenario, &mut visiting, &mut visited, &mut order)?;

    Ok(ResolutionPlan { order })
}

#[allow(clippy::too_many_arguments)]
fn visit<S: ScenarioSource>(
    source: &S,
    name: &ScenarioName,
    edge: Option<DependencyEdge>,
    scenario: Scenario,
    visiting: &mut BTreeSet<ScenarioName>,
    visited: &mut BTreeSet<ScenarioName>,
    order: &mut Vec<PlanNode>,
) -> Result<(), GraphError> {
    if visited.contains(name) {
        return Ok(());
    }
    visiting.insert(name.clone());

    for dep_edge in &scenario.metadata.dependencies {
        if visiting.contains(&dep_edge.scenario) {
            return Err(GraphError::Cycle {
                from: name.clone(),
                to: dep_edge.scenario.clone(),
            });
        }
        if visited.contains(&dep_edge.scenario) {
            continue;
        }
        match source.load_scenario(&dep_edge.scenario)? {
            Some(dep_scenario) => {
                visit(
                    source,
                    &dep_edge.scenario,
                    Some(dep_edge.clone()),
                    dep_scenario,
                    visiting,
                    visited,
                    order,
                )?;
            }
            None if dep_edge.optional => {
                tracing::debug!(
                    scenario = %name,
                    dependency = %dep_edge.scenario,
                    "skipping missing optional dependency"
                );
            }
            None => {
                return Err(GraphError::UnknownDependency {
                    scenario: name.clone(),
                    target: dep_edge.scenario.clone(),
                });
            }
        }
    }

    visiting.remove(name);
    visited.insert(name.clone());
    order.push(PlanNode { scenario, edge });
    Ok(())
}
