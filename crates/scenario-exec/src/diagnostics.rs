// crates/scenario-exec/src/diagnostics.rs
// ============================================================================
// Module: Failure Diagnostics
// Description: Structured failure reports the executor builds when an
//              action exhausts every selector, fallback, and smart-finder
//              candidate.
// Purpose: `spec.md` §4.6/§7 final-failure diagnostics.
// Dependencies: scenario-core, crate::driver
// ============================================================================

//! ## Overview
//! A [`FailureDiagnostic`] is built once, at the point an action gives up —
//! not per attempt. It captures enough page context (URL, title, element
//! actionable state, readiness, overlays, focus) plus the full attempt
//! history to let a human (or a calling agent) understand why replay broke
//! without re-running it against a live page.

use scenario_core::ElementInfo;
use serde::Serialize;

use crate::driver::ElementState;
use crate::driver::PageDriver;
use crate::driver::PageReadiness;

/// Which source produced a selector tried during recovery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AttemptSource {
    /// The recorded primary selector.
    Primary,
    /// A recorded fallback, promoted to primary for this attempt.
    Fallback,
    /// A candidate proposed by the smart finder.
    SmartFinder,
}

/// One attempted selector and its outcome, in chronological order.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptRecord {
    /// The selector string tried.
    pub selector: String,
    /// Where this selector came from.
    pub source: AttemptSource,
    /// A short description of why it failed.
    pub error: String,
}

/// A snapshot of page state taken at the moment an action's final attempt failed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageContext {
    /// The page's URL at failure time.
    pub url: String,
    /// The page's title at failure time.
    pub title: String,
    /// Settlement signals sampled at failure time.
    pub readiness: PageReadiness,
    /// The last-tried selector's actionable state, if it resolved at all.
    pub element_state: Option<ElementState>,
    /// The last-tried selector's structural descriptors, if it resolved at all.
    pub element_info: Option<ElementInfo>,
    /// A description of the currently focused element, if any.
    pub active_element: Option<String>,
    /// Descriptions of any open modal/overlay elements.
    pub open_overlays: Vec<String>,
}

/// The full structured report for an action that could not be completed.
#[derive(Debug, Clone, Serialize)]
pub struct FailureDiagnostic {
    /// The index of the failing action within its scenario's chain.
    pub action_index: usize,
    /// Page context captured at the moment of final failure.
    pub page: PageContext,
    /// Every selector tried, in order, with its outcome.
    pub attempts: Vec<AttemptRecord>,
    /// Heuristic, human-readable suggestions for fixing the scenario.
    pub suggestions: Vec<String>,
}

/// Captures best-effort page context for a diagnostic. Individual driver
/// queries that fail are recorded as absent rather than aborting the whole
/// capture — a diagnostic with partial context is still useful.
pub async fn capture_page_context(driver: &dyn PageDriver, last_selector: &str) -> PageContext {
    let url = driver.current_url().await.unwrap_or_default();
    let title = driver.title().await.unwrap_or_default();
    let readiness = driver.readiness().await.unwrap_or_default();
    let element_state = driver.element_state(last_selector).await.ok().flatten();
    let element_info = driver.describe_element(last_selector).await.ok().flatten();
    let active_element = driver.active_element().await.ok().flatten();
    let open_overlays = driver.open_overlays().await.unwrap_or_default();

    PageContext {
        url,
        title,
        readiness,
        element_state,
        element_info,
        active_element,
        open_overlays,
    }
}

/// Builds a final diagnostic from an action's attempt history and captured context.
#[must_use]
pub fn build_diagnostic(
    action_index: usize,
    page: PageContext,
    attempts: Vec<AttemptRecord>,
) -> FailureDiagnostic {
    let suggestions = build_suggestions(&page, &attempts);
    FailureDiagnostic {
        action_index,
        page,
        attempts,
        suggestions,
    }
}

fn build_suggestions(page: &PageContext, attempts: &[AttemptRecord]) -> Vec<String> {
    let mut suggestions = Vec::new();

    if !page.open_overlays.is_empty() {
        suggestions.push(format!(
            "an overlay is open ({}) — it may be intercepting the click or input",
            page.open_overlays.join(", ")
        ));
    }

    match &page.element_state {
        Some(state) if state.disabled => {
            suggestions.push("the target element is disabled; check for an unmet precondition earlier in the chain".to_string());
        }
        Some(state) if !state.visible => {
            suggestions.push("the target element exists but is not visible; it may be behind another element or still animating in".to_string());
        }
        None => {
            suggestions.push("no recorded or discovered selector resolved; the page layout may have changed since recording".to_string());
        }
        _ => {}
    }

    if !page.readiness.network_idle {
        suggestions.push("the network was still active when this action failed; consider adding a wait before it".to_string());
    }
    if page.readiness.animating {
        suggestions.push("an animation was still running; the target may not have settled into its final position".to_string());
    }

    if attempts.iter().any(|a| a.source == AttemptSource::SmartFinder) {
        suggestions.push("every recorded selector failed and the smart finder was consulted; re-recording this action is recommended".to_string());
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_overlay_when_present() {
        let page = PageContext {
            open_overlays: vec!["#cookie-banner".to_string()],
            ..Default::default()
        };
        let diagnostic = build_diagnostic(0, page, Vec::new());
        assert!(diagnostic.suggestions.iter().any(|s| s.contains("overlay")));
    }

    #[test]
    fn suggests_rerecording_after_smart_finder_attempt() {
        let attempts = vec![AttemptRecord {
            selector: "button.submit".to_string(),
            source: AttemptSource::SmartFinder,
            error: "not found".to_string(),
        }];
        let diagnostic = build_diagnostic(2, PageContext::default(), attempts);
        assert!(diagnostic.suggestions.iter().any(|s| s.contains("re-recording")));
    }

    #[test]
    fn no_element_state_suggests_layout_change() {
        let diagnostic = build_diagnostic(0, PageContext::default(), Vec::new());
        assert!(diagnostic.suggestions.iter().any(|s| s.contains("layout")));
    }
}
