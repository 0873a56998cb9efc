// crates/scenario-exec/src/driver.rs
// ============================================================================
// Module: Page Driver Boundary
// Description: The async boundary traits the executor drives; a host
//              (browser extension, CDP client, test harness) implements them.
// Purpose: `spec.md` §6 external interfaces.
// Dependencies: scenario-core, async-trait, serde_json
// ============================================================================

//! ## Overview
//! The executor never touches a page directly. It drives a [`PageDriver`]
//! and, on selector-resolution failure, falls back to a [`SmartFinder`].
//! Both traits are `async` — unlike `scenario-recorder`'s synchronous
//! `DomQuery`/`SnapshotStore` boundaries, page actions are suspension points
//! (`spec.md` §5): the executor yields to the host's event loop while a
//! click settles or a navigation completes.

use std::time::Duration;

use async_trait::async_trait;
use scenario_core::ElementInfo;
use scenario_core::KeyModifier;
use scenario_core::KeyName;
use scenario_core::SelectMode;
use serde_json::Value;

/// Errors a [`PageDriver`] or [`SmartFinder`] implementation may report.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The selector matched no element.
    #[error("selector `{0}` did not resolve to any element")]
    ElementNotFound(String),
    /// The selector matched more than one element where exactly one was expected.
    #[error("selector `{0}` resolved to more than one element")]
    AmbiguousElement(String),
    /// The element exists but cannot accept the requested action (hidden, disabled, detached).
    #[error("element at `{selector}` is not actionable: {reason}")]
    NotActionable {
        /// The selector involved.
        selector: String,
        /// A short, host-supplied reason.
        reason: String,
    },
    /// A wait condition was not satisfied before its timeout elapsed.
    #[error("timed out after {0:?} waiting for condition")]
    Timeout(Duration),
    /// Navigation failed (network error, blocked, crashed frame).
    #[error("navigation to `{0}` failed: {1}")]
    NavigationFailed(String, String),
    /// The host could not evaluate the requested expression.
    #[error("evaluation failed: {0}")]
    EvaluationFailed(String),
    /// Any other host-reported failure.
    #[error("driver error: {0}")]
    Other(String),
}

/// A point on the page, in CSS pixels relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal offset.
    pub x: f64,
    /// Vertical offset.
    pub y: f64,
}

/// An axis-aligned bounding box, in CSS pixels relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct BoundingBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// The actionable state of a resolved element, sampled for failure
/// diagnostics and pre-flight checks.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ElementState {
    /// Whether the element is visible (non-zero size, not `display: none`, in viewport or scrollable into it).
    pub visible: bool,
    /// Whether the element is disabled.
    pub disabled: bool,
    /// Whether the element is read-only (inputs/textareas).
    pub readonly: bool,
    /// The element's current bounding box, if it has layout.
    pub bounding_box: Option<BoundingBox>,
}

/// A snapshot of page-level readiness signals, used for post-action settlement
/// and for building a [`crate::diagnostics::FailureDiagnostic`].
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct PageReadiness {
    /// Whether any CSS transition/animation is still running.
    pub animating: bool,
    /// Whether the network is considered idle (no in-flight requests above the host's threshold).
    pub network_idle: bool,
    /// Whether the DOM has stopped mutating for the host's quiescence window.
    pub dom_quiescent: bool,
}

/// The async boundary the executor drives to perform page actions
/// (`spec.md` §6).
///
/// Every method is a suspension point: implementations are expected to
/// `await` real I/O (CDP round-trips, extension message passing).
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigates the page to `url` and waits according to `wait_condition`.
    async fn navigate(&self, url: &str) -> Result<(), DriverError>;

    /// Clicks the element matching `selector`.
    async fn click(&self, selector: &str) -> Result<(), DriverError>;

    /// Types `text` into the element matching `selector`, optionally clearing
    /// its existing value first and optionally pausing `delay` between
    /// keystrokes (used to coalesce recorded keystrokes back into one call).
    async fn type_text(
        &self,
        selector: &str,
        text: &str,
        clear_first: bool,
        delay: Option<Duration>,
    ) -> Result<(), DriverError>;

    /// Applies `mode` to a native `<select>` (or ARIA-equivalent) at `selector`.
    async fn select(&self, selector: &str, mode: &SelectMode) -> Result<(), DriverError>;

    /// Hovers the pointer over the element matching `selector`.
    async fn hover(&self, selector: &str) -> Result<(), DriverError>;

    /// Dispatches a key press with modifiers, targeting the current focus.
    async fn key_press(&self, key: &KeyName, modifiers: &[KeyModifier]) -> Result<(), DriverError>;

    /// Scrolls the element matching `selector` (or the viewport, if `None`)
    /// by the given deltas.
    async fn scroll(&self, selector: Option<&str>, dx: i32, dy: i32) -> Result<(), DriverError>;

    /// Uploads a local file to a `<input type="file">` at `selector`.
    async fn upload_file(&self, selector: &str, file_path: &str) -> Result<(), DriverError>;

    /// Moves the pointer to `point` without pressing.
    async fn pointer_move(&self, point: Point) -> Result<(), DriverError>;

    /// Presses the pointer at its current location.
    async fn pointer_press(&self) -> Result<(), DriverError>;

    /// Releases a previously pressed pointer at its current location.
    async fn pointer_release(&self) -> Result<(), DriverError>;

    /// Blocks until `selector` resolves to a visible element, or `timeout` elapses.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Waits a fixed duration, used for `Action::Wait(WaitSpec::Fixed)`.
    async fn wait_fixed(&self, duration: Duration);

    /// Evaluates a host-defined expression/function in the page context.
    async fn evaluate(&self, expression: &str) -> Result<Value, DriverError>;

    /// Returns the page's current cookies as name/value pairs.
    async fn cookies(&self) -> Result<Vec<(String, String)>, DriverError>;

    /// Returns the page's current URL.
    async fn current_url(&self) -> Result<String, DriverError>;

    /// Returns the page's current document title.
    async fn title(&self) -> Result<String, DriverError>;

    /// Returns whether `selector` currently resolves to exactly one element.
    async fn element_exists(&self, selector: &str) -> Result<bool, DriverError>;

    /// Reads an attribute (or, for `attribute == "text"`, the text content)
    /// of the element matching `selector`. Used by `Action::Extract`.
    async fn read_attribute(
        &self,
        selector: &str,
        attribute: &str,
    ) -> Result<Option<String>, DriverError>;

    /// Reads every matching element's attribute, for `Action::Extract { multiple: true, .. }`.
    async fn read_attribute_all(
        &self,
        selector: &str,
        attribute: &str,
    ) -> Result<Vec<String>, DriverError>;

    /// Best-effort heuristic for whether the page looks authenticated
    /// (session storage key, auth cookie, or a visible logout control) —
    /// backs the `is_authenticated` guard.
    async fn looks_authenticated(&self) -> Result<bool, DriverError>;

    /// Samples the current settlement signals used for post-action waits.
    async fn readiness(&self) -> Result<PageReadiness, DriverError>;

    /// Returns structural info about the element matching `selector`, used
    /// to enrich failure diagnostics. `Ok(None)` means the selector did not
    /// resolve.
    async fn describe_element(&self, selector: &str) -> Result<Option<ElementInfo>, DriverError>;

    /// Returns the actionable state (visibility, disabled, readonly,
    /// bounding box) of the element matching `selector`, if it resolves.
    async fn element_state(&self, selector: &str) -> Result<Option<ElementState>, DriverError>;

    /// Returns a short description of the currently focused element, if any
    /// (used to enrich failure diagnostics).
    async fn active_element(&self) -> Result<Option<String>, DriverError>;

    /// Returns short descriptions of any open modal/overlay elements the
    /// host can detect (used to enrich failure diagnostics).
    async fn open_overlays(&self) -> Result<Vec<String>, DriverError>;
}

/// One candidate a [`SmartFinder`] proposes for a failed selector, ranked by
/// the host's own confidence scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct FindCandidate {
    /// A selector the host believes resolves to the described element.
    pub selector: String,
    /// The host's confidence in this candidate, in `[0.0, 1.0]`.
    pub confidence: f32,
    /// Structural info about the candidate element, if available.
    pub element_info: Option<ElementInfo>,
}

/// The natural-language recovery boundary: when every recorded selector and
/// fallback has failed, the executor asks the host to find a replacement by
/// description (`spec.md` §4.6 recovery path).
#[async_trait]
pub trait SmartFinder: Send + Sync {
    /// Finds up to `max_results` candidates matching `description`, ranked
    /// best-first.
    async fn find(
        &self,
        description: &str,
        max_results: usize,
    ) -> Result<Vec<FindCandidate>, DriverError>;
}

/// A [`SmartFinder`] that never finds anything, for hosts that have not
/// wired up element-description search.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSmartFinder;

#[async_trait]
impl SmartFinder for NoopSmartFinder {
    async fn find(
        &self,
        _description: &str,
        _max_results: usize,
    ) -> Result<Vec<FindCandidate>, DriverError> {
        Ok(Vec::new())
    }
}
