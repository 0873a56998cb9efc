// crates/scenario-core/src/action.rs
// ============================================================================
// Module: Action
// Description: The closed set of replayable action variants.
// Purpose: Represent one step of a scenario's chain, tagged by kind, with
//          kind-specific payloads so optimiser passes and executor dispatch
//          stay exhaustive.
// Dependencies: serde, crate::selector, crate::time
// ============================================================================

//! ## Overview
//! `spec.md` §9 is explicit: "Actions form a closed set of variants; prefer
//! a tagged-variant representation over inheritance." [`Action`] is that
//! representation. Each recorded action carries a [`RecordingTimestamp`]
//! used only to order the raw stream during optimisation (`spec.md` §3).

use serde::Deserialize;
use serde::Serialize;

use crate::selector::SelectorRecord;
use crate::time::RecordingTimestamp;

/// One replayable step in a scenario's chain (`spec.md` §3).
///
/// # Invariants
/// - `timestamp` is monotonically increasing within one raw recording
///   stream; it has no meaning after optimisation beyond original ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// The action's ordering key from the recording session.
    pub timestamp: RecordingTimestamp,
    /// The kind-specific payload.
    pub kind: ActionKind,
}

impl Action {
    /// Wraps a kind in an action with the given recording timestamp.
    #[must_use]
    pub const fn new(timestamp: RecordingTimestamp, kind: ActionKind) -> Self {
        Self { timestamp, kind }
    }

    /// Returns the selector this action targets, if any.
    ///
    /// `navigate` and `wait { mode: duration }` have no selector.
    #[must_use]
    pub fn selector(&self) -> Option<&SelectorRecord> {
        self.kind.selector()
    }

    /// Returns a mutable reference to the selector this action targets, if any.
    pub fn selector_mut(&mut self) -> Option<&mut SelectorRecord> {
        self.kind.selector_mut()
    }
}

/// Key names recordable from `keydown` (`spec.md` §4.3: "only special keys").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum KeyName {
    /// The Enter/Return key.
    Enter,
    /// The Escape key.
    Escape,
    /// The Tab key.
    Tab,
    /// The Up arrow key.
    ArrowUp,
    /// The Down arrow key.
    ArrowDown,
    /// The Left arrow key.
    ArrowLeft,
    /// The Right arrow key.
    ArrowRight,
}

/// A modifier key active during a `keypress` action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum KeyModifier {
    /// The Control key.
    Control,
    /// The Shift key.
    Shift,
    /// The Alt/Option key.
    Alt,
    /// The Meta/Command/Windows key.
    Meta,
}

/// The mode of a `select` action (`spec.md` §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SelectMode {
    /// Native `<select>` element: set `value` directly.
    Native {
        /// The option value to select.
        value: String,
        /// The option's displayed text, captured for diagnostics.
        #[serde(skip_serializing_if = "Option::is_none")]
        display_text: Option<String>,
    },
    /// A JavaScript-driven custom dropdown widget, replayed as a click chain.
    Custom {
        /// The click/wait/click steps that open and choose the option.
        steps: Vec<CustomSelectStep>,
    },
}

/// One step of a custom-select replay chain (`spec.md` §3, §4.4 pass 3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum CustomSelectStep {
    /// Click the element at `selector`.
    Click {
        /// The target selector.
        selector: SelectorRecord,
    },
    /// Wait the given number of milliseconds before the next step.
    Wait {
        /// Milliseconds to wait.
        ms: u64,
    },
}

/// A `wait` action's payload (`spec.md` §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WaitSpec {
    /// Wait a fixed duration.
    Duration {
        /// Milliseconds to wait.
        ms: u64,
    },
    /// Wait for a selector to appear, up to `timeout_ms`.
    Selector {
        /// The selector to wait for.
        selector: SelectorRecord,
        /// Maximum time to wait, in milliseconds.
        timeout_ms: u64,
    },
}

/// A drag action's endpoint: either a selector or fixed coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DragEndpoint {
    /// A DOM node located by selector.
    Selector {
        /// The target selector.
        selector: SelectorRecord,
    },
    /// Fixed viewport coordinates.
    Coordinates {
        /// X coordinate in CSS pixels.
        x: f64,
        /// Y coordinate in CSS pixels.
        y: f64,
    },
}

/// A navigation wait condition (`spec.md` §3 `navigate` payload).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigateWaitCondition {
    /// Wait for the `load` event.
    Load,
    /// Wait for `DOMContentLoaded`.
    DomContentLoaded,
    /// Wait for network idle.
    NetworkIdle,
}

/// The kind-specific payload of an [`Action`] (`spec.md` §3 variant table).
///
/// # Invariants
/// - This is a closed set; adding a kind requires updating every optimiser
///   pass and the executor's dispatch table (`spec.md` §9).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ActionKind {
    /// A click on a resolved interactive target.
    Click {
        /// The target selector.
        selector: SelectorRecord,
        /// Captured link text, if the target was a link or labeled control.
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        /// Captured `href`, if the target was an anchor.
        #[serde(skip_serializing_if = "Option::is_none")]
        href: Option<String>,
        /// Whether the executor should run post-click settlement.
        #[serde(default)]
        requires_wait: bool,
    },
    /// Typing into an input, textarea, or contenteditable.
    Type {
        /// The target selector.
        selector: SelectorRecord,
        /// Text to type; may contain `{{param}}` placeholders.
        text: String,
        /// Whether `text` is a secret placeholder.
        #[serde(default)]
        is_secret: bool,
        /// The bound parameter name, when `is_secret` is true.
        #[serde(skip_serializing_if = "Option::is_none")]
        param_name: Option<String>,
        /// Whether to clear the field before typing.
        #[serde(default)]
        clear_first: bool,
    },
    /// Selecting an option, natively or via a custom widget.
    Select {
        /// The target selector (the `<select>` or the custom container).
        selector: SelectorRecord,
        /// The selection mode and its payload.
        #[serde(flatten)]
        mode: SelectMode,
    },
    /// Scrolling a target to a final offset.
    Scroll {
        /// The scrolled element's selector.
        selector: SelectorRecord,
        /// Target horizontal scroll offset.
        scroll_x: f64,
        /// Target vertical scroll offset.
        scroll_y: f64,
    },
    /// Hovering over a target.
    Hover {
        /// The hovered element's selector.
        selector: SelectorRecord,
    },
    /// A recorded special key press with active modifiers.
    Keypress {
        /// The key pressed.
        key: KeyName,
        /// Modifiers held during the key press.
        #[serde(default)]
        modifiers: Vec<KeyModifier>,
    },
    /// Waiting for a duration or for a selector to appear.
    Wait {
        /// The wait's mode and payload.
        #[serde(flatten)]
        spec: WaitSpec,
    },
    /// Uploading a file to a file input.
    Upload {
        /// The file input's selector.
        selector: SelectorRecord,
        /// File path; may contain a `{{param}}` placeholder.
        file_path: String,
    },
    /// Dragging from a source to a target.
    Drag {
        /// The drag source.
        source: DragEndpoint,
        /// The drop target.
        target: DragEndpoint,
    },
    /// Navigating to a URL.
    Navigate {
        /// The destination URL; may contain a `{{param}}` placeholder.
        url: String,
        /// The condition that marks navigation complete.
        wait_condition: NavigateWaitCondition,
    },
    /// Extracting a value from the page into a named output.
    Extract {
        /// The source element's selector.
        selector: SelectorRecord,
        /// The attribute to read, or `None` for text content.
        #[serde(skip_serializing_if = "Option::is_none")]
        attribute: Option<String>,
        /// Whether to extract all matches rather than the first.
        #[serde(default)]
        multiple: bool,
        /// The output name the result is bound to.
        output_name: String,
    },
}

impl ActionKind {
    /// Returns every string field that may carry `{{param}}` placeholders,
    /// in a stable but unspecified order. Used by placeholder validation
    /// (`spec.md` §3 invariant 2) and by parameter substitution
    /// (`spec.md` §4.6 step 1).
    #[must_use]
    pub fn placeholder_bearing_strings(&self) -> Vec<&str> {
        match self {
            Self::Type { text, .. } => vec![text.as_str()],
            Self::Upload { file_path, .. } => vec![file_path.as_str()],
            Self::Navigate { url, .. } => vec![url.as_str()],
            Self::Select {
                mode: SelectMode::Native { value, .. },
                ..
            } => vec![value.as_str()],
            Self::Click { .. }
            | Self::Select { .. }
            | Self::Scroll { .. }
            | Self::Hover { .. }
            | Self::Keypress { .. }
            | Self::Wait { .. }
            | Self::Drag { .. }
            | Self::Extract { .. } => Vec::new(),
        }
    }

    /// Returns a short, stable name for this kind, e.g. for logging.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Click { .. } => "click",
            Self::Type { .. } => "type",
            Self::Select { .. } => "select",
            Self::Scroll { .. } => "scroll",
            Self::Hover { .. } => "hover",
            Self::Keypress { .. } => "keypress",
            Self::Wait { .. } => "wait",
            Self::Upload { .. } => "upload",
            Self::Drag { .. } => "drag",
            Self::Navigate { .. } => "navigate",
            Self::Extract { .. } => "extract",
        }
    }

    /// Returns the selector this kind targets, if any.
    #[must_use]
    pub fn selector(&self) -> Option<&SelectorRecord> {
        match self {
            Self::Click { selector, .. }
            | Self::Type { selector, .. }
            | Self::Select { selector, .. }
            | Self::Scroll { selector, .. }
            | Self::Hover { selector }
            | Self::Upload { selector, .. }
            | Self::Extract { selector, .. } => Some(selector),
            Self::Wait {
                spec: WaitSpec::Selector { selector, .. },
            } => Some(selector),
            Self::Drag { source, .. } => match source {
                DragEndpoint::Selector { selector } => Some(selector),
                DragEndpoint::Coordinates { .. } => None,
            },
            Self::Wait { .. } | Self::Keypress { .. } | Self::Navigate { .. } => None,
        }
    }

    /// Returns a mutable reference to the selector this kind targets, if any.
    pub fn selector_mut(&mut self) -> Option<&mut SelectorRecord> {
        match self {
            Self::Click { selector, .. }
            | Self::Type { selector, .. }
            | Self::Select { selector, .. }
            | Self::Scroll { selector, .. }
            | Self::Hover { selector }
            | Self::Upload { selector, .. }
            | Self::Extract { selector, .. } => Some(selector),
            Self::Wait {
                spec: WaitSpec::Selector { selector, .. },
            } => Some(selector),
            Self::Drag { source, .. } => match source {
                DragEndpoint::Selector { selector } => Some(selector),
                DragEndpoint::Coordinates { .. } => None,
            },
            Self::Wait { .. } | Self::Keypress { .. } | Self::Navigate { .. } => None,
        }
    }
}
