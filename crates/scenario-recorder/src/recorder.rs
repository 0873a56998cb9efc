// crates/scenario-recorder/src/recorder.rs
// ============================================================================
// Module: In-Page Recorder (C3)
// Description: The recording lifecycle state machine and event-to-action
//              normalisation.
// Purpose: Turn a stream of host-reported DOM events into a buffered,
//          optimisable action chain, per `spec.md` §4.3.
// Dependencies: scenario-core, crate::dom, crate::selector_synth,
//               crate::classifier, crate::optimizer, tracing
// ============================================================================

//! ## Overview
//! The recorder never assumes it shares memory with the recorded page
//! (`spec.md` §9): every event arrives as an owned [`DomEvent`] carrying its
//! own node snapshot, and every selector verification goes through the
//! host-implemented [`DomQuery`] boundary. Event timestamps (`at_ms`) are
//! supplied by the caller rather than generated here, since the debounce
//! windows below (input, scroll) are real wall-clock windows the host is in
//! the best position to measure.

use scenario_core::Action;
use scenario_core::ActionKind;
use scenario_core::DragEndpoint;
use scenario_core::KeyModifier;
use scenario_core::KeyName;
use scenario_core::NavigateWaitCondition;
use scenario_core::RecordingTimestamp;
use scenario_core::ScenarioName;
use scenario_core::SecretsRecord;
use scenario_core::SelectMode;
use scenario_core::Timestamp;
use thiserror::Error;

use crate::classifier::FieldSignals;
use crate::classifier::classify_field;
use crate::classifier::is_auth_form;
use crate::dom::DomNode;
use crate::dom::DomQuery;
use crate::dom::NodeId;
use crate::optimizer::optimise;
use crate::selector_synth::synthesise;
use crate::snapshot::RecorderSnapshot;

const INPUT_DEBOUNCE_MS: u64 = 500;
const SCROLL_DEBOUNCE_MS: u64 = 1000;

/// The recorder's lifecycle state (`spec.md` §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    /// No recording in progress.
    Idle,
    /// Actively buffering events.
    Recording,
    /// Temporarily not buffering events; resumable.
    Paused,
}

/// Errors raised by recorder lifecycle transitions.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// A lifecycle method required the recorder to be recording or paused,
    /// but it was idle.
    #[error("recorder is idle")]
    NotStarted,
    /// `start` was called while already recording or paused.
    #[error("recorder is already active")]
    AlreadyActive,
    /// `save` was called with an empty buffer (`spec.md` §4.3 edge case).
    #[error("cannot save an empty recording")]
    EmptyBuffer,
}

/// One event reported by the host, already resolved to a node snapshot.
#[derive(Debug, Clone)]
pub enum DomEvent {
    /// A click on a resolved interactive target.
    Click {
        /// The clicked node.
        node: DomNode,
        /// Captured link/button text, if any.
        text: Option<String>,
        /// Captured `href`, if the target was an anchor.
        href: Option<String>,
    },
    /// A change to a text-entry field's value.
    Input {
        /// The target node.
        node: DomNode,
        /// The current field value.
        value: String,
        /// Text gathered from the enclosing form, for the auth-form gate.
        form_text: String,
        /// Whether the enclosing form contains at least one password-type
        /// input, the auth-form gate's second admission path (`spec.md` §4.2).
        form_has_password_field: bool,
    },
    /// A native `<select>` value change.
    Change {
        /// The target node.
        node: DomNode,
        /// The selected option's value.
        value: String,
        /// The selected option's displayed text.
        display_text: Option<String>,
    },
    /// A scroll settling at a final offset.
    Scroll {
        /// The scrolled node.
        node: DomNode,
        /// Final horizontal offset.
        x: f64,
        /// Final vertical offset.
        y: f64,
    },
    /// A hover dwell on a target.
    Hover {
        /// The hovered node.
        node: DomNode,
    },
    /// A recordable special key press.
    KeyDown {
        /// The key pressed.
        key: KeyName,
        /// Active modifiers.
        modifiers: Vec<KeyModifier>,
    },
    /// The start of a drag gesture.
    DragStart {
        /// The drag source node.
        node: DomNode,
    },
    /// The end of a drag gesture.
    DragEnd {
        /// The drop target node.
        node: DomNode,
    },
    /// A top-level navigation.
    Navigate {
        /// The destination URL.
        url: String,
    },
}

/// A hover still awaiting confirmation: dropped at `save` unless a later
/// click lands on its element or one of its ancestors (`spec.md` §4.3).
#[derive(Debug, Clone)]
struct PendingHover {
    buffer_index: usize,
    node_id: NodeId,
    ancestor_ids: Vec<NodeId>,
}

/// The recording session state machine.
///
/// # Invariants
/// - Events are only buffered while [`RecorderState::Recording`].
/// - `save` always runs the buffer through [`optimise`] before returning it.
#[derive(Debug)]
pub struct RecorderSession {
    state: RecorderState,
    scenario_name: Option<ScenarioName>,
    buffer: Vec<Action>,
    secrets: SecretsRecord,
    pending_drag_source: Option<DragEndpoint>,
    pending_hovers: Vec<PendingHover>,
}

/// Widget events (clicks and other interactions on the recorder's own
/// injected control) are discarded before they ever reach the buffer.
fn event_targets_widget(event: &DomEvent) -> bool {
    match event {
        DomEvent::Click { node, .. }
        | DomEvent::Input { node, .. }
        | DomEvent::Change { node, .. }
        | DomEvent::Scroll { node, .. }
        | DomEvent::Hover { node, .. }
        | DomEvent::DragStart { node, .. }
        | DomEvent::DragEnd { node, .. } => node.is_recorder_widget,
        DomEvent::KeyDown { .. } | DomEvent::Navigate { .. } => false,
    }
}

impl Default for RecorderSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RecorderSession {
    /// Creates an idle recorder with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RecorderState::Idle,
            scenario_name: None,
            buffer: Vec::new(),
            secrets: SecretsRecord::new(),
            pending_drag_source: None,
            pending_hovers: Vec::new(),
        }
    }

    /// The current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> RecorderState {
        self.state
    }

    /// Starts a new recording under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::AlreadyActive`] if already recording or paused.
    pub fn start(&mut self, name: ScenarioName) -> Result<(), RecorderError> {
        if self.state != RecorderState::Idle {
            return Err(RecorderError::AlreadyActive);
        }
        tracing::debug!(scenario = %name, "recorder started");
        self.scenario_name = Some(name);
        self.state = RecorderState::Recording;
        Ok(())
    }

    /// Pauses an active recording; buffered events are kept.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::NotStarted`] if idle.
    pub fn pause(&mut self) -> Result<(), RecorderError> {
        if self.state == RecorderState::Idle {
            return Err(RecorderError::NotStarted);
        }
        self.state = RecorderState::Paused;
        Ok(())
    }

    /// Resumes a paused recording.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::NotStarted`] if idle.
    pub fn resume(&mut self) -> Result<(), RecorderError> {
        if self.state == RecorderState::Idle {
            return Err(RecorderError::NotStarted);
        }
        self.state = RecorderState::Recording;
        Ok(())
    }

    /// Discards the current recording, returning to idle.
    pub fn cancel(&mut self) {
        tracing::debug!("recorder cancelled, discarding {} buffered actions", self.buffer.len());
        self.state = RecorderState::Idle;
        self.scenario_name = None;
        self.buffer.clear();
        self.secrets = SecretsRecord::new();
        self.pending_drag_source = None;
        self.pending_hovers.clear();
    }

    /// Ends the recording, optimises the buffer, and returns it along with
    /// the scenario name and any captured secret values.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::NotStarted`] if idle, or
    /// [`RecorderError::EmptyBuffer`] if nothing was ever buffered.
    pub fn save(&mut self) -> Result<(ScenarioName, Vec<Action>, SecretsRecord), RecorderError> {
        if self.state == RecorderState::Idle {
            return Err(RecorderError::NotStarted);
        }
        if self.buffer.is_empty() {
            return Err(RecorderError::EmptyBuffer);
        }
        let name = self.scenario_name.take().ok_or(RecorderError::NotStarted)?;
        let unconfirmed: std::collections::HashSet<usize> =
            self.pending_hovers.drain(..).map(|h| h.buffer_index).collect();
        let buffer = std::mem::take(&mut self.buffer)
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !unconfirmed.contains(i))
            .map(|(_, action)| action)
            .collect();
        let chain = optimise(buffer);
        let secrets = std::mem::replace(&mut self.secrets, SecretsRecord::new());
        self.state = RecorderState::Idle;
        self.pending_drag_source = None;
        tracing::debug!(scenario = %name, actions = chain.len(), "recorder saved");
        Ok((name, chain, secrets))
    }

    /// Builds a checkpoint of the current buffer for [`crate::snapshot::SnapshotStore`],
    /// or `None` if idle (nothing worth checkpointing).
    #[must_use]
    pub fn to_snapshot(&self, now: Timestamp) -> Option<RecorderSnapshot> {
        let scenario_name = self.scenario_name.clone()?;
        Some(RecorderSnapshot {
            scenario_name,
            buffer: self.buffer.clone(),
            saved_at: now,
        })
    }

    /// Resumes recording from a previously saved checkpoint. Callers should
    /// check [`RecorderSnapshot::is_expired`] first and discard stale ones.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::AlreadyActive`] if a recording is already
    /// in progress.
    pub fn restore(&mut self, snapshot: RecorderSnapshot) -> Result<(), RecorderError> {
        if self.state != RecorderState::Idle {
            return Err(RecorderError::AlreadyActive);
        }
        self.scenario_name = Some(snapshot.scenario_name);
        self.buffer = snapshot.buffer;
        self.state = RecorderState::Recording;
        Ok(())
    }

    fn push(&mut self, at_ms: u64, kind: ActionKind) {
        tracing::debug!(kind = kind.label(), at_ms, "action buffered");
        self.buffer.push(Action::new(RecordingTimestamp::new(at_ms), kind));
    }

    /// Feeds one host-reported event into the recorder.
    ///
    /// A no-op when not [`RecorderState::Recording`] (events reported while
    /// paused or idle are silently dropped, per `spec.md` §4.3).
    pub fn handle_event(&mut self, at_ms: u64, event: DomEvent, dom: &dyn DomQuery) {
        if self.state != RecorderState::Recording {
            return;
        }
        if event_targets_widget(&event) {
            tracing::debug!("dropping event targeting the recorder's own widget");
            return;
        }
        match event {
            DomEvent::Click { node, text, href } => self.handle_click(at_ms, &node, text, href, dom),
            DomEvent::Input {
                node,
                value,
                form_text,
                form_has_password_field,
            } => self.handle_input(at_ms, &node, &value, &form_text, form_has_password_field, dom),
            DomEvent::Change {
                node,
                value,
                display_text,
            } => self.handle_change(at_ms, &node, value, display_text, dom),
            DomEvent::Scroll { node, x, y } => self.handle_scroll(at_ms, &node, x, y, dom),
            DomEvent::Hover { node } => self.handle_hover(at_ms, &node, dom),
            DomEvent::KeyDown { key, modifiers } => {
                self.push(at_ms, ActionKind::Keypress { key, modifiers });
            }
            DomEvent::DragStart { node } => self.handle_drag_start(&node, dom),
            DomEvent::DragEnd { node } => self.handle_drag_end(at_ms, &node, dom),
            DomEvent::Navigate { url } => self.push(
                at_ms,
                ActionKind::Navigate {
                    url,
                    wait_condition: NavigateWaitCondition::Load,
                },
            ),
        }
    }

    fn handle_click(
        &mut self,
        at_ms: u64,
        node: &DomNode,
        text: Option<String>,
        href: Option<String>,
        dom: &dyn DomQuery,
    ) {
        self.confirm_pending_hovers(node.id);
        let Some(selector) = synthesise(node, dom) else {
            tracing::debug!(tag = %node.tag, "click target could not be verified, dropping");
            return;
        };
        self.push(
            at_ms,
            ActionKind::Click {
                selector,
                text,
                href,
                requires_wait: false,
            },
        );
    }

    /// Confirms (removes from the deletion-candidate set) every pending
    /// hover whose element or ancestor chain was just clicked, per the
    /// recorder's deletion-candidate rule (`spec.md` §4.3).
    fn confirm_pending_hovers(&mut self, clicked: NodeId) {
        self.pending_hovers
            .retain(|h| h.node_id != clicked && !h.ancestor_ids.contains(&clicked));
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_input(
        &mut self,
        at_ms: u64,
        node: &DomNode,
        value: &str,
        form_text: &str,
        form_has_password_field: bool,
        dom: &dyn DomQuery,
    ) {
        let Some(selector) = synthesise(node, dom) else {
            tracing::debug!(tag = %node.tag, "input target could not be verified, dropping");
            return;
        };
        let classification = if is_auth_form(form_text) || form_has_password_field {
            classify_field(FieldSignals {
                input_type: node.input_type.as_deref(),
                id_attr: node.id_attr.as_deref(),
                name: node.name.as_deref(),
                placeholder: node.placeholder.as_deref(),
                aria_label: node.aria_label.as_deref(),
                label_text: node.label_text.as_deref(),
                autocomplete: node.autocomplete.as_deref(),
                max_length: node.max_length,
            })
        } else {
            crate::classifier::Classification {
                is_secret: false,
                kind: None,
                parameter_name: None,
            }
        };
        let (text, is_secret, param_name) = if classification.is_secret {
            let param = classification.parameter_name.expect("is_secret implies parameter_name");
            self.secrets.insert(param.clone(), value);
            (format!("{{{{{param}}}}}"), true, Some(param.as_str().to_string()))
        } else {
            (value.to_string(), false, None)
        };

        if let Some(Action {
            timestamp,
            kind: ActionKind::Type {
                selector: prev_selector,
                ..
            },
        }) = self.buffer.last()
        {
            let within_window = at_ms.saturating_sub(timestamp.get()) <= INPUT_DEBOUNCE_MS;
            if within_window && prev_selector.primary == selector.primary {
                if let Some(last) = self.buffer.last_mut() {
                    last.kind = ActionKind::Type {
                        selector,
                        text,
                        is_secret,
                        param_name,
                        clear_first: false,
                    };
                }
                return;
            }
        }
        self.push(
            at_ms,
            ActionKind::Type {
                selector,
                text,
                is_secret,
                param_name,
                clear_first: false,
            },
        );
    }

    fn handle_change(
        &mut self,
        at_ms: u64,
        node: &DomNode,
        value: String,
        display_text: Option<String>,
        dom: &dyn DomQuery,
    ) {
        let Some(selector) = synthesise(node, dom) else {
            tracing::debug!(tag = %node.tag, "select target could not be verified, dropping");
            return;
        };
        self.push(
            at_ms,
            ActionKind::Select {
                selector,
                mode: SelectMode::Native {
                    value,
                    display_text,
                },
            },
        );
    }

    fn handle_scroll(&mut self, at_ms: u64, node: &DomNode, x: f64, y: f64, dom: &dyn DomQuery) {
        let Some(selector) = synthesise(node, dom) else {
            return;
        };
        if let Some(Action {
            timestamp,
            kind: ActionKind::Scroll {
                selector: prev_selector,
                ..
            },
        }) = self.buffer.last()
        {
            let within_window = at_ms.saturating_sub(timestamp.get()) <= SCROLL_DEBOUNCE_MS;
            if within_window && prev_selector.primary == selector.primary {
                if let Some(last) = self.buffer.last_mut() {
                    last.kind = ActionKind::Scroll {
                        selector,
                        scroll_x: x,
                        scroll_y: y,
                    };
                }
                return;
            }
        }
        self.push(
            at_ms,
            ActionKind::Scroll {
                selector,
                scroll_x: x,
                scroll_y: y,
            },
        );
    }

    fn handle_hover(&mut self, at_ms: u64, node: &DomNode, dom: &dyn DomQuery) {
        let Some(selector) = synthesise(node, dom) else {
            return;
        };
        self.push(at_ms, ActionKind::Hover { selector });
        self.pending_hovers.push(PendingHover {
            buffer_index: self.buffer.len() - 1,
            node_id: node.id,
            ancestor_ids: node.ancestor_ids.clone(),
        });
    }

    fn handle_drag_start(&mut self, node: &DomNode, dom: &dyn DomQuery) {
        if let Some(selector) = synthesise(node, dom) {
            self.pending_drag_source = Some(DragEndpoint::Selector { selector });
        }
    }

    fn handle_drag_end(&mut self, at_ms: u64, node: &DomNode, dom: &dyn DomQuery) {
        let Some(source) = self.pending_drag_source.take() else {
            tracing::debug!("drag end with no matching drag start, dropping");
            return;
        };
        let Some(selector) = synthesise(node, dom) else {
            return;
        };
        self.push(
            at_ms,
            ActionKind::Drag {
                source,
                target: DragEndpoint::Selector { selector },
            },
        );
    }
}
