// crates/scenario-recorder/src/optimizer.rs
// ============================================================================
// Module: Action Optimiser (C4)
// Description: Collapses a raw recorded action buffer into a clean,
//              replayable chain.
// Purpose: Apply `spec.md` §4.4's seven fixed passes, in order, producing a
//          chain that is idempotent under re-optimisation.
// Dependencies: scenario-core
// ============================================================================

//! ## Overview
//! [`optimise`] runs seven passes over the buffered [`Action`]s, each pass
//! reading the previous pass's output. The order is fixed: passes later in
//! the list assume earlier passes already ran (e.g. duplicate-click removal
//! assumes type-coalescing already collapsed keystroke noise). Running
//! `optimise` twice on its own output is a no-op — every pass's input
//! invariant already holds for optimised chains.

use scenario_core::Action;
use scenario_core::ActionKind;
use scenario_core::CustomSelectStep;
use scenario_core::SelectMode;
use scenario_core::WaitSpec;

const DUPLICATE_CLICK_WINDOW_MS: u64 = 500;
const TYPE_COALESCE_WINDOW_MS: u64 = 500;

fn is_widget_action(action: &Action) -> bool {
    action
        .kind
        .selector()
        .is_some_and(|selector| selector.element_info.is_recorder_widget)
}

/// Pass 1: drop actions targeting the recorder's own injected widget, which
/// the host marks on the node snapshot at record time (`spec.md` §4.4).
fn strip_widget_actions(actions: Vec<Action>) -> Vec<Action> {
    actions.into_iter().filter(|a| !is_widget_action(a)).collect()
}

/// Pass 2: collapse consecutive `Type` actions on the same selector into
/// the last one, keeping the first action's timestamp.
fn coalesce_sequential_types(actions: Vec<Action>) -> Vec<Action> {
    let mut out: Vec<Action> = Vec::with_capacity(actions.len());
    for action in actions {
        if let ActionKind::Type { selector, .. } = &action.kind {
            if let Some(prev) = out.last_mut() {
                if let ActionKind::Type {
                    selector: prev_selector,
                    ..
                } = &prev.kind
                {
                    let within_window = action
                        .timestamp
                        .get()
                        .saturating_sub(prev.timestamp.get())
                        <= TYPE_COALESCE_WINDOW_MS;
                    if prev_selector.primary == selector.primary && within_window {
                        let first_timestamp = prev.timestamp;
                        *prev = action;
                        prev.timestamp = first_timestamp;
                        continue;
                    }
                }
            }
        }
        out.push(action);
    }
    out
}

fn is_dropdown_trigger(action: &Action) -> bool {
    let ActionKind::Click { selector, .. } = &action.kind else {
        return false;
    };
    let info = &selector.element_info;
    info.role.as_deref().is_some_and(|r| r == "combobox" || r == "listbox")
        || info.classes.iter().any(|c| c.contains("select") || c.contains("dropdown"))
}

fn is_dropdown_option(action: &Action) -> bool {
    let ActionKind::Click { selector, .. } = &action.kind else {
        return false;
    };
    selector
        .element_info
        .role
        .as_deref()
        .is_some_and(|r| r == "option")
}

/// The longest idle wait between a dropdown trigger click and its option
/// click that still counts as the same interaction (spec.md §8 scenario 3
/// uses 300ms; anything past a second is no longer "the same click").
const CUSTOM_SELECT_IDLE_CAP_MS: u64 = 1_000;

fn idle_wait_ms(action: &Action) -> Option<u64> {
    match &action.kind {
        ActionKind::Wait {
            spec: WaitSpec::Duration { ms },
        } if *ms <= CUSTOM_SELECT_IDLE_CAP_MS => Some(*ms),
        _ => None,
    }
}

/// Pass 3: fold a trigger-click + option-click pair, with an optional idle
/// wait between them, into a single `Select` action with a custom step
/// sequence, when the recorded framework has no native `<select>` to target.
fn detect_custom_select_pattern(actions: Vec<Action>) -> Vec<Action> {
    let mut out: Vec<Action> = Vec::with_capacity(actions.len());
    let mut iter = actions.into_iter().peekable();
    while let Some(action) = iter.next() {
        if is_dropdown_trigger(&action) {
            let mut lookahead = iter.clone();
            let idle_ms = lookahead.peek().and_then(idle_wait_ms);
            if idle_ms.is_some() {
                lookahead.next();
            }
            if lookahead.peek().is_some_and(is_dropdown_option) {
                if idle_ms.is_some() {
                    iter.next();
                }
                let option = iter.next().expect("lookahead confirmed a next action");
                let trigger_selector = match &action.kind {
                    ActionKind::Click { selector, .. } => selector.clone(),
                    _ => unreachable!("is_dropdown_trigger only matches Click"),
                };
                let option_selector = match &option.kind {
                    ActionKind::Click { selector, .. } => selector.clone(),
                    _ => unreachable!("is_dropdown_option only matches Click"),
                };
                let mut steps = vec![CustomSelectStep::Click {
                    selector: trigger_selector.clone(),
                }];
                if let Some(ms) = idle_ms {
                    steps.push(CustomSelectStep::Wait { ms });
                }
                steps.push(CustomSelectStep::Click {
                    selector: option_selector,
                });
                out.push(Action {
                    timestamp: action.timestamp,
                    kind: ActionKind::Select {
                        selector: trigger_selector,
                        mode: SelectMode::Custom { steps },
                    },
                });
                continue;
            }
        }
        out.push(action);
    }
    out
}

/// Pass 4: drop a click that repeats the immediately preceding click on the
/// same selector within the debounce window (double-submit noise).
fn remove_duplicate_clicks(actions: Vec<Action>) -> Vec<Action> {
    let mut out: Vec<Action> = Vec::with_capacity(actions.len());
    for action in actions {
        if let ActionKind::Click { selector, .. } = &action.kind {
            if let Some(prev) = out.last() {
                if let ActionKind::Click {
                    selector: prev_selector,
                    ..
                } = &prev.kind
                {
                    let within_window = action
                        .timestamp
                        .get()
                        .saturating_sub(prev.timestamp.get())
                        <= DUPLICATE_CLICK_WINDOW_MS;
                    if prev_selector.primary == selector.primary && within_window {
                        continue;
                    }
                }
            }
        }
        out.push(action);
    }
    out
}

/// Pass 5: merge consecutive `Wait` actions — durations sum, selector waits
/// on the same selector keep the larger timeout.
fn merge_sequential_waits(actions: Vec<Action>) -> Vec<Action> {
    let mut out: Vec<Action> = Vec::with_capacity(actions.len());
    for action in actions {
        if let ActionKind::Wait { spec } = &action.kind {
            if let Some(prev) = out.last_mut() {
                if let ActionKind::Wait { spec: prev_spec } = &prev.kind {
                    match (prev_spec, spec) {
                        (WaitSpec::Duration { ms: prev_ms }, WaitSpec::Duration { ms }) => {
                            prev.kind = ActionKind::Wait {
                                spec: WaitSpec::Duration {
                                    ms: prev_ms + ms,
                                },
                            };
                            continue;
                        }
                        (
                            WaitSpec::Selector {
                                selector: prev_selector,
                                timeout_ms: prev_timeout,
                            },
                            WaitSpec::Selector {
                                selector,
                                timeout_ms,
                            },
                        ) if prev_selector.primary == selector.primary => {
                            let merged_timeout = (*prev_timeout).max(*timeout_ms);
                            prev.kind = ActionKind::Wait {
                                spec: WaitSpec::Selector {
                                    selector: selector.clone(),
                                    timeout_ms: merged_timeout,
                                },
                            };
                            continue;
                        }
                        _ => {}
                    }
                }
            }
        }
        out.push(action);
    }
    out
}

/// Pass 6: collapse consecutive scrolls on the same selector to the last one.
fn remove_redundant_scrolls(actions: Vec<Action>) -> Vec<Action> {
    let mut out: Vec<Action> = Vec::with_capacity(actions.len());
    for action in actions {
        if let ActionKind::Scroll { selector, .. } = &action.kind {
            if let Some(prev) = out.last() {
                if let ActionKind::Scroll {
                    selector: prev_selector,
                    ..
                } = &prev.kind
                {
                    if prev_selector.primary == selector.primary {
                        out.pop();
                    }
                }
            }
        }
        out.push(action);
    }
    out
}

/// Pass 7: a `Hover` immediately followed by another action on the same
/// selector was just revealing that element for the next interaction —
/// replay performs the hover implicitly, so it is dropped.
fn remove_redundant_hovers(actions: Vec<Action>) -> Vec<Action> {
    let mut out: Vec<Action> = Vec::with_capacity(actions.len());
    let mut iter = actions.into_iter().peekable();
    while let Some(action) = iter.next() {
        if let ActionKind::Hover { selector } = &action.kind {
            if let Some(next) = iter.peek() {
                if next
                    .kind
                    .selector()
                    .is_some_and(|s| s.primary == selector.primary)
                {
                    continue;
                }
            }
        }
        out.push(action);
    }
    out
}

/// Runs the full seven-pass optimisation over a raw recorded buffer
/// (`spec.md` §4.4). Idempotent: `optimise(optimise(chain)) == optimise(chain)`.
#[must_use]
pub fn optimise(actions: Vec<Action>) -> Vec<Action> {
    let actions = strip_widget_actions(actions);
    let actions = coalesce_sequential_types(actions);
    let actions = detect_custom_select_pattern(actions);
    let actions = remove_duplicate_clicks(actions);
    let actions = merge_sequential_waits(actions);
    let actions = remove_redundant_scrolls(actions);
    remove_redundant_hovers(actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_core::ElementInfo;
    use scenario_core::RecordingTimestamp;
    use scenario_core::SelectorRecord;

    fn selector(primary: &str) -> SelectorRecord {
        SelectorRecord::new(primary.to_string(), Vec::new(), ElementInfo::default())
    }

    fn click_at(ms: u64, selector_primary: &str) -> Action {
        Action {
            timestamp: RecordingTimestamp::new(ms),
            kind: ActionKind::Click {
                selector: selector(selector_primary),
                text: None,
                href: None,
                requires_wait: false,
            },
        }
    }

    fn type_at(ms: u64, selector_primary: &str, text: &str) -> Action {
        Action {
            timestamp: RecordingTimestamp::new(ms),
            kind: ActionKind::Type {
                selector: selector(selector_primary),
                text: text.to_string(),
                is_secret: false,
                param_name: None,
                clear_first: false,
            },
        }
    }

    fn dropdown_trigger_click(ms: u64, selector_primary: &str) -> Action {
        let mut action = click_at(ms, selector_primary);
        let ActionKind::Click { selector, .. } = &mut action.kind else {
            unreachable!()
        };
        selector.element_info.classes.push("select-container".to_string());
        action
    }

    fn dropdown_option_click(ms: u64, selector_primary: &str) -> Action {
        let mut action = click_at(ms, selector_primary);
        let ActionKind::Click { selector, .. } = &mut action.kind else {
            unreachable!()
        };
        selector.element_info.role = Some("option".to_string());
        action
    }

    fn idle_wait(ms: u64, duration_ms: u64) -> Action {
        Action {
            timestamp: RecordingTimestamp::new(ms),
            kind: ActionKind::Wait {
                spec: WaitSpec::Duration { ms: duration_ms },
            },
        }
    }

    #[test]
    fn folds_trigger_idle_option_into_one_custom_select() {
        let actions = vec![
            dropdown_trigger_click(0, ".select-container"),
            idle_wait(10, 300),
            dropdown_option_click(320, ".option[data-value='US']"),
        ];
        let out = optimise(actions);
        assert_eq!(out.len(), 1);
        let ActionKind::Select { selector, mode } = &out[0].kind else {
            panic!("expected a Select action, got {:?}", out[0].kind);
        };
        assert_eq!(selector.primary, ".select-container");
        let SelectMode::Custom { steps } = mode else {
            panic!("expected custom mode, got {mode:?}");
        };
        assert_eq!(
            steps,
            &vec![
                CustomSelectStep::Click {
                    selector: selector.clone(),
                },
                CustomSelectStep::Wait { ms: 300 },
                CustomSelectStep::Click {
                    selector: match &dropdown_option_click(0, ".option[data-value='US']").kind {
                        ActionKind::Click { selector, .. } => selector.clone(),
                        _ => unreachable!(),
                    },
                },
            ]
        );
    }

    #[test]
    fn coalesces_sequential_types_keeping_first_timestamp_and_last_text() {
        let actions = vec![
            type_at(0, "#q", "h"),
            type_at(100, "#q", "he"),
            type_at(200, "#q", "hello"),
        ];
        let out = optimise(actions);
        assert_eq!(out.len(), 1);
        let ActionKind::Type { text, .. } = &out[0].kind else {
            unreachable!()
        };
        assert_eq!(text, "hello");
        assert_eq!(out[0].timestamp.get(), 0);
    }

    #[test]
    fn removes_duplicate_click_within_debounce_window() {
        let actions = vec![click_at(0, "#submit"), click_at(200, "#submit")];
        let out = optimise(actions);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn keeps_clicks_on_same_selector_outside_debounce_window() {
        let actions = vec![click_at(0, "#submit"), click_at(900, "#submit")];
        let out = optimise(actions);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn merges_sequential_duration_waits() {
        let actions = vec![
            Action {
                timestamp: RecordingTimestamp::new(0),
                kind: ActionKind::Wait {
                    spec: WaitSpec::Duration { ms: 100 },
                },
            },
            Action {
                timestamp: RecordingTimestamp::new(100),
                kind: ActionKind::Wait {
                    spec: WaitSpec::Duration { ms: 200 },
                },
            },
        ];
        let out = optimise(actions);
        assert_eq!(out.len(), 1);
        let ActionKind::Wait {
            spec: WaitSpec::Duration { ms },
        } = &out[0].kind
        else {
            unreachable!()
        };
        assert_eq!(*ms, 300);
    }

    #[test]
    fn drops_hover_immediately_preceding_interaction_on_same_target() {
        let actions = vec![
            Action {
                timestamp: RecordingTimestamp::new(0),
                kind: ActionKind::Hover {
                    selector: selector("#menu-item"),
                },
            },
            click_at(50, "#menu-item"),
        ];
        let out = optimise(actions);
        assert_eq!(out.len(), 1);
        assert!(matches!(out[0].kind, ActionKind::Click { .. }));
    }

    #[test]
    fn strips_actions_targeting_the_recorder_widget() {
        let mut info = ElementInfo::default();
        info.is_recorder_widget = true;
        let action = Action {
            timestamp: RecordingTimestamp::new(0),
            kind: ActionKind::Click {
                selector: SelectorRecord::new("div.recorder-control".to_string(), Vec::new(), info),
                text: None,
                href: None,
                requires_wait: false,
            },
        };
        let out = optimise(vec![action]);
        assert!(out.is_empty());
    }

    #[test]
    fn ordinary_page_tooltip_is_not_stripped() {
        let mut info = ElementInfo::default();
        info.classes = vec!["tooltip".to_string()];
        let action = Action {
            timestamp: RecordingTimestamp::new(0),
            kind: ActionKind::Click {
                selector: SelectorRecord::new("div.tooltip".to_string(), Vec::new(), info),
                text: None,
                href: None,
                requires_wait: false,
            },
        };
        let out = optimise(vec![action]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn optimising_twice_is_idempotent() {
        let actions = vec![
            type_at(0, "#q", "h"),
            type_at(100, "#q", "hello"),
            click_at(300, "#submit"),
            click_at(400, "#submit"),
        ];
        let once = optimise(actions);
        let twice = optimise(once.clone());
        assert_eq!(
            once.iter().map(|a| a.kind.label()).collect::<Vec<_>>(),
            twice.iter().map(|a| a.kind.label()).collect::<Vec<_>>()
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use scenario_core::ElementInfo;
    use scenario_core::RecordingTimestamp;
    use scenario_core::SelectorRecord;

    fn raw_action() -> impl Strategy<Value = Action> {
        (0u64..2_000, 0u8..5, "#[a-c]").prop_map(|(ms, variant, selector_id)| {
            let selector = SelectorRecord::new(selector_id, Vec::new(), ElementInfo::default());
            let kind = match variant {
                0 => ActionKind::Click {
                    selector,
                    text: None,
                    href: None,
                    requires_wait: false,
                },
                1 => ActionKind::Type {
                    selector,
                    text: "x".to_string(),
                    is_secret: false,
                    param_name: None,
                    clear_first: false,
                },
                2 => ActionKind::Hover { selector },
                3 => ActionKind::Scroll {
                    selector,
                    scroll_x: 0.0,
                    scroll_y: 100.0,
                },
                _ => ActionKind::Wait {
                    spec: WaitSpec::Duration { ms: 50 },
                },
            };
            Action {
                timestamp: RecordingTimestamp::new(ms),
                kind,
            }
        })
    }

    proptest! {
        /// Re-running `optimise` on its own output never changes it, for any
        /// buffer of the action kinds the passes actually rewrite.
        #[test]
        fn optimise_is_idempotent_on_random_buffers(actions in prop::collection::vec(raw_action(), 0..16)) {
            let once = optimise(actions);
            let twice = optimise(once.clone());
            let once_labels: Vec<&str> = once.iter().map(|a| a.kind.label()).collect();
            let twice_labels: Vec<&str> = twice.iter().map(|a| a.kind.label()).collect();
            prop_assert_eq!(once_labels, twice_labels);
        }
    }
}
