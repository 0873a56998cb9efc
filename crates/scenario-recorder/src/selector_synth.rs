// crates/scenario-recorder/src/selector_synth.rs
// ============================================================================
// Module: Selector Synthesiser (C1)
// Description: Produces a primary selector plus ordered fallbacks for a
//              live DOM node.
// Purpose: Implement `spec.md` §4.1's fixed priority ladder, verifying every
//          candidate against a host-supplied `DomQuery` boundary.
// Dependencies: scenario-core, crate::dom
// ============================================================================

//! ## Overview
//! `synthesise` is pure with respect to the DOM at call time: it never
//! walks the document itself (`spec.md` §9 "Selector-as-value"). It takes a
//! snapshot of the candidate node ([`DomNode`]) plus a [`DomQuery`] boundary
//! the host implements, and returns a [`SelectorRecord`].

use scenario_core::ElementInfo;
use scenario_core::SelectorRecord;

use crate::dom::DomNode;
use crate::dom::DomQuery;

/// Classes considered unstable and never used alone as a selector (`spec.md` §4.1 rule 4).
const UNSTABLE_CLASS_NAMES: &[&str] = &["active", "visible", "hidden", "open", "closed"];

/// Returns true when `class` is stable enough to anchor a selector
/// (`spec.md` §4.1 rule 4: "≥2 chars, does not contain a run of ≥4 digits,
/// and is not in" the unstable set).
#[must_use]
pub fn is_stable_class(class: &str) -> bool {
    if class.chars().count() < 2 {
        return false;
    }
    if UNSTABLE_CLASS_NAMES.contains(&class) {
        return false;
    }
    let mut run = 0usize;
    for c in class.chars() {
        if c.is_ascii_digit() {
            run += 1;
            if run >= 4 {
                return false;
            }
        } else {
            run = 0;
        }
    }
    true
}

/// Escapes `value` for use inside a double-quoted CSS attribute selector.
fn escape_attr(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn candidate_id(node: &DomNode) -> Option<String> {
    let id = node.id_attr.as_ref()?;
    let starts_with_digit = id.chars().next().is_some_and(|c| c.is_ascii_digit());
    if starts_with_digit {
        return None;
    }
    Some(format!("#{id}"))
}

fn candidate_data_testid(node: &DomNode) -> Option<String> {
    node.data_testid
        .as_ref()
        .map(|v| format!("[data-testid=\"{}\"]", escape_attr(v)))
}

fn candidate_data_test(node: &DomNode) -> Option<String> {
    node.data_test
        .as_ref()
        .map(|v| format!("[data-test=\"{}\"]", escape_attr(v)))
}

fn stable_classes(node: &DomNode) -> Vec<&str> {
    node.classes
        .iter()
        .map(String::as_str)
        .filter(|c| is_stable_class(c))
        .collect()
}

fn candidate_single_classes(node: &DomNode) -> Vec<String> {
    stable_classes(node)
        .into_iter()
        .map(|class| format!("{}.{class}", node.tag))
        .collect()
}

fn candidate_triple_class(node: &DomNode) -> Option<String> {
    let classes = stable_classes(node);
    if classes.is_empty() {
        return None;
    }
    let joined: String = classes
        .into_iter()
        .take(3)
        .map(|c| format!(".{c}"))
        .collect();
    Some(format!("{}{joined}", node.tag))
}

fn candidate_name(node: &DomNode) -> Option<String> {
    node.name
        .as_ref()
        .map(|v| format!("{}[name=\"{}\"]", node.tag, escape_attr(v)))
}

fn candidate_attr_conjunction(node: &DomNode) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(role) = &node.role {
        parts.push(format!("[role=\"{}\"]", escape_attr(role)));
    }
    if let Some(label) = &node.aria_label {
        parts.push(format!("[aria-label=\"{}\"]", escape_attr(label)));
    }
    if let Some(placeholder) = &node.placeholder {
        parts.push(format!("[placeholder=\"{}\"]", escape_attr(placeholder)));
    }
    if parts.is_empty() {
        return None;
    }
    Some(format!("{}{}", node.tag, parts.concat()))
}

fn abbreviated_parent_selector(node: &DomNode) -> Option<String> {
    let parent = node.parent.as_ref()?;
    if let Some(id) = &parent.id_attr {
        if !id.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            return Some(format!("#{id}"));
        }
    }
    if let Some(class) = parent.classes.iter().find(|c| is_stable_class(c)) {
        return Some(format!("{}.{class}", parent.tag));
    }
    Some(parent.tag.clone())
}

fn candidate_parent_scoped(node: &DomNode) -> Option<String> {
    let parent_selector = abbreviated_parent_selector(node)?;
    let same_tag_siblings_disambiguate = node.same_tag_sibling_count_in_parent > 1;
    if same_tag_siblings_disambiguate {
        Some(format!(
            "{parent_selector} > {}:nth-of-type({})",
            node.tag, node.nth_of_type_in_parent
        ))
    } else {
        Some(format!(
            "{parent_selector} > {}:nth-child({})",
            node.tag, node.nth_child_in_parent
        ))
    }
}

fn candidate_document_positional(node: &DomNode) -> String {
    format!("{}:nth-of-type({})", node.tag, node.nth_of_type_in_document)
}

/// Builds the ordered candidate list for `node`, highest priority first
/// (`spec.md` §4.1 rules 1–9).
fn candidates(node: &DomNode) -> Vec<String> {
    let mut out = Vec::new();
    out.extend(candidate_id(node));
    out.extend(candidate_data_testid(node));
    out.extend(candidate_data_test(node));
    out.extend(candidate_single_classes(node));
    out.extend(candidate_triple_class(node));
    out.extend(candidate_name(node));
    out.extend(candidate_attr_conjunction(node));
    out.extend(candidate_parent_scoped(node));
    out.push(candidate_document_positional(node));
    out
}

/// Converts `node`'s snapshot into a [`ElementInfo`] for storage alongside
/// the selector record.
fn to_element_info(node: &DomNode) -> ElementInfo {
    ElementInfo {
        tag: node.tag.clone(),
        id: node.id_attr.clone(),
        classes: node.classes.clone(),
        name: node.name.clone(),
        input_type: node.input_type.clone(),
        role: node.role.clone(),
        aria_label: node.aria_label.clone(),
        placeholder: node.placeholder.clone(),
        data_test: node.data_test.clone(),
        data_testid: node.data_testid.clone(),
        nth_of_type: u32::try_from(node.nth_of_type_in_parent).ok(),
        nth_child: u32::try_from(node.nth_child_in_parent).ok(),
        text: node.text_excerpt.clone(),
        is_recorder_widget: node.is_recorder_widget,
    }
}

/// Synthesises a [`SelectorRecord`] for `node`, verifying each candidate
/// against `dom` in the fixed priority order from `spec.md` §4.1.
///
/// Returns `None` when no candidate verifies — callers should fall back to
/// discarding the event rather than recording an unusable selector.
#[must_use]
pub fn synthesise(node: &DomNode, dom: &dyn DomQuery) -> Option<SelectorRecord> {
    let mut primary = None;
    let mut fallbacks = Vec::new();
    for candidate in candidates(node) {
        if primary.is_none() {
            if dom.count_matches(&candidate) == 1 && dom.resolves_to(&candidate, &node.id) {
                primary = Some(candidate);
                continue;
            }
        }
        if dom.count_matches(&candidate) >= 1 {
            fallbacks.push(candidate);
        }
    }
    let primary = primary?;
    fallbacks.retain(|c| c != &primary);
    Some(SelectorRecord::new(primary, fallbacks, to_element_info(node)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeId;
    use crate::dom::ParentSummary;
    use std::cell::RefCell;
    use std::collections::HashMap;

    struct FakeDom {
        matches: RefCell<HashMap<String, Vec<NodeId>>>,
    }

    impl FakeDom {
        fn new(matches: Vec<(&str, Vec<u64>)>) -> Self {
            let map = matches
                .into_iter()
                .map(|(sel, ids)| (sel.to_string(), ids.into_iter().map(NodeId).collect()))
                .collect();
            Self {
                matches: RefCell::new(map),
            }
        }
    }

    impl DomQuery for FakeDom {
        fn count_matches(&self, selector: &str) -> usize {
            self.matches
                .borrow()
                .get(selector)
                .map_or(0, std::vec::Vec::len)
        }

        fn resolves_to(&self, selector: &str, node: &NodeId) -> bool {
            self.matches
                .borrow()
                .get(selector)
                .is_some_and(|ids| ids.contains(node))
        }
    }

    fn base_node() -> DomNode {
        DomNode {
            id: NodeId(1),
            tag: "button".to_string(),
            id_attr: None,
            classes: vec!["btn-primary".to_string(), "active".to_string()],
            name: None,
            input_type: None,
            role: None,
            aria_label: None,
            placeholder: None,
            data_test: None,
            data_testid: None,
            label_text: None,
            autocomplete: None,
            text_excerpt: Some("Submit".to_string()),
            parent: Some(ParentSummary {
                id_attr: Some("form-login".to_string()),
                tag: "form".to_string(),
                classes: Vec::new(),
            }),
            nth_of_type_in_parent: 1,
            same_tag_sibling_count_in_parent: 2,
            nth_child_in_parent: 2,
            nth_of_type_in_document: 4,
            max_length: None,
            is_recorder_widget: false,
            ancestor_ids: Vec::new(),
        }
    }

    #[test]
    fn id_wins_over_every_other_candidate() {
        let mut node = base_node();
        node.id_attr = Some("submit-btn".to_string());
        let dom = FakeDom::new(vec![("#submit-btn", vec![1]), ("button.btn-primary", vec![1])]);
        let rec = synthesise(&node, &dom).unwrap();
        assert_eq!(rec.primary, "#submit-btn");
    }

    #[test]
    fn id_starting_with_digit_is_skipped() {
        let mut node = base_node();
        node.id_attr = Some("1submit".to_string());
        let dom = FakeDom::new(vec![("button.btn-primary", vec![1])]);
        let rec = synthesise(&node, &dom).unwrap();
        assert_eq!(rec.primary, "button.btn-primary");
    }

    #[test]
    fn unstable_class_is_never_tried_alone() {
        let node = base_node();
        // only "active" (unstable) and "btn-primary" (stable) present;
        // the synthesiser should only ever try the stable one.
        let dom = FakeDom::new(vec![("button.btn-primary", vec![1])]);
        let rec = synthesise(&node, &dom).unwrap();
        assert_eq!(rec.primary, "button.btn-primary");
        assert!(!rec.fallbacks.iter().any(|f| f.contains("active")));
    }

    #[test]
    fn falls_back_to_parent_scoped_then_document_positional() {
        let mut node = base_node();
        node.classes.clear();
        let dom = FakeDom::new(vec![("#form-login > button:nth-of-type(1)", vec![1])]);
        let rec = synthesise(&node, &dom).unwrap();
        assert_eq!(rec.primary, "#form-login > button:nth-of-type(1)");
    }

    #[test]
    fn parent_scoped_falls_back_to_nth_child_when_no_same_tag_siblings() {
        let mut node = base_node();
        node.classes.clear();
        node.same_tag_sibling_count_in_parent = 1;
        let dom = FakeDom::new(vec![("#form-login > button:nth-child(2)", vec![1])]);
        let rec = synthesise(&node, &dom).unwrap();
        assert_eq!(rec.primary, "#form-login > button:nth-child(2)");
    }

    #[test]
    fn last_resort_is_document_wide_positional() {
        let mut node = base_node();
        node.classes.clear();
        node.parent = None;
        let dom = FakeDom::new(vec![("button:nth-of-type(4)", vec![1])]);
        let rec = synthesise(&node, &dom).unwrap();
        assert_eq!(rec.primary, "button:nth-of-type(4)");
    }

    #[test]
    fn returns_none_when_nothing_verifies() {
        let mut node = base_node();
        node.classes.clear();
        node.parent = None;
        let dom = FakeDom::new(vec![]);
        assert!(synthesise(&node, &dom).is_none());
    }

    #[test]
    fn is_stable_class_rejects_long_digit_runs_and_short_names() {
        assert!(!is_stable_class("a"));
        assert!(!is_stable_class("x1234"));
        assert!(!is_stable_class("active"));
        assert!(is_stable_class("btn-primary"));
    }
}
