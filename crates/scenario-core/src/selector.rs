// crates/scenario-core/src/selector.rs
// ============================================================================
// Module: Selector Record
// Description: Synthesised DOM node locators and their captured descriptors.
// Purpose: Represent C1's output as plain, replayable data.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`SelectorRecord`] is computed once from a live DOM node and replayed
//! later against a possibly-different DOM (`spec.md` §9, "Selector-as-value").
//! It therefore carries no back-reference to any node — only the selector
//! strings and a snapshot of the node's stable descriptors in
//! [`ElementInfo`], which the executor's recovery path uses when selectors
//! fail (`spec.md` §4.6).

use serde::Deserialize;
use serde::Serialize;

/// A synthesised identifier for one DOM node (`spec.md` §3).
///
/// # Invariants
/// - At synthesis time, `primary` matched exactly one node in the document.
/// - Each entry of `fallbacks` matched at least one candidate node when
///   generated, in priority order, most-preferred first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorRecord {
    /// The single selector string verified unique at synthesis time.
    pub primary: String,
    /// Alternative selectors, most-preferred first, for replay-time recovery.
    pub fallbacks: Vec<String>,
    /// A snapshot of the node's stable descriptors.
    pub element_info: ElementInfo,
}

impl SelectorRecord {
    /// Builds a selector record from a verified primary and ordered fallbacks.
    #[must_use]
    pub fn new(primary: impl Into<String>, fallbacks: Vec<String>, element_info: ElementInfo) -> Self {
        Self {
            primary: primary.into(),
            fallbacks,
            element_info,
        }
    }

    /// Promotes the first fallback to primary, per `spec.md` §4.6 retry rule:
    /// "the head is promoted to `selector.primary`, that fallback is
    /// removed". Returns `false` when there were no fallbacks left.
    pub fn promote_next_fallback(&mut self) -> bool {
        if self.fallbacks.is_empty() {
            return false;
        }
        self.primary = self.fallbacks.remove(0);
        true
    }
}

/// A snapshot of a DOM node's stable descriptors (`spec.md` §3).
///
/// # Invariants
/// - Captured even when unused by `primary`, because it feeds the
///   executor's smart-finder recovery path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementInfo {
    /// The node's tag name, lowercase (`div`, `button`, …).
    pub tag: String,
    /// The node's `id` attribute, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The node's class list, in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    /// The node's `name` attribute, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The node's `type` attribute, if present (inputs, buttons).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    /// The node's ARIA `role`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// The node's `aria-label`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    /// The node's `placeholder`, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// The node's `data-test` attribute, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_test: Option<String>,
    /// The node's `data-testid` attribute, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_testid: Option<String>,
    /// 1-based position among same-tag siblings under the parent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nth_of_type: Option<u32>,
    /// 1-based position among all siblings under the parent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nth_child: Option<u32>,
    /// A short excerpt of the node's text content, used by the smart finder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// True when the node is part of the recorder's own injected control
    /// rather than page content.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_recorder_widget: bool,
}

#[cfg(test)]
mod tests {
    use super::ElementInfo;
    use super::SelectorRecord;

    #[test]
    fn promote_next_fallback_shifts_and_shrinks() {
        let mut rec = SelectorRecord::new(
            "#stale-id",
            vec![".btn-primary".to_string(), "button:nth-of-type(2)".to_string()],
            ElementInfo::default(),
        );
        assert!(rec.promote_next_fallback());
        assert_eq!(rec.primary, ".btn-primary");
        assert_eq!(rec.fallbacks, vec!["button:nth-of-type(2)".to_string()]);
        assert!(rec.promote_next_fallback());
        assert_eq!(rec.primary, "button:nth-of-type(2)");
        assert!(rec.fallbacks.is_empty());
        assert!(!rec.promote_next_fallback());
    }

    #[test]
    fn round_trips_through_json_unchanged() {
        let rec = SelectorRecord::new(
            "#login-email",
            vec!["input[name=\"email\"]".to_string()],
            ElementInfo {
                tag: "input".to_string(),
                id: Some("login-email".to_string()),
                ..Default::default()
            },
        );
        let json = serde_json::to_string(&rec).unwrap();
        let back: SelectorRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(rec, back);
    }
}
