// crates/scenario-recorder/src/dom.rs
// ============================================================================
// Module: DOM Boundary
// Description: The node snapshot and query trait the host implements so the
//              recorder never touches the live document directly.
// Purpose: Keep selector synthesis and classification pure, testable without
//          a real browser, per `spec.md` §9 ("Selector-as-value").
// Dependencies: none (pure data + trait)
// ============================================================================

//! ## Overview
//! The host (browser extension, CDP driver, whatever embeds this crate) owns
//! the live document. It hands the recorder a [`DomNode`] snapshot for each
//! event and answers [`DomQuery`] questions about the document as a whole.
//! Nothing in this crate ever assumes shared memory with the page.

/// Opaque identity for a DOM node, scoped to one recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// The subset of a node's parent the synthesiser needs for parent-scoped
/// candidates (`spec.md` §4.1 rule 8).
#[derive(Debug, Clone)]
pub struct ParentSummary {
    /// The parent's `id` attribute, if any.
    pub id_attr: Option<String>,
    /// The parent's tag name, lowercased.
    pub tag: String,
    /// The parent's class list.
    pub classes: Vec<String>,
}

/// A snapshot of one DOM node's attributes, taken at event time.
#[derive(Debug, Clone)]
pub struct DomNode {
    /// This session's identity for the node.
    pub id: NodeId,
    /// Lowercased tag name.
    pub tag: String,
    /// The `id` attribute, if present.
    pub id_attr: Option<String>,
    /// The class list, in document order.
    pub classes: Vec<String>,
    /// The `name` attribute, if present.
    pub name: Option<String>,
    /// The `type` attribute for `input` elements.
    pub input_type: Option<String>,
    /// The `role` attribute, if present.
    pub role: Option<String>,
    /// The `aria-label` attribute, if present.
    pub aria_label: Option<String>,
    /// The `placeholder` attribute, if present.
    pub placeholder: Option<String>,
    /// The `data-test` attribute, if present.
    pub data_test: Option<String>,
    /// The `data-testid` attribute, if present.
    pub data_testid: Option<String>,
    /// Text of an associated `<label>`, if the host can resolve one.
    pub label_text: Option<String>,
    /// The `autocomplete` attribute, if present.
    pub autocomplete: Option<String>,
    /// A short excerpt of the node's visible text, if any.
    pub text_excerpt: Option<String>,
    /// The node's parent, or `None` at the document root.
    pub parent: Option<ParentSummary>,
    /// 1-based index of this node among same-tag siblings under its parent.
    pub nth_of_type_in_parent: usize,
    /// Count of same-tag siblings under the parent, including this node.
    /// One means this node is the only one of its tag under that parent, so
    /// `nth-of-type` would not disambiguate it from a freshly inserted sibling.
    pub same_tag_sibling_count_in_parent: usize,
    /// 1-based index of this node among all children of its parent.
    pub nth_child_in_parent: usize,
    /// 1-based index of this node among every node sharing its tag in the
    /// whole document (`spec.md` §4.1 rule 9's last-resort scope).
    pub nth_of_type_in_document: usize,
    /// The `maxlength` attribute on an `<input>`, if any (`spec.md` §4.2's
    /// OTP-length gate).
    pub max_length: Option<u32>,
    /// True when this node is part of the recorder's own injected control
    /// (the floating in-page widget), set by the host so recorder-on-itself
    /// events never get recorded as page interactions.
    pub is_recorder_widget: bool,
    /// This node's ancestor chain, nearest first, capped at three levels —
    /// used to confirm a pending hover when a later click lands on an
    /// ancestor rather than the hovered element itself (`spec.md` §4.3).
    pub ancestor_ids: Vec<NodeId>,
}

/// Host-implemented boundary the synthesiser uses to verify candidate
/// selectors without ever walking the document itself.
pub trait DomQuery {
    /// Number of nodes matching `selector` in the current document.
    fn count_matches(&self, selector: &str) -> usize;
    /// Whether `selector` matches `node` specifically (implies at least one
    /// match overall).
    fn resolves_to(&self, selector: &str, node: &NodeId) -> bool;
}
