// crates/scenario-core/src/placeholder.rs
// ============================================================================
// Module: Placeholder Substitution
// Description: Parsing and substitution of `{{name}}` placeholders.
// Purpose: Implement the wire-level syntax from `spec.md` §6 and the
//          executor's parameter-substitution step from `spec.md` §4.6.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Placeholder syntax is `{{` name `}}` where name matches
//! `[A-Za-z_][A-Za-z0-9_]*`. Unresolved placeholders pass through
//! substitution unchanged — a deliberate signal, not a silent blank
//! (`spec.md` §4.6 step 1, §6).

/// Returns every placeholder name referenced in `text`, in order of
/// appearance, without deduplicating.
#[must_use]
pub fn find_placeholders(text: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b'{' && bytes[i + 1] == b'{' {
            if let Some((name, end)) = scan_name(text, i + 2) {
                found.push(name);
                i = end;
                continue;
            }
        }
        i += 1;
    }
    found
}

/// Scans a placeholder name starting at byte offset `start`, returning the
/// name and the byte offset just past its closing `}}` when `start..` begins
/// with a valid `[A-Za-z_][A-Za-z0-9_]*}}`.
fn scan_name(text: &str, start: usize) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    let mut end = start;
    let first = *bytes.get(end)?;
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return None;
    }
    end += 1;
    while let Some(&b) = bytes.get(end) {
        if b.is_ascii_alphanumeric() || b == b'_' {
            end += 1;
        } else {
            break;
        }
    }
    if bytes.get(end) == Some(&b'}') && bytes.get(end + 1) == Some(&b'}') {
        Some((&text[start..end], end + 2))
    } else {
        None
    }
}

/// Substitutes every `{{name}}` placeholder in `text` using `resolve`.
///
/// Placeholders for which `resolve` returns `None` are left unchanged
/// (`spec.md` §4.6 step 1: "unresolved placeholders are left as-is").
pub fn substitute<'a, F>(text: &'a str, mut resolve: F) -> String
where
    F: FnMut(&str) -> Option<std::borrow::Cow<'a, str>>,
{
    let mut out = String::with_capacity(text.len());
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if i + 1 < bytes.len() && bytes[i] == b'{' && bytes[i + 1] == b'{' {
            if let Some((name, end)) = scan_name(text, i + 2) {
                match resolve(name) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(&text[i..end]),
                }
                i = end;
                continue;
            }
        }
        // Safe: we only ever skip by one byte when not at a placeholder
        // start, so char boundaries of the original string are preserved by
        // copying byte-for-byte rather than re-slicing mid-character.
        out.push(text[i..].chars().next().unwrap_or_default());
        i += text[i..].chars().next().map_or(1, char::len_utf8);
    }
    out
}


#[cfg(test)]
mod proptests {
    use super::find_placeholders;
    use super::substitute;
    use proptest::prelude::*;

    /// A valid placeholder name: `[A-Za-z_][A-Za-z0-9_]*`.
    fn placeholder_name() -> impl Strategy<Value = String> {
        "[A-Za-z_][A-Za-z0-9_]{0,8}"
    }

    proptest! {
        /// Wrapping any valid name in `{{` `}}` always round-trips through
        /// `find_placeholders` as exactly that name.
        #[test]
        fn wrapped_name_is_always_found(name in placeholder_name()) {
            let text = format!("prefix {{{{{name}}}}} suffix");
            prop_assert_eq!(find_placeholders(&text), vec![name.as_str()]);
        }

        /// Substituting with a resolver that always returns a fixed value
        /// never changes the length relationship implied by replacing every
        /// occurrence once, and leaves surrounding text untouched.
        #[test]
        fn substitution_preserves_surrounding_text(name in placeholder_name(), before in "[a-z ]{0,10}", after in "[a-z ]{0,10}") {
            let text = format!("{before}{{{{{name}}}}}{after}");
            let result = substitute(&text, |_| Some(std::borrow::Cow::Borrowed("X")));
            prop_assert_eq!(result, format!("{before}X{after}"));
        }

        /// A resolver that never resolves anything leaves the text byte-for-byte
        /// unchanged, regardless of what placeholders it contains.
        #[test]
        fn unresolved_placeholders_are_left_verbatim(name in placeholder_name()) {
            let text = format!("{{{{{name}}}}}");
            let result = substitute(&text, |_| None);
            prop_assert_eq!(result, text);
        }
    }
}
