//! First-error extraction over nested error payloads.
//!
//! Validation layers commonly report errors as arbitrarily nested
//! combinations of strings, sequences, and field-to-error mappings. Clients
//! rendering a single message want the *first* leaf. [`extract_first_error`]
//! walks such a tree and returns it.
//!
//! Termination is structural: every recursive step descends into a strictly
//! smaller value, and empty containers are leaves rendered as their literal
//! textual forms (`"[]"`, `"{}"`).

use serde_json::{json, Value};

/// How a mapping entry is reported by [`extract_first_error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractStyle {
    /// Return a one-entry object pairing the outermost field name with the
    /// fully-resolved leaf: `{"field": ["required"]}` becomes
    /// `{"field": "required"}`.
    ///
    /// This is the canonical style.
    #[default]
    Keyed,
    /// Return the bare leaf, dropping the field name: `{"field": ["required"]}`
    /// becomes `"required"`.
    Leaf,
}

/// Extracts the first error leaf from a nested error payload.
///
/// - a string is returned unchanged;
/// - a non-empty array recurses on its first element;
/// - an empty array or object is a leaf, returned as `"[]"` / `"{}"`;
/// - a non-empty object resolves its first entry (insertion order), reported
///   per [`ExtractStyle`];
/// - any other value is returned as its textual representation.
///
/// Always returns a value; never fails.
///
/// # Example
///
/// ```
/// use reshape_core::{extract_first_error, ExtractStyle};
/// use serde_json::json;
///
/// let errors = json!({"name": [{"first": ["required", "too short"]}]});
/// assert_eq!(
///     extract_first_error(&errors, ExtractStyle::Keyed),
///     json!({"name": "required"}),
/// );
/// assert_eq!(
///     extract_first_error(&errors, ExtractStyle::Leaf),
///     json!("required"),
/// );
/// ```
#[must_use]
pub fn extract_first_error(errors: &Value, style: ExtractStyle) -> Value {
    match errors {
        Value::String(_) => errors.clone(),
        Value::Array(items) => match items.first() {
            Some(head) => extract_first_error(head, style),
            None => Value::String("[]".to_owned()),
        },
        Value::Object(map) => match map.iter().next() {
            Some((field, nested)) => {
                // The leaf itself is always resolved bare; the style only
                // decides whether the outermost field name is kept.
                let leaf = extract_first_error(nested, ExtractStyle::Leaf);
                match style {
                    ExtractStyle::Keyed => json!({ field.as_str(): leaf }),
                    ExtractStyle::Leaf => leaf,
                }
            }
            None => Value::String("{}".to_owned()),
        },
        other => Value::String(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn string_leaf_is_identity() {
        let value = json!("required");
        assert_eq!(extract_first_error(&value, ExtractStyle::Keyed), value);
        assert_eq!(extract_first_error(&value, ExtractStyle::Leaf), value);
    }

    #[test]
    fn empty_containers_are_literal_leaves() {
        assert_eq!(
            extract_first_error(&json!([]), ExtractStyle::Keyed),
            json!("[]")
        );
        assert_eq!(
            extract_first_error(&json!({}), ExtractStyle::Keyed),
            json!("{}")
        );
    }

    #[test]
    fn array_recurses_on_head() {
        let value = json!([["first", "second"], "third"]);
        assert_eq!(
            extract_first_error(&value, ExtractStyle::Leaf),
            json!("first")
        );
    }

    #[test]
    fn keyed_style_keeps_outermost_field_name() {
        let value = json!({"profile": {"email": ["invalid address"]}});
        assert_eq!(
            extract_first_error(&value, ExtractStyle::Keyed),
            json!({"profile": "invalid address"})
        );
    }

    #[test]
    fn leaf_style_drops_field_names() {
        let value = json!({"profile": {"email": ["invalid address"]}});
        assert_eq!(
            extract_first_error(&value, ExtractStyle::Leaf),
            json!("invalid address")
        );
    }

    #[test]
    fn first_entry_wins_in_insertion_order() {
        // preserve_order keeps object entries in declaration order
        let value = json!({"b": "second field", "a": "first field"});
        assert_eq!(
            extract_first_error(&value, ExtractStyle::Keyed),
            json!({"b": "second field"})
        );
    }

    #[test]
    fn scalar_leaves_are_rendered_textually() {
        assert_eq!(
            extract_first_error(&json!(42), ExtractStyle::Keyed),
            json!("42")
        );
        assert_eq!(
            extract_first_error(&json!(null), ExtractStyle::Keyed),
            json!("null")
        );
        assert_eq!(
            extract_first_error(&json!({"flag": true}), ExtractStyle::Leaf),
            json!("true")
        );
    }

    fn error_tree() -> impl Strategy<Value = Value> {
        let leaf = "[a-z ]{1,12}".prop_map(Value::String);
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::vec(("[a-z]{1,6}", inner), 0..4).prop_map(|entries| {
                    Value::Object(entries.into_iter().collect())
                }),
            ]
        })
    }

    proptest! {
        #[test]
        fn extraction_always_terminates_with_a_value(tree in error_tree()) {
            let keyed = extract_first_error(&tree, ExtractStyle::Keyed);
            let leaf = extract_first_error(&tree, ExtractStyle::Leaf);
            prop_assert!(leaf.is_string());
            prop_assert!(keyed.is_string() || keyed.is_object());
        }

        #[test]
        fn head_of_nonempty_array_decides(head in error_tree(), tail in error_tree()) {
            let value = Value::Array(vec![head.clone(), tail]);
            prop_assert_eq!(
                extract_first_error(&value, ExtractStyle::Leaf),
                extract_first_error(&head, ExtractStyle::Leaf)
            );
        }
    }
}
