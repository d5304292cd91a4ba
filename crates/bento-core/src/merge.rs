//! Generic document merge
//!
//! One operation backs every cascade in the configuration: multi-source
//! option lists, checker → override → per-check options, and reporter
//! options. Arrays concatenate, objects merge key-wise recursively, and in
//! every other case (scalars, differing shapes) the second operand wins.

use serde_json::Value;

/// Merge `b` into `a`, returning the combined document.
pub fn merge(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Array(left), Value::Array(right)) => {
            let mut combined = left.clone();
            combined.extend(right.iter().cloned());
            Value::Array(combined)
        }
        (Value::Object(left), Value::Object(right)) => {
            let mut combined = left.clone();
            for (key, value) in right {
                let merged = match combined.get(key) {
                    Some(existing) => merge(existing, value),
                    None => value.clone(),
                };
                combined.insert(key.clone(), merged);
            }
            Value::Object(combined)
        }
        (_, other) => other.clone(),
    }
}

/// Fold a list of documents left to right with [`merge`].
///
/// An empty list merges to an empty object, the identity for option
/// documents.
pub fn merge_all<'a, I>(documents: I) -> Value
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut merged = Value::Object(serde_json::Map::new());
    for document in documents {
        merged = merge(&merged, document);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn two_arrays_concatenate() {
        let a = json!({"plugins": ["foo"]});
        let b = json!({"plugins": ["bar", "baz"]});

        assert_eq!(
            merge(&a, &b),
            json!({"plugins": ["foo", "bar", "baz"]})
        );
    }

    #[test]
    fn objects_merge_key_wise_recursively() {
        let a = json!({"rules": {"semi": "error", "indent": 2}});
        let b = json!({"rules": {"semi": "warn", "quotes": "double"}});

        assert_eq!(
            merge(&a, &b),
            json!({"rules": {"semi": "warn", "indent": 2, "quotes": "double"}})
        );
    }

    #[test]
    fn differing_shapes_second_wins() {
        let a = json!({"rules": ["foo"]});
        let b = json!({"rules": {"bar": "baz"}});

        assert_eq!(merge(&a, &b), json!({"rules": {"bar": "baz"}}));
    }

    #[test]
    fn scalars_second_wins() {
        assert_eq!(merge(&json!(1), &json!(2)), json!(2));
        assert_eq!(merge(&json!("a"), &json!(null)), json!(null));
        assert_eq!(merge(&json!({"x": 1}), &json!(3)), json!(3));
    }

    #[test]
    fn merge_all_folds_in_order() {
        let docs = vec![
            json!({"a": 1}),
            json!({"b": 2}),
            json!({"a": 3, "c": {"d": true}}),
        ];

        assert_eq!(
            merge_all(&docs),
            json!({"a": 3, "b": 2, "c": {"d": true}})
        );
    }

    #[test]
    fn merge_all_empty_is_empty_object() {
        let docs: Vec<Value> = Vec::new();
        assert_eq!(merge_all(&docs), json!({}));
    }
}
