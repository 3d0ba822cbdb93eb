//! Flattening of parsed JSON into `.lang` entries.
//!
//! Only objects and strings carry data. Every other value is handled by an
//! explicit [`UnsupportedValuePolicy`]; skipped values are reported back to the
//! caller rather than disappearing.
use serde_json::{Map, Value};
use tracing::debug;

use crate::core::error::{Error, ErrorKind};
use crate::core::record::Entry;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum UnsupportedValuePolicy {
    /// Leave the value out and record it in [`Flattened::skipped`].
    #[default]
    Skip,
    /// Fail with `ErrorKind::UnsupportedJsonValue`.
    Reject,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SkippedValue {
    pub path: Vec<String>,
    pub kind: &'static str,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Flattened {
    pub entries: Vec<Entry>,
    pub skipped: Vec<SkippedValue>,
}

/// Walks `value` depth-first, emitting one entry per string leaf.
///
/// Object keys are visited in `serde_json::Map` iteration order. The top-level
/// value must be an object; anything else falls under `policy`.
pub fn flatten(value: &Value, policy: UnsupportedValuePolicy) -> Result<Flattened, Error> {
    let mut out = Flattened::default();
    match value {
        Value::Object(map) => walk_object(map, &mut Vec::new(), policy, &mut out)?,
        other => unsupported(other, &[], policy, &mut out)?,
    }
    Ok(out)
}

fn walk_object(
    map: &Map<String, Value>,
    path: &mut Vec<String>,
    policy: UnsupportedValuePolicy,
    out: &mut Flattened,
) -> Result<(), Error> {
    for (key, value) in map {
        path.push(key.clone());
        match value {
            Value::String(text) => out.entries.push(Entry::new(path.clone(), text.as_str())),
            Value::Object(inner) => walk_object(inner, path, policy, out)?,
            other => unsupported(other, path, policy, out)?,
        }
        path.pop();
    }
    Ok(())
}

fn unsupported(
    value: &Value,
    path: &[String],
    policy: UnsupportedValuePolicy,
    out: &mut Flattened,
) -> Result<(), Error> {
    let kind = value_kind(value);
    let tag = path.join("/");
    match policy {
        UnsupportedValuePolicy::Skip => {
            debug!(tag = %tag, kind, "skipping unsupported json value");
            out.skipped.push(SkippedValue {
                path: path.to_vec(),
                kind,
            });
            Ok(())
        }
        UnsupportedValuePolicy::Reject => Err(Error::new(ErrorKind::UnsupportedJsonValue)
            .with_message(if path.is_empty() {
                format!("top-level {kind} is not an object")
            } else {
                format!("{kind} at \"{tag}\" is not a string or object")
            })
            .with_hint("Only nested objects with string leaves convert to .lang records.")),
    }
}

pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{SkippedValue, UnsupportedValuePolicy, flatten};
    use crate::core::error::ErrorKind;
    use crate::core::record::Entry;
    use serde_json::json;

    #[test]
    fn strings_become_entries_with_key_paths() {
        let value = json!({"tag": {"sub1": "text", "sub2": "煤炭"}, "top": "t"});
        let flat = flatten(&value, UnsupportedValuePolicy::Skip).expect("flatten");
        let mut entries = flat.entries;
        entries.sort();
        assert_eq!(
            entries,
            vec![
                Entry::from_tag("tag/sub1", "text"),
                Entry::from_tag("tag/sub2", "煤炭"),
                Entry::from_tag("top", "t"),
            ]
        );
        assert!(flat.skipped.is_empty());
    }

    #[test]
    fn unsupported_values_are_skipped_and_counted() {
        let value = json!({
            "keep": "yes",
            "n": 1,
            "nested": {"flag": true, "none": null, "list": ["a"], "ok": "fine"}
        });
        let flat = flatten(&value, UnsupportedValuePolicy::Skip).expect("flatten");
        assert_eq!(flat.entries.len(), 2);
        assert_eq!(flat.skipped.len(), 4);
        assert!(flat.skipped.contains(&SkippedValue {
            path: vec!["nested".to_string(), "list".to_string()],
            kind: "array",
        }));
        assert!(flat.skipped.contains(&SkippedValue {
            path: vec!["n".to_string()],
            kind: "number",
        }));
    }

    #[test]
    fn reject_policy_fails_on_first_unsupported_value() {
        let value = json!({"a": {"b": 3}});
        let err = flatten(&value, UnsupportedValuePolicy::Reject).expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::UnsupportedJsonValue);
        assert!(err.message().unwrap_or_default().contains("\"a/b\""));
    }

    #[test]
    fn top_level_non_object_contributes_nothing() {
        for value in [json!("text"), json!([1, 2]), json!(null)] {
            let flat = flatten(&value, UnsupportedValuePolicy::Skip).expect("flatten");
            assert!(flat.entries.is_empty());
            assert_eq!(flat.skipped.len(), 1);
            assert!(flat.skipped[0].path.is_empty());
        }
        let err = flatten(&json!("text"), UnsupportedValuePolicy::Reject).expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::UnsupportedJsonValue);
    }

    #[test]
    fn empty_objects_contribute_nothing() {
        let flat = flatten(&json!({"a": {}}), UnsupportedValuePolicy::Reject).expect("flatten");
        assert!(flat.entries.is_empty());
        assert!(flat.skipped.is_empty());
    }

    #[test]
    fn traversal_order_is_stable_across_runs() {
        let value = json!({"z": "1", "a": {"m": "2", "b": "3"}});
        let first = flatten(&value, UnsupportedValuePolicy::Skip).expect("flatten");
        let second = flatten(&value, UnsupportedValuePolicy::Skip).expect("flatten");
        assert_eq!(first, second);
    }
}
