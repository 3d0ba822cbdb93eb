//! Purpose: Whole-buffer conversion pipelines between `.lang` bytes and JSON text.
//! Exports: `lang_to_tree`, `lang_to_json`, `json_to_lang`, `json_bytes_to_lang`, `LangOutput`.
//! Role: Compose codec, tree, and flattening; no file system access.
//! Invariants: Each call is a pure function of its input; no state survives a call.
//! Invariants: Malformed JSON is an error, never an empty `.lang` body.
use serde_json::Value;

use crate::core::error::{Error, ErrorKind};
use crate::core::flatten::{self, SkippedValue, UnsupportedValuePolicy};
use crate::core::record;
use crate::core::tree::TagTree;
use crate::json::parse;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LangOutput {
    pub bytes: Vec<u8>,
    pub entry_count: usize,
    pub skipped: Vec<SkippedValue>,
}

pub fn lang_to_tree(bytes: &[u8]) -> Result<TagTree, Error> {
    TagTree::from_entries(record::decode(bytes)?)
}

pub fn lang_to_json(bytes: &[u8]) -> Result<String, Error> {
    Ok(lang_to_tree(bytes)?.render())
}

pub fn json_to_lang(text: &str, policy: UnsupportedValuePolicy) -> Result<LangOutput, Error> {
    let value: Value = parse::from_str(text).map_err(malformed)?;
    value_to_lang(&value, policy)
}

pub fn json_bytes_to_lang(
    bytes: &[u8],
    policy: UnsupportedValuePolicy,
) -> Result<LangOutput, Error> {
    let value: Value = parse::from_slice(bytes).map_err(malformed)?;
    value_to_lang(&value, policy)
}

pub fn value_to_lang(value: &Value, policy: UnsupportedValuePolicy) -> Result<LangOutput, Error> {
    let flat = flatten::flatten(value, policy)?;
    let bytes = record::encode(&flat.entries)?;
    Ok(LangOutput {
        bytes,
        entry_count: flat.entries.len(),
        skipped: flat.skipped,
    })
}

fn malformed(err: serde_json::Error) -> Error {
    let hint = parse::hint_for_error(&err, "json source");
    Error::new(ErrorKind::MalformedJson)
        .with_message("invalid JSON")
        .with_hint(hint)
        .with_source(err)
}

#[cfg(test)]
mod tests {
    use super::{json_bytes_to_lang, json_to_lang, lang_to_json};
    use crate::core::error::ErrorKind;
    use crate::core::flatten::UnsupportedValuePolicy;

    #[test]
    fn json_round_trips_through_lang() {
        let source = "{\n  \"a\":{\n    \"b\":\"<x> & y\"\n  },\n  \"c\":\"\\u0001\"\n}";
        let lang = json_to_lang(source, UnsupportedValuePolicy::Skip).expect("encode");
        assert_eq!(lang.entry_count, 2);
        assert_eq!(lang_to_json(&lang.bytes).expect("decode"), source);
    }

    #[test]
    fn malformed_json_is_reported_with_category() {
        let err = json_to_lang("{\"a\":", UnsupportedValuePolicy::Skip).expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::MalformedJson);
        assert!(err.hint().unwrap_or_default().contains("parse category: unexpected-eof"));
    }

    #[test]
    fn invalid_utf8_bytes_are_malformed() {
        let err = json_bytes_to_lang(&[0xff, b'{', b'}'], UnsupportedValuePolicy::Skip)
            .expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::MalformedJson);
    }

    #[test]
    fn skipped_values_travel_with_output() {
        let lang = json_to_lang("{\"a\":1,\"b\":\"x\"}", UnsupportedValuePolicy::Skip)
            .expect("encode");
        assert_eq!(lang.entry_count, 1);
        assert_eq!(lang.skipped.len(), 1);
        assert_eq!(lang.skipped[0].kind, "number");
    }

    #[test]
    fn partial_lang_renders_empty_object() {
        assert_eq!(lang_to_json(&[0u8; 8]).expect("decode"), "{\n}");
    }
}
