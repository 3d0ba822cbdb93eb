// Byte-level contract for the .lang codec and the JSON it renders.
use std::collections::BTreeSet;

use frostlang::core::record::{self, Entry};
use frostlang::{ErrorKind, TagTree, UnsupportedValuePolicy, json_to_lang, lang_to_json};

fn hex(text: &str) -> Vec<u8> {
    text.split_whitespace()
        .map(|byte| u8::from_str_radix(byte, 16).expect("hex byte"))
        .collect()
}

const DECODE_FIXTURE: &str = "30 30 30 30 30 30 30 30 08 00 74 61 67 2F 73 75 62 31 04 00 74 00 65 00 78 00 74 00 08 00 74 61 67 2F 73 75 62 32 04 00 74 00 65 00 73 00 74 00";

#[test]
fn decode_fixture_renders_exact_json() {
    let expected = "{\n  \"tag\":{\n    \"sub1\":\"text\",\n    \"sub2\":\"test\"\n  }\n}";
    assert_eq!(lang_to_json(&hex(DECODE_FIXTURE)).expect("decode"), expected);
}

#[test]
fn encode_fixture_matches_layout() {
    let lang = json_to_lang(
        r#"{"tag":{"sub1":"text","sub2":"煤炭"}}"#,
        UnsupportedValuePolicy::Skip,
    )
    .expect("encode");
    let bytes = lang.bytes;

    assert_eq!(&bytes[0..4], &[0x28, 0x00, 0x00, 0x00]);
    assert_eq!(&bytes[4..8], &[0x02, 0x00, 0x00, 0x00]);
    assert_eq!(bytes.len() - 8, 0x24);

    let sub1 = hex("08 00 74 61 67 2F 73 75 62 31 04 00 74 00 65 00 78 00 74 00");
    let sub2 = hex("08 00 74 61 67 2F 73 75 62 32 02 00 64 71 AD 70");
    let body = &bytes[8..];
    let forward = [sub1.clone(), sub2.clone()].concat();
    let reverse = [sub2, sub1].concat();
    assert!(body == forward.as_slice() || body == reverse.as_slice());
}

#[test]
fn decode_of_encode_preserves_entry_set() {
    let entries = vec![
        Entry::from_tag("ui/menu/file", "File"),
        Entry::from_tag("ui/menu/edit", "Edit & <Undo>"),
        Entry::from_tag("ui//blank", ""),
        Entry::from_tag("emoji", "\u{263A}"),
        Entry::from_tag("cjk/coal", "煤炭"),
    ];
    let decoded = record::decode(&record::encode(&entries).expect("encode")).expect("decode");
    let expected: BTreeSet<_> = entries.into_iter().collect();
    let actual: BTreeSet<_> = decoded.into_iter().collect();
    assert_eq!(actual, expected);
}

#[test]
fn header_reports_body_plus_four_and_entry_count() {
    let entries: Vec<Entry> = (0..5)
        .map(|i| Entry::from_tag(&format!("k/{i}"), "v".repeat(i)))
        .collect();
    let bytes = record::encode(&entries).expect("encode");
    let body_len = bytes.len() - 8;
    let size = u32::from_le_bytes(bytes[0..4].try_into().expect("4 bytes"));
    let count = u32::from_le_bytes(bytes[4..8].try_into().expect("4 bytes"));
    assert_eq!(size as usize, body_len + 4);
    assert_eq!(count, 5);
}

#[test]
fn every_truncation_point_is_reported_not_panicking() {
    let full = hex(DECODE_FIXTURE);
    for cut in 9..full.len() {
        if cut == 28 {
            // Exactly one whole record.
            assert_eq!(record::decode(&full[..cut]).expect("decode").len(), 1);
            continue;
        }
        let err = record::decode(&full[..cut]).expect_err("truncated");
        assert_eq!(err.kind(), ErrorKind::TruncatedRecord, "cut at {cut}");
    }
}

#[test]
fn repeated_paths_keep_last_text() {
    let mut body = Vec::new();
    for text in ["first", "second"] {
        body.extend_from_slice(&1u16.to_le_bytes());
        body.push(b'k');
        body.extend_from_slice(&(text.len() as u16).to_le_bytes());
        for unit in text.encode_utf16() {
            body.extend_from_slice(&unit.to_le_bytes());
        }
    }
    let mut bytes = vec![0u8; 8];
    bytes.extend(body);
    assert_eq!(lang_to_json(&bytes).expect("decode"), "{\n  \"k\":\"second\"\n}");
}

#[test]
fn empty_tree_renders_braces_on_two_lines() {
    assert_eq!(TagTree::new().render(), "{\n}");
    assert_eq!(lang_to_json(b"").expect("decode"), "{\n}");
}

#[test]
fn keys_carry_legacy_html_escapes_and_round_trip() {
    let lang = record::encode(&[Entry::from_tag("a&b/<k>", "x<y>")]).expect("encode");
    let json = lang_to_json(&lang).expect("decode");
    assert_eq!(json, "{\n  \"a\\u0026b\":{\n    \"\\u003ck\\u003e\":\"x<y>\"\n  }\n}");

    let back = json_to_lang(&json, UnsupportedValuePolicy::Skip).expect("encode");
    assert_eq!(back.bytes, lang);
}
