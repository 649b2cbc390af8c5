//! Differential checks against `serde_json`: both decoders must agree on which documents are
//! valid, and on the exact bits of every number they accept.

use puffjson::{DecodeError, Value, ValueKind};

/// Structural equality between our tree and serde_json's. serde_json's default map sorts keys,
/// so objects are only compared when their keys are unique.
fn same_tree(ours: &Value, theirs: &serde_json::Value) -> bool {
    match (ours.kind(), theirs) {
        (ValueKind::Null, serde_json::Value::Null) => true,
        (ValueKind::True, serde_json::Value::Bool(true)) => true,
        (ValueKind::False, serde_json::Value::Bool(false)) => true,
        (ValueKind::Number, serde_json::Value::Number(n)) => {
            n.as_f64().map(f64::to_bits) == ours.as_number().ok().map(f64::to_bits)
        }
        (ValueKind::String, serde_json::Value::String(s)) => ours.as_string() == Ok(s.as_str()),
        (ValueKind::Array, serde_json::Value::Array(values)) => {
            let ours = ours.as_array().unwrap();
            ours.len() == values.len() && ours.iter().zip(values).all(|(a, b)| same_tree(a, b))
        }
        (ValueKind::Object, serde_json::Value::Object(members)) => {
            ours.object_len() == Ok(members.len())
                && ours.entries().unwrap().all(|(key, value)| {
                    std::str::from_utf8(key)
                        .ok()
                        .and_then(|key| members.get(key))
                        .is_some_and(|theirs| same_tree(value, theirs))
                })
        }
        _ => false,
    }
}

fn assert_parity(input: &str) {
    let ours = puffjson::parse(input);
    let theirs = serde_json::from_str::<serde_json::Value>(input);
    match (ours, theirs) {
        (Ok(a), Ok(b)) => assert!(same_tree(&a, &b), "value mismatch for {input:?}"),
        (Err(_), Err(_)) => {}
        (left, right) => panic!("outcome mismatch for {input:?}: ours={left:?}, serde_json={right:?}"),
    }
}

#[test]
fn corpus_valid_documents_match() {
    let corpus = [
        r#"{"a":1,"b":"ok"}"#,
        r#"[1,2,3,{"x":true}]"#,
        r#"{"nested":{"arr":[{"k":"v"}]}}"#,
        r#"{"unicode":"\u2603 \ud83d\ude00"}"#,
        r#" [ null , false , "tab\there" ] "#,
        "\"caf\u{e9}\"",
        "[]",
        "{}",
    ];
    for input in corpus {
        assert_parity(input);
    }
}

#[test]
fn corpus_invalid_documents_match() {
    let corpus = [
        "[1,]",
        r#"{"a":1,}"#,
        "[1 2",
        r#"{"a" 1}"#,
        "01",
        "1.",
        ".5",
        "+1",
        "\"\\uD800\"",
        "\"\u{1}\"",
        "nul",
        "[",
        "// comment\n1",
        "{a:1}",
        "'single'",
    ];
    for input in corpus {
        assert_parity(input);
    }
}

#[test]
fn non_utf8_strings_are_accepted_unlike_serde_json() {
    let input = b"[\"caf\xe9\"]";
    assert!(serde_json::from_slice::<serde_json::Value>(input).is_err());
    let ours = puffjson::parse(input).unwrap();
    assert_eq!(
        ours.array_get(0).and_then(|s| s.as_bytes()),
        Ok(b"caf\xe9".as_slice())
    );
}

#[test]
fn number_bits_match_serde_json() {
    let literals = [
        "0",
        "-1",
        "1.0000000000000002",
        "0.1",
        "0.30000000000000004",
        "123456789012345678901234567890",
        "9007199254740993",
        "2.2250738585072011e-308",
        "2.2250738585072012e-308",
        "4.9406564584124654e-324",
        "1.7976931348623157e+308",
        "-1.7976931348623157e+308",
        "1e-10000",
        "3.141592653589793238462643383279",
        "1E400",
        "-1e309",
    ];
    for literal in literals {
        assert_parity(literal);
        assert_parity(&format!("[{literal}]"));
    }
}

#[test]
fn numbers_match_std_parse() {
    let values = [
        0.1_f64,
        1.0 / 3.0,
        f64::MAX,
        f64::MIN_POSITIVE,
        f64::EPSILON,
        5e-324,
        -123.456e-78,
        6.02214076e23,
    ];
    for n in values {
        for literal in [format!("{n:e}"), format!("{n:?}")] {
            let decoded = puffjson::parse(&literal).unwrap().as_number().unwrap();
            assert_eq!(decoded.to_bits(), n.to_bits(), "{literal}");
        }
    }
}

#[test]
fn overflow_is_a_range_error_not_infinity() {
    for literal in ["1e309", "-1e309", "1E400"] {
        assert!(matches!(
            puffjson::parse(literal),
            Err(DecodeError::Range(_))
        ));
    }
}

#[test]
fn duplicate_keys_are_kept() {
    let ours = puffjson::parse(r#"{"a":1,"a":2}"#).unwrap();
    assert_eq!(ours.object_len(), Ok(2));
    assert_eq!(ours.find("a").unwrap().map(|v| v.as_number()), Some(Ok(1.0)));

    // serde_json keeps the last one instead.
    let theirs: serde_json::Value = serde_json::from_str(r#"{"a":1,"a":2}"#).unwrap();
    assert_eq!(theirs["a"], 2);
}
