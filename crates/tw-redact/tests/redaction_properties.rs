//! Property-based tests for redaction invariants:
//! idempotence, shape preservation, key redaction at any depth, and
//! complete masking of email / access-key substrings.

use proptest::prelude::*;
use regex::Regex;
use serde_json::{json, Value};
use tw_redact::{Redactor, SensitiveKeys, REDACTED_MARKER};

fn arb_text() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        "[a-zA-Z0-9 ._+-]{0,20}",
        "[a-z0-9.]{1,8}@[a-z]{1,8}\\.[a-z]{2,4}",
        "AKIA[0-9A-Z]{16}",
        "AKIA[0-9A-Z]{10}",
        Just("@@..@".to_string()),
    ];
    prop::collection::vec(piece, 0..4).prop_map(|parts| parts.join(" "))
}

fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("password".to_string()),
        Just("Token".to_string()),
        Just("AUTHORIZATION".to_string()),
        Just("api_key".to_string()),
        "[a-z_]{1,10}",
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        arb_text().prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((arb_key(), inner), 0..6)
                .prop_map(|pairs| Value::Object(pairs.into_iter().collect())),
        ]
    })
}

fn same_shape(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter().zip(y.iter()).all(|((ka, va), (kb, vb))| {
                    ka == kb && (SensitiveKeys::default().contains(ka) || same_shape(va, vb))
                })
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(va, vb)| same_shape(va, vb))
        }
        (Value::Object(_) | Value::Array(_), _) | (_, Value::Object(_) | Value::Array(_)) => false,
        _ => true,
    }
}

fn sensitive_keys_redacted(value: &Value, keys: &SensitiveKeys) -> bool {
    match value {
        Value::Object(map) => map.iter().all(|(k, v)| {
            if keys.contains(k) {
                v == &Value::String(REDACTED_MARKER.to_string())
            } else {
                sensitive_keys_redacted(v, keys)
            }
        }),
        Value::Array(items) => items.iter().all(|v| sensitive_keys_redacted(v, keys)),
        _ => true,
    }
}

fn collect_strings<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::Object(map) => map.values().for_each(|v| collect_strings(v, out)),
        Value::Array(items) => items.iter().for_each(|v| collect_strings(v, out)),
        Value::String(s) => out.push(s),
        _ => {}
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// redact(redact(e)) == redact(e)
    #[test]
    fn redaction_is_idempotent(value in arb_value()) {
        let redactor = Redactor::default();
        let once = redactor.redact(&value);
        prop_assert_eq!(redactor.redact(&once), once);
    }

    /// Key sets, key order and sequence lengths never change.
    #[test]
    fn redaction_preserves_shape(value in arb_value()) {
        let redactor = Redactor::default();
        let out = redactor.redact(&value);
        prop_assert!(same_shape(&value, &out));
    }

    /// Every sensitive key, at any depth, maps to exactly the marker.
    #[test]
    fn sensitive_keys_always_redacted(value in arb_value()) {
        let redactor = Redactor::default();
        let out = redactor.redact(&value);
        prop_assert!(sensitive_keys_redacted(&out, redactor.sensitive_keys()));
    }

    /// No email-like or access-key-like substring survives masking.
    #[test]
    fn no_partial_matches_remain(value in arb_value()) {
        let email = Regex::new(r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+").unwrap();
        let akia = Regex::new(r"AKIA[0-9A-Z]{16}").unwrap();
        let out = Redactor::default().redact(&value);
        let mut strings = Vec::new();
        collect_strings(&out, &mut strings);
        for s in strings {
            prop_assert!(!email.is_match(s), "email survived in {:?}", s);
            prop_assert!(!akia.is_match(s), "access key survived in {:?}", s);
        }
    }
}
