//! Content-addressed identity for IR entities.
//!
//! The id of a fragment is `sha256(canonical(fragment - description))`, hex
//! encoded. The canonical form is a fixed JSON text encoding:
//!
//! - object keys sorted by code point at every level;
//! - `", "` between items and `": "` between key and value, no other spaces;
//! - strings escaped to pure ASCII (`\uXXXX`, surrogate pairs above U+FFFF),
//!   with the short escapes `\" \\ \n \r \t \b \f`;
//! - integers in decimal, floats in shortest round-trip form (`1.0`, `0.0001`,
//!   `1e+16`, `1.5e-05`).
//!
//! Only the top-level `description` key is excluded. Ids are a compatibility
//! surface: any implementation following these rules yields the same ids.

use std::fmt::Write as _;

use serde_json::{Map, Number, Value};
use sha2::{Digest, Sha256};

const EXCLUDED_KEY: &str = "description";

/// Content hash of a structural fragment.
pub fn stable_id(fragment: &Value) -> String {
    let mut out = String::new();
    match fragment {
        Value::Object(map) => write_object(&mut out, map, Some(EXCLUDED_KEY)),
        other => write_value(&mut out, other),
    }
    sha256_hex(out.as_bytes())
}

/// Hash of the full canonical encoding, nothing excluded.
pub fn digest(value: &Value) -> String {
    sha256_hex(canonical_string(value).as_bytes())
}

/// Canonical text encoding of a value.
pub fn canonical_string(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => write_number(out, n),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => write_object(out, map, None),
    }
}

fn write_object(out: &mut String, map: &Map<String, Value>, skip: Option<&str>) {
    let mut entries: Vec<(&String, &Value)> = map
        .iter()
        .filter(|(k, _)| Some(k.as_str()) != skip)
        .collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    out.push('{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_string(out, key);
        out.push_str(": ");
        write_value(out, value);
    }
    out.push('}');
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            ' '..='~' => out.push(ch),
            _ => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{unit:04x}");
                }
            }
        }
    }
    out.push('"');
}

fn write_number(out: &mut String, n: &Number) {
    if let Some(i) = n.as_i64() {
        let _ = write!(out, "{i}");
    } else if let Some(u) = n.as_u64() {
        let _ = write!(out, "{u}");
    } else if let Some(f) = n.as_f64() {
        write_float(out, f);
    }
}

/// Shortest round-trip float text: fixed notation for decimal exponents in
/// `-4..16`, otherwise `d.ddde±XX`.
fn write_float(out: &mut String, f: f64) {
    let sci = format!("{f:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        out.push_str(&sci);
        return;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        out.push_str(&sci);
        return;
    };
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    out.push_str(sign);

    if (-4..16).contains(&exp) {
        let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
        if exp >= 0 {
            let int_len = exp as usize + 1;
            if digits.len() <= int_len {
                out.push_str(&digits);
                out.extend(std::iter::repeat_n('0', int_len - digits.len()));
                out.push_str(".0");
            } else {
                out.push_str(&digits[..int_len]);
                out.push('.');
                out.push_str(&digits[int_len..]);
            }
        } else {
            out.push_str("0.");
            out.extend(std::iter::repeat_n('0', (-exp - 1) as usize));
            out.push_str(&digits);
        }
    } else {
        let exp_sign = if exp < 0 { '-' } else { '+' };
        let _ = write!(out, "{mantissa}e{exp_sign}{:02}", exp.abs());
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_canonical_sorts_keys_and_spaces() {
        let v = json!({"b": [1, true, null], "a": {"d": "x", "c": 2}});
        insta::assert_snapshot!(
            canonical_string(&v),
            @r#"{"a": {"c": 2, "d": "x"}, "b": [1, true, null]}"#
        );
    }

    #[test]
    fn test_canonical_escapes_non_ascii() {
        let v = json!("caf\u{e9} \u{1F600} \"q\"\n\u{1}");
        assert_eq!(
            canonical_string(&v),
            r#""caf\u00e9 \ud83d\ude00 \"q\"\n\u0001""#
        );
    }

    #[test]
    fn test_canonical_floats() {
        let cases = [
            (json!(1.0), "1.0"),
            (json!(-0.5), "-0.5"),
            (json!(123.0), "123.0"),
            (json!(0.0001), "0.0001"),
            (json!(0.00001), "1e-05"),
            (json!(1.5e-7), "1.5e-07"),
            (json!(1e16), "1e+16"),
            (json!(1.25e20), "1.25e+20"),
            (json!(1e15), "1000000000000000.0"),
            (json!(0.0), "0.0"),
        ];
        for (value, expected) in cases {
            assert_eq!(canonical_string(&value), expected, "{value}");
        }
    }

    #[test]
    fn test_canonical_integers() {
        assert_eq!(canonical_string(&json!(-42)), "-42");
        assert_eq!(canonical_string(&json!(u64::MAX)), "18446744073709551615");
    }

    #[test]
    fn test_stable_id_known_vectors() {
        // sha256 of `{"maxLength": 10, "type": "string"}`
        assert_eq!(
            stable_id(&json!({"type": "string", "maxLength": 10})),
            "2a581f2f0f8accce62bc27456d745bdceefeea8b996a9fb02821b9e1cec8b38f"
        );
        // sha256 of `{}`
        assert_eq!(
            stable_id(&json!({})),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn test_stable_id_ignores_description_only_at_top() {
        let plain = json!({"type": "object", "properties": {"a": {"type": "string"}}});
        let described = json!({
            "type": "object",
            "description": "top-level text",
            "properties": {"a": {"type": "string"}}
        });
        assert_eq!(stable_id(&plain), stable_id(&described));

        let nested = json!({
            "type": "object",
            "properties": {"a": {"type": "string", "description": "nested"}}
        });
        assert_ne!(stable_id(&plain), stable_id(&nested));
    }

    #[test]
    fn test_stable_id_is_order_independent() {
        let a: Value = serde_json::from_str(r#"{"type":"integer","minimum":1,"maximum":9}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"maximum":9,"type":"integer","minimum":1}"#).unwrap();
        assert_eq!(stable_id(&a), stable_id(&b));
    }

    #[test]
    fn test_stable_id_keeps_other_annotations() {
        let a = json!({"type": "string"});
        let b = json!({"type": "string", "title": "Name"});
        assert_ne!(stable_id(&a), stable_id(&b));
    }

    #[test]
    fn test_digest_includes_description() {
        let a = json!({"type": "string"});
        let b = json!({"type": "string", "description": "x"});
        assert_ne!(digest(&a), digest(&b));
        assert_eq!(digest(&a), stable_id(&a));
    }
}
