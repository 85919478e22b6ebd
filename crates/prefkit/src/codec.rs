//! Codecs: the decode/encode function pair behind a type tag.
//!
//! A codec turns the text printed by `defaults read` into a [`Value`] and a
//! [`Value`] into the single token passed to `defaults write -<tag>`.
//!
//! Decoding never fails: text outside the type's grammar decodes to
//! [`Value::Absent`]. Encoding returns `None` when the value's shape does not
//! fit the type; that sentinel is distinct from `Some(String::new())`.

use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Built-in boolean type tag.
pub const BOOLEAN: &str = "boolean";
/// Built-in string type tag.
pub const STRING: &str = "string";
/// Optional integer type tag.
pub const INTEGER: &str = "integer";
/// Optional float type tag.
pub const FLOAT: &str = "float";

/// Decode function: external text to internal value.
pub type DecodeFn = dyn Fn(&str) -> Value + Send + Sync;

/// Encode function: internal value to external text, `None` if inapplicable.
pub type EncodeFn = dyn Fn(&Value) -> Option<String> + Send + Sync;

/// One pluggable type transform.
#[derive(Clone)]
pub struct Codec {
    tag: String,
    decode: Arc<DecodeFn>,
    encode: Arc<EncodeFn>,
}

impl Codec {
    pub fn new<D, E>(tag: impl Into<String>, decode: D, encode: E) -> Self
    where
        D: Fn(&str) -> Value + Send + Sync + 'static,
        E: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            tag: tag.into(),
            decode: Arc::new(decode),
            encode: Arc::new(encode),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn decode(&self, raw: &str) -> Value {
        (self.decode)(raw)
    }

    pub fn encode(&self, value: &Value) -> Option<String> {
        (self.encode)(value)
    }

    /// Whether the encoder accepts this value's shape.
    pub fn accepts(&self, value: &Value) -> bool {
        self.encode(value).is_some()
    }
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec").field("tag", &self.tag).finish()
    }
}

/// `boolean`: `1`/`YES` and `0`/`NO`; writes `YES`/`NO`.
///
/// An absent value encodes as `NO`, but no text decodes back to absent.
pub fn boolean() -> Codec {
    Codec::new(BOOLEAN, decode_boolean, encode_boolean)
}

/// `string`: identity decode, accepts only text values.
pub fn string() -> Codec {
    Codec::new(STRING, |raw| Value::Text(raw.to_string()), |value| match value {
        Value::Text(s) => Some(s.clone()),
        _ => None,
    })
}

/// `integer`: decimal `i64`.
pub fn integer() -> Codec {
    Codec::new(
        INTEGER,
        |raw| raw.trim().parse::<i64>().map_or(Value::Absent, Value::Integer),
        |value| match value {
            Value::Integer(i) => Some(i.to_string()),
            _ => None,
        },
    )
}

/// `float`: decimal `f64`; integers are accepted on encode.
pub fn float() -> Codec {
    Codec::new(
        FLOAT,
        |raw| raw.trim().parse::<f64>().map_or(Value::Absent, Value::Float),
        |value| match value {
            Value::Float(x) => Some(x.to_string()),
            Value::Integer(i) => Some(i.to_string()),
            _ => None,
        },
    )
}

fn decode_boolean(raw: &str) -> Value {
    match raw {
        "1" | "YES" => Value::Bool(true),
        "0" | "NO" => Value::Bool(false),
        _ => Value::Absent,
    }
}

fn encode_boolean(value: &Value) -> Option<String> {
    match value {
        Value::Bool(true) => Some("YES".to_string()),
        Value::Bool(false) | Value::Absent => Some("NO".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_decode_markers() {
        let codec = boolean();
        assert_eq!(codec.decode("1"), Value::Bool(true));
        assert_eq!(codec.decode("YES"), Value::Bool(true));
        assert_eq!(codec.decode("0"), Value::Bool(false));
        assert_eq!(codec.decode("NO"), Value::Bool(false));
    }

    #[test]
    fn test_boolean_decode_unrecognized_is_absent() {
        let codec = boolean();
        assert_eq!(codec.decode("yes"), Value::Absent);
        assert_eq!(codec.decode("true"), Value::Absent);
        assert_eq!(codec.decode("1\n"), Value::Absent);
        assert_eq!(codec.decode(""), Value::Absent);
    }

    #[test]
    fn test_boolean_round_trip() {
        let codec = boolean();
        for b in [true, false] {
            let raw = codec.encode(&Value::Bool(b)).unwrap();
            assert_eq!(codec.decode(&raw), Value::Bool(b));
        }
    }

    #[test]
    fn test_boolean_absent_encodes_as_false_but_never_decodes_to_absent() {
        // Asymmetric on purpose: absent writes NO, and NO reads back as false.
        let codec = boolean();
        let raw = codec.encode(&Value::Absent).unwrap();
        assert_eq!(raw, "NO");
        assert_eq!(codec.decode(&raw), Value::Bool(false));
        assert_ne!(codec.decode(&raw), Value::Absent);
    }

    #[test]
    fn test_boolean_rejects_other_shapes() {
        let codec = boolean();
        assert_eq!(codec.encode(&Value::Text("YES".into())), None);
        assert_eq!(codec.encode(&Value::Integer(1)), None);
    }

    #[test]
    fn test_string_codec() {
        let codec = string();
        assert_eq!(codec.decode("Dark"), Value::Text("Dark".into()));
        assert_eq!(codec.encode(&Value::Text("Dark".into())), Some("Dark".into()));
        assert_eq!(codec.encode(&Value::Bool(true)), None);
        assert_eq!(codec.encode(&Value::Integer(3)), None);
        assert_eq!(codec.encode(&Value::Absent), None);
    }

    #[test]
    fn test_string_empty_encoding_is_not_inapplicable() {
        let codec = string();
        assert_eq!(codec.encode(&Value::Text(String::new())), Some(String::new()));
    }

    #[test]
    fn test_integer_codec() {
        let codec = integer();
        assert_eq!(codec.decode("42"), Value::Integer(42));
        assert_eq!(codec.decode("4.2"), Value::Absent);
        assert_eq!(codec.encode(&Value::Integer(-7)), Some("-7".into()));
        assert_eq!(codec.encode(&Value::Float(1.0)), None);
    }

    #[test]
    fn test_float_codec() {
        let codec = float();
        assert_eq!(codec.decode("0.25"), Value::Float(0.25));
        assert_eq!(codec.decode("fast"), Value::Absent);
        assert_eq!(codec.encode(&Value::Float(0.5)), Some("0.5".into()));
        assert_eq!(codec.encode(&Value::Integer(2)), Some("2".into()));
        assert_eq!(codec.encode(&Value::Bool(true)), None);
    }

    #[test]
    fn test_custom_codec() {
        let codec = Codec::new(
            "shouty",
            |raw| Value::Text(raw.to_lowercase()),
            |value| match value {
                Value::Text(s) => Some(s.to_uppercase()),
                _ => None,
            },
        );
        assert_eq!(codec.tag(), "shouty");
        assert!(codec.accepts(&Value::Text("hi".into())));
        assert!(!codec.accepts(&Value::Bool(false)));
        assert_eq!(format!("{codec:?}"), "Codec { tag: \"shouty\" }");
    }
}
