//! JSON binding at the edge of the codec.
//!
//! Plain records become [`Value::Map`] with text keys on the way in. On the way
//! out, a map becomes an object only when every key is text; otherwise it is
//! written as an array of `[key, value]` pairs. Byte blobs have no JSON form
//! and come out as arrays of octets.

use crate::error::{Result, WireError};
use crate::value::Value;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde_json::{Map as JsonMap, Number, Value as Json};

/// Convert a JSON document into a codec value
pub fn from_json(json: &Json) -> Result<Value> {
    let value = match json {
        Json::Null => return Err(WireError::UnsupportedType("null".to_string())),
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => number_to_value(n)?,
        Json::String(s) => Value::Text(s.clone()),
        Json::Array(items) => Value::Array(items.iter().map(from_json).collect::<Result<_>>()?),
        Json::Object(fields) => Value::Map(
            fields
                .iter()
                .map(|(k, v)| Ok((Value::Text(k.clone()), from_json(v)?)))
                .collect::<Result<_>>()?,
        ),
    };
    Ok(value)
}

/// Convert a codec value into JSON
pub fn to_json(value: &Value) -> Json {
    match value {
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(n) => int_to_json(n),
        Value::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
        Value::Text(s) => Json::String(s.clone()),
        Value::Bytes(b) => Json::Array(b.iter().map(|&byte| Json::from(byte)).collect()),
        Value::Array(items) => Json::Array(items.iter().map(to_json).collect()),
        Value::Map(entries) => {
            if entries.iter().all(|(k, _)| k.as_str().is_some()) {
                let mut object = JsonMap::with_capacity(entries.len());
                for (k, v) in entries {
                    if let Value::Text(key) = k {
                        object.insert(key.clone(), to_json(v));
                    }
                }
                Json::Object(object)
            } else {
                Json::Array(
                    entries
                        .iter()
                        .map(|(k, v)| Json::Array(vec![to_json(k), to_json(v)]))
                        .collect(),
                )
            }
        }
    }
}

fn number_to_value(n: &Number) -> Result<Value> {
    if let Some(u) = n.as_u64() {
        Ok(Value::from(u))
    } else if let Some(i) = n.as_i64() {
        Ok(Value::from(i))
    } else if let Some(f) = n.as_f64() {
        Ok(Value::Float(f))
    } else {
        Err(WireError::UnsupportedType(format!("json number {n}")))
    }
}

fn int_to_json(n: &BigInt) -> Json {
    if let Some(u) = n.to_u64() {
        Json::from(u)
    } else if let Some(i) = n.to_i64() {
        Json::from(i)
    } else {
        Json::String(n.to_string())
    }
}

impl TryFrom<&Json> for Value {
    type Error = WireError;

    fn try_from(json: &Json) -> Result<Self> {
        from_json(json)
    }
}

impl From<&Value> for Json {
    fn from(value: &Value) -> Self {
        to_json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_becomes_map() {
        let value = from_json(&json!({"foo": 123, "bar": [1, -2, 3.5], "ok": true})).unwrap();
        assert_eq!(value.get("foo").and_then(Value::as_i64), Some(123));
        assert_eq!(
            value.get("bar"),
            Some(&Value::Array(vec![
                Value::from(1u64),
                Value::from(-2i64),
                Value::Float(3.5)
            ]))
        );
        assert_eq!(value.get("ok"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_null_is_unsupported() {
        assert!(matches!(
            from_json(&json!([1, null])),
            Err(WireError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_to_json_shapes() {
        let text_keys = Value::map([("a", 1)]);
        assert_eq!(to_json(&text_keys), json!({"a": 1}));

        let int_keys = Value::map([(1, "one")]);
        assert_eq!(to_json(&int_keys), json!([[1, "one"]]));

        assert_eq!(to_json(&Value::bytes(vec![1u8, 255])), json!([1, 255]));

        let huge = Value::Int(BigInt::from(u64::MAX) * 4);
        assert_eq!(to_json(&huge), json!("73786976294838206460"));
    }

    #[test]
    fn test_object_key_order_is_kept() {
        let doc: Json = serde_json::from_str(r#"{"b": 1, "a": 2}"#).unwrap();
        let value = from_json(&doc).unwrap();
        let keys: Vec<&str> = value
            .as_map()
            .unwrap()
            .iter()
            .filter_map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, ["b", "a"]);

        let encoded = crate::encode(&value).unwrap();
        assert_eq!(&encoded[..5], &[0x09, 0x02, 0x06, 0x01, b'b']);

        let back = to_json(&crate::decode_all(&encoded).unwrap());
        assert_eq!(serde_json::to_string(&back).unwrap(), r#"{"b":1,"a":2}"#);
    }

    #[test]
    fn test_json_roundtrip_through_codec() {
        let doc = json!({
            "fff": [],
            "sd": {},
            "foo": 123,
            "shit": [123, 2],
            "bar": "12312",
            "foobar": {"zoo": 123, "fooo": true, "barrr": 3.212}
        });
        let value = from_json(&doc).unwrap();
        let encoded = crate::encode(&value).unwrap();
        let decoded = crate::decode_all(&encoded).unwrap();
        assert_eq!(to_json(&decoded), doc);
    }
}
