//! JSON documents as values.
//!
//! Objects become `map[string]any`, arrays `[]any`, and numbers `int` when
//! they fit a signed 64-bit integer, `float64` otherwise. `null` is a nil
//! interface.

use serde_json::Value as Json;
use tg_value::{Type, Value};

/// Convert a parsed document.
pub fn json_to_value(json: &Json) -> Value {
    match json {
        Json::Null => Value::Nil,
        Json::Bool(b) => Value::from(*b),
        Json::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Value::int(i),
            (None, Some(f)) => Value::from(f),
            (None, None) => Value::Nil,
        },
        Json::String(s) => Value::from(s.as_str()),
        Json::Array(items) => Value::slice(Type::any(), items.iter().map(boxed).collect()),
        Json::Object(fields) => Value::map(
            Type::string(),
            Type::any(),
            fields
                .iter()
                .map(|(key, value)| (Value::from(key.as_str()), boxed(value))),
        ),
    }
}

fn boxed(json: &Json) -> Value {
    Value::boxed(json_to_value(json))
}
