//! Turns raw JSPB response bodies into [`Value`] trees.
//!
//! Responses start with a fixed `)]}'` line that keeps browsers from
//! executing them as script. It is removed before the body is parsed.

mod config;
mod error;

pub use config::{BooleanRepr, Config};
pub use error::JsonError;
use jspb_value::{NodePath, Sequence, Value};
use serde_json::Value as JsonValue;

/// Anti-hijacking prefix prepended to JSPB responses.
pub const XSSI_PREFIX: &str = ")]}'";

/// Remove the anti-hijacking prefix if the body starts with it.
pub fn strip_xssi_prefix(body: &str) -> &str {
    body.strip_prefix(XSSI_PREFIX).unwrap_or(body)
}

/// Parse a raw response body into a value tree.
pub fn parse_response(body: &str, config: &Config) -> Result<Value, JsonError> {
    let json: JsonValue = serde_json::from_str(strip_xssi_prefix(body))?;
    json_to_value(&json, config)
}

/// Convert an already parsed JSON document into a value tree.
pub fn json_to_value(json: &JsonValue, config: &Config) -> Result<Value, JsonError> {
    let mut path = NodePath::root();
    convert_node(json, config, &mut path)
}

fn convert_node(
    json: &JsonValue,
    config: &Config,
    path: &mut NodePath,
) -> Result<Value, JsonError> {
    match json {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::String(text) => Ok(Value::String(text.clone())),
        JsonValue::Bool(b) => match config.boolean_repr {
            BooleanRepr::Integer => Ok(Value::Integer(i64::from(*b))),
            BooleanRepr::Error => Err(JsonError::Unsupported {
                kind: "boolean",
                path: path.clone(),
            }),
        },
        JsonValue::Number(number) => {
            if let Some(n) = number.as_i64() {
                Ok(Value::Integer(n))
            } else if number.is_u64() {
                Err(JsonError::IntegerOutOfRange {
                    number: number.to_string(),
                    path: path.clone(),
                })
            } else {
                Err(JsonError::Unsupported {
                    kind: "float",
                    path: path.clone(),
                })
            }
        }
        JsonValue::Array(items) => {
            let mut result = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                path.push(index);
                let converted = convert_node(item, config, path);
                path.pop();
                result.push(converted?);
            }
            Ok(Value::Sequence(Sequence(result)))
        }
        JsonValue::Object(_) => Err(JsonError::Unsupported {
            kind: "object",
            path: path.clone(),
        }),
    }
}

#[cfg(test)]
mod tests;
