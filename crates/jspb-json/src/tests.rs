use crate::{BooleanRepr, Config, JsonError, json_to_value, parse_response, strip_xssi_prefix};
use jspb_value::{Value, jspb};
use serde_json::json;

#[test]
fn test_strip_prefix() {
    assert_eq!(strip_xssi_prefix(")]}'\n[1]"), "\n[1]");
    assert_eq!(strip_xssi_prefix("[1]"), "[1]");
    // only a leading prefix is removed
    assert_eq!(strip_xssi_prefix(" )]}'[1]"), " )]}'[1]");
}

#[test]
fn test_parse_response_with_prefix() {
    let value = parse_response(")]}'\n[\"b.IssueSearchResponse\",[[\"42\"]],null]", &Config::default())
        .unwrap();
    assert_eq!(value, jspb!(["b.IssueSearchResponse", [["42"]], null]));
}

#[test]
fn test_parse_response_without_prefix() {
    let value = parse_response("[\"7\", 3]", &Config::default()).unwrap();
    assert_eq!(value, jspb!(["7", 3]));
}

#[test]
fn test_parse_response_syntax_error() {
    let result = parse_response(")]}'\n[1,", &Config::default());
    assert!(matches!(result, Err(JsonError::Syntax(_))));
}

#[test]
fn test_boolean_as_integer() {
    let value = json_to_value(&json!([true, false]), &Config::default()).unwrap();
    assert_eq!(value, jspb!([1, 0]));
}

#[test]
fn test_boolean_rejected() {
    let config = Config {
        boolean_repr: BooleanRepr::Error,
    };
    let err = json_to_value(&json!(["a", [null, true]]), &config).unwrap_err();
    assert_eq!(err.to_string(), "unsupported JSON boolean at $[1][1]");
}

#[test]
fn test_object_rejected() {
    let err = json_to_value(&json!([{"k": 1}]), &Config::default()).unwrap_err();
    assert!(matches!(err, JsonError::Unsupported { kind: "object", .. }));
}

#[test]
fn test_float_rejected() {
    let err = json_to_value(&json!([1.5]), &Config::default()).unwrap_err();
    assert_eq!(err.to_string(), "unsupported JSON float at $[0]");
}

#[test]
fn test_u64_out_of_range() {
    let err = json_to_value(&json!(u64::MAX), &Config::default()).unwrap_err();
    assert!(matches!(err, JsonError::IntegerOutOfRange { .. }));
}

#[test]
fn test_negative_integer() {
    let value = json_to_value(&json!(-12), &Config::default()).unwrap();
    assert_eq!(value, Value::Integer(-12));
}
