//! JSON argument parsing helpers for tool calls.
//!
//! ```rust
//! use ftooling::parse_json_object;
//!
//! let args = parse_json_object(r#"{"id":5}"#).expect("object should parse");
//! assert_eq!(args["id"], 5);
//! ```

use serde_json::{Map, Value};

use crate::ToolError;

pub fn parse_json_value(args_json: &str) -> Result<Value, ToolError> {
    serde_json::from_str(args_json)
        .map_err(|err| ToolError::invalid_arguments(format!("invalid JSON arguments: {err}")))
}

/// Parses call arguments as a JSON object. Blank input is an empty object.
pub fn parse_json_object(args_json: &str) -> Result<Map<String, Value>, ToolError> {
    if args_json.trim().is_empty() {
        return Ok(Map::new());
    }
    match parse_json_value(args_json)? {
        Value::Object(map) => Ok(map),
        _ => Err(ToolError::invalid_arguments("expected JSON object arguments")),
    }
}
