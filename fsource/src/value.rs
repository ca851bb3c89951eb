//! Driver-neutral SQL values used for bind arguments and result cells.
//!
//! ```rust
//! use fsource::SqlValue;
//! use serde_json::json;
//!
//! assert_eq!(SqlValue::from_json(&json!(5)), SqlValue::Integer(5));
//! assert_eq!(SqlValue::from_json(&json!(null)), SqlValue::Null);
//! assert_eq!(SqlValue::from_json(&json!([1, 2])), SqlValue::Text("[1,2]".to_string()));
//! ```

use serde::{Serialize, Serializer};
use serde_json::Value;

/// One SQL cell. Covers SQLite's storage classes plus booleans for binding.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SqlValue {
    #[default]
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Converts a JSON value into a bind argument. Arrays and objects bind as
    /// their JSON text so SQLite's JSON functions can consume them.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => SqlValue::Null,
            Value::Bool(value) => SqlValue::Boolean(*value),
            Value::Number(number) => match number.as_i64() {
                Some(integer) => SqlValue::Integer(integer),
                None => SqlValue::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(text) => SqlValue::Text(text.clone()),
            Value::Array(_) | Value::Object(_) => SqlValue::Text(value.to_string()),
        }
    }
}

impl Serialize for SqlValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            SqlValue::Null => serializer.serialize_unit(),
            SqlValue::Integer(value) => serializer.serialize_i64(*value),
            SqlValue::Float(value) => serializer.serialize_f64(*value),
            SqlValue::Text(value) => serializer.serialize_str(value),
            SqlValue::Boolean(value) => serializer.serialize_bool(*value),
            SqlValue::Blob(bytes) => serializer.collect_seq(bytes),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Boolean(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Blob(value)
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlValue::Null)
    }
}
