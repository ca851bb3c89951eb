//! Textual substitution of template parameters into statement text.
//!
//! Markers take two forms: `{{.name}}` for a scalar and `{{array .name}}`
//! for a comma-separated list. Substitution happens before the statement
//! reaches any driver, so rendered values never pass through bind
//! placeholders.
//!
//! ```rust
//! use ftooling::{ParameterDefinition, resolve_template_params};
//! use serde_json::json;
//!
//! let definitions = vec![ParameterDefinition::string("table", "Table to read")];
//! let values = json!({ "table": "t2" }).as_object().cloned().expect("object");
//!
//! let sql = resolve_template_params(&definitions, "SELECT * FROM {{.table}}", &values)
//!     .expect("template should resolve");
//! assert_eq!(sql, "SELECT * FROM t2");
//! ```

use serde_json::{Map, Value};

use crate::{ParameterDefinition, ToolError, get_params};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker<'a> {
    Scalar(&'a str),
    Array(&'a str),
}

/// Substitutes every marker in `statement` with the rendered value from `map`.
///
/// Every required template parameter must be present even when the statement
/// never references it.
pub fn resolve_template_params(
    definitions: &[ParameterDefinition],
    statement: &str,
    map: &Map<String, Value>,
) -> Result<String, ToolError> {
    let values = get_params(definitions, map)?;
    let mut resolved = String::with_capacity(statement.len());
    let mut rest = statement;

    while let Some(start) = rest.find(OPEN) {
        resolved.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];
        let end = after_open.find(CLOSE).ok_or_else(|| {
            ToolError::invalid_arguments(format!(
                "unterminated template marker at byte {}",
                statement.len() - rest.len() + start
            ))
        })?;

        let marker = parse_marker(&after_open[..end])?;
        let name = match marker {
            Marker::Scalar(name) | Marker::Array(name) => name,
        };
        if !definitions.iter().any(|definition| definition.name == name) {
            return Err(ToolError::invalid_arguments(format!(
                "template marker '{name}' has no matching template parameter"
            )));
        }
        let value = values.get(name).unwrap_or(&Value::Null);
        resolved.push_str(&render_marker(marker, name, value)?);

        rest = &after_open[end + CLOSE.len()..];
    }
    resolved.push_str(rest);
    Ok(resolved)
}

fn parse_marker(raw: &str) -> Result<Marker<'_>, ToolError> {
    let body = raw.trim();
    let unsupported =
        || ToolError::invalid_arguments(format!("unsupported template marker '{{{{{raw}}}}}'"));

    let (array, reference) = match body.strip_prefix("array") {
        Some(tail) if tail.starts_with(char::is_whitespace) => (true, tail.trim_start()),
        _ => (false, body),
    };
    let name = reference.strip_prefix('.').ok_or_else(unsupported)?;
    if !is_plain_identifier(name) {
        return Err(unsupported());
    }
    Ok(if array {
        Marker::Array(name)
    } else {
        Marker::Scalar(name)
    })
}

fn render_marker(marker: Marker<'_>, name: &str, value: &Value) -> Result<String, ToolError> {
    match (marker, value) {
        (_, Value::Null) => Err(ToolError::invalid_arguments(format!(
            "template parameter '{name}' has no value"
        ))),
        (Marker::Array(_), Value::Array(elements)) => elements
            .iter()
            .map(|element| render_scalar(name, element))
            .collect::<Result<Vec<_>, _>>()
            .map(|rendered| rendered.join(", ")),
        (Marker::Array(_), _) => Err(ToolError::invalid_arguments(format!(
            "template parameter '{name}' is used as an array but is not one"
        ))),
        (Marker::Scalar(_), value) => render_scalar(name, value),
    }
}

fn render_scalar(name: &str, value: &Value) -> Result<String, ToolError> {
    match value {
        Value::String(text) if is_identifier_path(text) => Ok(text.clone()),
        Value::String(text) => Ok(quote_identifier(text)),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(true) => Ok("TRUE".to_string()),
        Value::Bool(false) => Ok("FALSE".to_string()),
        Value::Null => Err(ToolError::invalid_arguments(format!(
            "template parameter '{name}' contains a null value"
        ))),
        Value::Array(_) => Err(ToolError::invalid_arguments(format!(
            "template parameter '{name}' is an array; use {{{{array .{name}}}}}"
        ))),
        Value::Object(_) => Err(ToolError::invalid_arguments(format!(
            "template parameter '{name}' cannot render an object"
        ))),
    }
}

/// Renders `text` as a double-quoted SQL identifier.
pub fn quote_identifier(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

fn is_plain_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(first) if first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

fn is_identifier_path(text: &str) -> bool {
    text.split('.').all(is_plain_identifier)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ToolErrorKind;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("value should be an object")
    }

    fn table_param() -> Vec<ParameterDefinition> {
        vec![ParameterDefinition::string("table", "")]
    }

    #[test]
    fn identifiers_render_verbatim() {
        let sql = resolve_template_params(
            &table_param(),
            "SELECT * FROM {{ .table }} WHERE 1",
            &object(json!({ "table": "main.users" })),
        )
        .expect("template should resolve");
        assert_eq!(sql, "SELECT * FROM main.users WHERE 1");
    }

    #[test]
    fn other_strings_are_quoted_identifiers() {
        let sql = resolve_template_params(
            &table_param(),
            "SELECT * FROM {{.table}}",
            &object(json!({ "table": "x\"; DROP TABLE t; --" })),
        )
        .expect("template should resolve");
        assert_eq!(sql, "SELECT * FROM \"x\"\"; DROP TABLE t; --\"");
    }

    #[test]
    fn array_marker_joins_elements() {
        let definitions = vec![ParameterDefinition::array(
            "columns",
            "",
            ParameterDefinition::string("column", ""),
        )];
        let sql = resolve_template_params(
            &definitions,
            "SELECT {{array .columns}} FROM t",
            &object(json!({ "columns": ["id", "full name"] })),
        )
        .expect("template should resolve");
        assert_eq!(sql, "SELECT id, \"full name\" FROM t");
    }

    #[test]
    fn numbers_and_booleans_render_as_literals() {
        let definitions = vec![
            ParameterDefinition::integer("limit", ""),
            ParameterDefinition::boolean("flag", ""),
        ];
        let sql = resolve_template_params(
            &definitions,
            "SELECT {{.flag}} LIMIT {{.limit}}",
            &object(json!({ "limit": 3, "flag": false })),
        )
        .expect("template should resolve");
        assert_eq!(sql, "SELECT FALSE LIMIT 3");
    }

    #[test]
    fn missing_required_parameter_fails_even_when_unreferenced() {
        let error = resolve_template_params(&table_param(), "SELECT 1", &Map::new())
            .expect_err("table is required");
        assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
    }

    #[test]
    fn undeclared_and_malformed_markers_fail() {
        let values = object(json!({ "table": "t" }));

        let error = resolve_template_params(&table_param(), "SELECT {{.other}}", &values)
            .expect_err("undeclared marker");
        assert!(error.message.contains("'other'"));

        let error = resolve_template_params(&table_param(), "SELECT {{table}}", &values)
            .expect_err("missing dot");
        assert!(error.message.contains("unsupported"));

        let error = resolve_template_params(&table_param(), "SELECT {{.table", &values)
            .expect_err("unterminated");
        assert!(error.message.contains("unterminated"));
    }

    #[test]
    fn optional_null_parameter_cannot_render() {
        let definitions = vec![ParameterDefinition::string("table", "").optional()];
        let error = resolve_template_params(&definitions, "SELECT * FROM {{.table}}", &Map::new())
            .expect_err("null cannot render");
        assert!(error.message.contains("no value"));
    }

    #[test]
    fn scalar_marker_rejects_array_value() {
        let definitions = vec![ParameterDefinition::array(
            "ids",
            "",
            ParameterDefinition::integer("id", ""),
        )];
        let error = resolve_template_params(
            &definitions,
            "SELECT {{.ids}}",
            &object(json!({ "ids": [1, 2] })),
        )
        .expect_err("array in scalar marker");
        assert!(error.message.contains("array .ids"));
    }

    #[test]
    fn statement_without_markers_is_unchanged() {
        let sql = resolve_template_params(&[], "SELECT ? AS id", &Map::new())
            .expect("plain statement should resolve");
        assert_eq!(sql, "SELECT ? AS id");
    }
}
