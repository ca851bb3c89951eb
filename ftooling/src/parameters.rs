//! Parameter definitions, value parsing, and manifest compilation.
//!
//! Tools declare two parameter sets. *Standard* parameters are bound by the
//! driver as query arguments. *Template* parameters are substituted into the
//! statement text before it reaches the driver (see [`crate::resolve_template_params`]).
//!
//! ```rust
//! use ftooling::{ClaimsMap, ParameterDefinition, parse_params};
//! use serde_json::json;
//!
//! let definitions = vec![
//!     ParameterDefinition::integer("id", "Row id"),
//!     ParameterDefinition::string("label", "Optional label").optional(),
//! ];
//! let args = json!({ "id": 5 }).as_object().cloned().expect("object");
//!
//! let values = parse_params(&definitions, &args, &ClaimsMap::new()).expect("params");
//! assert_eq!(values.positional(), vec![json!(5), json!(null)]);
//! ```

use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::value_from_claims;
use crate::{ClaimsMap, InputSchema, ParameterManifest, PropertySchema, ToolError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Integer,
    Float,
    Boolean,
    Array,
}

impl ParameterType {
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Integer => "integer",
            ParameterType::Float => "float",
            ParameterType::Boolean => "boolean",
            ParameterType::Array => "array",
        }
    }
}

impl Display for ParameterType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamAuthService {
    pub name: String,
    pub field: String,
}

impl ParamAuthService {
    pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParameterType,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub auth_services: Vec<ParamAuthService>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ParameterDefinition>>,
}

impl ParameterDefinition {
    pub fn new(name: impl Into<String>, kind: ParameterType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            required: None,
            default: None,
            auth_services: Vec::new(),
            items: None,
        }
    }

    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ParameterType::String, description)
    }

    pub fn integer(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ParameterType::Integer, description)
    }

    pub fn float(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ParameterType::Float, description)
    }

    pub fn boolean(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ParameterType::Boolean, description)
    }

    pub fn array(
        name: impl Into<String>,
        description: impl Into<String>,
        items: ParameterDefinition,
    ) -> Self {
        let mut definition = Self::new(name, ParameterType::Array, description);
        definition.items = Some(Box::new(items));
        definition
    }

    pub fn optional(mut self) -> Self {
        self.required = Some(false);
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_auth_service(mut self, name: impl Into<String>, field: impl Into<String>) -> Self {
        self.auth_services.push(ParamAuthService::new(name, field));
        self
    }

    /// Parameters are required unless marked otherwise or given a default.
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(self.default.is_none())
    }

    pub fn validate(&self) -> Result<(), ToolError> {
        if self.name.trim().is_empty() {
            return Err(ToolError::configuration("parameter name must not be empty"));
        }
        match (&self.kind, &self.items) {
            (ParameterType::Array, None) => {
                return Err(ToolError::configuration(format!(
                    "array parameter '{}' must declare 'items'",
                    self.name
                )));
            }
            (ParameterType::Array, Some(items)) => items.validate()?,
            (_, Some(_)) => {
                return Err(ToolError::configuration(format!(
                    "parameter '{}' of type {} cannot declare 'items'",
                    self.name, self.kind
                )));
            }
            (_, None) => {}
        }
        if let Some(default) = &self.default {
            self.parse(default).map_err(|error| {
                ToolError::configuration(format!(
                    "invalid default for parameter '{}': {}",
                    self.name, error.message
                ))
            })?;
        }
        Ok(())
    }

    /// Type-checks `value` against this definition and returns its canonical form.
    pub fn parse(&self, value: &Value) -> Result<Value, ToolError> {
        let mismatch = || {
            ToolError::invalid_arguments(format!(
                "parameter '{}' expects {} but got {}",
                self.name,
                self.kind,
                json_type_name(value)
            ))
        };
        match self.kind {
            ParameterType::String => value.is_string().then(|| value.clone()).ok_or_else(mismatch),
            ParameterType::Integer => integer_value(value).map(Value::from).ok_or_else(mismatch),
            ParameterType::Float => value.is_number().then(|| value.clone()).ok_or_else(mismatch),
            ParameterType::Boolean => value.is_boolean().then(|| value.clone()).ok_or_else(mismatch),
            ParameterType::Array => {
                let elements = value.as_array().ok_or_else(mismatch)?;
                let items = self.items.as_deref().ok_or_else(|| {
                    ToolError::configuration(format!(
                        "array parameter '{}' must declare 'items'",
                        self.name
                    ))
                })?;
                elements
                    .iter()
                    .map(|element| {
                        items.parse(element).map_err(|error| {
                            ToolError::invalid_arguments(format!(
                                "parameter '{}' element: {}",
                                self.name, error.message
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
        }
    }

    pub fn manifest(&self) -> ParameterManifest {
        ParameterManifest {
            name: self.name.clone(),
            kind: self.kind,
            required: self.is_required(),
            description: self.description.clone(),
            auth_services: self
                .auth_services
                .iter()
                .map(|service| service.name.clone())
                .collect(),
            items: self.items.as_ref().map(|items| Box::new(items.manifest())),
        }
    }

    pub fn schema_property(&self) -> PropertySchema {
        PropertySchema {
            kind: self.kind,
            description: self.description.clone(),
            items: self
                .items
                .as_ref()
                .map(|items| Box::new(items.schema_property())),
        }
    }

    fn resolve_missing(&self) -> Result<Value, ToolError> {
        if let Some(default) = &self.default {
            return Ok(default.clone());
        }
        if self.is_required() {
            return Err(ToolError::invalid_arguments(format!(
                "parameter '{}' is required",
                self.name
            )));
        }
        Ok(Value::Null)
    }
}

fn integer_value(value: &Value) -> Option<i64> {
    let number = value.as_number()?;
    if let Some(integer) = number.as_i64() {
        return Some(integer);
    }
    let float = number.as_f64()?;
    // i64::MAX as f64 rounds up to 2^63, which does not fit.
    let in_range = float >= i64::MIN as f64 && float < i64::MAX as f64;
    (float.fract() == 0.0 && in_range).then_some(float as i64)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) if number.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamValue {
    pub name: String,
    pub value: Value,
}

/// Resolved parameter values in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParamValues {
    values: Vec<ParamValue>,
}

impl ParamValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.values.push(ParamValue {
            name: name.into(),
            value,
        });
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|param| param.name == name)
            .map(|param| &param.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamValue> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Name-keyed view used for template substitution.
    pub fn as_map(&self) -> Map<String, Value> {
        self.values
            .iter()
            .map(|param| (param.name.clone(), param.value.clone()))
            .collect()
    }

    /// Positional view used for query binding.
    pub fn positional(&self) -> Vec<Value> {
        self.values.iter().map(|param| param.value.clone()).collect()
    }
}

impl FromIterator<ParamValue> for ParamValues {
    fn from_iter<I: IntoIterator<Item = ParamValue>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Output of [`process_parameters`]: every definition plus both manifest projections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedParameters {
    pub all: Vec<ParameterDefinition>,
    pub manifest: Vec<ParameterManifest>,
    pub input_schema: InputSchema,
}

pub fn validate_definitions(
    definitions: &[ParameterDefinition],
    set: &str,
) -> Result<(), ToolError> {
    let mut seen = HashSet::new();
    for definition in definitions {
        definition.validate()?;
        if !seen.insert(definition.name.as_str()) {
            return Err(ToolError::configuration(format!(
                "duplicate {set} parameter '{}'",
                definition.name
            )));
        }
    }
    Ok(())
}

/// Validates both sets and compiles the manifests, standard parameters first.
///
/// A name may not appear in both sets because both read from one input map.
pub fn process_parameters(
    template: &[ParameterDefinition],
    standard: &[ParameterDefinition],
) -> Result<ProcessedParameters, ToolError> {
    validate_definitions(standard, "standard")?;
    validate_definitions(template, "template")?;
    if let Some(clash) = template
        .iter()
        .find(|definition| standard.iter().any(|other| other.name == definition.name))
    {
        return Err(ToolError::configuration(format!(
            "parameter '{}' is declared as both a standard and a template parameter",
            clash.name
        )));
    }

    let all: Vec<ParameterDefinition> = standard.iter().chain(template).cloned().collect();
    let manifest = all.iter().map(ParameterDefinition::manifest).collect();
    let mut input_schema = InputSchema::object();
    for definition in &all {
        input_schema
            .properties
            .push((definition.name.clone(), definition.schema_property()));
        if definition.is_required() {
            input_schema.required.push(definition.name.clone());
        }
    }

    Ok(ProcessedParameters {
        all,
        manifest,
        input_schema,
    })
}

/// Resolves raw call arguments (and verified claims for auth-sourced
/// parameters) into typed values.
pub fn parse_params(
    definitions: &[ParameterDefinition],
    data: &Map<String, Value>,
    claims: &ClaimsMap,
) -> Result<ParamValues, ToolError> {
    let mut values = ParamValues::new();
    for definition in definitions {
        let raw = if definition.auth_services.is_empty() {
            match data.get(&definition.name) {
                Some(value) if !value.is_null() => value.clone(),
                _ => definition.resolve_missing()?,
            }
        } else {
            value_from_claims(&definition.name, &definition.auth_services, claims)?
        };
        let value = if raw.is_null() {
            raw
        } else {
            definition.parse(&raw)?
        };
        values.push(definition.name.clone(), value);
    }
    Ok(values)
}

/// Extracts and re-validates one definition set from a name-keyed map.
pub fn get_params(
    definitions: &[ParameterDefinition],
    map: &Map<String, Value>,
) -> Result<ParamValues, ToolError> {
    let mut values = ParamValues::new();
    for definition in definitions {
        let value = match map.get(&definition.name) {
            Some(value) if !value.is_null() => definition.parse(value)?,
            _ => {
                let fallback = definition.resolve_missing().map_err(|_| {
                    ToolError::invalid_arguments(format!(
                        "missing parameter '{}'",
                        definition.name
                    ))
                })?;
                if fallback.is_null() {
                    fallback
                } else {
                    definition.parse(&fallback)?
                }
            }
        };
        values.push(definition.name.clone(), value);
    }
    Ok(values)
}
