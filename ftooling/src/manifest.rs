//! Read-only descriptions of a tool's parameters.
//!
//! [`Manifest`] is the human-oriented listing; [`SchemaManifest`] is the
//! JSON-schema style listing handed to schema-driven clients. Both keep
//! parameters in declaration order.

use serde::ser::Serializer;
use serde::Serialize;

use crate::ParameterType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterManifest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParameterType,
    pub required: bool,
    pub description: String,
    pub auth_services: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ParameterManifest>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub description: String,
    pub parameters: Vec<ParameterManifest>,
    pub auth_required: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub kind: ParameterType,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<PropertySchema>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputSchema {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(serialize_with = "serialize_properties")]
    pub properties: Vec<(String, PropertySchema)>,
    pub required: Vec<String>,
}

impl InputSchema {
    pub fn object() -> Self {
        Self {
            kind: "object".to_string(),
            properties: Vec::new(),
            required: Vec::new(),
        }
    }

    pub fn property(&self, name: &str) -> Option<&PropertySchema> {
        self.properties
            .iter()
            .find(|(property, _)| property == name)
            .map(|(_, schema)| schema)
    }

    pub fn property_names(&self) -> Vec<&str> {
        self.properties.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl Default for InputSchema {
    fn default() -> Self {
        Self::object()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaManifest {
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
}

fn serialize_properties<S>(
    properties: &[(String, PropertySchema)],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(properties.iter().map(|(name, schema)| (name, schema)))
}
