//! Schema types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// JSON value type of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl SchemaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Boolean => "boolean",
            SchemaType::Integer => "integer",
            SchemaType::Number => "number",
            SchemaType::String => "string",
            SchemaType::Array => "array",
            SchemaType::Object => "object",
        }
    }
}

impl std::fmt::Display for SchemaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived shape of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    /// No constraint at all.
    Any,
    /// Only `null` is described.
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
    /// One of several member schemas.
    Union,
}

/// Item schemas of an array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Items {
    /// One schema per position (fixed-length tuple).
    Tuple(Vec<Schema>),
    /// Same schema for every element.
    Single(Box<Schema>),
}

/// Structural description of a value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<Schema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Schema>>,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Schema {
    /// Unconstrained schema.
    pub fn any() -> Self {
        Self::default()
    }

    /// Schema describing only `null`.
    pub fn null() -> Self {
        Self {
            nullable: Some(true),
            ..Self::default()
        }
    }

    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    pub fn boolean() -> Self {
        Self::of_type(SchemaType::Boolean)
    }

    pub fn integer() -> Self {
        Self::of_type(SchemaType::Integer)
    }

    pub fn number() -> Self {
        Self::of_type(SchemaType::Number)
    }

    pub fn string() -> Self {
        Self::of_type(SchemaType::String)
    }

    /// Homogeneous array.
    pub fn array(items: Schema) -> Self {
        Self {
            schema_type: Some(SchemaType::Array),
            items: Some(Items::Single(Box::new(items))),
            ..Self::default()
        }
    }

    /// Fixed-length array with one schema per position.
    pub fn tuple(items: Vec<Schema>) -> Self {
        let len = items.len();
        Self {
            schema_type: Some(SchemaType::Array),
            items: Some(Items::Tuple(items)),
            min_items: Some(len),
            max_items: Some(len),
            ..Self::default()
        }
    }

    /// Object whose values all share one schema.
    pub fn map(values: Schema) -> Self {
        Self {
            schema_type: Some(SchemaType::Object),
            additional_properties: Some(Box::new(values)),
            ..Self::default()
        }
    }

    /// Object with named properties.
    pub fn object(properties: IndexMap<String, Schema>) -> Self {
        Self {
            schema_type: Some(SchemaType::Object),
            properties: Some(properties),
            ..Self::default()
        }
    }

    pub fn one_of(members: Vec<Schema>) -> Self {
        Self {
            one_of: Some(members),
            ..Self::default()
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_enum(mut self, values: Vec<serde_json::Value>) -> Self {
        self.enum_values = Some(values);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(false)
    }

    /// The shape this node describes.
    pub fn kind(&self) -> SchemaKind {
        if self.one_of.is_some() {
            return SchemaKind::Union;
        }
        match self.schema_type {
            Some(SchemaType::Boolean) => SchemaKind::Boolean,
            Some(SchemaType::Integer) => SchemaKind::Integer,
            Some(SchemaType::Number) => SchemaKind::Number,
            Some(SchemaType::String) => SchemaKind::String,
            Some(SchemaType::Array) => SchemaKind::Array,
            Some(SchemaType::Object) => SchemaKind::Object,
            None if self.is_nullable() && self.enum_values.is_none() => SchemaKind::Null,
            None => SchemaKind::Any,
        }
    }
}
