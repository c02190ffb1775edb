//! Process descriptions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::Schema;

/// Upper cardinality bound of an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaxOccurs {
    Count(u32),
    Unbounded(Unbounded),
}

/// Marker serialized as the string `"unbounded"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unbounded {
    Unbounded,
}

impl MaxOccurs {
    pub fn unbounded() -> Self {
        MaxOccurs::Unbounded(Unbounded::Unbounded)
    }

    /// Whether more than one value may be supplied.
    pub fn is_multiple(&self) -> bool {
        match self {
            MaxOccurs::Count(n) => *n > 1,
            MaxOccurs::Unbounded(_) => true,
        }
    }

    pub fn allows(&self, count: usize) -> bool {
        match self {
            MaxOccurs::Count(n) => count <= *n as usize,
            MaxOccurs::Unbounded(_) => true,
        }
    }
}

/// Description of a process input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub schema: Schema,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_occurs: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_occurs: Option<MaxOccurs>,
}

impl InputDescription {
    pub fn new(schema: Schema) -> Self {
        Self {
            title: None,
            description: None,
            schema,
            min_occurs: None,
            max_occurs: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_occurs(mut self, min: u32, max: MaxOccurs) -> Self {
        self.min_occurs = Some(min);
        self.max_occurs = Some(max);
        self
    }

    /// An input is required unless it has a default, is nullable, or
    /// explicitly allows zero occurrences.
    pub fn is_required(&self) -> bool {
        self.schema.default.is_none()
            && !self.schema.is_nullable()
            && self.min_occurs.unwrap_or(1) > 0
    }
}

/// Description of a process output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub schema: Schema,
}

impl OutputDescription {
    pub fn new(schema: Schema) -> Self {
        Self {
            title: None,
            description: None,
            schema,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Full description of a registered process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    pub id: String,

    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub inputs: IndexMap<String, InputDescription>,

    #[serde(default)]
    pub outputs: IndexMap<String, OutputDescription>,
}

impl Process {
    pub fn summary(&self) -> ProcessSummary {
        ProcessSummary::from(self)
    }
}

/// Process listing entry, without inputs and outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSummary {
    pub id: String,

    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

impl From<&Process> for ProcessSummary {
    fn from(process: &Process) -> Self {
        Self {
            id: process.id.clone(),
            version: process.version.clone(),
            title: process.title.clone(),
            description: process.description.clone(),
            keywords: process.keywords.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_max_occurs_serialization() {
        assert_eq!(serde_json::to_value(MaxOccurs::Count(3)).unwrap(), json!(3));
        assert_eq!(
            serde_json::to_value(MaxOccurs::unbounded()).unwrap(),
            json!("unbounded")
        );
        let parsed: MaxOccurs = serde_json::from_value(json!("unbounded")).unwrap();
        assert_eq!(parsed, MaxOccurs::unbounded());
    }

    #[test]
    fn test_max_occurs_bounds() {
        assert!(!MaxOccurs::Count(1).is_multiple());
        assert!(MaxOccurs::Count(2).is_multiple());
        assert!(MaxOccurs::unbounded().is_multiple());
        assert!(MaxOccurs::Count(2).allows(2));
        assert!(!MaxOccurs::Count(2).allows(3));
        assert!(MaxOccurs::unbounded().allows(1000));
    }

    #[test]
    fn test_input_required() {
        assert!(InputDescription::new(Schema::integer()).is_required());
        assert!(!InputDescription::new(Schema::integer().with_default(json!(1))).is_required());
        assert!(!InputDescription::new(Schema::integer().with_nullable(true)).is_required());
        assert!(
            !InputDescription::new(Schema::integer())
                .with_occurs(0, MaxOccurs::Count(1))
                .is_required()
        );
    }

    #[test]
    fn test_input_description_wire_names() {
        let input = InputDescription::new(Schema::string()).with_occurs(1, MaxOccurs::unbounded());
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(
            value,
            json!({"schema": {"type": "string"}, "minOccurs": 1, "maxOccurs": "unbounded"})
        );
    }

    #[test]
    fn test_summary_drops_inputs_and_outputs() {
        let mut outputs = IndexMap::new();
        outputs.insert("result".to_string(), OutputDescription::new(Schema::number()));
        let process = Process {
            id: "sleep_a_while".to_string(),
            version: "0.0.0".to_string(),
            title: Some("Sleep Processor".to_string()),
            description: None,
            keywords: vec![],
            inputs: IndexMap::new(),
            outputs,
        };
        let summary = process.summary();
        assert_eq!(summary.id, "sleep_a_while");
        assert_eq!(summary.title.as_deref(), Some("Sleep Processor"));
        let value = serde_json::to_value(&summary).unwrap();
        assert!(value.get("outputs").is_none());
    }
}
