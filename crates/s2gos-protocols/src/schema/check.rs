//! Conformance checking of JSON values against a schema.

use serde_json::Value;

use super::{Items, Schema, SchemaType};
use crate::error::SchemaViolation;

impl Schema {
    /// Check that `value` conforms to this schema.
    ///
    /// Only the structural keywords produced by schema inference are
    /// enforced: type, nullability, enum, oneOf, item and property schemas,
    /// and array length bounds.
    pub fn check(&self, value: &Value) -> Result<(), SchemaViolation> {
        self.check_at(value, "$")
    }

    fn check_at(&self, value: &Value, path: &str) -> Result<(), SchemaViolation> {
        if value.is_null() {
            return if self.accepts_null() {
                Ok(())
            } else {
                Err(SchemaViolation::new(path, "null is not allowed"))
            };
        }

        if let Some(values) = &self.enum_values {
            if !values.contains(value) {
                return Err(SchemaViolation::new(
                    path,
                    format!("{} is not one of {}", value, Value::Array(values.clone())),
                ));
            }
        }

        if let Some(members) = &self.one_of {
            if !members.iter().any(|m| m.check_at(value, path).is_ok()) {
                return Err(SchemaViolation::new(
                    path,
                    "value matches none of the allowed schemas",
                ));
            }
        }

        let Some(schema_type) = self.schema_type else {
            return Ok(());
        };

        match schema_type {
            SchemaType::Boolean if value.is_boolean() => Ok(()),
            SchemaType::Integer if value.is_i64() || value.is_u64() => Ok(()),
            SchemaType::Number if value.is_number() => Ok(()),
            SchemaType::String if value.is_string() => Ok(()),
            SchemaType::Array => match value.as_array() {
                Some(elements) => self.check_array(elements, path),
                None => Err(type_mismatch(path, schema_type, value)),
            },
            SchemaType::Object => match value.as_object() {
                Some(entries) => self.check_object(entries, path),
                None => Err(type_mismatch(path, schema_type, value)),
            },
            _ => Err(type_mismatch(path, schema_type, value)),
        }
    }

    fn accepts_null(&self) -> bool {
        if self.is_nullable() || (self.schema_type.is_none() && self.one_of.is_none()) {
            return true;
        }
        self.one_of
            .as_ref()
            .is_some_and(|members| members.iter().any(Schema::accepts_null))
    }

    fn check_array(&self, elements: &[Value], path: &str) -> Result<(), SchemaViolation> {
        if let Some(min) = self.min_items {
            if elements.len() < min {
                return Err(SchemaViolation::new(
                    path,
                    format!("expected at least {} item(s), got {}", min, elements.len()),
                ));
            }
        }
        if let Some(max) = self.max_items {
            if elements.len() > max {
                return Err(SchemaViolation::new(
                    path,
                    format!("expected at most {} item(s), got {}", max, elements.len()),
                ));
            }
        }

        match &self.items {
            Some(Items::Single(item)) => {
                for (i, element) in elements.iter().enumerate() {
                    item.check_at(element, &format!("{}[{}]", path, i))?;
                }
            }
            Some(Items::Tuple(items)) => {
                for (i, (item, element)) in items.iter().zip(elements).enumerate() {
                    item.check_at(element, &format!("{}[{}]", path, i))?;
                }
            }
            None => {}
        }
        Ok(())
    }

    fn check_object(
        &self,
        entries: &serde_json::Map<String, Value>,
        path: &str,
    ) -> Result<(), SchemaViolation> {
        if let Some(required) = &self.required {
            let missing: Vec<&str> = required
                .iter()
                .filter(|name| !entries.contains_key(name.as_str()))
                .map(String::as_str)
                .collect();
            if !missing.is_empty() {
                return Err(SchemaViolation::new(
                    path,
                    format!("missing required property(ies): {}", missing.join(", ")),
                ));
            }
        }

        for (key, entry) in entries {
            let entry_path = format!("{}.{}", path, key);
            match self.properties.as_ref().and_then(|p| p.get(key)) {
                Some(property) => property.check_at(entry, &entry_path)?,
                None => {
                    if let Some(additional) = &self.additional_properties {
                        additional.check_at(entry, &entry_path)?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn type_mismatch(path: &str, expected: SchemaType, value: &Value) -> SchemaViolation {
    SchemaViolation::new(
        path,
        format!("expected {}, got {}", expected, json_type_name(value)),
    )
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
