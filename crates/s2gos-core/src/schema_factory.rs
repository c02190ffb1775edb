//! Schema inference from annotations.

use serde_json::Value;

use s2gos_protocols::{Schema, SchemaError, SchemaType};

use crate::annotation::Annotation;

/// Derives the schema of one parameter or return value.
///
/// ```
/// use s2gos_core::{Annotation, SchemaFactory};
///
/// let schema = SchemaFactory::new("demo::f", "x", &Annotation::Float)
///     .with_default(serde_json::json!(1.5))
///     .get_schema()
///     .unwrap();
/// assert_eq!(
///     serde_json::to_value(&schema).unwrap(),
///     serde_json::json!({"type": "number", "default": 1.5})
/// );
/// ```
pub struct SchemaFactory<'a> {
    function: &'a str,
    name: &'a str,
    annotation: &'a Annotation,
    default: Option<Value>,
    is_return: bool,
}

impl<'a> SchemaFactory<'a> {
    pub fn new(function: &'a str, name: &'a str, annotation: &'a Annotation) -> Self {
        Self {
            function,
            name,
            annotation,
            default: None,
            is_return: false,
        }
    }

    /// Attach a default value verbatim to the resulting schema.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// The annotation belongs to a return value rather than a parameter.
    pub fn for_return(mut self) -> Self {
        self.is_return = true;
        self
    }

    pub fn get_schema(self) -> Result<Schema, SchemaError> {
        let mut schema = self.schema_for(self.annotation)?;
        if let Some(default) = self.default.clone() {
            schema.default = Some(default);
        }
        Ok(schema)
    }

    fn schema_for(&self, annotation: &Annotation) -> Result<Schema, SchemaError> {
        match annotation {
            Annotation::Any => Ok(Schema::any()),
            Annotation::None => Ok(Schema::null()),
            Annotation::Bool => Ok(Schema::boolean()),
            Annotation::Int => Ok(Schema::integer()),
            Annotation::Float => Ok(Schema::number()),
            Annotation::Str => Ok(Schema::string()),
            Annotation::Date => Ok(Schema::string().with_format("date")),
            Annotation::DateTime => Ok(Schema::string().with_format("date-time")),
            Annotation::List(item) | Annotation::Set(item) => {
                Ok(Schema::array(self.schema_for(item)?))
            }
            Annotation::Tuple(members) if members.is_empty() => Ok(Schema::array(Schema::any())),
            Annotation::Tuple(members) => {
                let items = members
                    .iter()
                    .map(|m| self.schema_for(m))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Schema::tuple(items))
            }
            // Integer keys travel as JSON object keys in decimal form.
            Annotation::Dict(key, value) => match key.as_ref() {
                Annotation::Str | Annotation::Int | Annotation::Any => {
                    Ok(Schema::map(self.schema_for(value)?))
                }
                _ => Err(self.unhandled(annotation)),
            },
            Annotation::Union(members) => self.union_schema(members),
            Annotation::Literal(values) => self.literal_schema(annotation, values),
            Annotation::Named(_) => Err(self.unhandled(annotation)),
        }
    }

    fn union_schema(&self, members: &[Annotation]) -> Result<Schema, SchemaError> {
        let mut flat = Vec::new();
        flatten_union(members, &mut flat);

        let nullable = flat.iter().any(|m| matches!(m, Annotation::None));
        let mut others: Vec<&Annotation> = Vec::new();
        for member in flat.into_iter().filter(|m| !matches!(m, Annotation::None)) {
            if !others.contains(&member) {
                others.push(member);
            }
        }

        let schema = match others.as_slice() {
            [] => return Ok(Schema::null()),
            [single] => self.schema_for(single)?,
            _ => Schema::one_of(
                others
                    .iter()
                    .map(|m| self.schema_for(m))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        };
        Ok(if nullable {
            schema.with_nullable(true)
        } else {
            schema
        })
    }

    fn literal_schema(
        &self,
        annotation: &Annotation,
        values: &[Value],
    ) -> Result<Schema, SchemaError> {
        if values.is_empty() {
            return Err(self.unhandled(annotation));
        }
        let schema = match common_type(values) {
            Some(schema_type) => Schema::of_type(schema_type),
            None => Schema::any(),
        };
        Ok(schema.with_enum(values.to_vec()))
    }

    fn unhandled(&self, annotation: &Annotation) -> SchemaError {
        SchemaError {
            function: self.function.to_string(),
            name: self.name.to_string(),
            annotation: annotation.to_string(),
            is_return: self.is_return,
        }
    }
}

fn flatten_union<'a>(members: &'a [Annotation], out: &mut Vec<&'a Annotation>) {
    for member in members {
        match member {
            Annotation::Union(nested) => flatten_union(nested, out),
            other => out.push(other),
        }
    }
}

/// JSON type shared by all literal values; integers widen to number.
fn common_type(values: &[Value]) -> Option<SchemaType> {
    let mut common: Option<SchemaType> = None;
    for value in values {
        let current = match value {
            Value::Bool(_) => SchemaType::Boolean,
            Value::Number(n) if n.is_f64() => SchemaType::Number,
            Value::Number(_) => SchemaType::Integer,
            Value::String(_) => SchemaType::String,
            _ => return None,
        };
        common = match (common, current) {
            (None, t) => Some(t),
            (Some(a), b) if a == b => Some(a),
            (Some(SchemaType::Integer), SchemaType::Number)
            | (Some(SchemaType::Number), SchemaType::Integer) => Some(SchemaType::Number),
            _ => return None,
        };
    }
    common
}

#[cfg(test)]
#[path = "schema_factory_tests.rs"]
mod tests;
