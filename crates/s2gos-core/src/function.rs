//! Process functions and their signatures.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use s2gos_protocols::ProcessError;

use crate::annotation::{Annotation, TypeAnnotation};
use crate::context::JobContext;

/// A named, annotated parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub annotation: Annotation,
    pub default: Option<Value>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, annotation: Annotation) -> Self {
        Self {
            name: name.into(),
            annotation,
            default: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// Parameters and return annotation of a process function.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub parameters: Vec<Parameter>,
    pub returns: Annotation,
}

impl Signature {
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Number of output values, see [`Annotation::arity`].
    pub fn output_arity(&self) -> usize {
        self.returns.arity()
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self {
            parameters: Vec::new(),
            returns: Annotation::Any,
        }
    }
}

/// Type-erased function body.
pub type ProcessBody = dyn Fn(&JobContext, Arguments) -> Result<Value, ProcessError> + Send + Sync;

/// Named argument values passed to a process body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: IndexMap<String, Value>,
}

impl Arguments {
    pub fn new(values: IndexMap<String, Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Remove and decode an argument.
    ///
    /// An absent argument decodes from `null`, so `Option<T>` parameters may
    /// be omitted while anything else fails with
    /// [`ProcessError::MissingArgument`].
    pub fn take<T: DeserializeOwned>(&mut self, name: &str) -> Result<T, ProcessError> {
        match self.values.shift_remove(name) {
            Some(value) => {
                serde_json::from_value(value).map_err(|e| ProcessError::InvalidArgument {
                    name: name.to_string(),
                    message: e.to_string(),
                })
            }
            None => serde_json::from_value(Value::Null)
                .map_err(|_| ProcessError::MissingArgument(name.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.values
    }
}

impl From<IndexMap<String, Value>> for Arguments {
    fn from(values: IndexMap<String, Value>) -> Self {
        Self::new(values)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// A callable unit of work together with its signature.
#[derive(Clone)]
pub struct ProcessFunction {
    name: String,
    doc: Option<String>,
    signature: Signature,
    body: Arc<ProcessBody>,
}

impl ProcessFunction {
    /// Start building a function with the given qualified name.
    pub fn builder(name: impl Into<String>) -> ProcessFunctionBuilder {
        ProcessFunctionBuilder {
            name: name.into(),
            doc: None,
            signature: Signature::default(),
        }
    }

    /// Qualified name, `<module path>::<function name>`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Invoke the body.
    pub fn call(&self, ctx: &JobContext, args: Arguments) -> Result<Value, ProcessError> {
        (self.body)(ctx, args)
    }
}

impl std::fmt::Debug for ProcessFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessFunction")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ProcessFunction`].
///
/// ```
/// use s2gos_core::ProcessFunction;
///
/// let function = ProcessFunction::builder("demo::add")
///     .param::<i64>("a")
///     .param_with_default::<i64>("b", 1)
///     .returns::<i64>()
///     .body(|_ctx, mut args| {
///         let a: i64 = args.take("a")?;
///         let b: i64 = args.take("b")?;
///         Ok(a + b)
///     });
/// assert_eq!(function.signature().parameters.len(), 2);
/// ```
#[derive(Debug)]
pub struct ProcessFunctionBuilder {
    name: String,
    doc: Option<String>,
    signature: Signature,
}

impl ProcessFunctionBuilder {
    /// Documentation text, used as the default process description.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        let doc = doc.into();
        let trimmed = doc.trim();
        self.doc = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn param<T: TypeAnnotation>(self, name: impl Into<String>) -> Self {
        self.param_annotated(name, T::annotation(), None)
    }

    /// Parameter with a default value. Defaults that fail to serialize are
    /// dropped.
    pub fn param_with_default<T: TypeAnnotation>(
        self,
        name: impl Into<String>,
        default: impl Serialize,
    ) -> Self {
        let default = serde_json::to_value(default).ok();
        self.param_annotated(name, T::annotation(), default)
    }

    pub fn param_annotated(
        mut self,
        name: impl Into<String>,
        annotation: Annotation,
        default: Option<Value>,
    ) -> Self {
        self.signature.parameters.push(Parameter {
            name: name.into(),
            annotation,
            default,
        });
        self
    }

    pub fn returns<T: TypeAnnotation>(self) -> Self {
        self.returns_annotated(T::annotation())
    }

    pub fn returns_annotated(mut self, annotation: Annotation) -> Self {
        self.signature.returns = annotation;
        self
    }

    /// Finish with the function body.
    ///
    /// The body's return value is serialized to JSON.
    pub fn body<F, R>(self, body: F) -> ProcessFunction
    where
        F: Fn(&JobContext, Arguments) -> Result<R, ProcessError> + Send + Sync + 'static,
        R: Serialize,
    {
        let body = move |ctx: &JobContext, args: Arguments| -> Result<Value, ProcessError> {
            let value = body(ctx, args)?;
            Ok(serde_json::to_value(value)?)
        };
        ProcessFunction {
            name: self.name,
            doc: self.doc,
            signature: self.signature,
            body: Arc::new(body),
        }
    }
}
