//! Process registry.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{info, warn};

use s2gos_protocols::{InputDescription, OutputDescription, Process, RegistryError};

use super::base::{BaseRegistry, Registerable};
use crate::annotation::Annotation;
use crate::function::{Parameter, ProcessFunction, Signature};
use crate::schema_factory::SchemaFactory;

const DEFAULT_VERSION: &str = "0.0.0";

/// A registered process: the callable and its description.
#[derive(Debug)]
pub struct RegistryEntry {
    pub function: Arc<ProcessFunction>,
    pub process: Process,
}

impl RegistryEntry {
    pub fn signature(&self) -> &Signature {
        self.function.signature()
    }
}

impl Registerable for RegistryEntry {
    fn registry_id(&self) -> &str {
        &self.process.id
    }
}

/// Optional metadata overriding what is derived from the function.
#[derive(Debug, Clone, Default)]
pub struct RegisterOptions {
    pub id: Option<String>,
    pub version: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    /// Explicit input descriptions. Parameters not listed are inferred.
    pub inputs: IndexMap<String, InputDescription>,
    /// Explicit output descriptions. Inferred from the return type if empty.
    pub outputs: IndexMap<String, OutputDescription>,
}

impl RegisterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
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

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_input(mut self, name: impl Into<String>, input: InputDescription) -> Self {
        self.inputs.insert(name.into(), input);
        self
    }

    pub fn with_output(mut self, name: impl Into<String>, output: OutputDescription) -> Self {
        self.outputs.insert(name.into(), output);
        self
    }
}

/// Something that can be registered as a process in one call.
///
/// Implemented by the definitions generated by `#[process]`.
pub trait IntoProcess {
    fn into_process(self) -> (ProcessFunction, RegisterOptions);
}

/// Ordered registry of processes keyed by process ID.
pub struct ProcessRegistry {
    inner: BaseRegistry<RegistryEntry>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self {
            inner: BaseRegistry::new(),
        }
    }

    /// Register a function as a process.
    ///
    /// Inputs and outputs not given in `options` are inferred from the
    /// function's signature. Registering an existing ID replaces the previous
    /// entry and keeps its position.
    pub fn register(
        &self,
        function: ProcessFunction,
        options: RegisterOptions,
    ) -> Result<Arc<RegistryEntry>, RegistryError> {
        validate_function(&function)?;

        let id = match options.id {
            Some(id) if id.trim().is_empty() => {
                return Err(RegistryError::InvalidProcess(
                    "process id must not be empty".to_string(),
                ));
            }
            Some(id) => id,
            None => function.name().to_string(),
        };

        let inputs = complete_inputs(&function, options.inputs)?;
        let outputs = complete_outputs(&function, &id, options.outputs)?;

        let process = Process {
            id,
            version: options.version.unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            title: options.title,
            description: options
                .description
                .or_else(|| function.doc().map(str::to_string)),
            keywords: options.keywords,
            inputs,
            outputs,
        };

        let entry = Arc::new(RegistryEntry {
            function: Arc::new(function),
            process,
        });
        let process_id = entry.process.id.clone();
        if self.inner.register(entry.clone()).is_some() {
            warn!(process_id = %process_id, "Process already registered, replacing it");
        }
        info!(
            process_id = %process_id,
            function = %entry.function.name(),
            "Registered process"
        );
        Ok(entry)
    }

    /// Register a definition generated by `#[process]`.
    pub fn register_definition<D: IntoProcess>(
        &self,
        definition: D,
    ) -> Result<Arc<RegistryEntry>, RegistryError> {
        let (function, options) = definition.into_process();
        self.register(function, options)
    }

    pub fn get(&self, process_id: &str) -> Option<Arc<RegistryEntry>> {
        self.inner.get(process_id)
    }

    pub fn get_process(&self, process_id: &str) -> Option<Process> {
        self.inner.get(process_id).map(|entry| entry.process.clone())
    }

    /// All processes in registration order.
    pub fn list(&self) -> Vec<Process> {
        self.inner
            .values()
            .iter()
            .map(|entry| entry.process.clone())
            .collect()
    }

    pub fn unregister(&self, process_id: &str) -> Option<Arc<RegistryEntry>> {
        let removed = self.inner.unregister(process_id);
        if removed.is_some() {
            info!(process_id = %process_id, "Unregistered process");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for ProcessRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_function(function: &ProcessFunction) -> Result<(), RegistryError> {
    if function.name().trim().is_empty() {
        return Err(RegistryError::InvalidProcess(
            "function name must not be empty".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    for parameter in &function.signature().parameters {
        if parameter.name.trim().is_empty() {
            return Err(RegistryError::InvalidProcess(format!(
                "'{}' has a parameter without a name",
                function.name()
            )));
        }
        if !seen.insert(parameter.name.as_str()) {
            return Err(RegistryError::InvalidProcess(format!(
                "'{}' has duplicate parameter '{}'",
                function.name(),
                parameter.name
            )));
        }
    }
    Ok(())
}

fn complete_inputs(
    function: &ProcessFunction,
    mut explicit: IndexMap<String, InputDescription>,
) -> Result<IndexMap<String, InputDescription>, RegistryError> {
    let signature = function.signature();
    let unknown: Vec<String> = explicit
        .keys()
        .filter(|name| signature.parameter(name).is_none())
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(RegistryError::InvalidInput { names: unknown });
    }

    let mut inputs = IndexMap::with_capacity(signature.parameters.len());
    for parameter in &signature.parameters {
        let input = match explicit.shift_remove(&parameter.name) {
            Some(input) => input,
            None => generate_input(function.name(), parameter)?,
        };
        inputs.insert(parameter.name.clone(), input);
    }
    Ok(inputs)
}

fn generate_input(
    function: &str,
    parameter: &Parameter,
) -> Result<InputDescription, RegistryError> {
    let mut factory = SchemaFactory::new(function, &parameter.name, &parameter.annotation);
    if let Some(default) = &parameter.default {
        factory = factory.with_default(default.clone());
    }
    Ok(InputDescription::new(factory.get_schema()?))
}

fn complete_outputs(
    function: &ProcessFunction,
    process_id: &str,
    explicit: IndexMap<String, OutputDescription>,
) -> Result<IndexMap<String, OutputDescription>, RegistryError> {
    let returns = &function.signature().returns;
    let arity = returns.arity();

    if !explicit.is_empty() {
        if explicit.len() != arity {
            return Err(RegistryError::InvalidOutput(format!(
                "process '{}' declares {} output(s) but its function returns {} value(s)",
                process_id,
                explicit.len(),
                arity
            )));
        }
        return Ok(explicit);
    }

    let mut outputs = IndexMap::new();
    match returns {
        Annotation::Tuple(members) if !members.is_empty() => {
            for (i, member) in members.iter().enumerate() {
                let name = format!("result_{}", i);
                let schema = SchemaFactory::new(function.name(), &name, member)
                    .for_return()
                    .get_schema()?;
                outputs.insert(name, OutputDescription::new(schema));
            }
        }
        _ => {
            let schema = SchemaFactory::new(function.name(), "result", returns)
                .for_return()
                .get_schema()?;
            outputs.insert("result".to_string(), OutputDescription::new(schema));
        }
    }
    Ok(outputs)
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
