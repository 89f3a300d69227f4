//! Whole-graph validation: input routing, per-module resolution, and
//! cross-module output checks.
//!
//! [`validate`] is a pure function of its inputs; re-running it with the
//! same graph and values yields the same report, and it holds no state
//! between calls. All problems found anywhere in the graph are collected
//! into one ordered report: graph-shape errors first, then input routing
//! errors in supply order, then per-module resolution errors in module
//! insertion order, then wire errors.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ErrorKind, PathSegment, ValidationError, ValuePath};
use crate::graph::{GraphError, ModuleGraph};
use crate::resolve::resolve;
use crate::types::{ResolvedValue, SchemaNode};

/// External input values addressed to modules by dotted `module.field`
/// keys.
///
/// Supply order is preserved so that routing errors appear in a stable
/// order in the report.
///
/// # Examples
///
/// ```
/// use blueprint_schema_core::ExternalInputs;
/// use serde_json::json;
///
/// let mut inputs = ExternalInputs::new();
/// inputs.set("cluster.project_id", json!("my-project"));
/// inputs.set("filestore.filestore_storage", json!({"share1": {"tier": "ENTERPRISE"}}));
/// assert_eq!(inputs.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExternalInputs {
    values: Vec<(String, Value)>,
}

impl ExternalInputs {
    /// Creates an empty input set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value for a dotted key, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.values.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.values.push((key, value)),
        }
    }

    /// Builds an input set from a JSON object.
    ///
    /// Keys containing a dot are taken verbatim; a key without a dot whose
    /// value is an object is expanded into one `module.field` entry per
    /// member. Other dotless keys are kept as-is and surface as routing
    /// errors during validation.
    pub fn from_json(value: &Value) -> Self {
        let mut inputs = Self::new();
        let Some(entries) = value.as_object() else {
            return inputs;
        };
        for (key, item) in entries {
            if key.contains('.') {
                inputs.set(key.clone(), item.clone());
            } else if let Some(fields) = item.as_object() {
                for (field, field_value) in fields {
                    inputs.set(format!("{key}.{field}"), field_value.clone());
                }
            } else {
                inputs.set(key.clone(), item.clone());
            }
        }
        inputs
    }

    /// Returns the entries in supply order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no values are supplied.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Aggregated outcome of validating a module graph.
///
/// Either `errors` is empty and every module has a resolved tree, or the
/// ordered error list describes every problem found in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Every problem found, in deterministic order.
    pub errors: Vec<ValidationError>,
    /// Fully-resolved input trees, keyed by module name. Modules whose
    /// resolution failed have no entry.
    pub resolved: HashMap<String, ResolvedValue>,
}

impl ValidationReport {
    /// Returns `true` if no errors were found.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the resolved tree for a module, if resolution succeeded.
    pub fn resolved_for(&self, module: &str) -> Option<&ResolvedValue> {
        self.resolved.get(module)
    }
}

/// Validates every module in the graph against the supplied external
/// inputs.
///
/// Each module's declared inputs are resolved from the subset of inputs
/// addressed to it; module-local error paths are rooted at the module
/// name. Wire-bound inputs are checked structurally against the producing
/// module's declared outputs and are exempt from value resolution. Graph
/// cycles and unknown references surface as report errors rather than
/// panics.
///
/// Independent modules are resolved in parallel; the report order is
/// nevertheless deterministic.
pub fn validate(graph: &ModuleGraph, inputs: &ExternalInputs) -> ValidationReport {
    let mut errors = Vec::new();

    match graph.resolve_order() {
        Ok(order) => debug!(modules = order.len(), "Instantiation order resolved"),
        Err(GraphError::CyclicReference { path }) => {
            let message = format!("module references form a cycle: {}", path.join(" -> "));
            let mut value_path = ValuePath::root();
            for module in &path {
                value_path.push(PathSegment::Field(module.clone()));
            }
            errors.push(ValidationError::new(
                ErrorKind::CyclicReference,
                value_path,
                message,
            ));
        }
        Err(GraphError::UnknownReference { module, reference }) => {
            errors.push(ValidationError::unknown_field(
                ValuePath::field(&module),
                format!("module '{module}' references unknown module '{reference}'"),
            ));
        }
        Err(GraphError::DuplicateModule(_)) => unreachable!("add_module enforces uniqueness"),
    }

    // Route dotted inputs to their modules.
    let mut routed: HashMap<&str, serde_json::Map<String, Value>> = HashMap::new();
    for (key, value) in inputs.iter() {
        match key.split_once('.') {
            Some((module, field)) if graph.contains(module) => {
                routed
                    .entry(module)
                    .or_default()
                    .insert(field.to_string(), value.clone());
            }
            Some((module, _)) => errors.push(ValidationError::unknown_field(
                ValuePath::field(module),
                format!("input addresses unknown module '{module}'"),
            )),
            None => errors.push(ValidationError::unknown_field(
                ValuePath::field(key),
                "external input key must use 'module.field' form",
            )),
        }
    }

    // Per-module resolution. Modules never depend on each other's resolved
    // values (wires are checked by name below), so subtrees resolve in
    // parallel; rayon's collect keeps insertion order for the report.
    let outcomes: Vec<(&str, Result<ResolvedValue, Vec<ValidationError>>)> = graph
        .modules()
        .par_iter()
        .map(|module| {
            let wired: Vec<&str> = module.wires.iter().map(|w| w.input.as_str()).collect();
            let schema = SchemaNode::object(module.inputs.without_fields(&wired));
            let supplied = Value::Object(routed.get(module.name.as_str()).cloned().unwrap_or_default());
            (module.name.as_str(), resolve(&schema, Some(&supplied)))
        })
        .collect();

    let mut resolved = HashMap::new();
    for (name, outcome) in outcomes {
        match outcome {
            Ok(tree) => {
                resolved.insert(name.to_string(), tree);
            }
            Err(module_errors) => {
                errors.extend(module_errors.into_iter().map(|mut e| {
                    e.path = std::mem::take(&mut e.path)
                        .prepend(PathSegment::Field(name.to_string()));
                    e
                }));
            }
        }
    }

    // Cross-module wire checks: consumed outputs must be declared by the
    // producer.
    for module in graph.modules() {
        for wire in &module.wires {
            let at = || {
                ValuePath::field(&module.name).child(PathSegment::Field(wire.input.clone()))
            };
            if !module.inputs.contains(&wire.input) {
                errors.push(ValidationError::unknown_field(
                    at(),
                    format!(
                        "wire targets undeclared input '{}' on module '{}'",
                        wire.input, module.name
                    ),
                ));
                continue;
            }
            match graph.get(&wire.producer) {
                None => errors.push(ValidationError::unknown_field(
                    at(),
                    format!("wire references unknown module '{}'", wire.producer),
                )),
                Some(producer) if !producer.has_output(&wire.output) => {
                    errors.push(ValidationError::unknown_field(
                        at(),
                        format!(
                            "module '{}' does not declare output '{}'",
                            wire.producer, wire.output
                        ),
                    ));
                }
                Some(_) => {}
            }
        }
    }

    info!(
        modules = graph.len(),
        errors = errors.len(),
        "Validation complete"
    );
    ValidationReport { errors, resolved }
}
