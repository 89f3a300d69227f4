//! Module descriptors: the composable units of a blueprint.

use crate::types::ObjectSchema;

/// Binds a module's declared input to another module's declared output.
///
/// Wires are checked structurally by the validator: the producing module
/// must declare the named output. The output's *value* is only available at
/// provisioning time, so wire-bound inputs are exempt from value
/// resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputWire {
    /// Input field on the consuming module.
    pub input: String,
    /// Name of the producing module.
    pub producer: String,
    /// Output name on the producing module.
    pub output: String,
}

impl OutputWire {
    /// Creates a wire from `producer.output` into the named input field.
    pub fn new(
        input: impl Into<String>,
        producer: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            input: input.into(),
            producer: producer.into(),
            output: output.into(),
        }
    }
}

/// A unit of infrastructure composition with typed inputs and declared
/// outputs, possibly referencing sub-modules.
///
/// Descriptors are assembled into a [`ModuleGraph`](crate::ModuleGraph);
/// references between them must form a DAG.
///
/// # Examples
///
/// ```
/// use blueprint_schema_core::{
///     FieldSchema, ModuleDescriptor, ObjectSchema, OutputWire, SchemaNode,
/// };
///
/// let cluster = ModuleDescriptor::new("cluster", "modules/gke-cluster")
///     .with_inputs(
///         ObjectSchema::new(vec![
///             FieldSchema::new("project_id", SchemaNode::string().required()),
///             FieldSchema::new("network", SchemaNode::string().required()),
///         ])
///         .unwrap(),
///     )
///     .with_output("fleet_host")
///     .with_output("get_credentials")
///     .with_reference("vpc")
///     .with_wire(OutputWire::new("network", "vpc", "network_self_link"));
///
/// assert!(cluster.has_output("fleet_host"));
/// assert_eq!(cluster.references, vec!["vpc"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDescriptor {
    /// Unique module name within a graph.
    pub name: String,
    /// Opaque source location (e.g. a registry path).
    pub source: String,
    /// Declared input fields, in declaration order.
    pub inputs: ObjectSchema,
    /// Declared output names, in declaration order.
    pub outputs: Vec<String>,
    /// Names of sub-modules this module composes.
    pub references: Vec<String>,
    /// Structural bindings from other modules' outputs to this module's
    /// inputs.
    pub wires: Vec<OutputWire>,
}

impl ModuleDescriptor {
    /// Creates a descriptor with no inputs, outputs, or references.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            inputs: ObjectSchema::empty(),
            outputs: Vec::new(),
            references: Vec::new(),
            wires: Vec::new(),
        }
    }

    /// Sets the declared input schema.
    pub fn with_inputs(mut self, inputs: ObjectSchema) -> Self {
        self.inputs = inputs;
        self
    }

    /// Adds a declared output name.
    pub fn with_output(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(name.into());
        self
    }

    /// Adds a sub-module reference.
    pub fn with_reference(mut self, name: impl Into<String>) -> Self {
        self.references.push(name.into());
        self
    }

    /// Adds an output wire.
    pub fn with_wire(mut self, wire: OutputWire) -> Self {
        self.wires.push(wire);
        self
    }

    /// Returns `true` if this module declares the named output.
    pub fn has_output(&self, name: &str) -> bool {
        self.outputs.iter().any(|o| o == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_builder_chain() {
        let module = ModuleDescriptor::new("vpc", "modules/net-vpc")
            .with_output("network_self_link")
            .with_output("subnet_self_links");

        assert_eq!(module.name, "vpc");
        assert!(module.has_output("network_self_link"));
        assert!(!module.has_output("router"));
        assert!(module.inputs.is_empty());
    }
}
