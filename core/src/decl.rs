//! Declarative schema and module descriptions.
//!
//! These are the serde-facing forms that blueprint files are written in
//! (JSON or YAML). Compiling a declaration into the internal model enforces
//! the load-time invariants: unique field names, known type names, no
//! default on a required field, and defaults that match their declared
//! type. Any violation fails with a [`SchemaError`] before validation ever
//! runs.
//!
//! Object fields are declared as an ordered list (not a mapping) so that
//! declaration order survives serialization.
//!
//! # Example declaration (YAML)
//!
//! ```yaml
//! name: filestore
//! source: modules/filestore
//! inputs:
//!   - name: project_id
//!     type: string
//!     required: true
//!   - name: filestore_storage
//!     type:
//!       map:
//!         object:
//!           - { name: name, type: string, required: true }
//!           - { name: tier, type: string, required: true }
//!           - { name: capacity_gb, type: number, required: true }
//!     default: {}
//! outputs:
//!   - filestore_instances
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;
use crate::module::{ModuleDescriptor, OutputWire};
use crate::types::{FieldSchema, ObjectSchema, SchemaKind, SchemaNode};

/// Declarative type expression.
///
/// Scalars are spelled as the strings `string`, `bool`, `number`; compound
/// types nest under `list`, `map`, or `object` keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeDecl {
    /// `string`, `bool`, or `number`.
    Scalar(String),
    /// Homogeneous list of the inner type.
    List {
        /// Element type.
        list: Box<TypeDecl>,
    },
    /// Open-keyed map of the inner type.
    Map {
        /// Value type.
        map: Box<TypeDecl>,
    },
    /// Closed object with ordered fields.
    Object {
        /// Field declarations, in order.
        object: Vec<FieldDecl>,
    },
}

impl TypeDecl {
    /// Compiles this declaration into a [`SchemaKind`].
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownType`] for unrecognized scalar names
    /// and propagates any error from nested declarations.
    pub fn compile(&self) -> Result<SchemaKind, SchemaError> {
        match self {
            Self::Scalar(name) => match name.as_str() {
                "string" => Ok(SchemaKind::String),
                "bool" => Ok(SchemaKind::Bool),
                "number" => Ok(SchemaKind::Number),
                other => Err(SchemaError::UnknownType(other.to_string())),
            },
            Self::List { list } => Ok(SchemaKind::List(Box::new(list.compile_node()?))),
            Self::Map { map } => Ok(SchemaKind::Map(Box::new(map.compile_node()?))),
            Self::Object { object } => Ok(SchemaKind::Object(compile_fields(object)?)),
        }
    }

    // Element types are plain optional nodes; requiredness and defaults
    // attach at the field level.
    fn compile_node(&self) -> Result<SchemaNode, SchemaError> {
        Ok(SchemaNode {
            kind: self.compile()?,
            required: false,
            default: None,
        })
    }
}

/// Declarative form of one object field or module input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Field name.
    pub name: String,
    /// Field type expression.
    #[serde(rename = "type")]
    pub ty: TypeDecl,
    /// Whether a value must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Default substituted when the field is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl FieldDecl {
    /// Compiles this declaration into a [`FieldSchema`].
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::RequiredWithDefault`] if both `required` and
    /// `default` are set, or [`SchemaError::DefaultMismatch`] if the
    /// default's shape does not match the declared type.
    pub fn compile(&self) -> Result<FieldSchema, SchemaError> {
        let kind = self.ty.compile()?;
        if self.required && self.default.is_some() {
            return Err(SchemaError::RequiredWithDefault(self.name.clone()));
        }
        if let Some(default) = &self.default {
            if !kind.admits(default) {
                return Err(SchemaError::DefaultMismatch {
                    field: self.name.clone(),
                    expected: kind.type_name(),
                });
            }
        }
        Ok(FieldSchema::new(
            &self.name,
            SchemaNode {
                kind,
                required: self.required,
                default: self.default.clone(),
            },
        ))
    }
}

/// Compiles an ordered field list into an [`ObjectSchema`].
///
/// # Errors
///
/// Returns the first [`SchemaError`] found: duplicate names, unknown types,
/// or malformed defaults.
pub fn compile_fields(fields: &[FieldDecl]) -> Result<ObjectSchema, SchemaError> {
    let compiled = fields
        .iter()
        .map(FieldDecl::compile)
        .collect::<Result<Vec<_>, _>>()?;
    ObjectSchema::new(compiled)
}

/// Declarative wire from another module's output to one of this module's
/// inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireDecl {
    /// Consuming input field.
    pub input: String,
    /// Producing module name.
    pub producer: String,
    /// Produced output name.
    pub output: String,
}

/// Declarative form of a [`ModuleDescriptor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDecl {
    /// Unique module name.
    pub name: String,
    /// Opaque source location.
    #[serde(default)]
    pub source: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared inputs, in order.
    #[serde(default)]
    pub inputs: Vec<FieldDecl>,
    /// Declared output names, in order.
    #[serde(default)]
    pub outputs: Vec<String>,
    /// Sub-module references.
    #[serde(default)]
    pub references: Vec<String>,
    /// Output wires.
    #[serde(default)]
    pub wires: Vec<WireDecl>,
}

impl ModuleDecl {
    /// Compiles this declaration into a [`ModuleDescriptor`].
    ///
    /// # Errors
    ///
    /// Propagates any [`SchemaError`] from the input field declarations.
    pub fn compile(&self) -> Result<ModuleDescriptor, SchemaError> {
        let mut descriptor = ModuleDescriptor::new(&self.name, &self.source)
            .with_inputs(compile_fields(&self.inputs)?);
        for output in &self.outputs {
            descriptor = descriptor.with_output(output);
        }
        for reference in &self.references {
            descriptor = descriptor.with_reference(reference);
        }
        for wire in &self.wires {
            descriptor =
                descriptor.with_wire(OutputWire::new(&wire.input, &wire.producer, &wire.output));
        }
        Ok(descriptor)
    }
}
