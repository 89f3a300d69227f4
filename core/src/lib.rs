//! Core schema model, value resolution, and module composition for
//! infrastructure blueprints.
//!
//! This crate defines the foundational types for modeling blueprint
//! configuration namespaces and validating values against them:
//!
//! - [`SchemaNode`] / [`SchemaKind`] — tagged, nested schema trees with
//!   per-node `required` flags and defaults.
//! - [`resolve`] — recursive default-fill resolution producing a
//!   [`ResolvedValue`] tree or the complete list of problems found.
//! - [`ModuleDescriptor`] / [`ModuleGraph`] — modules with typed inputs,
//!   declared outputs, and sub-module references, with topological
//!   instantiation order and cycle detection.
//! - [`validate`] — whole-graph validation producing one aggregated
//!   [`ValidationReport`].
//! - [`ModuleDecl`] / [`Blueprint`] — the serde-facing declarative forms
//!   blueprint files are written in, compiled into the model with
//!   load-time [`SchemaError`] rejection.
//!
//! # Example
//!
//! ```
//! use blueprint_schema_core::*;
//! use serde_json::json;
//!
//! // Schema for a filestore share map, as a blueprint module declares it.
//! let share = SchemaNode::object(
//!     ObjectSchema::new(vec![
//!         FieldSchema::new("tier", SchemaNode::string().required()),
//!         FieldSchema::new("capacity_gb", SchemaNode::number().required()),
//!         FieldSchema::new(
//!             "multi_share",
//!             SchemaNode::boolean().with_default(json!(false)),
//!         ),
//!     ])
//!     .unwrap(),
//! );
//! let storage = SchemaNode::map(share);
//!
//! let input = json!({"share1": {"tier": "ENTERPRISE", "capacity_gb": 1024}});
//! let resolved = resolve(&storage, Some(&input)).unwrap();
//! let share1 = resolved.get("share1").unwrap();
//! assert_eq!(share1.get("multi_share"), Some(&ResolvedValue::Bool(false)));
//!
//! // Missing required fields are collected, path-qualified, in one pass.
//! let errors = resolve(&storage, Some(&json!({"share1": {}}))).unwrap_err();
//! assert_eq!(errors.len(), 2);
//! assert_eq!(errors[0].path.to_string(), "share1.tier");
//! ```

mod blueprint;
pub mod decl;
mod error;
mod graph;
mod module;
mod resolve;
mod types;
mod validate;

pub use blueprint::{BLUEPRINT_CONTRACT_VERSION, Blueprint};
pub use decl::{FieldDecl, ModuleDecl, TypeDecl, WireDecl, compile_fields};
pub use error::{ErrorKind, PathSegment, SchemaError, ValidationError, ValuePath};
pub use graph::{GraphError, ModuleGraph};
pub use module::{ModuleDescriptor, OutputWire};
pub use resolve::resolve;
pub use types::{FieldSchema, ObjectSchema, ResolvedValue, SchemaKind, SchemaNode};
pub use validate::{ExternalInputs, ValidationReport, validate};
