//! Schema and value type definitions for blueprint configuration modeling.
//!
//! This module defines the core data model used to represent typed, nested,
//! optional-with-default configuration schemas and the fully-resolved value
//! trees produced from them. Raw (unresolved) values are plain
//! [`serde_json::Value`] trees, so schemas can be fed from JSON or YAML
//! sources without conversion.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::SchemaError;

/// Type tag for a [`SchemaNode`].
///
/// Mirrors the shapes that appear in blueprint variable declarations:
/// scalars, homogeneous lists and maps, and objects with a fixed, ordered
/// field set.
///
/// # Examples
///
/// ```
/// use blueprint_schema_core::{SchemaKind, SchemaNode};
///
/// let strings = SchemaKind::List(Box::new(SchemaNode::string()));
/// assert_eq!(strings.type_name(), "list");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    /// UTF-8 string.
    String,
    /// Boolean.
    Bool,
    /// Numeric value (integer or float).
    Number,
    /// Homogeneous list with the given element schema.
    List(Box<SchemaNode>),
    /// Mapping from arbitrary caller-chosen string keys to values of the
    /// given element schema. Unlike [`SchemaKind::Object`], the key set is
    /// open: unknown keys are never an error.
    Map(Box<SchemaNode>),
    /// Object with a fixed, ordered set of declared fields. Keys not
    /// declared in the [`ObjectSchema`] are rejected during resolution.
    Object(ObjectSchema),
}

impl SchemaKind {
    /// Returns a short name for this kind, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Object(_) => "object",
        }
    }

    /// Checks whether a raw value structurally matches this kind.
    ///
    /// Used to reject malformed defaults at schema construction time. The
    /// check is structural only: object fields may be missing (they are
    /// default-filled later), but present fields must be declared and must
    /// themselves match.
    pub fn admits(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::String, Value::String(_)) => true,
            (Self::Bool, Value::Bool(_)) => true,
            (Self::Number, Value::Number(_)) => true,
            (Self::List(elem), Value::Array(items)) => {
                items.iter().all(|item| elem.kind.admits(item))
            }
            (Self::Map(elem), Value::Object(entries)) => {
                entries.values().all(|item| elem.kind.admits(item))
            }
            (Self::Object(fields), Value::Object(entries)) => entries
                .iter()
                .all(|(key, item)| fields.get(key).is_some_and(|f| f.kind.admits(item))),
            _ => false,
        }
    }
}

/// A single node in a configuration schema tree.
///
/// Each node carries its [`SchemaKind`], whether a value is required, and an
/// optional default. A required node must not carry a default. The builder
/// methods uphold this: [`with_default`](SchemaNode::with_default) marks the
/// node optional, and [`required`](SchemaNode::required) clears any default.
/// Hand-built literals must maintain the same exclusivity; declarative input
/// is checked by [`crate::decl`] compilation, which rejects a declaration
/// setting both.
///
/// # Examples
///
/// ```
/// use blueprint_schema_core::SchemaNode;
/// use serde_json::json;
///
/// let tier = SchemaNode::string().required();
/// assert!(tier.required);
///
/// let access = SchemaNode::boolean().with_default(json!(true));
/// assert!(!access.required);
/// assert_eq!(access.default, Some(json!(true)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    /// Shape of values this node accepts.
    pub kind: SchemaKind,
    /// Whether a value must be supplied (no default available).
    pub required: bool,
    /// Default substituted when the input omits this node.
    pub default: Option<Value>,
}

impl SchemaNode {
    fn optional(kind: SchemaKind) -> Self {
        Self {
            kind,
            required: false,
            default: None,
        }
    }

    /// Creates an optional string node.
    pub fn string() -> Self {
        Self::optional(SchemaKind::String)
    }

    /// Creates an optional boolean node.
    pub fn boolean() -> Self {
        Self::optional(SchemaKind::Bool)
    }

    /// Creates an optional number node.
    pub fn number() -> Self {
        Self::optional(SchemaKind::Number)
    }

    /// Creates an optional list node with the given element schema.
    pub fn list(element: SchemaNode) -> Self {
        Self::optional(SchemaKind::List(Box::new(element)))
    }

    /// Creates an optional map node with the given element schema.
    pub fn map(element: SchemaNode) -> Self {
        Self::optional(SchemaKind::Map(Box::new(element)))
    }

    /// Creates an optional object node with the given field set.
    pub fn object(fields: ObjectSchema) -> Self {
        Self::optional(SchemaKind::Object(fields))
    }

    /// Marks this node required, clearing any default.
    pub fn required(mut self) -> Self {
        self.required = true;
        self.default = None;
        self
    }

    /// Attaches a default, implicitly marking the node optional.
    ///
    /// The default's shape is not checked here; declarative compilation
    /// ([`crate::decl`]) rejects mismatched defaults with a
    /// [`SchemaError`](crate::SchemaError).
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self.required = false;
        self
    }
}

/// A named field within an [`ObjectSchema`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// Field name, case-sensitive.
    pub name: String,
    /// Schema for the field's value.
    pub schema: SchemaNode,
}

impl FieldSchema {
    /// Creates a field with the given name and schema.
    pub fn new(name: impl Into<String>, schema: SchemaNode) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

/// Ordered, uniquely-named field set for an object schema.
///
/// Field order is declaration order and is preserved through resolution.
/// Lookup by name is O(1) via an internal index.
///
/// # Examples
///
/// ```
/// use blueprint_schema_core::{FieldSchema, ObjectSchema, SchemaNode};
///
/// let fields = ObjectSchema::new(vec![
///     FieldSchema::new("tier", SchemaNode::string().required()),
///     FieldSchema::new("capacity_gb", SchemaNode::number().required()),
/// ])
/// .unwrap();
///
/// assert_eq!(fields.len(), 2);
/// assert!(fields.get("tier").is_some());
/// assert!(fields.get("Tier").is_none()); // case-sensitive
///
/// // Duplicate names are rejected at construction.
/// let dup = ObjectSchema::new(vec![
///     FieldSchema::new("tier", SchemaNode::string()),
///     FieldSchema::new("tier", SchemaNode::string()),
/// ]);
/// assert!(dup.is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    fields: Vec<FieldSchema>,
    index: HashMap<String, usize>,
}

impl ObjectSchema {
    /// Builds an object schema from an ordered field list.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateField`] if two fields share a name.
    pub fn new(fields: Vec<FieldSchema>) -> Result<Self, SchemaError> {
        let mut index = HashMap::with_capacity(fields.len());
        for (position, field) in fields.iter().enumerate() {
            if index.insert(field.name.clone(), position).is_some() {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }
        Ok(Self { fields, index })
    }

    /// Returns the empty object schema.
    pub fn empty() -> Self {
        Self {
            fields: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Looks up a field's schema by name in O(1) time.
    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.index.get(name).map(|&i| &self.fields[i].schema)
    }

    /// Returns `true` if a field with this name is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the fields in declaration order.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Returns the number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns a copy of this schema with the named fields removed.
    ///
    /// Used by the validator to exclude wire-bound inputs from resolution.
    pub fn without_fields(&self, names: &[&str]) -> Self {
        let kept: Vec<FieldSchema> = self
            .fields
            .iter()
            .filter(|f| !names.contains(&f.name.as_str()))
            .cloned()
            .collect();
        // Removal cannot introduce duplicates.
        Self::new(kept).expect("field removal preserves uniqueness")
    }
}

impl PartialEq for ObjectSchema {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

/// A fully-resolved value tree, shaped identically to its schema.
///
/// Produced by [`resolve`](crate::resolve); every optional field is either
/// default-filled or carries the explicit [`Absent`](ResolvedValue::Absent)
/// marker, which is distinguishable from a present empty value. Resolved
/// trees are immutable by convention: the resolver hands out an owned tree
/// and nothing in this crate mutates one afterwards.
///
/// # Examples
///
/// ```
/// use blueprint_schema_core::ResolvedValue;
///
/// let obj = ResolvedValue::Object(vec![
///     ("tier".into(), ResolvedValue::String("ENTERPRISE".into())),
///     ("labels".into(), ResolvedValue::Absent),
/// ]);
///
/// assert_eq!(obj.get("tier"), Some(&ResolvedValue::String("ENTERPRISE".into())));
/// assert!(obj.get("labels").unwrap().is_absent());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue {
    /// Optional field that was neither supplied nor defaulted.
    Absent,
    /// Resolved string.
    String(String),
    /// Resolved boolean.
    Bool(bool),
    /// Resolved number.
    Number(serde_json::Number),
    /// Resolved list, input order preserved.
    List(Vec<ResolvedValue>),
    /// Resolved map, caller key set preserved verbatim.
    Map(Vec<(String, ResolvedValue)>),
    /// Resolved object, fields in schema declaration order.
    Object(Vec<(String, ResolvedValue)>),
}

impl ResolvedValue {
    /// Returns `true` for the [`Absent`](ResolvedValue::Absent) marker.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Looks up an entry by name in an object or map.
    ///
    /// Returns `None` for other variants or missing names.
    pub fn get(&self, name: &str) -> Option<&ResolvedValue> {
        match self {
            Self::Object(entries) | Self::Map(entries) => entries
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Returns the string value, if this is a resolved string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a resolved boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the numeric value as `f64`, if this is a resolved number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Converts back to a raw [`serde_json::Value`].
    ///
    /// Absent object fields are omitted. Absent map entries become `null`
    /// instead, so the caller-chosen key set survives the round-trip. A
    /// top-level absent value becomes `null`. Re-resolving the raw form
    /// against the same schema reproduces this tree exactly.
    pub fn to_raw(&self) -> Value {
        match self {
            Self::Absent => Value::Null,
            Self::String(s) => Value::String(s.clone()),
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_raw).collect()),
            Self::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_raw()))
                    .collect(),
            ),
            Self::Object(entries) => {
                let mut map = serde_json::Map::new();
                for (key, value) in entries {
                    if !value.is_absent() {
                        map.insert(key.clone(), value.to_raw());
                    }
                }
                Value::Object(map)
            }
        }
    }
}

impl Serialize for ResolvedValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_raw().serialize(serializer)
    }
}
