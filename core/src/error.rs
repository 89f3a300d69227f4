//! Error types for schema construction and validation.
//!
//! Two families exist: [`SchemaError`] covers malformed schema definitions
//! and is fatal at load time, while [`ValidationError`] describes problems
//! with user-supplied values and is collected into reports rather than
//! aborting on first failure.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors in the schema definition itself.
///
/// These are raised when compiling a declarative schema description and are
/// never surfaced to end users of a valid schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two fields in one object schema share a name.
    #[error("duplicate field in object schema: {0}")]
    DuplicateField(String),
    /// A required field also declares a default.
    #[error("required field must not declare a default: {0}")]
    RequiredWithDefault(String),
    /// A declared default does not match the field's type.
    #[error("default for field '{field}' does not match declared type '{expected}'")]
    DefaultMismatch {
        /// Field whose default is malformed.
        field: String,
        /// Declared type name.
        expected: &'static str,
    },
    /// A scalar type name is not one of `string`, `bool`, `number`.
    #[error("unknown type name in schema declaration: {0}")]
    UnknownType(String),
}

/// One segment of a [`ValuePath`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSegment {
    /// Declared object field or module name.
    Field(String),
    /// List element position.
    Index(usize),
    /// Caller-chosen map key.
    Key(String),
}

/// Path from the root of a value tree to the location of an error.
///
/// Displays in dotted form, e.g. `nodepools.pool-1.taints[0].value`.
///
/// # Examples
///
/// ```
/// use blueprint_schema_core::{PathSegment, ValuePath};
///
/// let mut path = ValuePath::root();
/// path.push(PathSegment::Field("nodepools".into()));
/// path.push(PathSegment::Key("pool-1".into()));
/// path.push(PathSegment::Index(0));
/// assert_eq!(path.to_string(), "nodepools.pool-1[0]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValuePath(Vec<PathSegment>);

impl ValuePath {
    /// Returns the empty root path.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns a single-field path.
    pub fn field(name: impl Into<String>) -> Self {
        Self(vec![PathSegment::Field(name.into())])
    }

    /// Appends a segment in place.
    pub fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    /// Removes the last segment.
    pub fn pop(&mut self) {
        self.0.pop();
    }

    /// Returns a new path with the segment appended.
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut next = self.clone();
        next.push(segment);
        next
    }

    /// Returns a new path with the segment inserted at the front.
    ///
    /// The validator uses this to root module-local error paths at the
    /// module name.
    pub fn prepend(mut self, segment: PathSegment) -> Self {
        self.0.insert(0, segment);
        self
    }

    /// Returns the segments in order.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Returns `true` if this is the root path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for (position, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) | PathSegment::Key(name) => {
                    if position > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{name}")?;
                }
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Category of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required field was neither supplied nor defaulted.
    MissingRequired,
    /// A supplied value does not match the declared type.
    TypeMismatch,
    /// A supplied key or referenced name is not declared.
    UnknownField,
    /// Module references form a cycle.
    CyclicReference,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequired => write!(f, "missing_required"),
            Self::TypeMismatch => write!(f, "type_mismatch"),
            Self::UnknownField => write!(f, "unknown_field"),
            Self::CyclicReference => write!(f, "cyclic_reference"),
        }
    }
}

/// A single validation problem, qualified by path.
///
/// Created during resolution or graph validation, collected into an ordered
/// report, and never mutated afterwards.
///
/// # Examples
///
/// ```
/// use blueprint_schema_core::{ErrorKind, ValidationError, ValuePath};
///
/// let err = ValidationError::missing_required(ValuePath::field("capacity_gb"));
/// assert_eq!(err.kind, ErrorKind::MissingRequired);
/// assert_eq!(err.to_string(), "missing_required at capacity_gb: required field is missing");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind} at {path}: {message}")]
pub struct ValidationError {
    /// Location of the problem in the value tree.
    pub path: ValuePath,
    /// Error category.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    /// Creates an error with an explicit message.
    pub fn new(kind: ErrorKind, path: ValuePath, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }

    /// Creates a `MissingRequired` error with the canned message.
    pub fn missing_required(path: ValuePath) -> Self {
        Self::new(
            ErrorKind::MissingRequired,
            path,
            "required field is missing",
        )
    }

    /// Creates a `TypeMismatch` error naming both types.
    pub fn type_mismatch(path: ValuePath, expected: &str, actual: &str) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            path,
            format!("expected {expected}, found {actual}"),
        )
    }

    /// Creates an `UnknownField` error.
    pub fn unknown_field(path: ValuePath, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownField, path, message)
    }
}
