//! Recursive value resolution with default-fill and error collection.
//!
//! [`resolve`] walks a [`SchemaNode`] and a partially-populated raw input in
//! lockstep, substituting defaults for absent optional fields (recursively,
//! so a default like `{}` still receives its nested defaults) and collecting
//! every problem found across the whole tree. A call reports all errors at
//! once rather than stopping at the first.
//!
//! An explicit JSON `null` is treated identically to an absent value: the
//! default applies for optional fields, and required fields report
//! `MissingRequired`, never a type error.
//!
//! # Examples
//!
//! ```
//! use blueprint_schema_core::{FieldSchema, ObjectSchema, ResolvedValue, SchemaNode, resolve};
//! use serde_json::json;
//!
//! let schema = SchemaNode::object(
//!     ObjectSchema::new(vec![FieldSchema::new(
//!         "master_global_access",
//!         SchemaNode::boolean().with_default(json!(true)),
//!     )])
//!     .unwrap(),
//! )
//! .with_default(json!({}));
//!
//! // Supplying `{}` and supplying nothing both resolve to the same tree.
//! let from_empty = resolve(&schema, Some(&json!({}))).unwrap();
//! let from_absent = resolve(&schema, None).unwrap();
//! assert_eq!(from_empty, from_absent);
//! assert_eq!(
//!     from_empty.get("master_global_access"),
//!     Some(&ResolvedValue::Bool(true))
//! );
//! ```

use serde_json::Value;
use tracing::debug;

use crate::error::{PathSegment, ValidationError, ValuePath};
use crate::types::{ResolvedValue, SchemaKind, SchemaNode};

/// Resolves a raw input against a schema, producing a fully-populated tree.
///
/// Returns either a complete [`ResolvedValue`] or the non-empty, ordered
/// list of every [`ValidationError`] found. Resolution is deterministic:
/// identical arguments always yield structurally equal results.
///
/// # Errors
///
/// Returns all `MissingRequired`, `TypeMismatch`, and `UnknownField`
/// problems found anywhere in the tree.
pub fn resolve(
    schema: &SchemaNode,
    input: Option<&Value>,
) -> Result<ResolvedValue, Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut path = ValuePath::root();
    let value = resolve_node(schema, normalize(input), &mut path, &mut errors);
    if errors.is_empty() {
        Ok(value)
    } else {
        debug!(error_count = errors.len(), "Resolution failed");
        Err(errors)
    }
}

/// Collapses an explicit `null` into "absent".
fn normalize(input: Option<&Value>) -> Option<&Value> {
    match input {
        Some(Value::Null) | None => None,
        present => present,
    }
}

fn resolve_node(
    schema: &SchemaNode,
    input: Option<&Value>,
    path: &mut ValuePath,
    errors: &mut Vec<ValidationError>,
) -> ResolvedValue {
    match input {
        Some(value) => resolve_supplied(schema, value, path, errors),
        None => match &schema.default {
            // The default may itself be a partial structure; resolve it so
            // nested optional fields receive their own defaults.
            Some(default) => resolve_supplied(schema, default, path, errors),
            None if schema.required => {
                errors.push(ValidationError::missing_required(path.clone()));
                ResolvedValue::Absent
            }
            None => ResolvedValue::Absent,
        },
    }
}

fn resolve_supplied(
    schema: &SchemaNode,
    value: &Value,
    path: &mut ValuePath,
    errors: &mut Vec<ValidationError>,
) -> ResolvedValue {
    match &schema.kind {
        SchemaKind::String => match value {
            Value::String(s) => ResolvedValue::String(s.clone()),
            other => mismatch(schema, other, path, errors),
        },
        SchemaKind::Bool => match value {
            Value::Bool(b) => ResolvedValue::Bool(*b),
            other => mismatch(schema, other, path, errors),
        },
        SchemaKind::Number => match value {
            Value::Number(n) => ResolvedValue::Number(n.clone()),
            other => mismatch(schema, other, path, errors),
        },
        SchemaKind::List(element) => match value {
            Value::Array(items) => {
                let mut resolved = Vec::with_capacity(items.len());
                for (position, item) in items.iter().enumerate() {
                    path.push(PathSegment::Index(position));
                    resolved.push(resolve_node(element, normalize(Some(item)), path, errors));
                    path.pop();
                }
                ResolvedValue::List(resolved)
            }
            other => mismatch(schema, other, path, errors),
        },
        SchemaKind::Map(element) => match value {
            Value::Object(entries) => {
                // Caller-chosen keys are preserved verbatim; unknown keys
                // are never an error for maps.
                let mut resolved = Vec::with_capacity(entries.len());
                for (key, item) in entries {
                    path.push(PathSegment::Key(key.clone()));
                    let child = resolve_node(element, normalize(Some(item)), path, errors);
                    path.pop();
                    resolved.push((key.clone(), child));
                }
                ResolvedValue::Map(resolved)
            }
            other => mismatch(schema, other, path, errors),
        },
        SchemaKind::Object(fields) => match value {
            Value::Object(entries) => {
                let mut resolved = Vec::with_capacity(fields.len());
                for field in fields.fields() {
                    path.push(PathSegment::Field(field.name.clone()));
                    let child = resolve_node(
                        &field.schema,
                        normalize(entries.get(&field.name)),
                        path,
                        errors,
                    );
                    path.pop();
                    resolved.push((field.name.clone(), child));
                }
                for key in entries.keys() {
                    if !fields.contains(key) {
                        errors.push(ValidationError::unknown_field(
                            path.child(PathSegment::Field(key.clone())),
                            format!("field '{key}' is not declared in this object"),
                        ));
                    }
                }
                ResolvedValue::Object(resolved)
            }
            other => mismatch(schema, other, path, errors),
        },
    }
}

fn mismatch(
    schema: &SchemaNode,
    value: &Value,
    path: &mut ValuePath,
    errors: &mut Vec<ValidationError>,
) -> ResolvedValue {
    errors.push(ValidationError::type_mismatch(
        path.clone(),
        schema.kind.type_name(),
        raw_type_name(value),
    ));
    ResolvedValue::Absent
}

fn raw_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::error::ErrorKind;
    use crate::types::{FieldSchema, ObjectSchema};

    use super::*;

    fn filestore_share() -> SchemaNode {
        SchemaNode::object(
            ObjectSchema::new(vec![
                FieldSchema::new("tier", SchemaNode::string().required()),
                FieldSchema::new("capacity_gb", SchemaNode::number().required()),
                FieldSchema::new("name", SchemaNode::string().required()),
            ])
            .unwrap(),
        )
        .required()
    }

    #[test]
    fn test_missing_required_field_reports_exact_path() {
        let input = json!({"name": "share1", "tier": "ENTERPRISE"});
        let errors = resolve(&filestore_share(), Some(&input)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::MissingRequired);
        assert_eq!(errors[0].path.to_string(), "capacity_gb");
    }

    #[test]
    fn test_one_missing_required_per_absent_field() {
        let errors = resolve(&filestore_share(), Some(&json!({}))).unwrap_err();
        let paths: Vec<String> = errors.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, vec!["tier", "capacity_gb", "name"]);
        assert!(errors.iter().all(|e| e.kind == ErrorKind::MissingRequired));
    }

    #[test]
    fn test_null_for_required_is_missing_not_mismatch() {
        let input = json!({"name": null, "tier": "BASIC_HDD", "capacity_gb": 1024});
        let errors = resolve(&filestore_share(), Some(&input)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::MissingRequired);
        assert_eq!(errors[0].path.to_string(), "name");
    }

    #[test]
    fn test_null_for_optional_applies_default() {
        let schema = SchemaNode::object(
            ObjectSchema::new(vec![FieldSchema::new(
                "machine_type",
                SchemaNode::string().with_default(json!("n2-standard-2")),
            )])
            .unwrap(),
        );
        let resolved = resolve(&schema, Some(&json!({"machine_type": null}))).unwrap();
        assert_eq!(
            resolved.get("machine_type").unwrap().as_str(),
            Some("n2-standard-2")
        );
    }

    #[test]
    fn test_type_mismatch_on_scalar() {
        let input = json!({"name": "share1", "tier": "ENTERPRISE", "capacity_gb": "big"});
        let errors = resolve(&filestore_share(), Some(&input)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::TypeMismatch);
        assert_eq!(errors[0].path.to_string(), "capacity_gb");
        assert!(errors[0].message.contains("expected number, found string"));
    }

    #[test]
    fn test_unknown_object_field_is_reported() {
        let input = json!({
            "name": "share1",
            "tier": "ENTERPRISE",
            "capacity_gb": 1024,
            "zone": "europe-west1-b"
        });
        let errors = resolve(&filestore_share(), Some(&input)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::UnknownField);
        assert_eq!(errors[0].path.to_string(), "zone");
    }

    #[test]
    fn test_errors_do_not_short_circuit() {
        let input = json!({"tier": 7, "zone": "x"});
        let errors = resolve(&filestore_share(), Some(&input)).unwrap_err();
        // tier mismatch + capacity_gb missing + name missing + unknown zone
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_map_preserves_caller_keys() {
        let schema = SchemaNode::map(filestore_share());
        let input = json!({
            "share1": {"name": "share1", "tier": "ENTERPRISE", "capacity_gb": 1024},
            "share2": {"name": "share2", "tier": "BASIC_HDD", "capacity_gb": 2048}
        });
        let resolved = resolve(&schema, Some(&input)).unwrap();
        let ResolvedValue::Map(entries) = resolved else {
            panic!("expected map");
        };
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["share1", "share2"]);
    }

    #[test]
    fn test_map_errors_carry_key_segments() {
        let schema = SchemaNode::map(filestore_share());
        let input = json!({"share1": {"name": "share1", "tier": "ENTERPRISE"}});
        let errors = resolve(&schema, Some(&input)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path.to_string(), "share1.capacity_gb");
    }

    #[test]
    fn test_list_preserves_order_and_indexes_errors() {
        let schema = SchemaNode::list(SchemaNode::number().required());
        let resolved = resolve(&schema, Some(&json!([3, 1, 2]))).unwrap();
        assert_eq!(
            resolved,
            ResolvedValue::List(vec![
                ResolvedValue::Number(3.into()),
                ResolvedValue::Number(1.into()),
                ResolvedValue::Number(2.into()),
            ])
        );

        let errors = resolve(&schema, Some(&json!([3, "one", 2]))).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path.to_string(), "[1]");
    }

    #[test]
    fn test_empty_list_is_valid() {
        let schema = SchemaNode::list(SchemaNode::string()).required();
        let resolved = resolve(&schema, Some(&json!([]))).unwrap();
        assert_eq!(resolved, ResolvedValue::List(vec![]));
    }

    #[test]
    fn test_required_list_with_no_value_is_missing() {
        let schema = SchemaNode::list(SchemaNode::string()).required();
        let errors = resolve(&schema, None).unwrap_err();
        assert_eq!(errors[0].kind, ErrorKind::MissingRequired);
    }

    #[test]
    fn test_nested_default_fill_from_empty_object() {
        // private_cluster_config = object({master_global_access: optional(bool, true)})
        let schema = SchemaNode::object(
            ObjectSchema::new(vec![FieldSchema::new(
                "master_global_access",
                SchemaNode::boolean().with_default(json!(true)),
            )])
            .unwrap(),
        )
        .with_default(json!({}));

        let resolved = resolve(&schema, Some(&json!({}))).unwrap();
        assert_eq!(
            resolved.get("master_global_access"),
            Some(&ResolvedValue::Bool(true))
        );
    }

    #[test]
    fn test_nested_default_fill_from_absent_parent() {
        let inner = SchemaNode::object(
            ObjectSchema::new(vec![FieldSchema::new(
                "master_global_access",
                SchemaNode::boolean().with_default(json!(true)),
            )])
            .unwrap(),
        )
        .with_default(json!({}));
        let schema = SchemaNode::object(
            ObjectSchema::new(vec![FieldSchema::new("private_cluster_config", inner)]).unwrap(),
        );

        let resolved = resolve(&schema, Some(&json!({}))).unwrap();
        let config = resolved.get("private_cluster_config").unwrap();
        assert_eq!(
            config.get("master_global_access"),
            Some(&ResolvedValue::Bool(true))
        );
    }

    #[test]
    fn test_absent_optional_without_default_is_absent_marker() {
        let schema = SchemaNode::object(
            ObjectSchema::new(vec![FieldSchema::new("labels", SchemaNode::map(SchemaNode::string()))])
                .unwrap(),
        );
        let resolved = resolve(&schema, Some(&json!({}))).unwrap();
        assert!(resolved.get("labels").unwrap().is_absent());

        // Distinguishable from a present empty map.
        let resolved = resolve(&schema, Some(&json!({"labels": {}}))).unwrap();
        assert_eq!(resolved.get("labels"), Some(&ResolvedValue::Map(vec![])));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let input = json!({"name": "share1", "tier": "ENTERPRISE", "capacity_gb": 1024});
        let first = resolve(&filestore_share(), Some(&input)).unwrap();
        let second = resolve(&filestore_share(), Some(&input)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_null_map_entry_survives_reresolution() {
        let schema = SchemaNode::map(SchemaNode::string());
        let input = json!({"share1": null});

        let once = resolve(&schema, Some(&input)).unwrap();
        assert_eq!(
            once,
            ResolvedValue::Map(vec![("share1".into(), ResolvedValue::Absent)])
        );

        // The caller-chosen key must not vanish on a round-trip.
        assert_eq!(once.to_raw(), json!({"share1": null}));
        let twice = resolve(&schema, Some(&once.to_raw())).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let inner = SchemaNode::object(
            ObjectSchema::new(vec![
                FieldSchema::new("tier", SchemaNode::string().required()),
                FieldSchema::new(
                    "multi_share",
                    SchemaNode::boolean().with_default(json!(false)),
                ),
            ])
            .unwrap(),
        );
        let schema = SchemaNode::map(inner);
        let input = json!({"share1": {"tier": "ENTERPRISE"}});

        let once = resolve(&schema, Some(&input)).unwrap();
        let raw = once.to_raw();
        let twice = resolve(&schema, Some(&raw)).unwrap();
        assert_eq!(once, twice);
    }
}
