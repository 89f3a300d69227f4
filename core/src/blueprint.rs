//! Serializable blueprint bundles.

use serde::{Deserialize, Serialize};

use crate::decl::ModuleDecl;

/// Version of the blueprint contract (semver).
///
/// Embedded in every [`Blueprint`] to track compatibility across bundle
/// formats.
pub const BLUEPRINT_CONTRACT_VERSION: &str = "1.0.0";

/// A named, versioned bundle of module declarations with a declared
/// input/output contract, suitable for serializing to a single JSON or
/// YAML file and distributing as one artifact.
///
/// # Examples
///
/// ```
/// use blueprint_schema_core::{Blueprint, ModuleDecl};
///
/// let mut blueprint = Blueprint::new("0.1.0", "2026-01-15T10:30:00Z");
/// blueprint.name = Some("accelerator-cluster".into());
/// blueprint.modules.push(ModuleDecl {
///     name: "vpc".into(),
///     source: "modules/net-vpc".into(),
///     description: None,
///     inputs: vec![],
///     outputs: vec!["network_self_link".into()],
///     references: vec![],
///     wires: vec![],
/// });
///
/// assert_eq!(blueprint.module_count(), 1);
/// assert_eq!(blueprint.version, "0.1.0");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    /// Blueprint contract version (populated from
    /// [`BLUEPRINT_CONTRACT_VERSION`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    /// Bundle version (semver string).
    pub version: String,
    /// Optional blueprint name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Optional blueprint description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// ISO-8601 timestamp for bundle creation.
    pub generated_at: String,
    /// Optional sha-256 hex digest of the canonical modules JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_hash: Option<String>,
    /// Module declarations included in this blueprint.
    #[serde(default)]
    pub modules: Vec<ModuleDecl>,
}

impl Blueprint {
    /// Creates a blueprint with required fields.
    ///
    /// The `schema_version` is automatically set from
    /// [`BLUEPRINT_CONTRACT_VERSION`].
    pub fn new(version: impl Into<String>, generated_at: impl Into<String>) -> Self {
        Self {
            schema_version: Some(BLUEPRINT_CONTRACT_VERSION.to_string()),
            version: version.into(),
            name: None,
            description: None,
            generated_at: generated_at.into(),
            bundle_hash: None,
            modules: Vec::new(),
        }
    }

    /// Returns the number of module declarations in this blueprint.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}
