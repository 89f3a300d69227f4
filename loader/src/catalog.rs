//! Blueprint catalog loading with builder pattern and fallback chains.
//!
//! Provides [`BlueprintCatalog`] for in-memory module declaration lookup
//! and [`CatalogBuilder`] for constructing a catalog from multiple sources
//! with automatic fallback. Declarations load from JSON or YAML, either as
//! one file per module or as a single [`Blueprint`] bundle.
//!
//! # Loading patterns
//!
//! ```no_run
//! use blueprint_schema_loader::BlueprintCatalog;
//!
//! // Load from a directory of per-module declaration files
//! let catalog = BlueprintCatalog::from_dir("blueprints/modules/").unwrap();
//! assert!(catalog.get("vpc").is_some());
//!
//! // Load from a single Blueprint bundle
//! let catalog = BlueprintCatalog::from_bundle("accelerator-cluster.json").unwrap();
//!
//! // Use the builder for a fallback chain
//! let catalog = BlueprintCatalog::builder()
//!     .from_dir("blueprints/modules/")
//!     .from_bundle("accelerator-cluster.json")
//!     .build()
//!     .unwrap();
//!
//! // Compile into a validated module graph (cycles rejected here)
//! let graph = catalog.compile().unwrap();
//! ```

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use blueprint_schema_core::{Blueprint, ModuleDecl, ModuleGraph};

use crate::error::{CatalogError, Result};

/// Describes where a [`BlueprintCatalog`] was loaded from.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    /// Assembled in memory (empty catalog, or merged from mixed inputs).
    Memory,
    /// Loaded from a directory of individual declaration files.
    Directory(PathBuf),
    /// Loaded from a single [`Blueprint`] bundle file.
    Bundle(PathBuf),
    /// Loaded via a fallback chain of multiple sources.
    Multiple(Vec<CatalogSource>),
}

/// In-memory collection of module declarations, addressable by name.
///
/// Declaration order is preserved: it becomes the module insertion order
/// of the compiled [`ModuleGraph`], which in turn fixes tie-breaking in
/// the instantiation order.
#[derive(Debug)]
pub struct BlueprintCatalog {
    modules: Vec<ModuleDecl>,
    source: CatalogSource,
}

impl BlueprintCatalog {
    /// Creates an empty in-memory catalog.
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            source: CatalogSource::Memory,
        }
    }

    /// Returns a new [`CatalogBuilder`] for configuring a fallback chain.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Loads module declarations from a directory of `*.json`, `*.yaml`,
    /// and `*.yml` files, one module per file.
    ///
    /// Files are read in lexicographic name order so that declaration
    /// order does not depend on filesystem iteration order. A later file
    /// declaring an already-seen module name replaces the earlier entry.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the directory cannot be read, or a
    /// parse error for the first malformed file.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut files: Vec<PathBuf> = std::fs::read_dir(path)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("json" | "yaml" | "yml")
                )
            })
            .collect();
        files.sort();

        let mut catalog = Self {
            modules: Vec::new(),
            source: CatalogSource::Directory(path.to_path_buf()),
        };
        for file in files {
            let decl = read_module_decl(&file)?;
            debug!(module = %decl.name, file = %file.display(), "Loaded module declaration");
            catalog.insert(decl);
        }
        Ok(catalog)
    }

    /// Loads module declarations from a single [`Blueprint`] bundle file
    /// (JSON or YAML by extension).
    ///
    /// If the bundle carries a `bundle_hash`, it is verified against the
    /// bundle's modules.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ChecksumMismatch`] if the recorded hash
    /// does not match, or I/O and parse errors as appropriate.
    pub fn from_bundle(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let blueprint: Blueprint = if is_yaml(path) {
            serde_yaml::from_str(&raw)?
        } else {
            serde_json::from_str(&raw)?
        };

        if let Some(expected) = &blueprint.bundle_hash {
            let computed = bundle_hash(&blueprint.modules)?;
            if *expected != computed {
                return Err(CatalogError::ChecksumMismatch {
                    expected: expected.clone(),
                    computed,
                });
            }
        }

        let mut catalog = Self {
            modules: Vec::new(),
            source: CatalogSource::Bundle(path.to_path_buf()),
        };
        for decl in blueprint.modules {
            catalog.insert(decl);
        }
        Ok(catalog)
    }

    /// Inserts a declaration, replacing any existing entry with the same
    /// module name.
    pub fn insert(&mut self, decl: ModuleDecl) {
        match self.modules.iter_mut().find(|m| m.name == decl.name) {
            Some(existing) => *existing = decl,
            None => self.modules.push(decl),
        }
    }

    /// Looks up a declaration by module name.
    pub fn get(&self, name: &str) -> Option<&ModuleDecl> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Returns `true` if the catalog contains a declaration for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the number of module declarations.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns `true` if the catalog contains no declarations.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Returns the declarations in load order.
    pub fn modules(&self) -> &[ModuleDecl] {
        &self.modules
    }

    /// Returns a reference to the source metadata.
    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Compiles every declaration and assembles the module graph.
    ///
    /// Cyclic or dangling references are rejected here, at load time,
    /// before any validation runs.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Schema`] for malformed declarations or
    /// [`CatalogError::Graph`] for duplicate names, unknown references, or
    /// cycles.
    pub fn compile(&self) -> Result<ModuleGraph> {
        let mut graph = ModuleGraph::new();
        for decl in &self.modules {
            graph.add_module(decl.compile()?)?;
        }
        graph.resolve_order()?;
        Ok(graph)
    }
}

impl Default for BlueprintCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes the sha-256 hex digest of the canonical modules JSON.
///
/// Used both when writing bundles and when verifying a bundle's recorded
/// `bundle_hash`.
pub fn bundle_hash(modules: &[ModuleDecl]) -> Result<String> {
    let bytes = serde_json::to_vec(modules)?;
    let hash = Sha256::digest(&bytes);
    Ok(format!("{hash:x}"))
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

fn read_module_decl(path: &Path) -> Result<ModuleDecl> {
    let raw = std::fs::read_to_string(path)?;
    if is_yaml(path) {
        Ok(serde_yaml::from_str(&raw)?)
    } else {
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Builder for constructing a [`BlueprintCatalog`] with a fallback chain.
///
/// Sources are tried in the order they are added. The first successful
/// load wins; if all fail, [`CatalogError::NoSourcesAvailable`] is
/// returned.
///
/// # Example
///
/// ```no_run
/// use blueprint_schema_loader::BlueprintCatalog;
///
/// let catalog = BlueprintCatalog::builder()
///     .from_dir("/etc/blueprints/modules/")
///     .from_bundle("/etc/blueprints/bundle.json")
///     .build()
///     .unwrap();
/// ```
#[derive(Default)]
pub struct CatalogBuilder {
    sources: Vec<CatalogSource>,
}

impl CatalogBuilder {
    /// Creates a new builder with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a directory of declaration files as a source.
    pub fn from_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(CatalogSource::Directory(path.into()));
        self
    }

    /// Adds a [`Blueprint`] bundle file as a source.
    pub fn from_bundle(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(CatalogSource::Bundle(path.into()));
        self
    }

    /// Attempts to load a catalog from the configured sources in order.
    ///
    /// Returns the first successfully loaded catalog. If all sources
    /// fail, returns [`CatalogError::NoSourcesAvailable`].
    pub fn build(self) -> Result<BlueprintCatalog> {
        if self.sources.is_empty() {
            return Err(CatalogError::NoSourcesAvailable);
        }

        let all_sources = self.sources.clone();
        for source in &self.sources {
            let result = match source {
                CatalogSource::Directory(path) => BlueprintCatalog::from_dir(path),
                CatalogSource::Bundle(path) => BlueprintCatalog::from_bundle(path),
                CatalogSource::Memory | CatalogSource::Multiple(_) => continue,
            };
            match result {
                Ok(mut catalog) => {
                    catalog.source = CatalogSource::Multiple(all_sources);
                    return Ok(catalog);
                }
                Err(err) => debug!(?source, error = %err, "Catalog source failed, trying next"),
            }
        }

        Err(CatalogError::NoSourcesAvailable)
    }
}
