//! Blueprint catalog loading and compilation.
//!
//! This crate provides infrastructure for loading module declarations from
//! various sources (directories of JSON/YAML files, single blueprint
//! bundles) and compiling them into a validated
//! [`ModuleGraph`](blueprint_schema_core::ModuleGraph).
//!
//! # Quick start
//!
//! ```no_run
//! use blueprint_schema_core::{ExternalInputs, validate};
//! use blueprint_schema_loader::BlueprintCatalog;
//!
//! let catalog = BlueprintCatalog::builder()
//!     .from_dir("blueprints/modules/")
//!     .from_bundle("accelerator-cluster.json")
//!     .build()
//!     .unwrap();
//!
//! // Cyclic or dangling module references fail here, at load time.
//! let graph = catalog.compile().unwrap();
//!
//! let report = validate(&graph, &ExternalInputs::new());
//! for error in &report.errors {
//!     eprintln!("{error}");
//! }
//! ```

mod catalog;
mod error;

pub use catalog::{BlueprintCatalog, CatalogBuilder, CatalogSource, bundle_hash};
pub use error::{CatalogError, Result};
