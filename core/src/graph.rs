//! Module composition graph with topological ordering and cycle detection.
//!
//! Modules reference sub-modules by name; the references must form a DAG.
//! [`ModuleGraph::resolve_order`] computes a deterministic instantiation
//! order in which every module appears after the modules it references,
//! with ties between unrelated modules broken by insertion order.

use std::collections::HashMap;

use thiserror::Error;

use crate::module::ModuleDescriptor;

/// Errors raised while assembling or ordering a module graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A module with this name is already present.
    #[error("duplicate module in graph: {0}")]
    DuplicateModule(String),
    /// A module references a name not present in the graph.
    #[error("module '{module}' references unknown module '{reference}'")]
    UnknownReference {
        /// Referencing module.
        module: String,
        /// Missing reference target.
        reference: String,
    },
    /// Module references form a cycle; `path` names the module sequence,
    /// ending with a repeat of the first module.
    #[error("cyclic module reference: {}", path.join(" -> "))]
    CyclicReference {
        /// The cycle, e.g. `["a", "b", "c", "a"]`.
        path: Vec<String>,
    },
}

/// A named collection of [`ModuleDescriptor`]s with reference edges.
///
/// Read-heavy after construction; ordering and validation never mutate the
/// graph.
///
/// # Examples
///
/// ```
/// use blueprint_schema_core::{ModuleDescriptor, ModuleGraph};
///
/// let mut graph = ModuleGraph::new();
/// graph
///     .add_module(ModuleDescriptor::new("cluster", "modules/gke-cluster").with_reference("vpc"))
///     .unwrap();
/// graph
///     .add_module(ModuleDescriptor::new("vpc", "modules/net-vpc"))
///     .unwrap();
///
/// // Referenced modules come first.
/// assert_eq!(graph.resolve_order().unwrap(), vec!["vpc", "cluster"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    modules: Vec<ModuleDescriptor>,
    index: HashMap<String, usize>,
}

impl ModuleGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module to the graph.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateModule`] if the name is already
    /// present. References to modules added later are allowed; they are
    /// checked by [`resolve_order`](Self::resolve_order).
    pub fn add_module(&mut self, module: ModuleDescriptor) -> Result<(), GraphError> {
        if self.index.contains_key(&module.name) {
            return Err(GraphError::DuplicateModule(module.name.clone()));
        }
        self.index.insert(module.name.clone(), self.modules.len());
        self.modules.push(module);
        Ok(())
    }

    /// Looks up a module by name in O(1) time.
    pub fn get(&self, name: &str) -> Option<&ModuleDescriptor> {
        self.index.get(name).map(|&i| &self.modules[i])
    }

    /// Returns `true` if a module with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the modules in insertion order.
    pub fn modules(&self) -> &[ModuleDescriptor] {
        &self.modules
    }

    /// Returns the number of modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns `true` if the graph has no modules.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Computes a valid instantiation order.
    ///
    /// Every module appears after all modules it references. Modules with
    /// no path between them keep their relative insertion order, so the
    /// result is deterministic.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownReference`] if any reference targets a
    /// missing module, or [`GraphError::CyclicReference`] naming the module
    /// sequence if the references contain a cycle.
    pub fn resolve_order(&self) -> Result<Vec<&str>, GraphError> {
        for module in &self.modules {
            for reference in &module.references {
                if !self.index.contains_key(reference) {
                    return Err(GraphError::UnknownReference {
                        module: module.name.clone(),
                        reference: reference.clone(),
                    });
                }
            }
        }

        // Kahn's algorithm; each round takes the lowest-insertion-index
        // module whose references are all placed.
        let count = self.modules.len();
        let mut pending: Vec<usize> = self
            .modules
            .iter()
            .map(|m| m.references.len())
            .collect();
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];
        for (position, module) in self.modules.iter().enumerate() {
            for reference in &module.references {
                dependents[self.index[reference]].push(position);
            }
        }

        let mut placed = vec![false; count];
        let mut order = Vec::with_capacity(count);
        loop {
            let Some(next) = (0..count).find(|&i| !placed[i] && pending[i] == 0) else {
                break;
            };
            placed[next] = true;
            order.push(self.modules[next].name.as_str());
            for &dependent in &dependents[next] {
                pending[dependent] -= 1;
            }
        }

        if order.len() < count {
            return Err(GraphError::CyclicReference {
                path: self.trace_cycle(&placed),
            });
        }
        Ok(order)
    }

    /// Walks unplaced references from the first unplaced module until one
    /// repeats, yielding the cycle with its first module repeated at the
    /// end.
    fn trace_cycle(&self, placed: &[bool]) -> Vec<String> {
        let start = placed
            .iter()
            .position(|&p| !p)
            .expect("cycle trace requires an unplaced module");

        let mut visited: Vec<usize> = Vec::new();
        let mut current = start;
        loop {
            if let Some(first) = visited.iter().position(|&i| i == current) {
                let mut path: Vec<String> = visited[first..]
                    .iter()
                    .map(|&i| self.modules[i].name.clone())
                    .collect();
                path.push(self.modules[current].name.clone());
                return path;
            }
            visited.push(current);
            current = self.modules[current]
                .references
                .iter()
                .map(|r| self.index[r])
                .find(|&i| !placed[i])
                .expect("unplaced module must have an unplaced reference");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str, references: &[&str]) -> ModuleDescriptor {
        let mut descriptor = ModuleDescriptor::new(name, format!("modules/{name}"));
        for reference in references {
            descriptor = descriptor.with_reference(*reference);
        }
        descriptor
    }

    #[test]
    fn test_add_module_rejects_duplicate_name() {
        let mut graph = ModuleGraph::new();
        graph.add_module(module("vpc", &[])).unwrap();
        let result = graph.add_module(module("vpc", &[]));
        assert_eq!(result, Err(GraphError::DuplicateModule("vpc".to_string())));
    }

    #[test]
    fn test_resolve_order_places_references_first() {
        let mut graph = ModuleGraph::new();
        graph.add_module(module("cluster", &["vpc", "sa"])).unwrap();
        graph.add_module(module("vpc", &[])).unwrap();
        graph.add_module(module("sa", &[])).unwrap();
        graph.add_module(module("nodepool", &["cluster"])).unwrap();

        let order = graph.resolve_order().unwrap();
        assert_eq!(order, vec!["vpc", "sa", "cluster", "nodepool"]);
    }

    #[test]
    fn test_resolve_order_breaks_ties_by_insertion() {
        let mut graph = ModuleGraph::new();
        graph.add_module(module("nat", &[])).unwrap();
        graph.add_module(module("filestore", &[])).unwrap();
        graph.add_module(module("vpc", &[])).unwrap();

        let order = graph.resolve_order().unwrap();
        assert_eq!(order, vec!["nat", "filestore", "vpc"]);
    }

    #[test]
    fn test_resolve_order_rejects_unknown_reference() {
        let mut graph = ModuleGraph::new();
        graph.add_module(module("cluster", &["vpc"])).unwrap();

        let result = graph.resolve_order();
        assert_eq!(
            result,
            Err(GraphError::UnknownReference {
                module: "cluster".to_string(),
                reference: "vpc".to_string(),
            })
        );
    }

    #[test]
    fn test_resolve_order_names_full_cycle() {
        let mut graph = ModuleGraph::new();
        graph.add_module(module("a", &["b"])).unwrap();
        graph.add_module(module("b", &["c"])).unwrap();
        graph.add_module(module("c", &["a"])).unwrap();

        let result = graph.resolve_order();
        assert_eq!(
            result,
            Err(GraphError::CyclicReference {
                path: vec![
                    "a".to_string(),
                    "b".to_string(),
                    "c".to_string(),
                    "a".to_string(),
                ],
            })
        );
    }

    #[test]
    fn test_cycle_detection_ignores_acyclic_neighbors() {
        let mut graph = ModuleGraph::new();
        graph.add_module(module("standalone", &[])).unwrap();
        graph.add_module(module("a", &["b"])).unwrap();
        graph.add_module(module("b", &["a"])).unwrap();

        let result = graph.resolve_order();
        assert_eq!(
            result,
            Err(GraphError::CyclicReference {
                path: vec!["a".to_string(), "b".to_string(), "a".to_string()],
            })
        );
    }
}
