pub mod builder;
pub mod source;

use crate::types::config::DependencySignal;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileNode {
    pub file_path: String,
    /// Raw module specifiers, in source order.
    pub imports: Vec<String>,
    pub exports: Vec<String>,
    pub identifiers: BTreeSet<String>,
}

impl FileNode {
    /// Whether `name` appears as an identifier in the file. For dotted names
    /// (`Class.method`) the last segment is checked.
    pub fn mentions(&self, name: &str) -> bool {
        let last = name.rsplit('.').next().unwrap_or(name);
        let is_identifier = !last.is_empty()
            && last
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
        !is_identifier || self.identifiers.contains(last)
    }
}

/// File-level import graph for one run. Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    pub nodes: BTreeMap<String, FileNode>,
    /// importer -> imported files
    pub edges: BTreeMap<String, BTreeSet<String>>,
    dependents: BTreeMap<String, usize>,
}

impl DependencyGraph {
    pub fn new(
        nodes: BTreeMap<String, FileNode>,
        edges: BTreeMap<String, BTreeSet<String>>,
    ) -> Self {
        let mut dependents = BTreeMap::new();
        for targets in edges.values() {
            for target in targets {
                *dependents.entry(target.clone()).or_insert(0) += 1;
            }
        }
        Self {
            nodes,
            edges,
            dependents,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[cfg(test)]
    pub fn contains(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    pub fn node(&self, path: &str) -> Option<&FileNode> {
        self.nodes.get(path)
    }

    /// Number of files importing `path`.
    pub fn fan_in(&self, path: &str) -> usize {
        self.dependents.get(path).copied().unwrap_or(0)
    }

    /// Number of files `path` imports.
    pub fn fan_out(&self, path: &str) -> usize {
        self.edges.get(path).map_or(0, BTreeSet::len)
    }

    pub fn dependency_count(&self, path: &str, signal: DependencySignal) -> usize {
        match signal {
            DependencySignal::FanIn => self.fan_in(path),
            DependencySignal::FanOut => self.fan_out(path),
            DependencySignal::GraphSize => self.node_count(),
        }
    }
}
