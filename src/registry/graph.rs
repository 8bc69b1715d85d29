//! Conversion graph between store types
//!
//! The registry only knows single-hop conversions. This graph links them so
//! the shell can find multi-hop paths (fewest hops first) and then run them
//! with [`StoreRegistry::convert_path`]. Uses petgraph for graph operations.

use std::collections::HashMap;

use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use petgraph::Direction;
use thiserror::Error;

use super::dispatch::StoreRegistry;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Store not found: {0}")]
    UnknownStore(String),

    #[error("No conversion path from {0} to {1}")]
    NoPath(String, String),
}

/// Directed graph of declared conversions, one node per store key
#[derive(Debug, Default)]
pub struct ConversionGraph {
    graph: DiGraph<&'static str, ()>,
    node_map: HashMap<&'static str, NodeIndex>,
}

impl ConversionGraph {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph of every conversion the registry declares
    pub fn from_registry(registry: &StoreRegistry) -> Self {
        let mut graph = Self::new();

        for info in registry.stores() {
            graph.add_store(info.key);
        }

        for entry in registry.converters.values() {
            if (entry.can_convert)() {
                graph.add_conversion(entry.source, entry.dest);
            }
        }

        graph
    }

    /// Adds a store node
    pub fn add_store(&mut self, key: &'static str) {
        if !self.node_map.contains_key(key) {
            let idx = self.graph.add_node(key);
            self.node_map.insert(key, idx);
        }
    }

    /// Adds a conversion edge `from -> to`, adding missing nodes
    pub fn add_conversion(&mut self, from: &'static str, to: &'static str) {
        self.add_store(from);
        self.add_store(to);
        let (a, b) = (self.node_map[from], self.node_map[to]);
        if self.graph.find_edge(a, b).is_none() {
            self.graph.add_edge(a, b, ());
        }
    }

    fn node(&self, key: &str) -> Result<NodeIndex, GraphError> {
        self.node_map
            .get(key)
            .copied()
            .ok_or_else(|| GraphError::UnknownStore(key.to_string()))
    }

    /// Returns true if a single-hop conversion exists
    pub fn has_direct(&self, from: &str, to: &str) -> bool {
        match (self.node_map.get(from), self.node_map.get(to)) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    /// Shortest conversion path from `from` to `to`, both ends included
    ///
    /// A store converts into itself only through a declared self-conversion.
    pub fn path(&self, from: &str, to: &str) -> Result<Vec<&'static str>, GraphError> {
        let start = self.node(from)?;
        let goal = self.node(to)?;
        let no_path = || GraphError::NoPath(from.to_string(), to.to_string());

        if start == goal {
            return if self.graph.find_edge(start, goal).is_some() {
                Ok(vec![self.graph[start], self.graph[goal]])
            } else {
                Err(no_path())
            };
        }

        let (_, nodes) = astar(&self.graph, start, |n| n == goal, |_| 1, |_| 0).ok_or_else(no_path)?;

        Ok(nodes.into_iter().map(|idx| self.graph[idx]).collect())
    }

    /// Every store reachable from `from` in one or more hops
    ///
    /// `from` itself is included only when a cycle leads back to it.
    pub fn reachable(&self, from: &str) -> Result<Vec<&'static str>, GraphError> {
        let start = self.node(from)?;
        let mut bfs = Bfs::new(&self.graph, start);
        let mut keys = Vec::new();

        while let Some(idx) = bfs.next(&self.graph) {
            if idx != start {
                keys.push(self.graph[idx]);
            }
        }

        let returns = self
            .graph
            .neighbors_directed(start, Direction::Incoming)
            .any(|idx| bfs.discovered.contains(idx.index()));
        if returns {
            keys.push(self.graph[start]);
        }

        keys.sort_unstable();
        Ok(keys)
    }

    /// Number of stores in the graph
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    /// Returns true if the graph has no stores
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> ConversionGraph {
        let mut graph = ConversionGraph::new();
        graph.add_conversion("aig", "mig");
        graph.add_conversion("mig", "xag");
        graph.add_conversion("aig", "table");
        graph.add_conversion("xag", "table");
        graph.add_store("klut");
        graph
    }

    #[test]
    fn empty_graph() {
        let graph = ConversionGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
    }

    #[test]
    fn direct_edges_are_directional() {
        let graph = chain();
        assert!(graph.has_direct("aig", "mig"));
        assert!(!graph.has_direct("mig", "aig"));
        assert!(!graph.has_direct("aig", "missing"));
    }

    #[test]
    fn shortest_path_wins() {
        let graph = chain();
        assert_eq!(graph.path("aig", "table").unwrap(), vec!["aig", "table"]);
        assert_eq!(
            graph.path("mig", "table").unwrap(),
            vec!["mig", "xag", "table"]
        );
    }

    #[test]
    fn no_path_reported() {
        let graph = chain();
        assert_eq!(
            graph.path("table", "aig"),
            Err(GraphError::NoPath("table".to_string(), "aig".to_string()))
        );
        assert_eq!(
            graph.path("aig", "nowhere"),
            Err(GraphError::UnknownStore("nowhere".to_string()))
        );
    }

    #[test]
    fn self_conversion_needs_declaration() {
        let mut graph = chain();
        assert!(graph.path("aig", "aig").is_err());

        graph.add_conversion("aig", "aig");
        assert_eq!(graph.path("aig", "aig").unwrap(), vec!["aig", "aig"]);
    }

    #[test]
    fn reachable_stores() {
        let graph = chain();
        assert_eq!(
            graph.reachable("mig").unwrap(),
            vec!["table", "xag"]
        );
        assert!(graph.reachable("klut").unwrap().is_empty());
    }

    #[test]
    fn cycle_makes_start_reachable() {
        let mut graph = ConversionGraph::new();
        graph.add_conversion("aig", "mig");
        graph.add_conversion("mig", "aig");
        graph.add_conversion("mig", "table");

        assert_eq!(graph.reachable("aig").unwrap(), vec!["aig", "mig", "table"]);
        assert_eq!(graph.reachable("table").unwrap(), Vec::<&str>::new());
    }
}
