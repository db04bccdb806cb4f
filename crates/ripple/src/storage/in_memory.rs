//! In-memory graph store backed by petgraph.
//!
//! Nodes and edges live in a `DiGraph<Node, Edge>`; a side map translates
//! store-level [`NodeId`]s into petgraph indices.

use petgraph::Direction as PetDirection;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

use super::{GraphStore, Relationship};
use crate::domain::{Direction, Edge, EdgeId, Node, NodeId};
use crate::error::{Error, Result};

/// A directed, typed graph held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraph {
    graph: DiGraph<Node, Edge>,
    node_map: HashMap<NodeId, NodeIndex>,
}

impl InMemoryGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateNode` if a node with the same id exists.
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if self.node_map.contains_key(&node.id) {
            return Err(Error::DuplicateNode(node.id));
        }
        let id = node.id;
        let index = self.graph.add_node(node);
        self.node_map.insert(id, index);
        Ok(())
    }

    /// Add a directed edge `from -> to`.
    ///
    /// Parallel edges and self-loops are allowed.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownEndpoint` if either endpoint is missing.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, edge: Edge) -> Result<EdgeId> {
        let from_index = self.index_of(from)?;
        let to_index = self.index_of(to)?;
        let index = self.graph.add_edge(from_index, to_index, edge);
        Ok(EdgeId(index.index()))
    }

    /// Find the first node carrying `name`.
    #[must_use]
    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.graph
            .node_weights()
            .find(|node| node.name.as_deref() == Some(name))
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All nodes, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// All edges as `(from, to, edge)`, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &Edge)> {
        self.graph.edge_references().map(|e| {
            (
                self.graph[e.source()].id,
                self.graph[e.target()].id,
                e.weight(),
            )
        })
    }

    fn index_of(&self, id: NodeId) -> Result<NodeIndex> {
        self.node_map
            .get(&id)
            .copied()
            .ok_or(Error::UnknownEndpoint(id))
    }

    fn collect_directed<'g>(
        &'g self,
        index: NodeIndex,
        rel_type: &str,
        direction: PetDirection,
        out: &mut Vec<Relationship<'g>>,
    ) {
        for edge in self.graph.edges_directed(index, direction) {
            if edge.weight().rel_type != rel_type {
                continue;
            }
            let other = match direction {
                PetDirection::Outgoing => edge.target(),
                PetDirection::Incoming => edge.source(),
            };
            out.push(Relationship {
                id: EdgeId(edge.id().index()),
                edge: edge.weight(),
                other: self.graph[other].id,
            });
        }
    }
}

impl GraphStore for InMemoryGraph {
    fn contains(&self, id: NodeId) -> bool {
        self.node_map.contains_key(&id)
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_map.get(&id).map(|&index| &self.graph[index])
    }

    fn relationships(
        &self,
        node: NodeId,
        rel_type: &str,
        direction: Direction,
    ) -> Result<Vec<Relationship<'_>>> {
        let Some(&index) = self.node_map.get(&node) else {
            return Ok(Vec::new());
        };

        let mut found = Vec::new();
        if matches!(direction, Direction::Outgoing | Direction::Both) {
            self.collect_directed(index, rel_type, PetDirection::Outgoing, &mut found);
        }
        if matches!(direction, Direction::Incoming | Direction::Both) {
            self.collect_directed(index, rel_type, PetDirection::Incoming, &mut found);
        }

        // petgraph walks adjacency lists newest-first; report insertion order
        found.sort_by_key(|rel| rel.id);
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> InMemoryGraph {
        let mut graph = InMemoryGraph::new();
        for (id, name) in [(1, "A"), (2, "B"), (3, "C")] {
            graph.add_node(Node::new(id).with_name(name)).unwrap();
        }
        graph
            .add_edge(NodeId(1), NodeId(2), Edge::new("IMPACTS"))
            .unwrap();
        graph
            .add_edge(NodeId(1), NodeId(3), Edge::new("IMPACTS"))
            .unwrap();
        graph
            .add_edge(NodeId(3), NodeId(2), Edge::new("FEEDS"))
            .unwrap();
        graph
    }

    #[test]
    fn duplicate_node_is_rejected() {
        let mut graph = abc();
        let err = graph.add_node(Node::new(1)).unwrap_err();
        assert!(matches!(err, Error::DuplicateNode(NodeId(1))));
    }

    #[test]
    fn edge_to_unknown_node_is_rejected() {
        let mut graph = abc();
        let err = graph
            .add_edge(NodeId(1), NodeId(42), Edge::new("IMPACTS"))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownEndpoint(NodeId(42))));
    }

    #[test]
    fn outgoing_relationships_filter_by_type() {
        let graph = abc();
        let rels = graph
            .relationships(NodeId(1), "IMPACTS", Direction::Outgoing)
            .unwrap();
        let others: Vec<NodeId> = rels.iter().map(|r| r.other).collect();
        assert_eq!(others, vec![NodeId(2), NodeId(3)]);

        let none = graph
            .relationships(NodeId(1), "FEEDS", Direction::Outgoing)
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn incoming_and_both_directions() {
        let graph = abc();
        let incoming = graph
            .relationships(NodeId(2), "IMPACTS", Direction::Incoming)
            .unwrap();
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].other, NodeId(1));

        let both = graph
            .relationships(NodeId(3), "FEEDS", Direction::Both)
            .unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].other, NodeId(2));

        let both_impacts = graph
            .relationships(NodeId(3), "IMPACTS", Direction::Both)
            .unwrap();
        assert_eq!(both_impacts.len(), 1);
        assert_eq!(both_impacts[0].other, NodeId(1));
    }

    #[test]
    fn unknown_node_has_no_relationships() {
        let graph = abc();
        assert!(!graph.contains(NodeId(9)));
        assert!(graph
            .relationships(NodeId(9), "IMPACTS", Direction::Both)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn lookup_by_name_and_counts() {
        let graph = abc();
        assert_eq!(graph.node_by_name("C").map(|n| n.id), Some(NodeId(3)));
        assert!(graph.node_by_name("Z").is_none());
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.edges().count(), 3);
    }
}
