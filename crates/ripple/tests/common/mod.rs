//! Common test utilities shared across integration tests.
//!
//! Fixture graphs assign node ids in creation order, starting at 0.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use ripple::domain::{Edge, ImpactResult, Limits, Node, NodeId, RelationshipFilter};
use ripple::rules::PropagationRule;
use ripple::state::State;
use ripple::storage::jsonl::{EdgeRecord, GraphRecord};
use ripple::storage::{GraphStore, InMemoryGraph};
use serde_json::Value;

/// Builds a graph from `(name, label)` nodes and `(from, to, edge)` edges.
pub struct GraphBuilder {
    graph: InMemoryGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: InMemoryGraph::new(),
        }
    }

    /// Add nodes with ids continuing from the current count.
    pub fn nodes(mut self, nodes: &[(&str, &str)]) -> Self {
        for (name, label) in nodes {
            let id = i64::try_from(self.graph.node_count()).unwrap();
            self.graph
                .add_node(Node::new(id).with_name(*name).with_label(*label))
                .unwrap();
        }
        self
    }

    pub fn edge(mut self, from: &str, to: &str, edge: Edge) -> Self {
        let from = id(&self.graph, from);
        let to = id(&self.graph, to);
        self.graph.add_edge(from, to, edge).unwrap();
        self
    }

    pub fn impacts(self, from: &str, to: &str) -> Self {
        self.edge(from, to, Edge::new("IMPACTS"))
    }

    pub fn build(self) -> InMemoryGraph {
        self.graph
    }
}

/// Id of the node called `name`.
pub fn id(graph: &InMemoryGraph, name: &str) -> NodeId {
    graph
        .node_by_name(name)
        .unwrap_or_else(|| panic!("no node named {name}"))
        .id
}

// ============================================================================
// Fixture Topologies
// ============================================================================

/// A, B and D each impact C. Edges are created A->C, D->C, B->C, and
/// `edge_for` receives the source node name.
pub fn abcd(edge_for: impl Fn(&str) -> Edge) -> InMemoryGraph {
    GraphBuilder::new()
        .nodes(&[("A", "Node"), ("B", "Node"), ("C", "Node"), ("D", "Node")])
        .edge("A", "C", edge_for("A"))
        .edge("D", "C", edge_for("D"))
        .edge("B", "C", edge_for("B"))
        .build()
}

/// ABCD with every edge using the same rule and no group.
pub fn abcd_with_rule(rule: PropagationRule) -> InMemoryGraph {
    abcd(|_| Edge::new("IMPACTS").with_rule(rule))
}

/// START -> A -> B -> C -> A
pub fn abc_loop() -> InMemoryGraph {
    GraphBuilder::new()
        .nodes(&[("START", "X"), ("A", "X"), ("B", "X"), ("C", "X")])
        .impacts("START", "A")
        .impacts("A", "B")
        .impacts("B", "C")
        .impacts("C", "A")
        .build()
}

/// A -[MY_NON_DEFAULT_IMPACT_RELATION]-> B, A -[WHATEVER]-> C
pub fn custom_relations() -> InMemoryGraph {
    GraphBuilder::new()
        .nodes(&[("A", "Node"), ("B", "Node"), ("C", "Node")])
        .edge("A", "B", Edge::new("MY_NON_DEFAULT_IMPACT_RELATION"))
        .edge("A", "C", Edge::new("WHATEVER"))
        .build()
}

/// A small transport network.
///
/// ```text
/// loc1 -> A -> A-C1 -> A-C1-1 --> link A-B ------------+
///                   -> A-C1-2     ^                    | PROTECTION
///      -> B -> B-C1 -> B-C1-1 ---+                     v  group 1
///                   -> B-C1-2                        circ -> e2e
/// X-1-1 -> protection link A-B ----------------------^       ^
///                                  prev circ, next circ -----+
/// ```
///
/// Ids: loc1 0, A 1, B 2, A-C1 3, A-C1-1 4, A-C1-2 5, B-C1 6, B-C1-1 7,
/// B-C1-2 8, link 9, protection link 10, prev circ 11, circ 12,
/// next circ 13, e2e 14, X-1-1 15.
pub fn network() -> InMemoryGraph {
    let protection = |group: Value| {
        Edge::new("IMPACTS")
            .with_rule(PropagationRule::Protection)
            .with_group(group)
    };

    GraphBuilder::new()
        .nodes(&[
            ("loc1", "Location"),
            ("A", "NE"),
            ("B", "NE"),
            ("A-C1", "Card"),
            ("A-C1-1", "Port"),
            ("A-C1-2", "Port"),
            ("B-C1", "Card"),
            ("B-C1-1", "Port"),
            ("B-C1-2", "Port"),
            ("link A-B", "Link"),
            ("protection link A-B", "Link"),
            ("prev circ", "Circuit"),
            ("circ", "Circuit"),
            ("next circ", "Circuit"),
            ("e2e", "Circuit"),
            ("X-1-1", "Port"),
        ])
        .impacts("loc1", "A")
        .impacts("loc1", "B")
        .impacts("A", "A-C1")
        .impacts("B", "B-C1")
        .impacts("B-C1", "B-C1-1")
        .impacts("B-C1", "B-C1-2")
        .impacts("A-C1", "A-C1-1")
        .impacts("A-C1", "A-C1-2")
        .impacts("A-C1-1", "link A-B")
        .impacts("B-C1-1", "link A-B")
        .impacts("X-1-1", "protection link A-B")
        .impacts("prev circ", "e2e")
        .impacts("circ", "e2e")
        .impacts("next circ", "e2e")
        .edge("protection link A-B", "circ", protection(Value::from("1")))
        .edge("link A-B", "circ", protection(Value::from(1)))
        .build()
}

// ============================================================================
// Running Computations
// ============================================================================

/// Resolve `start`, parse the optional expressions and compute, the way a
/// caller passing raw arguments would.
pub fn impact(
    graph: &InMemoryGraph,
    start: Value,
    filter: Option<&str>,
    limits: Option<&str>,
) -> ripple::Result<Vec<ImpactResult>> {
    let seeds = ripple::resolve_start(graph, &start)?;
    let filter =
        filter.map_or_else(|| Ok(RelationshipFilter::default()), RelationshipFilter::parse)?;
    let limits = limits.map_or_else(|| Ok(Limits::default()), Limits::parse)?;
    ripple::compute(graph, &seeds, &filter, limits)
}

/// State reported for the node called `name`, if it is in the results.
pub fn state_of(graph: &InMemoryGraph, results: &[ImpactResult], name: &str) -> Option<State> {
    let node = id(graph, name);
    results.iter().find(|r| r.node == node).map(|r| r.state)
}

/// Names of every node in the results, sorted.
pub fn names(graph: &InMemoryGraph, results: &[ImpactResult]) -> Vec<String> {
    let mut names: Vec<String> = results
        .iter()
        .map(|r| {
            graph
                .node(r.node)
                .and_then(|n| n.name.clone())
                .unwrap_or_else(|| r.node.to_string())
        })
        .collect();
    names.sort();
    names
}

// ============================================================================
// Files and Binary
// ============================================================================

/// Serialize a graph to JSONL text.
pub fn to_jsonl(graph: &InMemoryGraph) -> String {
    let nodes = graph.nodes().cloned().map(GraphRecord::Node);
    let edges = graph.edges().map(|(from, to, edge)| {
        GraphRecord::Edge(EdgeRecord {
            from,
            to,
            rel_type: edge.rel_type.clone(),
            properties: edge.properties.clone(),
        })
    });
    nodes
        .chain(edges)
        .map(|record| serde_json::to_string(&record).unwrap() + "\n")
        .collect()
}

/// Write `graph` as JSONL into `dir/file_name`.
pub fn write_graph(dir: &Path, file_name: &str, graph: &InMemoryGraph) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, to_jsonl(graph)).unwrap();
    path
}

/// Run the ripple binary in `dir` with colors disabled.
pub fn run_ripple_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ripple"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute ripple binary")
}
