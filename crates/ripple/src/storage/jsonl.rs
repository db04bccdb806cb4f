//! JSONL persistence for the in-memory graph store.
//!
//! Each line holds one record, tagged by `kind`:
//!
//! ```text
//! {"kind":"node","id":1,"name":"loc1","labels":["Location"]}
//! {"kind":"edge","from":1,"to":2,"type":"IMPACTS"}
//! {"kind":"edge","from":9,"to":12,"type":"IMPACTS","properties":{"impact_propagation":"PROTECTION","impact_group":1}}
//! ```
//!
//! Records may appear in any order; edges are attached after every node has
//! been read.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader, BufWriter};

use super::in_memory::InMemoryGraph;
use crate::domain::{Edge, Node, NodeId};
use crate::error::{Error, Result};

/// One line of a graph file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphRecord {
    /// A node
    Node(Node),
    /// A directed edge between two nodes
    Edge(EdgeRecord),
}

/// Serialized form of an edge, endpoints included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Source node
    pub from: NodeId,
    /// Target node
    pub to: NodeId,
    /// Relationship type
    #[serde(rename = "type")]
    pub rel_type: String,
    /// Edge properties
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
}

/// Non-fatal problems found while loading a graph file.
///
/// The offending record is skipped; everything else is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// Line is not a valid graph record
    MalformedJson {
        /// 1-based line number
        line_number: usize,
        /// Parser message
        error: String,
    },

    /// A node id was already defined on an earlier line
    DuplicateNode {
        /// The repeated id
        id: NodeId,
        /// 1-based line number of the repeat
        line_number: usize,
    },

    /// An edge refers to a node that is not in the file
    DanglingEdge {
        /// Source node
        from: NodeId,
        /// Target node
        to: NodeId,
        /// 1-based line number
        line_number: usize,
    },
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedJson { line_number, error } => {
                write!(f, "line {line_number}: malformed record skipped ({error})")
            }
            Self::DuplicateNode { id, line_number } => {
                write!(f, "line {line_number}: duplicate node {id} skipped")
            }
            Self::DanglingEdge {
                from,
                to,
                line_number,
            } => write!(
                f,
                "line {line_number}: edge {from} -> {to} skipped (unknown endpoint)"
            ),
        }
    }
}

/// Load a graph from a JSONL file.
///
/// # Errors
///
/// Only I/O failures are errors. Bad records become [`LoadWarning`]s.
pub async fn load_from_jsonl(path: &Path) -> Result<(InMemoryGraph, Vec<LoadWarning>)> {
    let file = File::open(path).await?;
    let (graph, warnings) = read_graph(file).await?;
    tracing::debug!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        warnings = warnings.len(),
        "Loaded graph"
    );
    Ok((graph, warnings))
}

/// Read a graph from any async reader producing JSONL.
///
/// # Errors
///
/// Returns an error if reading from `reader` fails.
pub async fn read_graph<R: AsyncRead + Unpin>(
    reader: R,
) -> Result<(InMemoryGraph, Vec<LoadWarning>)> {
    let mut lines = BufReader::new(reader).lines();
    let mut warnings = Vec::new();
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut line_number = 0;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<GraphRecord>(&line) {
            Ok(GraphRecord::Node(node)) => nodes.push((line_number, node)),
            Ok(GraphRecord::Edge(edge)) => edges.push((line_number, edge)),
            Err(e) => {
                tracing::warn!(line_number, error = %e, "Skipping malformed graph record");
                warnings.push(LoadWarning::MalformedJson {
                    line_number,
                    error: e.to_string(),
                });
            }
        }
    }

    let mut graph = InMemoryGraph::new();
    for (line_number, node) in nodes {
        let id = node.id;
        match graph.add_node(node) {
            Ok(()) => {}
            Err(Error::DuplicateNode(_)) => {
                tracing::warn!(line_number, %id, "Skipping duplicate node");
                warnings.push(LoadWarning::DuplicateNode { id, line_number });
            }
            Err(e) => return Err(e),
        }
    }

    for (line_number, record) in edges {
        let EdgeRecord {
            from,
            to,
            rel_type,
            properties,
        } = record;
        let edge = Edge {
            rel_type,
            properties,
        };
        match graph.add_edge(from, to, edge) {
            Ok(_) => {}
            Err(Error::UnknownEndpoint(_)) => {
                tracing::warn!(line_number, %from, %to, "Skipping edge with unknown endpoint");
                warnings.push(LoadWarning::DanglingEdge {
                    from,
                    to,
                    line_number,
                });
            }
            Err(e) => return Err(e),
        }
    }

    Ok((graph, warnings))
}

/// Save a graph to a JSONL file: all nodes first, then all edges.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub async fn save_to_jsonl(graph: &InMemoryGraph, path: &Path) -> Result<()> {
    let file = File::create(path).await?;
    let mut writer = BufWriter::new(file);

    let node_records = graph.nodes().cloned().map(GraphRecord::Node);
    let edge_records = graph.edges().map(|(from, to, edge)| {
        GraphRecord::Edge(EdgeRecord {
            from,
            to,
            rel_type: edge.rel_type.clone(),
            properties: edge.properties.clone(),
        })
    });

    for record in node_records.chain(edge_records) {
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
    }

    writer.flush().await?;
    Ok(())
}
