//! Graph store abstraction.
//!
//! The traversal only ever reads the graph, through the [`GraphStore`]
//! trait. Implementations:
//!
//! - **In-memory**: petgraph-backed [`InMemoryGraph`], loadable from and
//!   savable to JSONL files (see [`jsonl`]).
//!
//! # Consistency
//!
//! A store must give one traversal a consistent view of the graph for the
//! duration of the call. Concurrent traversals over the same store are
//! independent; nothing is written back.

use crate::domain::{Direction, Edge, EdgeId, Node, NodeId};
use crate::error::Result;

pub mod in_memory;
pub mod jsonl;

pub use in_memory::InMemoryGraph;
pub use jsonl::{GraphRecord, LoadWarning, load_from_jsonl, save_to_jsonl};

/// An edge as seen from one of its endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Relationship<'g> {
    /// Store identity of the edge
    pub id: EdgeId,
    /// The edge itself
    pub edge: &'g Edge,
    /// The endpoint that is not the node being looked at
    pub other: NodeId,
}

/// Read-only access to a directed, typed graph.
pub trait GraphStore {
    /// Whether a node with this id exists.
    fn contains(&self, id: NodeId) -> bool;

    /// Look up a node by id.
    fn node(&self, id: NodeId) -> Option<&Node>;

    /// Edges of `rel_type` touching `node` in `direction`.
    ///
    /// `Incoming` yields edges pointing at `node`, `Outgoing` edges leaving
    /// it, `Both` the union of the two. A self-loop is reported once per
    /// matching direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot serve the read. The in-memory
    /// store never fails.
    fn relationships(
        &self,
        node: NodeId,
        rel_type: &str,
        direction: Direction,
    ) -> Result<Vec<Relationship<'_>>>;
}
