//! Ripple - cascading impact analysis over directed dependency graphs.
//!
//! Given one or more failed *seed* nodes, ripple walks the graph breadth
//! first along configurable relationship types and derives an operational
//! state (`WORKING`, `AT_RISK`, `DEGRADED` or `FAILED`) for every node it
//! reaches. How a node's predecessors combine is controlled per edge by a
//! propagation rule and an optional impact group.
//!
//! # Example
//!
//! ```
//! use ripple::domain::{Edge, Limits, Node, NodeId, RelationshipFilter};
//! use ripple::rules::PropagationRule;
//! use ripple::state::State;
//! use ripple::storage::InMemoryGraph;
//!
//! // Two protected links feeding one circuit
//! let mut graph = InMemoryGraph::new();
//! for id in 1..=3 {
//!     graph.add_node(Node::new(id)).unwrap();
//! }
//! let protected = Edge::new("IMPACTS").with_rule(PropagationRule::Protection);
//! graph.add_edge(NodeId(1), NodeId(3), protected.clone()).unwrap();
//! graph.add_edge(NodeId(2), NodeId(3), protected).unwrap();
//!
//! let results = ripple::compute(
//!     &graph,
//!     &[NodeId(1)],
//!     &RelationshipFilter::default(),
//!     Limits::default(),
//! )
//! .unwrap();
//!
//! let circuit = results.iter().find(|r| r.node == NodeId(3)).unwrap();
//! assert_eq!(circuit.state, State::AtRisk);
//! ```

#![forbid(unsafe_code)]

// Core library
pub mod domain;
pub mod error;
pub mod evaluator;
pub mod grouper;
pub mod rules;
pub mod state;
pub mod storage;
pub mod table;
pub mod traversal;

// Argument mini-languages and seed resolution
pub mod filter;
pub mod limits;
pub mod start;

// Public CLI module (needed by binary)
pub mod cli;
pub mod config;
pub mod output;

pub use domain::{ImpactResult, Limits, NodeId, RelationshipFilter};
pub use error::{Error, Result};
pub use start::resolve_start;
pub use state::State;
pub use traversal::{ImpactReport, Traversal, TraversalStats, compute};
