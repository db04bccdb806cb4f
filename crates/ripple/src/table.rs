//! The per-call node state table.
//!
//! The table is both the accumulating result of a traversal and the memo the
//! evaluator reads predecessor states from. It is owned by exactly one call.

use std::collections::HashMap;

use crate::domain::{ImpactResult, NodeId};
use crate::state::State;

/// Mapping from visited node to its current derived state.
#[derive(Debug, Clone, Default)]
pub struct NodeStateTable {
    states: HashMap<NodeId, State>,
}

impl NodeStateTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with every seed recorded as `Failed`.
    pub fn seeded<'a, I: IntoIterator<Item = &'a NodeId>>(seeds: I) -> Self {
        let states = seeds.into_iter().map(|&id| (id, State::Failed)).collect();
        Self { states }
    }

    /// The recorded state, if the node has been visited.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<State> {
        self.states.get(&node).copied()
    }

    /// The recorded state, or `Working` for nodes not visited yet.
    #[must_use]
    pub fn state_of(&self, node: NodeId) -> State {
        self.get(node).unwrap_or_default()
    }

    /// Whether the node is recorded as `Failed` and therefore frozen.
    #[must_use]
    pub fn is_frozen(&self, node: NodeId) -> bool {
        self.get(node) == Some(State::Failed)
    }

    /// Record a state, replacing any earlier entry. Returns the previous one.
    pub fn record(&mut self, node: NodeId, state: State) -> Option<State> {
        self.states.insert(node, state)
    }

    /// Number of recorded nodes, checked against the result cap.
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.states.len()
    }

    /// Consume the table into an unordered list of results.
    #[must_use]
    pub fn into_results(self) -> Vec<ImpactResult> {
        self.states
            .into_iter()
            .map(|(node, state)| ImpactResult { node, state })
            .collect()
    }
}
