//! Per-visit decision logic for the breadth-first traversal.
//!
//! Every time a path arrives at a node the evaluator decides whether the node
//! belongs in the result and whether the traversal may continue past it.
//! Checks run in a fixed order:
//!
//! 1. timeout reached: exclude and prune
//! 2. result cap reached: exclude and prune
//! 3. seed node: (re)confirm `Failed`, include and continue
//! 4. already `Failed`: frozen, exclude and prune
//! 5. otherwise recompute the state from the node's impact groups, record
//!    it, include and continue

use std::collections::HashSet;
use std::time::Instant;

use crate::domain::{Limits, NodeId, RelationshipSpec};
use crate::error::Result;
use crate::grouper::{combine, group_incoming};
use crate::state::State;
use crate::storage::GraphStore;
use crate::table::NodeStateTable;

/// Outcome of evaluating one path arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// Keep the node and expand the path further.
    IncludeAndContinue,
    /// Drop this arrival and do not expand the path.
    ExcludeAndPrune,
}

impl Evaluation {
    /// Whether the traversal may expand past this node.
    #[must_use]
    pub fn continues(self) -> bool {
        matches!(self, Self::IncludeAndContinue)
    }
}

/// Evaluates path arrivals for one traversal call.
pub struct FrontierEvaluator<'a, G: GraphStore + ?Sized> {
    store: &'a G,
    seeds: &'a HashSet<NodeId>,
    specs: &'a [RelationshipSpec],
    limits: Limits,
    started_at: Instant,
}

impl<'a, G: GraphStore + ?Sized> FrontierEvaluator<'a, G> {
    /// Create an evaluator whose timeout is measured from `started_at`.
    pub fn new(
        store: &'a G,
        seeds: &'a HashSet<NodeId>,
        specs: &'a [RelationshipSpec],
        limits: Limits,
        started_at: Instant,
    ) -> Self {
        Self {
            store,
            seeds,
            specs,
            limits,
            started_at,
        }
    }

    /// Evaluate an arrival at `node`, updating `table` as needed.
    ///
    /// # Errors
    ///
    /// Propagates graph store read failures.
    pub fn evaluate(&self, node: NodeId, table: &mut NodeStateTable) -> Result<Evaluation> {
        if self.timed_out() {
            tracing::trace!(%node, "Timeout reached, pruning");
            return Ok(Evaluation::ExcludeAndPrune);
        }
        if self
            .limits
            .max_results
            .is_some_and(|cap| table.len() >= cap)
        {
            tracing::trace!(%node, "Result cap reached, pruning");
            return Ok(Evaluation::ExcludeAndPrune);
        }

        if self.seeds.contains(&node) {
            table.record(node, State::Failed);
            return Ok(Evaluation::IncludeAndContinue);
        }

        if table.is_frozen(node) {
            tracing::trace!(%node, "Already failed, pruning");
            return Ok(Evaluation::ExcludeAndPrune);
        }

        let groups = group_incoming(self.store, node, self.specs, table)?;
        let state = combine(&groups);
        let previous = table.record(node, state);
        tracing::trace!(
            %node,
            groups = groups.len(),
            %state,
            previous = ?previous,
            "Evaluated node"
        );

        Ok(Evaluation::IncludeAndContinue)
    }

    fn timed_out(&self) -> bool {
        self.limits
            .timeout
            .is_some_and(|budget| self.started_at.elapsed() >= budget)
    }
}
