//! Breadth-first impact traversal.
//!
//! The driver explores *paths*, not nodes: a node reachable along several
//! paths is evaluated once per arriving path, in breadth-first order. A path
//! never revisits a node it already contains, which is what terminates the
//! walk on cycles. Nodes recorded `Failed` are frozen and never expanded
//! again.
//!
//! # Approximation
//!
//! This is a single breadth-first pass, not a fixed-point solver. On acyclic
//! graphs every path shorter than a node's own depth has updated that node's
//! predecessors before the node is re-evaluated, so the last evaluation
//! wins with a settled state. On cyclic graphs, or when paths reconverge at
//! very different depths, a non-`Failed` state may be computed before a
//! later-discovered predecessor degrades and is not revisited once the
//! traversal has moved past it.

use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};

use crate::domain::{ImpactResult, Limits, NodeId, RelationshipFilter};
use crate::error::Result;
use crate::evaluator::FrontierEvaluator;
use crate::storage::GraphStore;
use crate::table::NodeStateTable;

/// Counters describing one traversal run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Path arrivals handed to the evaluator
    pub paths_evaluated: usize,
    /// Arrivals the evaluator excluded and pruned
    pub paths_pruned: usize,
    /// Deepest hop depth evaluated
    pub max_depth_reached: usize,
    /// Wall-clock time spent
    pub elapsed: Duration,
}

/// Result of a traversal: the impacted nodes plus run statistics.
#[derive(Debug, Clone)]
pub struct ImpactReport {
    /// Every visited node with its final state, unordered
    pub results: Vec<ImpactResult>,
    /// Run statistics
    pub stats: TraversalStats,
}

/// Compute the impact of `seeds` failing.
///
/// Every seed is in the result as `Failed`. Reaching a limit truncates the
/// result silently.
///
/// # Errors
///
/// Propagates graph store read failures.
pub fn compute<G: GraphStore + ?Sized>(
    store: &G,
    seeds: &[NodeId],
    filter: &RelationshipFilter,
    limits: Limits,
) -> Result<Vec<ImpactResult>> {
    let report = Traversal::new(store, seeds.iter().copied())
        .with_filter(filter.clone())
        .with_limits(limits)
        .run()?;
    Ok(report.results)
}

/// Configurable breadth-first impact traversal over a [`GraphStore`].
///
/// # Example
///
/// ```
/// use ripple::domain::{Edge, Node, NodeId};
/// use ripple::state::State;
/// use ripple::storage::InMemoryGraph;
/// use ripple::traversal::Traversal;
///
/// let mut graph = InMemoryGraph::new();
/// graph.add_node(Node::new(1)).unwrap();
/// graph.add_node(Node::new(2)).unwrap();
/// graph.add_edge(NodeId(1), NodeId(2), Edge::new("IMPACTS")).unwrap();
///
/// let report = Traversal::new(&graph, [NodeId(1)]).run().unwrap();
/// assert_eq!(report.results.len(), 2);
/// assert!(report.results.iter().all(|r| r.state == State::Failed));
/// ```
pub struct Traversal<'a, G: GraphStore + ?Sized> {
    store: &'a G,
    seeds: Vec<NodeId>,
    filter: RelationshipFilter,
    limits: Limits,
    started_at: Option<Instant>,
}

impl<'a, G: GraphStore + ?Sized> Traversal<'a, G> {
    /// Traverse from `seeds` with the default filter and limits.
    ///
    /// Repeated seeds are ignored.
    pub fn new<I: IntoIterator<Item = NodeId>>(store: &'a G, seeds: I) -> Self {
        let mut seen = HashSet::new();
        let seeds = seeds.into_iter().filter(|id| seen.insert(*id)).collect();
        Self {
            store,
            seeds,
            filter: RelationshipFilter::default(),
            limits: Limits::default(),
            started_at: None,
        }
    }

    /// Follow these relationships instead of the default.
    #[must_use]
    pub fn with_filter(mut self, filter: RelationshipFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Apply these limits instead of the default.
    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Measure the timeout from `instant` instead of from the call to `run`.
    #[must_use]
    pub fn started_at(mut self, instant: Instant) -> Self {
        self.started_at = Some(instant);
        self
    }

    /// Run the traversal.
    ///
    /// # Errors
    ///
    /// Propagates graph store read failures.
    pub fn run(self) -> Result<ImpactReport> {
        let started_at = self.started_at.unwrap_or_else(Instant::now);
        tracing::debug!(
            seeds = ?self.seeds,
            filter = %self.filter,
            limits = %self.limits,
            "Impact traversal started"
        );

        let seed_set: HashSet<NodeId> = self.seeds.iter().copied().collect();
        let mut table = NodeStateTable::seeded(&self.seeds);
        let evaluator = FrontierEvaluator::new(
            self.store,
            &seed_set,
            self.filter.specs(),
            self.limits,
            started_at,
        );

        let mut paths = PathArena::default();
        let mut frontier: VecDeque<usize> = self.seeds.iter().map(|&s| paths.root(s)).collect();
        let mut stats = TraversalStats::default();

        while let Some(tip) = frontier.pop_front() {
            let PathStep { node, depth, .. } = paths.steps[tip];
            stats.paths_evaluated += 1;
            stats.max_depth_reached = stats.max_depth_reached.max(depth);

            if !evaluator.evaluate(node, &mut table)?.continues() {
                stats.paths_pruned += 1;
                continue;
            }
            if self.limits.max_hops.is_some_and(|max| depth >= max) {
                continue;
            }

            for next in self.next_hops(node)? {
                if paths.contains(tip, next) {
                    continue;
                }
                frontier.push_back(paths.extend(tip, next));
            }
        }

        stats.elapsed = started_at.elapsed();
        tracing::debug!(
            results = table.len(),
            paths_evaluated = stats.paths_evaluated,
            paths_pruned = stats.paths_pruned,
            elapsed_ms = stats.elapsed.as_millis(),
            "Impact traversal completed"
        );

        Ok(ImpactReport {
            results: table.into_results(),
            stats,
        })
    }

    /// Neighbours reachable from `node` along the filter's forward specs.
    ///
    /// An edge matched by several specs is followed once.
    fn next_hops(&self, node: NodeId) -> Result<Vec<NodeId>> {
        let mut seen = HashSet::new();
        let mut hops = Vec::new();
        for spec in self.filter.specs() {
            for rel in self
                .store
                .relationships(node, &spec.rel_type, spec.direction)?
            {
                if seen.insert(rel.id) {
                    hops.push(rel.other);
                }
            }
        }
        Ok(hops)
    }
}

/// One step of a path: the node reached, its predecessor step and depth.
#[derive(Debug, Clone, Copy)]
struct PathStep {
    node: NodeId,
    parent: Option<usize>,
    depth: usize,
}

/// Arena of path steps; a path is identified by the index of its last step.
#[derive(Debug, Default)]
struct PathArena {
    steps: Vec<PathStep>,
}

impl PathArena {
    fn root(&mut self, node: NodeId) -> usize {
        self.push(PathStep {
            node,
            parent: None,
            depth: 0,
        })
    }

    fn extend(&mut self, tip: usize, node: NodeId) -> usize {
        let depth = self.steps[tip].depth + 1;
        self.push(PathStep {
            node,
            parent: Some(tip),
            depth,
        })
    }

    fn push(&mut self, step: PathStep) -> usize {
        self.steps.push(step);
        self.steps.len() - 1
    }

    /// Whether the path ending at `tip` already passes through `node`.
    fn contains(&self, tip: usize, node: NodeId) -> bool {
        let mut cursor = Some(tip);
        while let Some(index) = cursor {
            let step = self.steps[index];
            if step.node == node {
                return true;
            }
            cursor = step.parent;
        }
        false
    }
}
