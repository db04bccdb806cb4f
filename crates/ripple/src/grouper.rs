//! Classifies the edges that impact a node into aggregation groups.
//!
//! For each configured `(type, direction)` spec the grouper inspects edges of
//! that type in the *reverse* direction: a spec that follows `IMPACTS`
//! outgoing from the impacting side means "incoming `IMPACTS` edges" from the
//! impacted node's point of view. `Both` inspects either way.

use std::collections::{BTreeMap, HashSet};

use crate::domain::{ImpactGroup, NodeId, RelationshipSpec};
use crate::error::Result;
use crate::rules::PropagationRule;
use crate::state::State;
use crate::storage::GraphStore;
use crate::table::NodeStateTable;

/// Key shared by edges that aggregate together at one node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    /// Propagation rule of the edges in the group
    pub rule: PropagationRule,
    /// Group id of the edges in the group
    pub group: ImpactGroup,
}

/// Predecessor states of one node, grouped by [`GroupKey`].
pub type EdgeGroups = BTreeMap<GroupKey, Vec<State>>;

/// Collect the states of everything that impacts `node`, grouped by key.
///
/// Each edge contributes the current table state of its other endpoint
/// (`Working` if not visited yet). An edge matched by several specs counts
/// once.
///
/// # Errors
///
/// Propagates graph store read failures.
pub fn group_incoming<G: GraphStore + ?Sized>(
    store: &G,
    node: NodeId,
    specs: &[RelationshipSpec],
    table: &NodeStateTable,
) -> Result<EdgeGroups> {
    let mut groups = EdgeGroups::new();
    let mut seen = HashSet::new();

    for spec in specs {
        for rel in store.relationships(node, &spec.rel_type, spec.direction.reverse())? {
            if !seen.insert(rel.id) {
                continue;
            }
            let key = GroupKey {
                rule: rel.edge.propagation_rule(),
                group: rel.edge.impact_group(),
            };
            groups
                .entry(key)
                .or_default()
                .push(table.state_of(rel.other));
        }
    }

    Ok(groups)
}

/// Aggregate every group and combine them into the worst state.
///
/// No groups at all means nothing impacts the node: `Working`.
#[must_use]
pub fn combine(groups: &EdgeGroups) -> State {
    groups
        .iter()
        .map(|(key, states)| {
            let state = key.rule.aggregate(states);
            tracing::trace!(
                rule = %key.rule,
                group = %key.group,
                members = states.len(),
                %state,
                "Aggregated impact group"
            );
            state
        })
        .max()
        .unwrap_or_default()
}
