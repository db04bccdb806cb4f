//! Resolution of the caller-supplied start argument into seed nodes.
//!
//! The start argument is loosely typed JSON. Accepted shapes:
//!
//! - `null`: no seeds
//! - `42`: a node id
//! - `{"id": 42, ...}`: a node reference
//! - a list of either, where the first element decides the shape

use std::collections::HashSet;

use serde_json::Value;

use crate::domain::NodeId;
use crate::error::{Error, Result};
use crate::storage::GraphStore;

/// Resolve `start` into de-duplicated seed ids, in order of first mention.
///
/// # Errors
///
/// - [`Error::NodeNotFound`] if an id is not in `store`
/// - [`Error::UnsupportedStart`] for any other shape
pub fn resolve_start<G: GraphStore + ?Sized>(store: &G, start: &Value) -> Result<Vec<NodeId>> {
    let ids = match start {
        Value::Null => Vec::new(),
        Value::Number(_) => vec![id_of(start)?],
        Value::Object(_) => vec![reference_of(start)?],
        Value::Array(items) => match items.first() {
            None => Vec::new(),
            Some(Value::Number(_)) => items.iter().map(id_of).collect::<Result<_>>()?,
            Some(Value::Object(_)) => items.iter().map(reference_of).collect::<Result<_>>()?,
            Some(_) => return Err(Error::UnsupportedStart),
        },
        Value::String(_) | Value::Bool(_) => return Err(Error::UnsupportedStart),
    };

    let mut seen = HashSet::new();
    let mut seeds = Vec::with_capacity(ids.len());
    for id in ids {
        if !store.contains(id) {
            return Err(Error::NodeNotFound(id.as_i64()));
        }
        if seen.insert(id) {
            seeds.push(id);
        }
    }

    tracing::debug!(seeds = ?seeds, "Resolved start nodes");
    Ok(seeds)
}

/// An integral node id.
fn id_of(value: &Value) -> Result<NodeId> {
    value
        .as_i64()
        .map(NodeId)
        .ok_or(Error::UnsupportedStart)
}

/// A node reference: an object carrying an integral `id`.
fn reference_of(value: &Value) -> Result<NodeId> {
    value
        .as_object()
        .and_then(|object| object.get("id"))
        .ok_or(Error::UnsupportedStart)
        .and_then(id_of)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Node;
    use crate::storage::InMemoryGraph;
    use rstest::rstest;
    use serde_json::json;

    fn graph() -> InMemoryGraph {
        let mut graph = InMemoryGraph::new();
        for id in [1, 2, 3] {
            graph.add_node(Node::new(id)).unwrap();
        }
        graph
    }

    // ========== Accepted shapes ==========

    #[rstest]
    #[case::null(json!(null), vec![])]
    #[case::id(json!(2), vec![2])]
    #[case::reference(json!({"id": 3, "name": "c"}), vec![3])]
    #[case::empty_list(json!([]), vec![])]
    #[case::id_list(json!([3, 1]), vec![3, 1])]
    #[case::reference_list(json!([{"id": 1}, {"id": 2}]), vec![1, 2])]
    #[case::duplicates(json!([2, 1, 2, 1]), vec![2, 1])]
    fn resolves(#[case] start: Value, #[case] expected: Vec<i64>) {
        let seeds = resolve_start(&graph(), &start).unwrap();
        assert_eq!(seeds, expected.into_iter().map(NodeId).collect::<Vec<_>>());
    }

    // ========== Rejected shapes ==========

    #[rstest]
    #[case::string(json!("1"))]
    #[case::float(json!(1.5))]
    #[case::boolean(json!(true))]
    #[case::string_list(json!(["1"]))]
    #[case::nested_list(json!([[1]]))]
    #[case::mixed_list(json!([1, {"id": 2}]))]
    #[case::reference_without_id(json!({"name": "a"}))]
    #[case::reference_with_text_id(json!({"id": "1"}))]
    fn unsupported_shapes(#[case] start: Value) {
        let err = resolve_start(&graph(), &start).unwrap_err();
        assert!(matches!(err, Error::UnsupportedStart), "{err}");
    }

    #[rstest]
    #[case::id(json!(99_999_999))]
    #[case::in_list(json!([1, 99_999_999]))]
    #[case::reference(json!({"id": 99_999_999}))]
    fn unknown_ids(#[case] start: Value) {
        let err = resolve_start(&graph(), &start).unwrap_err();
        assert_eq!(err.to_string(), "Unable to load NODE with id 99999999");
    }
}
