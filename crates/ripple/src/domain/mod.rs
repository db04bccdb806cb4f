//! Domain types for impact analysis.
//!
//! This module contains the graph-facing types (nodes, edges, relationship
//! specs) and the per-call configuration (filter, limits) consumed by the
//! traversal.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;

use crate::rules::PropagationRule;
use crate::state::State;

/// Edge property holding the propagation rule name.
pub const PROPAGATION_RULE_PROPERTY: &str = "impact_propagation";

/// Alternate spelling accepted for [`PROPAGATION_RULE_PROPERTY`].
pub const PROPAGATION_RULE_ALIAS: &str = "propagation_rule";

/// Edge property holding the impact group id.
pub const IMPACT_GROUP_PROPERTY: &str = "impact_group";

/// Relationship type followed when no filter is given.
pub const DEFAULT_RELATIONSHIP_TYPE: &str = "IMPACTS";

/// Default maximum hop depth.
pub const DEFAULT_MAX_HOPS: usize = 10;

/// Default timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default maximum number of results.
pub const DEFAULT_MAX_RESULTS: usize = 1000;

/// Identity of a node in the graph store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl NodeId {
    /// Extract the raw i64 value.
    #[must_use]
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Identity of an edge in the graph store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub usize);

/// A node in the impact graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier
    pub id: NodeId,

    /// Human-readable name (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Labels (e.g. "Port", "Circuit")
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,

    /// Free-form properties
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
}

impl Node {
    /// Create a bare node with the given id.
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            labels: Vec::new(),
            properties: Map::new(),
        }
    }

    /// Set the node name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }
}

/// A typed, directed relationship between two nodes.
///
/// Endpoints are owned by the graph store; the edge itself only carries its
/// type and properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Relationship type tag (e.g. "IMPACTS")
    pub rel_type: String,

    /// Free-form properties, including the propagation rule and group
    pub properties: Map<String, Value>,
}

impl Edge {
    /// Create an edge of the given type with no properties.
    pub fn new(rel_type: impl Into<String>) -> Self {
        Self {
            rel_type: rel_type.into(),
            properties: Map::new(),
        }
    }

    /// Set the propagation rule property.
    #[must_use]
    pub fn with_rule(mut self, rule: PropagationRule) -> Self {
        self.properties.insert(
            PROPAGATION_RULE_PROPERTY.to_string(),
            Value::String(rule.as_str().to_string()),
        );
        self
    }

    /// Set the impact group property.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<Value>) -> Self {
        self.properties
            .insert(IMPACT_GROUP_PROPERTY.to_string(), group.into());
        self
    }

    /// The propagation rule for this edge.
    ///
    /// Absent, non-string and unrecognized values all yield `MostSevere`.
    #[must_use]
    pub fn propagation_rule(&self) -> PropagationRule {
        let name = self
            .properties
            .get(PROPAGATION_RULE_PROPERTY)
            .or_else(|| self.properties.get(PROPAGATION_RULE_ALIAS))
            .and_then(Value::as_str);
        PropagationRule::from_name_or_default(name)
    }

    /// The impact group this edge belongs to.
    #[must_use]
    pub fn impact_group(&self) -> ImpactGroup {
        ImpactGroup::from_property(self.properties.get(IMPACT_GROUP_PROPERTY))
    }
}

/// Group id read from an edge's `impact_group` property.
///
/// Values are compared by their textual form, so the string `"1"` and the
/// number `1` name the same group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ImpactGroup {
    /// No group set: all such edges with the same rule aggregate together.
    #[default]
    Default,
    /// An explicit group id.
    Named(String),
}

impl ImpactGroup {
    fn from_property(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Default,
            Some(Value::String(s)) if s.is_empty() => Self::Default,
            Some(Value::String(s)) => Self::Named(s.clone()),
            Some(other) => Self::Named(other.to_string()),
        }
    }
}

impl fmt::Display for ImpactGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("<default>"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Direction of a relationship relative to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Edges pointing at the node
    Incoming,
    /// Edges leaving the node
    Outgoing,
    /// Either way
    Both,
}

impl Direction {
    /// The opposite direction; `Both` stays `Both`.
    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            Self::Incoming => Self::Outgoing,
            Self::Outgoing => Self::Incoming,
            Self::Both => Self::Both,
        }
    }
}

/// One relationship type to follow, and which way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipSpec {
    /// Relationship type tag
    pub rel_type: String,
    /// Direction, from the impacting node's point of view
    pub direction: Direction,
}

impl RelationshipSpec {
    /// Create a new spec.
    pub fn new(rel_type: impl Into<String>, direction: Direction) -> Self {
        Self {
            rel_type: rel_type.into(),
            direction,
        }
    }
}

impl fmt::Display for RelationshipSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Incoming => write!(f, "<{}", self.rel_type),
            Direction::Outgoing => write!(f, "{}>", self.rel_type),
            Direction::Both => write!(f, "<{}>", self.rel_type),
        }
    }
}

/// Ordered set of relationship specs with union semantics.
///
/// Parsing from the `<TYPE|TYPE>` mini-language lives in [`crate::filter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipFilter {
    specs: Vec<RelationshipSpec>,
}

impl RelationshipFilter {
    /// Build a filter from explicit specs.
    ///
    /// An empty list falls back to the default filter.
    #[must_use]
    pub fn new(specs: Vec<RelationshipSpec>) -> Self {
        if specs.is_empty() {
            return Self::default();
        }
        Self { specs }
    }

    /// The specs, in declaration order.
    #[must_use]
    pub fn specs(&self) -> &[RelationshipSpec] {
        &self.specs
    }
}

impl Default for RelationshipFilter {
    fn default() -> Self {
        Self {
            specs: vec![RelationshipSpec::new(
                DEFAULT_RELATIONSHIP_TYPE,
                Direction::Outgoing,
            )],
        }
    }
}

impl fmt::Display for RelationshipFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, spec) in self.specs.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{spec}")?;
        }
        Ok(())
    }
}

/// Resource limits for one traversal. `None` disables a limit.
///
/// Parsing from the `10hops,60s,1000results` mini-language lives in
/// [`crate::limits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum hop depth from any seed
    pub max_hops: Option<usize>,
    /// Wall-clock budget, polled at each node visit
    pub timeout: Option<Duration>,
    /// Maximum number of entries in the result
    pub max_results: Option<usize>,
}

impl Limits {
    /// No limits at all.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_hops: None,
            timeout: None,
            max_results: None,
        }
    }

    /// Set the hop limit; 0 disables it.
    #[must_use]
    pub fn with_max_hops(mut self, hops: usize) -> Self {
        self.max_hops = (hops > 0).then_some(hops);
        self
    }

    /// Set the timeout; a zero duration disables it.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// Set the result cap; 0 disables it.
    #[must_use]
    pub fn with_max_results(mut self, results: usize) -> Self {
        self.max_results = (results > 0).then_some(results);
        self
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_hops: Some(DEFAULT_MAX_HOPS),
            timeout: Some(DEFAULT_TIMEOUT),
            max_results: Some(DEFAULT_MAX_RESULTS),
        }
    }
}

impl fmt::Display for Limits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(hops) = self.max_hops {
            parts.push(format!("{hops}hops"));
        }
        if let Some(timeout) = self.timeout {
            parts.push(format!("{}s", timeout.as_secs()));
        }
        if let Some(results) = self.max_results {
            parts.push(format!("{results}results"));
        }
        if parts.is_empty() {
            f.write_str("unlimited")
        } else {
            f.write_str(&parts.join(","))
        }
    }
}

/// One entry of the computed impact: a node and its derived state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImpactResult {
    /// The impacted node
    pub node: NodeId,
    /// Its derived state
    pub state: State,
}
