//! Propagation rules: how a group of predecessor states combines into one.
//!
//! Every rule is a pure, order-independent aggregate over the member states
//! of one group. Which rule applies is decided per edge (see
//! [`Edge::propagation_rule`](crate::domain::Edge::propagation_rule)).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::state::State;

/// Aggregation policy applied to a group of predecessor states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropagationRule {
    /// The worst member state wins.
    #[default]
    MostSevere,
    /// The best member state wins.
    LeastSevere,
    /// Like `MostSevere`, capped at `Degraded`.
    Degradation,
    /// Like `MostSevere`, capped at `AtRisk`.
    RiskPropagation,
    /// Redundant paths: a single remaining working member means `AtRisk`,
    /// otherwise the best member state wins.
    Protection,
}

impl PropagationRule {
    /// All rules, in their canonical order.
    pub const ALL: [PropagationRule; 5] = [
        PropagationRule::MostSevere,
        PropagationRule::LeastSevere,
        PropagationRule::Degradation,
        PropagationRule::RiskPropagation,
        PropagationRule::Protection,
    ];

    /// Parses a rule name, falling back to `MostSevere` for anything unknown.
    #[must_use]
    pub fn from_name_or_default(name: Option<&str>) -> Self {
        name.and_then(|n| n.parse().ok()).unwrap_or_default()
    }

    /// The canonical upper-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MostSevere => "MOST_SEVERE",
            Self::LeastSevere => "LEAST_SEVERE",
            Self::Degradation => "DEGRADATION",
            Self::RiskPropagation => "RISK_PROPAGATION",
            Self::Protection => "PROTECTION",
        }
    }

    /// Aggregates the states of one group.
    ///
    /// Groups are only created for at least one edge, so `states` is never
    /// empty in practice; an empty group yields `Working`.
    #[must_use]
    pub fn aggregate(self, states: &[State]) -> State {
        let Some(worst) = State::most_severe(states.iter().copied()) else {
            return State::Working;
        };
        let best = State::least_severe(states.iter().copied()).unwrap_or(worst);

        match self {
            Self::MostSevere => worst,
            Self::LeastSevere => best,
            Self::Degradation => worst.capped_at(State::Degraded),
            Self::RiskPropagation => worst.capped_at(State::AtRisk),
            Self::Protection => {
                let working = states.iter().filter(|s| **s == State::Working).count();
                if working == 1 { State::AtRisk } else { best }
            }
        }
    }
}

impl FromStr for PropagationRule {
    type Err = String;

    /// Exact, case-sensitive match on the canonical names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|rule| rule.as_str() == s)
            .ok_or_else(|| format!("unknown propagation rule: '{s}'"))
    }
}

impl fmt::Display for PropagationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
