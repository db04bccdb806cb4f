//! Operational states and their severity order.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Operational state of a node, ordered by severity.
///
/// The derived `Ord` follows declaration order, so `Working < AtRisk <
/// Degraded < Failed` and comparisons are plain severity comparisons.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum State {
    /// Not affected by any failure.
    #[default]
    Working,
    /// Still working, but one more failure away from losing service.
    AtRisk,
    /// Working with reduced capacity or quality.
    Degraded,
    /// Out of service.
    Failed,
}

impl State {
    /// All states, least severe first.
    pub const ALL: [State; 4] = [
        State::Working,
        State::AtRisk,
        State::Degraded,
        State::Failed,
    ];

    /// Numeric severity: 0 for `Working` up to 3 for `Failed`.
    #[must_use]
    pub fn severity(self) -> u8 {
        match self {
            Self::Working => 0,
            Self::AtRisk => 1,
            Self::Degraded => 2,
            Self::Failed => 3,
        }
    }

    /// Compares two states by severity.
    #[must_use]
    pub fn compare(self, other: State) -> Ordering {
        self.severity().cmp(&other.severity())
    }

    /// The most severe state in `states`, or `None` if it is empty.
    pub fn most_severe<I: IntoIterator<Item = State>>(states: I) -> Option<State> {
        states.into_iter().max()
    }

    /// The least severe state in `states`, or `None` if it is empty.
    pub fn least_severe<I: IntoIterator<Item = State>>(states: I) -> Option<State> {
        states.into_iter().min()
    }

    /// Caps this state at `ceiling`.
    #[must_use]
    pub fn capped_at(self, ceiling: State) -> State {
        self.min(ceiling)
    }

    /// The canonical upper-case name, as reported in results.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Working => "WORKING",
            Self::AtRisk => "AT_RISK",
            Self::Degraded => "DEGRADED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
