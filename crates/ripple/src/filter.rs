//! Parser for the relationship-filter mini-language.
//!
//! A filter is a `|`-separated list of relationship types. Each token may
//! carry a direction marker:
//!
//! | Token      | Direction  |
//! |------------|------------|
//! | `TYPE`     | outgoing   |
//! | `TYPE>`    | outgoing   |
//! | `<TYPE`    | incoming   |
//! | `<TYPE>`   | both       |

use std::str::FromStr;

use crate::domain::{Direction, RelationshipFilter, RelationshipSpec};
use crate::error::{Error, Result};

impl RelationshipFilter {
    /// Parse a filter expression such as `IMPACTS>|<FEEDS`.
    ///
    /// Blank input yields the default filter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFilter`] if a token has no type name or a
    /// direction marker in the wrong place.
    pub fn parse(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        let specs = input
            .split('|')
            .map(parse_spec)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(specs))
    }
}

impl FromStr for RelationshipFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn parse_spec(raw: &str) -> Result<RelationshipSpec> {
    let token = raw.trim();
    let (incoming, rest) = match token.strip_prefix('<') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let (outgoing, name) = match rest.strip_suffix('>') {
        Some(name) => (true, name),
        None => (false, rest),
    };

    let invalid = |reason: &str| Error::InvalidFilter {
        token: raw.to_string(),
        reason: reason.to_string(),
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid("missing relationship type"));
    }
    if name.contains(['<', '>']) {
        return Err(invalid("direction markers belong at the start or end"));
    }

    let direction = match (incoming, outgoing) {
        (true, true) => Direction::Both,
        (true, false) => Direction::Incoming,
        (false, _) => Direction::Outgoing,
    };
    Ok(RelationshipSpec::new(name, direction))
}
