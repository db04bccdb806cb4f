//! Parser for the limits mini-language.
//!
//! Limits are written as comma-separated tokens: `10s` for a timeout in
//! seconds, `5hops` for a maximum path depth and `1000results` for a result
//! cap. A parsed expression only enables the limits it mentions.

use std::str::FromStr;
use std::time::Duration;

use crate::domain::Limits;
use crate::error::{Error, Result};

impl Limits {
    /// Parse a limits expression such as `3hops, 1000results, 50s`.
    ///
    /// Limits the expression does not mention are disabled, and a value of
    /// zero disables its limit. A later token for the same limit wins.
    /// Trailing commas are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLimit`] for the first token that is not one
    /// of the three forms, or whose number does not fit.
    pub fn parse(input: &str) -> Result<Self> {
        let tokens: Vec<&str> = input.trim().split(',').collect();
        // Trailing empty tokens (`3hops,`) are dropped; a lone empty one is not
        let kept = tokens.iter().rposition(|t| !t.is_empty()).map_or(1, |i| i + 1);

        let mut limits = Self::unlimited();
        for &raw in &tokens[..kept] {
            let token = raw.trim();
            let invalid = || Error::InvalidLimit(raw.to_string());

            if let Some(count) = token.strip_suffix("results") {
                limits = limits.with_max_results(parse_count(count).ok_or_else(invalid)?);
            } else if let Some(count) = token.strip_suffix("hops") {
                limits = limits.with_max_hops(parse_count(count).ok_or_else(invalid)?);
            } else if let Some(secs) = token.strip_suffix('s') {
                let secs = parse_count(secs).ok_or_else(invalid)?;
                limits = limits.with_timeout(Duration::from_secs(secs));
            } else {
                return Err(invalid());
            }
        }
        Ok(limits)
    }
}

impl FromStr for Limits {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Parse a non-empty run of ASCII digits.
fn parse_count<T: FromStr>(digits: &str) -> Option<T> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
