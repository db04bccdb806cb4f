//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute so malformed
//! arguments are rejected at parse time, before any graph is loaded.

use serde_json::Value;

use crate::domain::{Limits, RelationshipFilter};

/// Parse the start argument as JSON.
///
/// The shape is checked later, against the loaded graph.
pub fn validate_start(s: &str) -> Result<Value, String> {
    serde_json::from_str(s.trim())
        .map_err(|e| format!("start must be JSON such as 3, [1,2] or {{\"id\": 3}} ({e})"))
}

/// Parse a relationship filter expression.
///
/// Delegates to [`RelationshipFilter::parse`].
pub fn validate_filter(s: &str) -> Result<RelationshipFilter, String> {
    RelationshipFilter::parse(s).map_err(|e| e.to_string())
}

/// Parse a limits expression.
///
/// Delegates to [`Limits::parse`].
pub fn validate_limits(s: &str) -> Result<Limits, String> {
    Limits::parse(s).map_err(|e| e.to_string())
}

/// Validate a node name given with `--name`.
pub fn validate_name(s: &str) -> Result<String, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Node name cannot be empty".to_string());
    }
    Ok(s.to_string())
}
