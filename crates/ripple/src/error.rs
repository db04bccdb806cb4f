//! Error types for ripple operations.
//!
//! Errors fall into two groups:
//!
//! - **Configuration errors**: malformed limits or relationship filters and
//!   unusable start arguments. They are raised before the traversal begins
//!   and abort the call with no partial result.
//! - **Infrastructure errors**: I/O and JSON failures, and graph-store
//!   integrity violations (duplicate nodes, unknown edge endpoints).
//!
//! Reaching a resource limit (timeout, result cap, hop depth) is not an
//! error. The traversal truncates and returns what it has accumulated.

use std::io;
use thiserror::Error;

use crate::domain::NodeId;

/// Message prefix shared by every malformed-limit error.
pub const INVALID_LIMIT_PREFIX: &str = "parameter 'limit' expects one (or several, with a comma separating them) of the following formats";

/// Result type for ripple operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for ripple operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A limits token did not match `<int>s`, `<int>hops` or `<int>results`.
    #[error(
        "parameter 'limit' expects one (or several, with a comma separating them) of the following formats : limit in seconds (ex : '10s'), hop limit (ex: '5hops'), or result limit (ex: '1000results'). Found '{0}'"
    )]
    InvalidLimit(String),

    /// A relationship filter token could not be parsed.
    #[error("invalid relationship filter token '{token}': {reason}")]
    InvalidFilter {
        /// The offending token, as written.
        token: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The start argument has a shape that cannot be turned into seed nodes.
    #[error(
        "Unsupported data type for start parameter a Node or an Identifier (long) of a Node must be given!"
    )]
    UnsupportedStart,

    /// A start identifier does not resolve to a node in the graph.
    #[error("Unable to load NODE with id {0}")]
    NodeNotFound(i64),

    /// A node with this id already exists in the graph.
    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),

    /// An edge refers to a node that is not in the graph.
    #[error("edge endpoint not found: {0}")]
    UnknownEndpoint(NodeId),

    /// Invalid configuration file or arguments.
    #[error("configuration error: {0}")]
    Config(String),

    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` for errors caused by the caller's arguments.
    ///
    /// These are never recovered internally; they propagate to the caller
    /// unmodified.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidLimit(_)
                | Self::InvalidFilter { .. }
                | Self::UnsupportedStart
                | Self::NodeNotFound(_)
                | Self::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_limit_message_keeps_compatible_prefix() {
        let error = Error::InvalidLimit("BS".to_string());

        let display = error.to_string();
        assert!(display.starts_with(INVALID_LIMIT_PREFIX));
        assert!(display.contains("parameter 'limit' expects"));
        assert!(display.ends_with("Found 'BS'"));
    }

    #[test]
    fn start_errors_keep_compatible_messages() {
        assert!(
            Error::UnsupportedStart
                .to_string()
                .contains("Unsupported data type for start parameter")
        );
        assert_eq!(
            Error::NodeNotFound(99_999_999).to_string(),
            "Unable to load NODE with id 99999999"
        );
    }

    #[test]
    fn configuration_errors_are_classified() {
        assert!(Error::InvalidLimit("x".into()).is_configuration_error());
        assert!(Error::UnsupportedStart.is_configuration_error());
        assert!(Error::NodeNotFound(1).is_configuration_error());
        assert!(
            Error::InvalidFilter {
                token: "<".into(),
                reason: "empty".into()
            }
            .is_configuration_error()
        );

        assert!(!Error::Io(io::Error::other("disk gone")).is_configuration_error());
        assert!(!Error::DuplicateNode(NodeId(1)).is_configuration_error());
    }
}
