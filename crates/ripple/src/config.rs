//! Configuration file handling.
//!
//! Ripple reads optional defaults from a `ripple.yaml` file:
//!
//! ```yaml
//! relationship-filter: IMPACTS>
//! limits: 10hops,60s,1000results
//! graph: graph.jsonl
//! ```
//!
//! Command-line flags override the file; the file overrides built-in
//! defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::{Limits, RelationshipFilter};
use crate::error::{Error, Result};

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "ripple.yaml";

/// Graph file written into a freshly initialized configuration
pub const DEFAULT_GRAPH_FILE: &str = "graph.jsonl";

/// Maximum directory depth to traverse when searching for a config file
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Contents of `ripple.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RippleConfig {
    /// Relationship filter expression, e.g. `IMPACTS>|<FEEDS`
    #[serde(
        rename = "relationship-filter",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub relationship_filter: Option<String>,

    /// Limits expression, e.g. `5hops,30s`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<String>,

    /// Path of the JSONL graph file, relative to the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph: Option<PathBuf>,
}

impl RippleConfig {
    /// The configuration `ripple init` writes: every default spelled out.
    #[must_use]
    pub fn starter() -> Self {
        Self {
            relationship_filter: Some(RelationshipFilter::default().to_string()),
            limits: Some(Limits::default().to_string()),
            graph: Some(PathBuf::from(DEFAULT_GRAPH_FILE)),
        }
    }

    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| Error::Config(e.to_string()))?;
        tracing::debug!(path = %path.display(), ?config, "Loaded configuration");
        Ok(config)
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// The configured relationship filter, or the default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFilter`] if the expression is malformed.
    pub fn filter(&self) -> Result<RelationshipFilter> {
        self.relationship_filter
            .as_deref()
            .map_or_else(|| Ok(RelationshipFilter::default()), RelationshipFilter::parse)
    }

    /// The configured limits, or the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLimit`] if the expression is malformed.
    pub fn limits(&self) -> Result<Limits> {
        self.limits
            .as_deref()
            .map_or_else(|| Ok(Limits::default()), Limits::parse)
    }
}

/// Find `ripple.yaml` in `start_dir` or its nearest ancestor that has one.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}

/// Write a starter `ripple.yaml` into `dir`.
///
/// # Errors
///
/// Returns an error if a config file already exists there or the write
/// fails.
pub async fn init(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    if fs::try_exists(&path).await? {
        return Err(Error::Config(format!(
            "Ripple is already initialized in this directory. Found existing '{CONFIG_FILE_NAME}'"
        )));
    }
    RippleConfig::starter().save(&path).await?;
    tracing::info!(path = %path.display(), "Wrote configuration");
    Ok(path)
}
