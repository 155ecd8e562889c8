//! Configuration management for lineage.
//!
//! Settings come from a YAML file. An explicit `--config` path must exist;
//! otherwise `lineage.yaml` in the working directory is used when present,
//! and built-in defaults apply when it is not. Command-line flags override
//! whatever the file says.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "lineage.yaml";

/// Default database path.
pub const DEFAULT_DATABASE: &str = "lineage.db";

/// Default owner for imports.
pub const DEFAULT_OWNER: &str = "default";

/// Lineage configuration.
///
/// Missing keys take their default value, so a file only needs the
/// settings it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LineageConfig {
    /// Path to the `SQLite` database
    pub database: PathBuf,

    /// Owner used when `--owner` is not given
    pub owner: String,

    /// Reject malformed lines instead of skipping them
    pub strict: bool,
}

impl Default for LineageConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            owner: DEFAULT_OWNER.to_string(),
            strict: false,
        }
    }
}

impl LineageConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Parse configuration from YAML text.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Resolve the configuration for a run.
    ///
    /// `explicit` is the `--config` argument; `base_dir` is where
    /// [`CONFIG_FILE_NAME`] is looked for when no path was given.
    pub fn discover(explicit: Option<&Path>, base_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = base_dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "Loading configuration");
            return Self::load(&candidate);
        }

        tracing::debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }
}
