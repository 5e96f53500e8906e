use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading or validating a [`crate::PolicyConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {} as JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Local failures of the update pipeline.
///
/// A management CLI that runs and exits non-zero is not an error here; it is
/// reported through [`crate::CommandOutcome`].
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("failed to serialize policy payload: {0}")]
    PayloadSerialize(#[from] serde_json::Error),

    #[error("failed to write payload file {}: {source}", path.display())]
    PayloadWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("tool not found: '{tool}' is not installed or not on PATH")]
    ToolNotFound { tool: String },

    #[error("failed to run '{tool}': {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
}
