//! Error types for plastic-sync
//!
//! All modules use `SyncResult<T>` as their return type. Every error is fatal
//! to the run; nothing here is retried.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for plastic-sync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Workspace operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceOp {
    Create,
    Undo,
    Switch,
}

impl fmt::Display for WorkspaceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create workspace",
            Self::Undo => "undo changes",
            Self::Switch => "update workspace",
        })
    }
}

/// All errors that can occur in plastic-sync
#[derive(Error, Debug)]
pub enum SyncError {
    // Input errors
    #[error("Invalid branch name `{branch}`: {reason}")]
    InvalidBranchName { branch: String, reason: String },

    #[error("Invalid selector `{revision}` specified: {source}")]
    InvalidRevision {
        revision: String,
        #[source]
        source: std::num::ParseIntError,
    },

    // Resolution errors
    #[error("Failed to find head of branch `{branch}` (got `{selector}`): {source}")]
    HeadLookupFailed {
        branch: String,
        selector: String,
        #[source]
        source: Box<SyncError>,
    },

    #[error("Failed to get comment for `{selector}:{branch}`: {source}")]
    CommentLookupFailed {
        selector: String,
        branch: String,
        #[source]
        source: Box<SyncError>,
    },

    // Metadata errors
    #[error("Failed to read {key} metadata: {source}")]
    MetadataReadFailed {
        key: String,
        #[source]
        source: Box<SyncError>,
    },

    #[error("Failed to set {key} metadata: {source}")]
    MetadataWriteFailed {
        key: String,
        #[source]
        source: Box<SyncError>,
    },

    // Workspace errors
    #[error("Failed to {operation}: {source}")]
    WorkspaceOperationFailed {
        operation: WorkspaceOp,
        #[source]
        source: Box<SyncError>,
    },

    // Configuration errors
    #[error("Required setting not provided: {name}")]
    MissingSetting { name: String },

    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // Process errors
    #[error("`{command}` exited unsuccessfully.\n{output}")]
    Tool { command: String, output: String },

    #[error("Command failed: {command}: {source}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SyncError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error (the program could not be started)
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create an error for a command that ran but exited non-zero
    pub fn tool(command: impl Into<String>, output: impl Into<String>) -> Self {
        Self::Tool {
            command: command.into(),
            output: output.into(),
        }
    }

    /// Create a workspace operation error
    pub fn workspace(operation: WorkspaceOp, source: SyncError) -> Self {
        Self::WorkspaceOperationFailed {
            operation,
            source: Box::new(source),
        }
    }

    /// Output captured from the external tool, if this error carries any
    pub fn tool_output(&self) -> Option<&str> {
        match self {
            Self::Tool { output, .. } => Some(output),
            Self::HeadLookupFailed { source, .. }
            | Self::CommentLookupFailed { source, .. }
            | Self::MetadataReadFailed { source, .. }
            | Self::MetadataWriteFailed { source, .. }
            | Self::WorkspaceOperationFailed { source, .. } => source.tool_output(),
            _ => None,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidBranchName { .. } => Some("Branch names must not end with '/'"),
            Self::InvalidRevision { .. } => {
                Some("Use a changeset number, HEAD, or a qualified selector such as sh:123")
            }
            Self::CommandFailed { .. } => {
                Some("Check that `cm` and `buildkite-agent` are installed and on PATH")
            }
            Self::MissingSetting { .. } => {
                Some("Set the plugin's `repo` option in pipeline.yml")
            }
            _ => match self.tool_output() {
                Some(out) if out.contains("not logged in") || out.contains("credentials") => {
                    Some("Check the Plastic SCM client configuration of the agent user")
                }
                _ => None,
            },
        }
    }
}
