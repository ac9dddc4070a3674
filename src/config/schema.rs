//! Configuration schema for plastic-sync
//!
//! Optional file, by default at `~/.config/plastic-sync/config.toml` on the
//! agent. Build inputs come from the environment, not from here.

use crate::plastic::RevisionPolicy;
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// External programs
    pub tools: ToolsConfig,

    /// Workspace settings
    pub workspace: WorkspaceConfig,

    /// Failure annotation settings
    pub annotation: AnnotationConfig,

    /// Target resolution settings
    pub resolution: ResolutionConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Paths or names of the programs this tool drives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Plastic SCM command-line client
    pub cm: String,

    /// Buildkite agent binary
    pub agent: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            cm: "cm".to_string(),
            agent: "buildkite-agent".to_string(),
        }
    }
}

/// Workspace configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Prepended to the pipeline name when no workspace name is given
    pub name_prefix: String,

    /// `cm workspace create` output that means the workspace is already there.
    /// Matched as a plain substring; set to "" to treat every error as fatal.
    pub already_exists_pattern: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            name_prefix: "buildkite-".to_string(),
            already_exists_pattern: "already exists.".to_string(),
        }
    }
}

/// Annotation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Post an annotation when the run fails
    pub enabled: bool,

    /// Annotation context; reused so repeated failures replace each other
    pub context: String,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            context: "lightforge-plastic-plugin".to_string(),
        }
    }
}

/// Resolution configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// What to do with a commit value that is not HEAD, qualified, or numeric
    pub revision_policy: RevisionPolicy,
}
