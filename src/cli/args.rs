//! CLI argument definitions using clap derive
//!
//! Buildkite passes everything through the environment, so every build input
//! has an `env` binding and flags are only needed when running by hand.

use crate::config::Config;
use crate::error::{SyncError, SyncResult};
use crate::plastic::ResolveRequest;
use crate::sync::SyncTarget;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// plastic-sync - Plastic SCM checkout for Buildkite
///
/// Resolves the build's changeset or shelve once per build, records it in
/// build metadata and updates the workspace to it.
#[derive(Parser, Debug)]
#[command(name = "plastic-sync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute (defaults to `sync`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub build: BuildArgs,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PLASTIC_SYNC_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Command to run, `sync` when none was given
    pub fn selected_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Sync)
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Sync the workspace to the build's changeset or shelve
    Sync,

    /// Resolve the build's selector and print it, without touching the workspace
    Resolve,

    /// Print the resolution recorded in build metadata as JSON
    Show,

    /// Print the display form of a branch name
    FriendlyName(FriendlyNameArgs),
}

impl Commands {
    /// Whether a failure of this command should be annotated on the build
    pub fn annotates_failures(&self) -> bool {
        matches!(self, Self::Sync | Self::Resolve)
    }
}

/// Arguments for the friendly-name command
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct FriendlyNameArgs {
    /// Branch path, e.g. /main/child
    #[arg(value_name = "BRANCH")]
    pub name: String,
}

/// Build inputs provided by Buildkite
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Branch to build
    #[arg(long, global = true, env = "BUILDKITE_BRANCH", default_value = "")]
    pub branch: String,

    /// Changeset number, HEAD, or a qualified selector such as sh:123
    #[arg(long, global = true, env = "BUILDKITE_COMMIT", default_value = "")]
    pub commit: String,

    /// Repository spec, e.g. game@plastic.example.com:8087
    #[arg(long, global = true, env = "BUILDKITE_PLUGIN_PLASTIC_REPO")]
    pub repo: Option<String>,

    /// Pipeline name, used to derive the workspace name
    #[arg(long, global = true, env = "BUILDKITE_PIPELINE_NAME", default_value = "")]
    pub pipeline_name: String,

    /// Workspace name (defaults to the prefixed pipeline name)
    #[arg(long, global = true, env = "BUILDKITE_PLUGIN_PLASTIC_WORKSPACENAME")]
    pub workspace_name: Option<String>,

    /// Workspace directory
    #[arg(long, global = true, env = "BUILDKITE_PLUGIN_PLASTIC_PATH", default_value = ".")]
    pub path: PathBuf,
}

impl BuildArgs {
    /// Resolution inputs for this build
    pub fn resolve_request(&self, config: &Config) -> ResolveRequest {
        ResolveRequest {
            branch: self.branch.clone(),
            revision: self.commit.clone(),
            policy: config.resolution.revision_policy,
        }
    }

    /// Workspace name, derived from the pipeline unless set explicitly
    pub fn workspace_name(&self, config: &Config) -> String {
        match &self.workspace_name {
            Some(name) => name.clone(),
            None => format!("{}{}", config.workspace.name_prefix, self.pipeline_name),
        }
    }

    /// Everything `sync_workspace` needs to know about the workspace
    pub fn sync_target(&self, config: &Config) -> SyncResult<SyncTarget> {
        let repo = self
            .repo
            .clone()
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| SyncError::MissingSetting {
                name: "BUILDKITE_PLUGIN_PLASTIC_REPO".to_string(),
            })?;

        Ok(SyncTarget {
            workspace_name: self.workspace_name(config),
            path: self.path.clone(),
            repo,
            already_exists_pattern: config.workspace.already_exists_pattern.clone(),
        })
    }
}
