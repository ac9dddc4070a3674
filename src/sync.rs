//! Workspace synchronization
//!
//! Ensures the workspace exists, resolves the build's selector, throws away
//! local changes and switches to the selector. No step is retried.

use crate::error::{SyncError, SyncResult, WorkspaceOp};
use crate::plastic::{ResolutionCache, Selector, WorkspaceOps};
use console::style;
use std::path::PathBuf;
use tracing::debug;

/// Where and what to sync
#[derive(Debug, Clone)]
pub struct SyncTarget {
    /// Workspace name registered with the Plastic client
    pub workspace_name: String,
    /// Workspace directory
    pub path: PathBuf,
    /// Repository spec, e.g. `game@plastic.example.com:8087`
    pub repo: String,
    /// Substring of `cm workspace create` output that means it already exists
    pub already_exists_pattern: String,
}

/// Bring the workspace at `target.path` to the build's selector
pub async fn sync_workspace(
    workspace: &dyn WorkspaceOps,
    cache: &ResolutionCache<'_>,
    target: &SyncTarget,
) -> SyncResult<Selector> {
    println!(
        "Creating workspace {:?} for repository {:?}",
        target.workspace_name, target.repo
    );
    ensure_workspace(workspace, target).await?;

    let selector = cache.get_or_resolve().await?;

    println!("Cleaning workspace of any changes...");
    workspace
        .undo_all(&target.path)
        .await
        .map_err(|e| SyncError::workspace(WorkspaceOp::Undo, e))?;

    println!("Setting workspace to {}", style(&selector).cyan());
    workspace
        .switch(&target.path, &selector.to_string())
        .await
        .map_err(|e| SyncError::workspace(WorkspaceOp::Switch, e))?;

    println!("{} Update complete.", style("✓").green());
    Ok(selector)
}

async fn ensure_workspace(workspace: &dyn WorkspaceOps, target: &SyncTarget) -> SyncResult<()> {
    match workspace
        .create_workspace(&target.workspace_name, &target.path, &target.repo)
        .await
    {
        Ok(()) => Ok(()),
        Err(e) if already_exists(&e, &target.already_exists_pattern) => {
            debug!("Workspace {} already exists", target.workspace_name);
            Ok(())
        }
        Err(e) => Err(SyncError::workspace(WorkspaceOp::Create, e)),
    }
}

fn already_exists(err: &SyncError, pattern: &str) -> bool {
    !pattern.is_empty()
        && err
            .tool_output()
            .is_some_and(|output| output.contains(pattern))
}
