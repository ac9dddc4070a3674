//! Plastic SCM client abstraction
//!
//! Revision queries and workspace commands are kept behind two narrow
//! traits so the resolution logic can run against a scripted fake.

use crate::error::SyncResult;
use async_trait::async_trait;
use std::path::Path;

/// Read-only queries against the repository server
#[async_trait]
pub trait RevisionQuery: Send + Sync {
    /// Raw id of the newest changeset on `branch`
    async fn head_changeset(&self, branch: &str) -> SyncResult<String>;

    /// Comment of the changeset identified by `selector`
    async fn changeset_comment(&self, selector: &str) -> SyncResult<String>;

    /// Comment of the shelve with id `shelve_id`
    async fn shelve_comment(&self, shelve_id: &str) -> SyncResult<String>;
}

/// Commands that change the local working copy
#[async_trait]
pub trait WorkspaceOps: Send + Sync {
    /// Create workspace `name` at `path` bound to repository `repo`
    async fn create_workspace(&self, name: &str, path: &Path, repo: &str) -> SyncResult<()>;

    /// Discard every pending change below `path`
    async fn undo_all(&self, path: &Path) -> SyncResult<()>;

    /// Update the workspace at `path` to `selector`
    async fn switch(&self, path: &Path, selector: &str) -> SyncResult<()>;
}
