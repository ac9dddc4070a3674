//! `cm` command-line client
//!
//! Implements `RevisionQuery` and `WorkspaceOps` by shelling out to the
//! Plastic SCM CLI. Queries use the `--format` options so stdout carries
//! just the requested field.

use crate::error::SyncResult;
use crate::plastic::client::{RevisionQuery, WorkspaceOps};
use crate::process;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

/// Plastic SCM client driven through the `cm` binary
pub struct CmClient {
    binary: String,
    /// Queries run here so `cm` picks up the workspace's repository
    workdir: PathBuf,
}

impl CmClient {
    /// Create a client for the given `cm` binary, querying from `workdir`
    pub fn new(binary: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            workdir: workdir.into(),
        }
    }

    /// Run `cm` and return trimmed stdout, failing on a non-zero exit
    async fn query(&self, args: &[&str]) -> SyncResult<String> {
        let output = process::run(&self.binary, args, Some(&self.workdir))
            .await?
            .into_result()?;
        Ok(output.value())
    }

    /// Run `cm` for its side effect, failing on a non-zero exit
    async fn exec(&self, args: &[&str], cwd: &Path) -> SyncResult<()> {
        process::run(&self.binary, args, Some(cwd))
            .await?
            .into_result()?;
        Ok(())
    }
}

#[async_trait]
impl RevisionQuery for CmClient {
    async fn head_changeset(&self, branch: &str) -> SyncResult<String> {
        let filter = format!("where branch = '{}'", branch);
        self.query(
            &[
                "find",
                "changeset",
                &filter,
                "--format={changesetid}",
                "order",
                "by",
                "changesetId",
                "desc",
                "LIMIT",
                "1",
                "--nototal",
            ],
        )
        .await
    }

    async fn changeset_comment(&self, selector: &str) -> SyncResult<String> {
        self.query(&["log", selector, "--csformat={comment}"]).await
    }

    async fn shelve_comment(&self, shelve_id: &str) -> SyncResult<String> {
        let filter = format!("where shelveid = '{}'", shelve_id);
        self.query(
            &[
                "find",
                "shelve",
                &filter,
                "--format={comment}",
                "LIMIT",
                "1",
                "--nototal",
            ],
        )
        .await
    }
}

#[async_trait]
impl WorkspaceOps for CmClient {
    async fn create_workspace(&self, name: &str, path: &Path, repo: &str) -> SyncResult<()> {
        info!("Creating workspace {} at {}", name, path.display());
        let path = path.to_string_lossy();
        process::run(&self.binary, &["workspace", "create", name, &path, repo], None)
            .await?
            .into_result()?;
        Ok(())
    }

    async fn undo_all(&self, path: &Path) -> SyncResult<()> {
        self.exec(&["undo", ".", "-R"], path).await
    }

    async fn switch(&self, path: &Path, selector: &str) -> SyncResult<()> {
        self.exec(&["switch", selector], path).await
    }
}
