//! Scripted Plastic client for unit tests

use crate::error::{SyncError, SyncResult};
use crate::plastic::client::{RevisionQuery, WorkspaceOps};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;

/// Answers queries from canned values and records every call
pub struct FakePlastic {
    head: Result<String, String>,
    changeset_comment: Result<String, String>,
    shelve_comment: Result<String, String>,
    create: Result<(), String>,
    undo: Result<(), String>,
    switch: Result<(), String>,
    calls: Mutex<Vec<String>>,
}

impl FakePlastic {
    pub fn new() -> Self {
        Self {
            head: Ok("1".to_string()),
            changeset_comment: Ok("changeset comment".to_string()),
            shelve_comment: Ok("shelve comment".to_string()),
            create: Ok(()),
            undo: Ok(()),
            switch: Ok(()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_head(mut self, id: &str) -> Self {
        self.head = Ok(id.to_string());
        self
    }

    pub fn with_head_error(mut self, output: &str) -> Self {
        self.head = Err(output.to_string());
        self
    }

    pub fn with_changeset_comment(mut self, comment: &str) -> Self {
        self.changeset_comment = Ok(comment.to_string());
        self
    }

    pub fn with_comment_error(mut self, output: &str) -> Self {
        self.changeset_comment = Err(output.to_string());
        self.shelve_comment = Err(output.to_string());
        self
    }

    pub fn with_shelve_comment(mut self, comment: &str) -> Self {
        self.shelve_comment = Ok(comment.to_string());
        self
    }

    pub fn with_create_error(mut self, output: &str) -> Self {
        self.create = Err(output.to_string());
        self
    }

    pub fn with_undo_error(mut self, output: &str) -> Self {
        self.undo = Err(output.to_string());
        self
    }

    pub fn with_switch_error(mut self, output: &str) -> Self {
        self.switch = Err(output.to_string());
        self
    }

    /// Calls made so far, e.g. `head /main` or `switch cs:1`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record<T: Clone>(&self, call: String, answer: &Result<T, String>) -> SyncResult<T> {
        self.calls.lock().unwrap().push(call.clone());
        answer
            .clone()
            .map_err(|output| SyncError::tool(format!("cm {}", call), output))
    }
}

#[async_trait]
impl RevisionQuery for FakePlastic {
    async fn head_changeset(&self, branch: &str) -> SyncResult<String> {
        self.record(format!("head {}", branch), &self.head)
    }

    async fn changeset_comment(&self, selector: &str) -> SyncResult<String> {
        self.record(format!("log {}", selector), &self.changeset_comment)
    }

    async fn shelve_comment(&self, shelve_id: &str) -> SyncResult<String> {
        self.record(format!("shelve {}", shelve_id), &self.shelve_comment)
    }
}

#[async_trait]
impl WorkspaceOps for FakePlastic {
    async fn create_workspace(&self, name: &str, path: &Path, repo: &str) -> SyncResult<()> {
        self.record(
            format!("create {} {} {}", name, path.display(), repo),
            &self.create,
        )
    }

    async fn undo_all(&self, path: &Path) -> SyncResult<()> {
        self.record(format!("undo {}", path.display()), &self.undo)
    }

    async fn switch(&self, _path: &Path, selector: &str) -> SyncResult<()> {
        self.record(format!("switch {}", selector), &self.switch)
    }
}
