//! Once-per-build target resolution
//!
//! The plugin runs in several hooks of the same build. The first invocation
//! resolves the selector and records it in build metadata; every later one
//! reads it back so all hooks agree on the revision, even if the branch moved
//! in the meantime.
//!
//! The guard flag is written *before* any resolution work. If a later step
//! fails the build aborts with the flag already set, and a retried job in the
//! same build will trust the incomplete record. Invocations are assumed to
//! be strictly sequential; two concurrent first-time resolutions would race
//! on the metadata writes.

use crate::buildkite::{keys, MetadataStore};
use crate::error::{SyncError, SyncResult};
use crate::plastic::client::RevisionQuery;
use crate::plastic::selector::{friendly_name, resolve_selector, RevisionPolicy, Selector};
use serde::Serialize;
use tracing::{info, warn};

/// What the build asked for
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    /// Branch path, e.g. `/main/child`
    pub branch: String,
    /// Raw commit value: empty, `HEAD`, a changeset number or a qualified selector
    pub revision: String,
    pub policy: RevisionPolicy,
}

/// Everything recorded in build metadata about the resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionRecord {
    pub initialised: bool,
    pub branch: String,
    pub display_branch: String,
    pub selector: Selector,
    pub commit_message: String,
}

/// Resolves the build target at most once per build
pub struct ResolutionCache<'a> {
    metadata: &'a dyn MetadataStore,
    query: &'a dyn RevisionQuery,
    request: ResolveRequest,
}

impl<'a> ResolutionCache<'a> {
    pub fn new(
        metadata: &'a dyn MetadataStore,
        query: &'a dyn RevisionQuery,
        request: ResolveRequest,
    ) -> Self {
        Self {
            metadata,
            query,
            request,
        }
    }

    /// Return the build's selector, resolving and recording it on first use
    pub async fn get_or_resolve(&self) -> SyncResult<Selector> {
        if read(self.metadata, keys::INITIALISED, "false").await? == "true" {
            return self.from_metadata().await;
        }
        self.resolve_and_record().await
    }

    async fn from_metadata(&self) -> SyncResult<Selector> {
        let branch = read(self.metadata, keys::BRANCH, "").await?;
        let selector = read_selector(self.metadata).await?;

        info!("using br:{} and {} from metadata", branch, selector);
        if selector.to_string().is_empty() {
            warn!(
                "{} is set but no selector was recorded; an earlier resolution did not finish",
                keys::INITIALISED
            );
        }
        Ok(selector)
    }

    async fn resolve_and_record(&self) -> SyncResult<Selector> {
        let ResolveRequest {
            branch,
            revision,
            policy,
        } = &self.request;

        // Pure validation first: malformed input never touches metadata.
        let display_branch = friendly_name(branch)?;

        write(self.metadata, keys::INITIALISED, "true").await?;

        let selector = resolve_selector(self.query, branch, revision, *policy).await?;
        info!("Resolved {} on {} to {}", revision, branch, selector);

        // Recorded before the workspace update, which can take minutes.
        let comment = self.comment_for(&selector, branch).await?;

        write(self.metadata, keys::BRANCH, branch).await?;
        write(self.metadata, keys::DISPLAY_BRANCH, &display_branch).await?;
        write(self.metadata, keys::SELECTOR, &selector.to_string()).await?;
        write(
            self.metadata,
            keys::GIT_COMMIT,
            &commit_message(&selector, &comment),
        )
        .await?;

        Ok(selector)
    }

    async fn comment_for(&self, selector: &Selector, branch: &str) -> SyncResult<String> {
        let result = match selector.shelve_id() {
            Some(id) => self.query.shelve_comment(id).await,
            None => self.query.changeset_comment(&selector.to_string()).await,
        };
        result.map_err(|e| SyncError::CommentLookupFailed {
            selector: selector.to_string(),
            branch: branch.to_string(),
            source: Box::new(e),
        })
    }
}

/// Read back whatever has been recorded, without resolving anything
pub async fn read_record(metadata: &dyn MetadataStore) -> SyncResult<ResolutionRecord> {
    Ok(ResolutionRecord {
        initialised: read(metadata, keys::INITIALISED, "false").await? == "true",
        branch: read(metadata, keys::BRANCH, "").await?,
        display_branch: read(metadata, keys::DISPLAY_BRANCH, "").await?,
        selector: read_selector(metadata).await?,
        commit_message: read(metadata, keys::GIT_COMMIT, "").await?,
    })
}

async fn read_selector(metadata: &dyn MetadataStore) -> SyncResult<Selector> {
    let raw = read(metadata, keys::SELECTOR, "").await?;
    match raw.parse::<Selector>() {
        Ok(selector) => Ok(selector),
        Err(never) => match never {},
    }
}

async fn read(metadata: &dyn MetadataStore, key: &str, default: &str) -> SyncResult<String> {
    metadata
        .get(key, default)
        .await
        .map_err(|e| SyncError::MetadataReadFailed {
            key: key.to_string(),
            source: Box::new(e),
        })
}

async fn write(metadata: &dyn MetadataStore, key: &str, value: &str) -> SyncResult<()> {
    metadata
        .set(key, value)
        .await
        .map_err(|e| SyncError::MetadataWriteFailed {
            key: key.to_string(),
            source: Box::new(e),
        })
}

/// Format the value Buildkite shows as the build's commit message.
///
/// Mirrors `git log` output: a `commit` header, a blank line, then the
/// comment indented by a tab.
pub fn commit_message(selector: &Selector, comment: &str) -> String {
    let body: Vec<String> = comment.lines().map(|line| format!("\t{}", line)).collect();
    let body = if body.is_empty() {
        "\t".to_string()
    } else {
        body.join("\n")
    };
    format!("commit {}\n\n{}", selector, body)
}
