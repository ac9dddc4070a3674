//! Target selection
//!
//! Turns the branch and commit values Buildkite hands us into a single
//! selector `cm` understands. Everything here is pure except the head lookup
//! done for an unpinned build.

use crate::error::{SyncError, SyncResult};
use crate::plastic::client::RevisionQuery;
use serde::{Deserialize, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Branch path separator
pub const BRANCH_SEPARATOR: char = '/';

/// Replaces separators in friendly branch names
pub const FRIENDLY_JOINER: &str = "__";

/// Commit value meaning "newest changeset on the branch"
pub const HEAD: &str = "HEAD";

const CHANGESET_PREFIX: &str = "cs:";
const SHELVE_PREFIX: &str = "sh:";

/// A revision `cm` can switch to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `cs:<id>`
    Changeset(u64),
    /// `sh:<id>`
    Shelve(String),
    /// Any other qualified or pass-through value, used verbatim
    Raw(String),
}

impl Selector {
    /// Shelve id, when this selector targets a shelve
    pub fn shelve_id(&self) -> Option<&str> {
        match self {
            Self::Shelve(id) => Some(id),
            _ => None,
        }
    }

    /// Classify a value that already carries a `kind:` qualifier
    fn qualified(value: &str) -> Self {
        match value.strip_prefix(SHELVE_PREFIX) {
            Some(id) => Self::Shelve(id.to_string()),
            None => Self::Raw(value.to_string()),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Changeset(id) => write!(f, "{}{}", CHANGESET_PREFIX, id),
            Self::Shelve(id) => write!(f, "{}{}", SHELVE_PREFIX, id),
            Self::Raw(raw) => f.write_str(raw),
        }
    }
}

/// Parses the wire form written to build metadata back into a selector
impl FromStr for Selector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(id) = s.strip_prefix(CHANGESET_PREFIX) {
            // Only canonical numbers round-trip as changesets.
            if let Ok(n) = id.parse::<u64>() {
                if n.to_string() == id {
                    return Ok(Self::Changeset(n));
                }
            }
        }
        Ok(Self::qualified(s))
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// How to treat a commit value that is neither HEAD, qualified, nor a number
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevisionPolicy {
    /// Reject it as `InvalidRevision`
    #[default]
    Strict,
    /// Hand it to `cm` unchanged
    Lenient,
}

/// Render a branch path for display and metadata.
///
/// `/main/child` becomes `main__child`. Branches ending in `/` are rejected.
pub fn friendly_name(branch: &str) -> SyncResult<String> {
    if branch.ends_with(BRANCH_SEPARATOR) {
        return Err(SyncError::InvalidBranchName {
            branch: branch.to_string(),
            reason: "branch must not end with /".to_string(),
        });
    }

    let trimmed = branch.strip_prefix(BRANCH_SEPARATOR).unwrap_or(branch);
    Ok(trimmed.replace(BRANCH_SEPARATOR, FRIENDLY_JOINER))
}

/// Resolve the commit value of a build into a selector.
///
/// An empty or `HEAD` revision costs one head query against `branch`; every
/// other shape is decided locally.
pub async fn resolve_selector(
    query: &dyn RevisionQuery,
    branch: &str,
    revision: &str,
    policy: RevisionPolicy,
) -> SyncResult<Selector> {
    let revision = revision.trim();

    if revision.is_empty() || revision == HEAD {
        return head_selector(query, branch).await;
    }

    if revision.contains(':') {
        // Already qualified, e.g. a shelve given as sh:123
        return Ok(Selector::qualified(revision));
    }

    match revision.parse::<i64>() {
        Ok(cs) if cs >= 1 => Ok(Selector::Changeset(cs as u64)),
        Ok(_) => Ok(Selector::Raw(revision.to_string())),
        Err(source) => match policy {
            RevisionPolicy::Strict => Err(SyncError::InvalidRevision {
                revision: revision.to_string(),
                source,
            }),
            RevisionPolicy::Lenient => Ok(Selector::Raw(revision.to_string())),
        },
    }
}

/// Look up the newest changeset on `branch`.
///
/// On failure the raw answer is still rendered in changeset form and carried
/// in the error, so the annotation shows what `cm` actually returned.
async fn head_selector(query: &dyn RevisionQuery, branch: &str) -> SyncResult<Selector> {
    let raw = match query.head_changeset(branch).await {
        Ok(raw) => raw,
        Err(e) => {
            let raw = e.tool_output().unwrap_or_default().trim().to_string();
            return Err(SyncError::HeadLookupFailed {
                branch: branch.to_string(),
                selector: format!("{}{}", CHANGESET_PREFIX, raw),
                source: Box::new(e),
            });
        }
    };

    match raw.trim().parse::<u64>() {
        Ok(id) if id >= 1 => {
            info!("Head of {} is changeset {}", branch, id);
            Ok(Selector::Changeset(id))
        }
        _ => Err(SyncError::HeadLookupFailed {
            branch: branch.to_string(),
            selector: format!("{}{}", CHANGESET_PREFIX, raw.trim()),
            source: Box::new(SyncError::tool(
                "cm find changeset",
                format!("expected a changeset id, got {:?}", raw),
            )),
        }),
    }
}
