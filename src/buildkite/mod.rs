//! Buildkite agent integration
//!
//! Build metadata is the only state shared between separate invocations of
//! this tool within one build. The core talks to it through `MetadataStore`
//! so tests can swap in `MemoryMetadata`.

mod agent;
#[cfg(test)]
pub(crate) mod memory;

pub use agent::BuildkiteAgent;
#[cfg(test)]
pub(crate) use memory::MemoryMetadata;

use crate::error::SyncResult;
use async_trait::async_trait;

/// Metadata keys shared with other plugins and with Buildkite itself
pub mod keys {
    /// Guard flag, written before anything else is resolved
    pub const INITIALISED: &str = "lightforge:plastic:initialised";
    /// Raw branch path from the build
    pub const BRANCH: &str = "lightforge:plastic:branch";
    /// Branch rendered with `__` joiners
    pub const DISPLAY_BRANCH: &str = "lightforge:plastic:displaybranch";
    /// Resolved selector
    pub const SELECTOR: &str = "lightforge:plastic:selector";
    /// Read by Buildkite to show the commit message in the UI
    pub const GIT_COMMIT: &str = "buildkite:git:commit";
}

/// Build-scoped key/value store
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Read a value, returning `default` when the key was never set
    async fn get(&self, key: &str, default: &str) -> SyncResult<String>;

    /// Write a value
    async fn set(&self, key: &str, value: &str) -> SyncResult<()>;
}

/// Annotation style understood by Buildkite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationStyle {
    Error,
}

impl AnnotationStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
        }
    }
}

/// Posts annotations to the build page
#[async_trait]
pub trait Annotator: Send + Sync {
    async fn annotate(
        &self,
        style: AnnotationStyle,
        context: &str,
        message: &str,
    ) -> SyncResult<()>;
}
