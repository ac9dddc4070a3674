//! `buildkite-agent` backed metadata store and annotator

use crate::buildkite::{AnnotationStyle, Annotator, MetadataStore};
use crate::error::SyncResult;
use crate::process;
use async_trait::async_trait;
use tracing::debug;

/// Talks to the agent running the current job
pub struct BuildkiteAgent {
    binary: String,
}

impl BuildkiteAgent {
    /// Create a client for the given `buildkite-agent` binary
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for BuildkiteAgent {
    fn default() -> Self {
        Self::new("buildkite-agent")
    }
}

#[async_trait]
impl MetadataStore for BuildkiteAgent {
    async fn get(&self, key: &str, default: &str) -> SyncResult<String> {
        let output = process::run(
            &self.binary,
            &["meta-data", "get", key, "--default", default],
            None,
        )
        .await?
        .into_result()?;

        // The agent prints the raw value; only a trailing newline is noise.
        let value = output.stdout.trim_end_matches(['\r', '\n']).to_string();
        debug!("meta-data {} = {:?}", key, value);
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> SyncResult<()> {
        process::run(&self.binary, &["meta-data", "set", key, value], None)
            .await?
            .into_result()?;
        Ok(())
    }
}

#[async_trait]
impl Annotator for BuildkiteAgent {
    async fn annotate(
        &self,
        style: AnnotationStyle,
        context: &str,
        message: &str,
    ) -> SyncResult<()> {
        process::run(
            &self.binary,
            &[
                "annotate",
                message,
                "--context",
                context,
                "--style",
                style.as_str(),
            ],
            None,
        )
        .await?
        .into_result()?;
        Ok(())
    }
}
