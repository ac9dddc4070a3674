//! Sync command - bring the workspace to the build's target

use crate::buildkite::BuildkiteAgent;
use crate::cli::args::BuildArgs;
use crate::config::Config;
use crate::error::{SyncError, SyncResult};
use crate::plastic::{CmClient, ResolutionCache};
use crate::sync::sync_workspace;
use console::style;

/// Execute the sync command
pub async fn execute(args: &BuildArgs, config: &Config) -> SyncResult<()> {
    let target = args.sync_target(config)?;

    let cwd = std::env::current_dir()
        .map_err(|e| SyncError::io("getting current directory", e))?;
    println!(
        "Executing {} from {}",
        style("plastic-sync").bold(),
        cwd.display()
    );

    let agent = BuildkiteAgent::new(&config.tools.agent);
    let cm = CmClient::new(&config.tools.cm, &target.path);
    let cache = ResolutionCache::new(&agent, &cm, args.resolve_request(config));

    sync_workspace(&cm, &cache, &target).await?;
    Ok(())
}
