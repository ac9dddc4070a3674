//! Resolve command - print the build's selector
//!
//! Shares the once-per-build resolution with `sync`, so a hook that only
//! needs the target sees the same selector the checkout used.

use crate::buildkite::BuildkiteAgent;
use crate::cli::args::BuildArgs;
use crate::config::Config;
use crate::error::SyncResult;
use crate::plastic::{CmClient, ResolutionCache};

/// Execute the resolve command
pub async fn execute(args: &BuildArgs, config: &Config) -> SyncResult<()> {
    let agent = BuildkiteAgent::new(&config.tools.agent);
    let cm = CmClient::new(&config.tools.cm, &args.path);
    let cache = ResolutionCache::new(&agent, &cm, args.resolve_request(config));

    let selector = cache.get_or_resolve().await?;
    println!("{}", selector);
    Ok(())
}
