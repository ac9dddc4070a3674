//! Show command - dump the recorded resolution

use crate::buildkite::BuildkiteAgent;
use crate::config::Config;
use crate::error::SyncResult;
use crate::plastic::read_record;

/// Execute the show command
pub async fn execute(config: &Config) -> SyncResult<()> {
    let agent = BuildkiteAgent::new(&config.tools.agent);

    let record = read_record(&agent).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
