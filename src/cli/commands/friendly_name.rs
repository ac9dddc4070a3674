//! Friendly-name command - print a branch's display name

use crate::cli::args::FriendlyNameArgs;
use crate::error::SyncResult;
use crate::plastic::friendly_name;

/// Execute the friendly-name command
pub fn execute(args: &FriendlyNameArgs) -> SyncResult<()> {
    println!("{}", friendly_name(&args.name)?);
    Ok(())
}
