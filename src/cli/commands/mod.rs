//! CLI command implementations

pub mod friendly_name;
pub mod resolve;
pub mod show;
pub mod sync;

pub use friendly_name::execute as friendly_name;
pub use resolve::execute as resolve;
pub use show::execute as show;
pub use sync::execute as sync;
