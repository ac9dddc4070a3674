//! Plastic SCM target resolution and client
//!
//! - `selector`: turns branch/commit inputs into a `cm` selector
//! - `resolution`: resolves once per build, backed by build metadata
//! - `cm`: the real client over the `cm` binary

mod client;
mod cm;
#[cfg(test)]
pub(crate) mod fake;
pub mod resolution;
pub mod selector;

pub use client::{RevisionQuery, WorkspaceOps};
pub use cm::CmClient;
pub use resolution::{read_record, ResolutionCache, ResolutionRecord, ResolveRequest};
pub use selector::{friendly_name, resolve_selector, RevisionPolicy, Selector};
