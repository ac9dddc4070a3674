//! plastic-sync - Plastic SCM checkout for Buildkite
//!
//! Resolves which changeset or shelve a build targets, records the answer in
//! build metadata so every hook of the build agrees on it, and updates the
//! workspace to it.

pub mod buildkite;
pub mod cli;
pub mod config;
pub mod error;
pub mod plastic;
pub mod process;
pub mod sync;

pub use error::{SyncError, SyncResult};
