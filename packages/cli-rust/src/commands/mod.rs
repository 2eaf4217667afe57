//! CLI command implementations
//!
//! This module contains the implementations for host management and tunnel commands.

mod host;
mod versions;

pub use host::{HostArgs, cmd_host};
pub use versions::{VersionsArgs, cmd_versions};
