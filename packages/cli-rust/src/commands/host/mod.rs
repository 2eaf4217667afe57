//! fleetlink host - Manage fleet hosts

mod add;
mod list;
mod remove;
mod up;

use anyhow::Result;
use clap::{Args, Subcommand};
use fleetlink_core::Config;

pub use add::HostAddArgs;
pub use list::HostListArgs;
pub use remove::HostRemoveArgs;
pub use up::HostUpArgs;

/// Arguments for the host command group
#[derive(Args)]
pub struct HostArgs {
    #[command(subcommand)]
    pub command: HostCommands,
}

#[derive(Subcommand)]
pub enum HostCommands {
    /// Add a fleet host
    Add(HostAddArgs),
    /// List configured hosts
    List(HostListArgs),
    /// Remove a host
    Remove(HostRemoveArgs),
    /// Open the Docker tunnel to a host and check its daemon version
    Up(HostUpArgs),
}

pub async fn cmd_host(args: &HostArgs, config: &Config, quiet: bool, verbose: u8) -> Result<()> {
    match &args.command {
        HostCommands::Add(args) => add::cmd_host_add(args, quiet),
        HostCommands::List(args) => list::cmd_host_list(args, quiet),
        HostCommands::Remove(args) => remove::cmd_host_remove(args, quiet),
        HostCommands::Up(args) => up::cmd_host_up(args, config, quiet, verbose).await,
    }
}
