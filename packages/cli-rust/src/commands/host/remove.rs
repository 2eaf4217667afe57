//! fleetlink host remove - Remove a fleet host

use anyhow::Result;
use clap::Args;
use console::style;
use fleetlink_core::{HostError, load_hosts, save_hosts};

/// Arguments for host remove command
#[derive(Args)]
pub struct HostRemoveArgs {
    /// Name of the host to remove
    pub name: String,
}

pub fn cmd_host_remove(args: &HostRemoveArgs, quiet: bool) -> Result<()> {
    let mut hosts = load_hosts()?;

    if hosts.remove_host(&args.name).is_none() {
        return Err(HostError::NotFound(args.name.clone()).into());
    }
    save_hosts(&hosts)?;

    if !quiet {
        println!(
            "{} Removed host {}",
            style("\u{2713}").green(),
            style(&args.name).cyan()
        );
    }

    Ok(())
}
