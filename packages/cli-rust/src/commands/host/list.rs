//! fleetlink host list - List all configured hosts

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color, Table};
use console::style;
use fleetlink_core::{get_hosts_path, load_hosts};

/// Arguments for host list command
#[derive(Args)]
pub struct HostListArgs {
    /// Show only host names (for scripting)
    #[arg(long)]
    pub names_only: bool,
}

pub fn cmd_host_list(args: &HostListArgs, quiet: bool) -> Result<()> {
    let hosts = load_hosts()?;

    if hosts.hosts.is_empty() {
        if !quiet && !args.names_only {
            println!("No hosts configured.");
            println!();
            println!(
                "  {} {}",
                style("Add one with:").dim(),
                style("fleetlink host add <name> <address>").yellow()
            );
        }
        return Ok(());
    }

    // Names only mode (for scripting)
    if args.names_only || quiet {
        for name in hosts.host_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Name", "Address", "User", "Port", "Key", "Version Check"]);

    for (name, config) in &hosts.hosts {
        let key = if config.ssh_key.is_some() {
            "(inline)".to_string()
        } else {
            config.ssh_key_path.clone()
        };
        let check = if config.enforce_docker_version {
            Cell::new("strict").fg(Color::Yellow)
        } else {
            Cell::new("advisory")
        };

        table.add_row(vec![
            Cell::new(name).fg(Color::Cyan),
            Cell::new(&config.address),
            Cell::new(&config.user),
            Cell::new(config.ssh_port()),
            Cell::new(key),
            check,
        ]);
    }

    println!("{table}");

    if let Some(path) = get_hosts_path() {
        println!();
        println!(
            "  {} {}",
            style("Config file:").dim(),
            style(path.display()).dim()
        );
    }

    Ok(())
}
