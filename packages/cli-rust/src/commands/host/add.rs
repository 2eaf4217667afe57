//! fleetlink host add - Add a fleet host

use anyhow::{Result, bail};
use clap::Args;
use console::style;
use fleetlink_core::{HostConfig, load_hosts, save_hosts};

/// Arguments for host add command
#[derive(Args)]
pub struct HostAddArgs {
    /// Name to identify this host (e.g., "node-1")
    pub name: String,

    /// SSH hostname or IP address
    pub address: String,

    /// SSH username (default: current user)
    #[arg(short, long)]
    pub user: Option<String>,

    /// SSH port (default: 22)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to SSH private key (default: ~/.ssh/id_rsa)
    #[arg(short = 'k', long)]
    pub key_path: Option<String>,

    /// Fail `host up` when the Docker version is unsupported
    #[arg(long)]
    pub enforce_docker_version: bool,

    /// Description for this host
    #[arg(short, long)]
    pub description: Option<String>,

    /// Overwrite if host already exists
    #[arg(long)]
    pub force: bool,
}

pub fn cmd_host_add(args: &HostAddArgs, quiet: bool) -> Result<()> {
    let mut hosts = load_hosts()?;

    if hosts.has_host(&args.name) && !args.force {
        bail!(
            "Host '{}' already exists. Use --force to overwrite, or choose a different name.",
            args.name
        );
    }

    let config = build_host_config(args);
    let summary = format!("{}@{}:{}", config.user, config.address, config.ssh_port());

    hosts.add_host(&args.name, config);
    save_hosts(&hosts)?;

    if !quiet {
        println!(
            "{} Added host {} ({})",
            style("\u{2713}").green(),
            style(&args.name).cyan(),
            summary
        );
        println!();
        println!(
            "  {} {}",
            style("Open the tunnel with:").dim(),
            style(format!("fleetlink host up {}", args.name)).yellow()
        );
    }

    Ok(())
}

fn build_host_config(args: &HostAddArgs) -> HostConfig {
    let mut config = HostConfig::new(&args.address)
        .with_enforce_docker_version(args.enforce_docker_version);

    if let Some(user) = &args.user {
        config = config.with_user(user);
    }
    if let Some(port) = args.port {
        config = config.with_port(port);
    }
    if let Some(key_path) = &args.key_path {
        config = config.with_ssh_key_path(key_path);
    }
    if let Some(desc) = &args.description {
        config = config.with_description(desc);
    }

    config
}
