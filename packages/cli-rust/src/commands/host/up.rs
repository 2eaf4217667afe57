//! fleetlink host up - Open the Docker tunnel to a host

use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Args;
use console::style;
use fleetlink_core::{
    Compatibility, Config, Host, HostConfig, K8S_VERSION, SshDialerFactory, TunnelError,
    TunnelOutcome, TunnelStage, load_hosts,
};

use crate::output::{CommandSpinner, SpinnerAwarePrompt};

/// Arguments for host up command
#[derive(Args)]
pub struct HostUpArgs {
    /// Name of the host to connect to
    pub name: String,

    /// Fail on an unsupported Docker version even if the host only warns
    #[arg(long)]
    pub enforce_docker_version: bool,
}

pub async fn cmd_host_up(args: &HostUpArgs, config: &Config, quiet: bool, verbose: u8) -> Result<()> {
    let hosts = load_hosts()?;

    let host_config = hosts
        .get_host(&args.name)
        .ok_or_else(|| anyhow::anyhow!("Host '{}' not found.", args.name))?;
    let host_config = if args.enforce_docker_version {
        host_config.clone().with_enforce_docker_version(true)
    } else {
        host_config.clone()
    };

    let mut host = Host::from_config(&host_config);
    let versions = config.version_table();

    let spinner = CommandSpinner::new_maybe(
        &format!(
            "Opening tunnel to {} ({}@{})...",
            style(&args.name).cyan(),
            host.user(),
            host.address()
        ),
        quiet,
    );
    let prompt = SpinnerAwarePrompt::new(spinner.handle());
    let factory =
        SshDialerFactory::new(Arc::new(prompt)).with_connect_timeout(config.connect_timeout());

    match host.tunnel_up(&factory, &versions).await {
        Ok(outcome) => {
            spinner.success("Tunnel established");
            if quiet {
                // Advisory mismatches are warnings; keep them visible
                if let Some(warning) = unsupported_warning(&args.name, &outcome) {
                    eprintln!("{} {}", style("Warning:").yellow().bold(), warning);
                }
            } else {
                print_outcome(&args.name, &host_config, &outcome);
                if verbose > 0 {
                    if let Some(docker) = host.docker() {
                        println!("  {:<15} {}", style("Relay:").dim(), docker.relay_url());
                        if let Ok(version) = docker.version().await {
                            println!("  {:<15} {}", style("Engine:").dim(), version);
                        }
                    }
                }
            }
            Ok(())
        }
        Err(e) => {
            spinner.fail("Tunnel setup failed");
            if !quiet {
                println!();
                println!("  {e}");
                println!();
                print_hints(&host_config, &e);
            }
            bail!("Tunnel setup failed at {} stage", e.stage());
        }
    }
}

fn print_outcome(name: &str, config: &HostConfig, outcome: &TunnelOutcome) {
    let TunnelOutcome::Established {
        info,
        compatibility,
    } = outcome
    else {
        return;
    };

    println!();
    println!("  {:<15} {}", style("Host:").dim(), name);
    println!(
        "  {:<15} {}@{}:{}",
        style("SSH:").dim(),
        config.user,
        config.address,
        config.ssh_port()
    );
    println!(
        "  {:<15} {}",
        style("Docker:").dim(),
        info.server_version.as_deref().unwrap_or("unknown")
    );
    if let Some(os) = &info.operating_system {
        println!("  {:<15} {}", style("OS:").dim(), os);
    }

    match compatibility {
        Compatibility::Supported => println!(
            "  {:<15} {}",
            style("Support:").dim(),
            style(format!("supported for release {K8S_VERSION}")).green()
        ),
        Compatibility::Unsupported { supported, .. } => {
            println!(
                "  {:<15} {}",
                style("Support:").dim(),
                style(format!("unsupported for release {K8S_VERSION}")).yellow()
            );
            println!(
                "  {:<15} {}",
                style("Supported:").dim(),
                supported.join(", ")
            );
        }
    }
}

/// One-line warning for an advisory version mismatch
fn unsupported_warning(name: &str, outcome: &TunnelOutcome) -> Option<String> {
    match outcome {
        TunnelOutcome::Established {
            compatibility: Compatibility::Unsupported { version, supported },
            ..
        } => Some(format!(
            "Docker {version} on host '{name}' is not supported for release {K8S_VERSION} (supported: {})",
            supported.join(", ")
        )),
        _ => None,
    }
}

fn print_hints(config: &HostConfig, err: &TunnelError) {
    println!("{}", style("Troubleshooting:").yellow());
    match err.stage() {
        TunnelStage::Dialer => {
            println!(
                "  1. Verify SSH access: ssh -i {} -p {} {}@{}",
                config.ssh_key_path,
                config.ssh_port(),
                config.user,
                config.address
            );
            println!("  2. Check the private key path and passphrase");
        }
        TunnelStage::ClientInit | TunnelStage::DaemonInfo => {
            println!(
                "  1. Check Docker is running: ssh {}@{} docker info",
                config.user, config.address
            );
            println!(
                "  2. Ensure {} can read /var/run/docker.sock (docker group)",
                config.user
            );
        }
        TunnelStage::VersionCheck => {
            println!("  1. Install a supported Docker version on the host");
            println!(
                "  2. Or override the table with \"docker_versions\" in the fleetlink config"
            );
        }
    }
}
