//! fleetlink versions - Show supported Docker versions

use anyhow::Result;
use clap::Args;
use console::style;
use fleetlink_core::{Config, K8S_VERSION, VersionTable};

/// Arguments for versions command
#[derive(Args)]
pub struct VersionsArgs {
    /// Show every release in the table, not just the pinned one
    #[arg(long)]
    pub all: bool,
}

pub fn cmd_versions(args: &VersionsArgs, config: &Config, quiet: bool) -> Result<()> {
    let table = config.version_table();
    let source = if config.docker_versions.is_some() {
        "config override"
    } else {
        "built-in"
    };

    for release in releases_to_show(&table, args.all) {
        let supported = table.supported(&release).unwrap_or_default();
        if quiet {
            println!("{release}: {}", supported.join(" "));
            continue;
        }

        let marker = if release == K8S_VERSION {
            style(" (pinned)").green().to_string()
        } else {
            String::new()
        };
        println!("{}{}", style(format!("Release {release}")).cyan().bold(), marker);
        if supported.is_empty() {
            println!("  {}", style("no supported versions listed").yellow());
        }
        for version in supported {
            println!("  {version}");
        }
    }

    if !quiet {
        println!();
        println!("  {} {}", style("Source:").dim(), style(source).dim());
    }

    Ok(())
}

fn releases_to_show(table: &VersionTable, all: bool) -> Vec<String> {
    if all {
        table.releases().map(str::to_string).collect()
    } else {
        vec![K8S_VERSION.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinned_release_only_by_default() {
        let table = VersionTable::default().with_release("1.9", ["17.03.2"]);
        assert_eq!(releases_to_show(&table, false), vec!["1.8".to_string()]);
        assert_eq!(
            releases_to_show(&table, true),
            vec!["1.8".to_string(), "1.9".to_string()]
        );
    }
}
