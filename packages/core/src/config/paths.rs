//! Location of fleetlink's config.json and hosts.json
//!
//! `FLEETLINK_CONFIG_DIR` overrides the directory outright. Otherwise files
//! live under `~/.config/fleetlink/` on Unix and `%APPDATA%\fleetlink\` on
//! Windows.

use std::env;
use std::path::PathBuf;

/// Environment variable that relocates the config directory
pub const CONFIG_DIR_ENV: &str = "FLEETLINK_CONFIG_DIR";

const APP_DIR: &str = "fleetlink";

/// Directory holding config.json and hosts.json
pub fn get_config_dir() -> Option<PathBuf> {
    if let Some(dir) = env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    default_config_dir()
}

#[cfg(unix)]
fn default_config_dir() -> Option<PathBuf> {
    // XDG-style on macOS too, not ~/Library
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(".config").join(APP_DIR))
}

#[cfg(windows)]
fn default_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.config_dir().join(APP_DIR))
}

#[cfg(not(any(unix, windows)))]
fn default_config_dir() -> Option<PathBuf> {
    None
}

pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|d| d.join("config.json"))
}

pub fn get_hosts_path() -> Option<PathBuf> {
    get_config_dir().map(|d| d.join("hosts.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_share_the_config_dir() {
        let (Some(config), Some(hosts)) = (get_config_path(), get_hosts_path()) else {
            return;
        };
        assert_eq!(config.parent(), hosts.parent());
        assert!(config.ends_with("config.json"));
        assert!(hosts.ends_with("hosts.json"));
    }

    #[cfg(unix)]
    #[test]
    fn default_dir_is_xdg_style() {
        let dir = default_config_dir().unwrap();
        assert!(dir.ends_with(".config/fleetlink"));
    }
}
