//! Version information for fleetlink

use crate::docker::{DOCKER_API_VERSION, K8S_VERSION};

/// Crate version as reported by `--version`
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Version line shown in verbose mode
///
/// Includes the orchestration release the Docker gate is pinned to and the
/// Engine API version spoken over the tunnel. A commit hash is appended when
/// `FLEETLINK_GIT_HASH` was set at build time.
pub fn get_version_long() -> String {
    let mut line = format!(
        "fleetlink {} (release {K8S_VERSION}, docker api {DOCKER_API_VERSION})",
        get_version()
    );
    if let Some(hash) = option_env!("FLEETLINK_GIT_HASH") {
        line.push_str(&format!(" [{hash}]"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_package_version() {
        assert_eq!(get_version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn long_version_names_pinned_release() {
        let long = get_version_long();
        assert!(long.starts_with(&format!("fleetlink {}", get_version())));
        assert!(long.contains("release 1.8"));
        assert!(long.contains("docker api 1.24"));
    }
}
