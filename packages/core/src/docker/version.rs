//! Docker daemon version compatibility
//!
//! Maps orchestration releases to the Docker versions they were validated
//! against and checks a daemon's reported version against that table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::K8S_VERSION;

/// Docker versions validated for each orchestration release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionTable {
    releases: BTreeMap<String, Vec<String>>,
}

impl Default for VersionTable {
    fn default() -> Self {
        Self::new().with_release(K8S_VERSION, ["1.11.2", "1.12.6", "1.13.1", "17.03.2"])
    }
}

impl VersionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            releases: BTreeMap::new(),
        }
    }

    /// Builder pattern: set the supported versions for a release
    pub fn with_release<I, S>(mut self, release: impl Into<String>, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.releases
            .insert(release.into(), versions.into_iter().map(Into::into).collect());
        self
    }

    /// Supported versions for `release`, if the release is known
    pub fn supported(&self, release: &str) -> Option<&[String]> {
        self.releases.get(release).map(Vec::as_slice)
    }

    /// Known release identifiers
    pub fn releases(&self) -> impl Iterator<Item = &str> {
        self.releases.keys().map(String::as_str)
    }
}

/// Result of checking a daemon version against the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compatibility {
    /// Version is listed for the release
    Supported,
    /// Version is not listed; `supported` is the full list for the release
    Unsupported {
        version: String,
        supported: Vec<String>,
    },
}

impl Compatibility {
    pub fn is_supported(&self) -> bool {
        matches!(self, Compatibility::Supported)
    }
}

/// Compatibility cannot be assessed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// Release is absent from the table
    #[error("no supported Docker versions are defined for release {0}")]
    UnknownRelease(String),

    /// Release is present but lists nothing
    #[error("supported Docker version list for release {0} is empty")]
    EmptyRelease(String),

    /// Daemon did not report a version
    #[error("Docker daemon did not report a server version")]
    MissingServerVersion,
}

/// Check `server_version` against the versions supported by `release`
///
/// Matching is exact: a version must appear verbatim in the table.
pub fn check_docker_version(
    table: &VersionTable,
    release: &str,
    server_version: Option<&str>,
) -> Result<Compatibility, VersionError> {
    let supported = table
        .supported(release)
        .ok_or_else(|| VersionError::UnknownRelease(release.to_string()))?;
    if supported.is_empty() {
        return Err(VersionError::EmptyRelease(release.to_string()));
    }

    let version = server_version
        .filter(|v| !v.is_empty())
        .ok_or(VersionError::MissingServerVersion)?;

    if supported.iter().any(|s| s == version) {
        Ok(Compatibility::Supported)
    } else {
        Ok(Compatibility::Unsupported {
            version: version.to_string(),
            supported: supported.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> VersionTable {
        VersionTable::new().with_release("1.8", ["1.12.0", "1.13.0"])
    }

    #[test]
    fn listed_version_is_supported() {
        let result = check_docker_version(&table(), "1.8", Some("1.13.0")).unwrap();
        assert!(result.is_supported());
    }

    #[test]
    fn unlisted_version_reports_full_supported_set() {
        let result = check_docker_version(&table(), "1.8", Some("1.11.0")).unwrap();
        assert_eq!(
            result,
            Compatibility::Unsupported {
                version: "1.11.0".to_string(),
                supported: vec!["1.12.0".to_string(), "1.13.0".to_string()],
            }
        );
    }

    #[test]
    fn matching_is_exact_not_semver() {
        let result = check_docker_version(&table(), "1.8", Some("1.13.0-ce")).unwrap();
        assert!(!result.is_supported());
        let result = check_docker_version(&table(), "1.8", Some("1.13")).unwrap();
        assert!(!result.is_supported());
    }

    #[test]
    fn unknown_release_cannot_be_assessed() {
        let err = check_docker_version(&table(), "1.9", Some("1.12.0")).unwrap_err();
        assert_eq!(err, VersionError::UnknownRelease("1.9".to_string()));
    }

    #[test]
    fn empty_release_cannot_be_assessed() {
        let table = VersionTable::new().with_release("1.8", Vec::<String>::new());
        let err = check_docker_version(&table, "1.8", Some("1.12.0")).unwrap_err();
        assert_eq!(err, VersionError::EmptyRelease("1.8".to_string()));
    }

    #[test]
    fn missing_server_version_cannot_be_assessed() {
        assert_eq!(
            check_docker_version(&table(), "1.8", None),
            Err(VersionError::MissingServerVersion)
        );
        assert_eq!(
            check_docker_version(&table(), "1.8", Some("")),
            Err(VersionError::MissingServerVersion)
        );
    }

    #[test]
    fn default_table_covers_pinned_release() {
        let table = VersionTable::default();
        let supported = table.supported(K8S_VERSION).unwrap();
        assert!(supported.contains(&"17.03.2".to_string()));
    }

    #[test]
    fn table_deserializes_from_plain_map() {
        let table: VersionTable =
            serde_json::from_str(r#"{"1.8": ["1.12.0", "1.13.0"]}"#).unwrap();
        assert_eq!(table, self::table());
    }
}
