//! SSH session authentication settings

use std::sync::Arc;

use russh_keys::key::KeyPair;

use super::credentials::Signer;

/// How the server's host key is verified when the session opens
///
/// `AcceptAny` trusts whatever key the node presents. Nodes are not pinned
/// against known_hosts, so a spoofed node on the network path would be
/// accepted; operators relying on this must secure the network itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKeyPolicy {
    /// Accept any host identity
    AcceptAny,
}

impl HostKeyPolicy {
    /// Decide whether a presented host key is acceptable
    pub fn accepts(&self, fingerprint: &str) -> bool {
        match self {
            HostKeyPolicy::AcceptAny => {
                tracing::debug!("Accepting host key {} without verification", fingerprint);
                true
            }
        }
    }
}

/// Immutable authentication settings for one SSH session
#[derive(Debug, Clone)]
pub struct AuthConfig {
    user: String,
    signer: Signer,
    host_key_policy: HostKeyPolicy,
}

impl AuthConfig {
    /// SSH user to authenticate as
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Host key verification policy
    pub fn host_key_policy(&self) -> HostKeyPolicy {
        self.host_key_policy
    }

    /// Algorithm of the public key offered to the server
    pub fn key_algorithm(&self) -> &'static str {
        self.signer.algorithm()
    }

    pub(crate) fn key_pair(&self) -> Arc<KeyPair> {
        self.signer.key_pair()
    }
}

/// Build public key authentication settings for `user`
pub fn build_auth_config(user: &str, signer: Signer) -> AuthConfig {
    AuthConfig {
        user: user.to_string(),
        signer,
        host_key_policy: HostKeyPolicy::AcceptAny,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::credentials::parse_private_key;
    use crate::host::credentials::tests::PLAIN_KEY;

    #[test]
    fn auth_config_accepts_any_host_key() {
        let signer = parse_private_key(PLAIN_KEY, None).unwrap();
        let config = build_auth_config("rancher", signer);

        assert_eq!(config.user(), "rancher");
        assert_eq!(config.host_key_policy(), HostKeyPolicy::AcceptAny);
        assert_eq!(config.key_algorithm(), "ssh-ed25519");
        assert!(config.host_key_policy().accepts("SHA256:anything"));
    }
}
