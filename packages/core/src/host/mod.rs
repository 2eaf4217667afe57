//! Host management module
//!
//! Provides functionality for reaching Docker on fleet nodes:
//! - Host configuration schema and storage
//! - SSH credential resolution and session authentication
//! - Pluggable dialers that tunnel Docker API traffic over SSH
//! - Tunnel setup with daemon version gating

mod auth;
mod credentials;
mod dialer;
mod error;
mod schema;
mod storage;
mod tunnel;

// Public exports
pub use auth::{AuthConfig, HostKeyPolicy, build_auth_config};
pub use credentials::{
    PASSPHRASE_PROMPT, SecretPrompt, Signer, TerminalPrompt, expand_home, parse_private_key,
    read_key_file, resolve_signer,
};
pub use dialer::{
    AsyncStream, DEFAULT_CONNECT_TIMEOUT, Dialer, DialerFactory, SshDialerFactory, TunnelStream,
};
pub use error::{CredentialError, DialerError, HostError, KeyParseError, TunnelError, TunnelStage};
pub use schema::{DEFAULT_SSH_KEY_PATH, DEFAULT_SSH_PORT, HostConfig, HostsFile};
pub use storage::{load_hosts, load_hosts_from, save_hosts, save_hosts_to};
pub use tunnel::{EngineState, Host, TunnelFailure, TunnelOutcome};
