//! SSH credential resolution
//!
//! Turns inline key material or a key file into a [`Signer`], recovering
//! passphrase-protected keys through an injected [`SecretPrompt`].

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use console::Term;
use russh_keys::key::KeyPair;

use super::error::{CredentialError, KeyParseError};

/// Prompt shown when an encrypted private key is detected
pub const PASSPHRASE_PROMPT: &str = "Passphrase for Private SSH Key: ";

/// Authentication credential derived from a private key
///
/// Cloning shares the underlying key; the raw key bytes are never exposed.
#[derive(Clone)]
pub struct Signer {
    key: Arc<KeyPair>,
}

impl Signer {
    /// SSH algorithm name of the key (e.g. `ssh-ed25519`)
    pub fn algorithm(&self) -> &'static str {
        self.key.name()
    }

    pub(crate) fn key_pair(&self) -> Arc<KeyPair> {
        Arc::clone(&self.key)
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("algorithm", &self.algorithm())
            .finish_non_exhaustive()
    }
}

/// Source of hidden interactive input
///
/// Production code binds this to the terminal; tests bind a scripted answer.
pub trait SecretPrompt: Send + Sync {
    /// Show `prompt` and read one line without echoing it
    fn read_secret(&self, prompt: &str) -> io::Result<String>;
}

/// [`SecretPrompt`] reading from the controlling terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl SecretPrompt for TerminalPrompt {
    fn read_secret(&self, prompt: &str) -> io::Result<String> {
        let term = Term::stdout();
        term.write_str(prompt)?;
        let secret = term.read_secure_line();
        // Input is hidden, so the cursor is still on the prompt line
        term.write_line("")?;
        secret
    }
}

/// Parse a private key, reporting encrypted keys as a distinct kind
pub fn parse_private_key(
    key_material: &str,
    passphrase: Option<&str>,
) -> Result<Signer, KeyParseError> {
    match russh_keys::decode_secret_key(key_material, passphrase) {
        Ok(key) => Ok(Signer { key: Arc::new(key) }),
        Err(russh_keys::Error::KeyIsEncrypted) => Err(KeyParseError::NeedsPassphrase),
        Err(e) => Err(KeyParseError::Invalid(e.to_string())),
    }
}

/// Resolve a signer from inline key material or a key file
///
/// Inline material takes precedence; `key_path` is only read when
/// `key_material` is empty. Encrypted keys trigger exactly one passphrase
/// prompt.
pub fn resolve_signer(
    key_material: &str,
    key_path: &str,
    prompt: &dyn SecretPrompt,
) -> Result<Signer, CredentialError> {
    tracing::debug!("[ssh] Checking private key");

    let from_file;
    let material = if key_material.is_empty() {
        from_file = read_key_file(key_path);
        from_file.as_str()
    } else {
        key_material
    };

    match parse_private_key(material, None) {
        Ok(signer) => Ok(signer),
        Err(KeyParseError::NeedsPassphrase) => {
            let passphrase = prompt
                .read_secret(PASSPHRASE_PROMPT)
                .map_err(CredentialError::Prompt)?;
            if passphrase.is_empty() {
                return Err(CredentialError::Declined);
            }
            parse_private_key(material, Some(&passphrase)).map_err(|e| match e {
                KeyParseError::NeedsPassphrase => CredentialError::WrongPassphrase(e.to_string()),
                KeyParseError::Invalid(msg) => CredentialError::WrongPassphrase(msg),
            })
        }
        Err(KeyParseError::Invalid(msg)) => Err(CredentialError::Malformed(msg)),
    }
}

/// Read a private key file after `~/` expansion
///
/// Read failures yield empty content; the parse step reports them instead.
pub fn read_key_file(key_path: &str) -> String {
    let path = expand_home(key_path, home_dir().as_deref());
    match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::debug!("Could not read private key {}: {}", path.display(), e);
            String::new()
        }
    }
}

/// Expand a leading `~/` against `home`
///
/// Paths without the shorthand, or with no home available, are returned as-is.
pub fn expand_home(path: &str, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) const PLAIN_KEY: &str = include_str!("../../tests/fixtures/id_ed25519");
    pub(crate) const ENCRYPTED_KEY: &str =
        include_str!("../../tests/fixtures/id_ed25519_encrypted");
    pub(crate) const PASSPHRASE: &str = "correct horse";

    /// Prompt that returns a fixed answer and counts how often it was asked
    pub(crate) struct ScriptedPrompt {
        answer: io::Result<String>,
        prompts: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedPrompt {
        pub(crate) fn answering(answer: &str) -> Self {
            Self {
                answer: Ok(answer.to_string()),
                prompts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                answer: Err(io::Error::new(io::ErrorKind::NotConnected, "no tty")),
                prompts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SecretPrompt for ScriptedPrompt {
        fn read_secret(&self, prompt: &str) -> io::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.answer {
                Ok(answer) => Ok(answer.clone()),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            }
        }
    }

    #[test]
    fn plain_key_resolves_without_prompt() {
        let prompt = ScriptedPrompt::answering("unused");
        let signer = resolve_signer(PLAIN_KEY, "", &prompt).unwrap();
        assert_eq!(signer.algorithm(), "ssh-ed25519");
        assert_eq!(prompt.calls(), 0);
    }

    #[test]
    fn encrypted_key_is_reported_as_needing_passphrase() {
        let result = parse_private_key(ENCRYPTED_KEY, None);
        assert!(matches!(result, Err(KeyParseError::NeedsPassphrase)));
    }

    #[test]
    fn encrypted_key_prompts_once_with_correct_passphrase() {
        let prompt = ScriptedPrompt::answering(PASSPHRASE);
        let signer = resolve_signer(ENCRYPTED_KEY, "", &prompt).unwrap();
        assert_eq!(signer.algorithm(), "ssh-ed25519");
        assert_eq!(prompt.calls(), 1);
        assert_eq!(
            prompt.prompts.lock().unwrap().as_slice(),
            [PASSPHRASE_PROMPT.to_string()]
        );
    }

    #[test]
    fn wrong_passphrase_fails_after_single_prompt() {
        let prompt = ScriptedPrompt::answering("battery staple");
        let result = resolve_signer(ENCRYPTED_KEY, "", &prompt);
        assert!(matches!(result, Err(CredentialError::WrongPassphrase(_))));
        assert_eq!(prompt.calls(), 1);
    }

    #[test]
    fn empty_passphrase_is_declined() {
        let prompt = ScriptedPrompt::answering("");
        let result = resolve_signer(ENCRYPTED_KEY, "", &prompt);
        assert!(matches!(result, Err(CredentialError::Declined)));
    }

    #[test]
    fn prompt_failure_is_propagated() {
        let prompt = ScriptedPrompt::failing();
        let result = resolve_signer(ENCRYPTED_KEY, "", &prompt);
        assert!(matches!(result, Err(CredentialError::Prompt(_))));
    }

    #[test]
    fn garbage_key_is_malformed_without_prompt() {
        let prompt = ScriptedPrompt::answering(PASSPHRASE);
        let result = resolve_signer("not a key", "", &prompt);
        assert!(matches!(result, Err(CredentialError::Malformed(_))));
        assert_eq!(prompt.calls(), 0);
    }

    #[test]
    fn key_path_used_when_material_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("id_ed25519");
        std::fs::write(&path, PLAIN_KEY).unwrap();

        let prompt = ScriptedPrompt::answering("unused");
        let signer = resolve_signer("", path.to_str().unwrap(), &prompt).unwrap();
        assert_eq!(signer.algorithm(), "ssh-ed25519");
    }

    #[test]
    fn inline_material_takes_precedence_over_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken");
        std::fs::write(&path, "garbage").unwrap();

        let prompt = ScriptedPrompt::answering("unused");
        assert!(resolve_signer(PLAIN_KEY, path.to_str().unwrap(), &prompt).is_ok());
    }

    #[test]
    fn unreadable_key_file_becomes_parse_error() {
        let prompt = ScriptedPrompt::answering("unused");
        let result = resolve_signer("", "/nonexistent/fleetlink/id_rsa", &prompt);
        assert!(matches!(result, Err(CredentialError::Malformed(_))));
    }

    #[test]
    fn home_shorthand_matches_explicit_home_path() {
        for home in ["/home/ops", "/root", "/tmp/with space", "relative/home"] {
            let home = Path::new(home);
            let explicit = format!("{}/.ssh/id_rsa", home.display());
            assert_eq!(
                expand_home("~/.ssh/id_rsa", Some(home)),
                expand_home(&explicit, Some(home)),
            );
        }
    }

    #[test]
    fn expand_home_leaves_other_paths_alone() {
        let home = Path::new("/home/ops");
        assert_eq!(
            expand_home("/etc/ssh/key", Some(home)),
            PathBuf::from("/etc/ssh/key")
        );
        assert_eq!(expand_home("~user/key", Some(home)), PathBuf::from("~user/key"));
        assert_eq!(expand_home("~/key", None), PathBuf::from("~/key"));
    }
}
