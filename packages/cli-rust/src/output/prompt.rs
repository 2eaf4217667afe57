//! Passphrase prompt that pauses the spinner

use std::io;

use fleetlink_core::{SecretPrompt, TerminalPrompt};
use indicatif::ProgressBar;

/// Terminal prompt that hides a running spinner while it reads
pub struct SpinnerAwarePrompt {
    spinner: Option<ProgressBar>,
}

impl SpinnerAwarePrompt {
    pub fn new(spinner: Option<ProgressBar>) -> Self {
        Self { spinner }
    }
}

impl SecretPrompt for SpinnerAwarePrompt {
    fn read_secret(&self, prompt: &str) -> io::Result<String> {
        match &self.spinner {
            Some(bar) => bar.suspend(|| TerminalPrompt.read_secret(prompt)),
            None => TerminalPrompt.read_secret(prompt),
        }
    }
}
