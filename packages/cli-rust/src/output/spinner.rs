//! Command spinner with elapsed time display
//!
//! Provides visual feedback while a tunnel is being dialed, and can step
//! aside for interactive prompts.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// A spinner for command operations with elapsed time display
///
/// It respects quiet mode by becoming a no-op when quiet is enabled.
pub struct CommandSpinner {
    bar: Option<ProgressBar>,
}

impl CommandSpinner {
    /// Create a new spinner with the given message
    ///
    /// Shows: `spinner message (HH:MM:SS)`
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.green} {msg} ({elapsed_precise:.dim})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(bar) }
    }

    /// Create a spinner that respects quiet mode
    pub fn new_maybe(message: &str, quiet: bool) -> Self {
        if quiet {
            Self { bar: None }
        } else {
            Self::new(message)
        }
    }

    /// Handle for hiding the spinner from another thread
    pub fn handle(&self) -> Option<ProgressBar> {
        self.bar.clone()
    }

    /// Finish the spinner with a success message (green checkmark)
    pub fn success(self, message: &str) {
        if let Some(bar) = self.bar {
            bar.finish_with_message(format!(
                "{} {}",
                console::style("\u{2713}").green(),
                message
            ));
        }
    }

    /// Finish the spinner with a failure message (red X)
    pub fn fail(self, message: &str) {
        if let Some(bar) = self.bar {
            bar.finish_with_message(format!("{} {}", console::style("\u{2717}").red(), message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spinner_new_does_not_panic() {
        let spinner = CommandSpinner::new("test");
        spinner.success("done");
    }

    #[test]
    fn spinner_quiet_mode_is_noop() {
        let spinner = CommandSpinner::new_maybe("test", true);
        assert!(spinner.bar.is_none());
        assert!(spinner.handle().is_none());
        spinner.fail("failed");
    }
}
