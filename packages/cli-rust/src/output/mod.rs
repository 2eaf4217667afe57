//! Output utilities for CLI commands
//!
//! Spinner with elapsed time for tunnel setup, and a passphrase prompt
//! that keeps the spinner out of the way.

pub mod prompt;
pub mod spinner;

pub use prompt::SpinnerAwarePrompt;
pub use spinner::CommandSpinner;
