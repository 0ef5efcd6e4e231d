//! Interactive password input.
//!
//! The resolver asks a [`SecretSource`] for the password instead of touching
//! the console directly, so tests can supply one without a terminal.

use crate::error::ConfigError;
use preps_core::Secret;
use std::io::IsTerminal;

/// Text shown before reading the password.
pub const PASSWORD_PROMPT: &str = "Please enter your password: ";

/// Something that can hand out a password on request.
pub trait SecretSource {
    /// Reads one secret, showing `prompt` if the source is interactive.
    ///
    /// # Errors
    /// Returns [`ConfigError::TerminalUnavailable`] if no interactive
    /// terminal is attached, or [`ConfigError::SecretPrompt`] if reading fails.
    fn read_secret(&mut self, prompt: &str) -> Result<Secret, ConfigError>;
}

/// Reads the password from the controlling terminal with echo disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl SecretSource for TerminalPrompt {
    fn read_secret(&mut self, prompt: &str) -> Result<Secret, ConfigError> {
        if !std::io::stdin().is_terminal() {
            return Err(ConfigError::TerminalUnavailable);
        }

        rpassword::prompt_password(prompt)
            .map(Secret::new)
            .map_err(|source| ConfigError::SecretPrompt { source })
    }
}

/// Hands out a fixed password. Useful for embedding and tests.
#[derive(Debug, Clone)]
pub struct StaticSecret {
    secret: Secret,
    reads: usize,
}

impl StaticSecret {
    /// Wraps `secret`.
    pub fn new(secret: impl Into<Secret>) -> Self {
        Self {
            secret: secret.into(),
            reads: 0,
        }
    }

    /// How many times the secret has been requested.
    pub const fn reads(&self) -> usize {
        self.reads
    }
}

impl SecretSource for StaticSecret {
    fn read_secret(&mut self, _prompt: &str) -> Result<Secret, ConfigError> {
        self.reads = self.reads.saturating_add(1);
        Ok(self.secret.clone())
    }
}

/// Source for non-interactive contexts: every request fails with
/// [`ConfigError::TerminalUnavailable`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTerminal;

impl SecretSource for NoTerminal {
    fn read_secret(&mut self, _prompt: &str) -> Result<Secret, ConfigError> {
        Err(ConfigError::TerminalUnavailable)
    }
}
