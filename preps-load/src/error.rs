//! Configuration resolution errors.
//!
//! Every variant is fatal for the `preps` binary, which prints the message
//! (plus usage where [`ConfigError::wants_usage`] says so) and exits with
//! [`FAILURE_EXIT_CODE`]. Library callers decide for themselves.

use thiserror::Error;

/// Process exit status for any configuration failure.
pub const FAILURE_EXIT_CODE: i32 = -1;

/// Why a connection setting could not be resolved.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed or conflicting command-line tokens
    #[error("Parsing failed. Reason: {}", clap_reason(.0))]
    ArgumentParse(#[from] clap::Error),

    /// A required field is absent from every source
    #[error("Missing option {field}")]
    MissingConfiguration {
        /// Name of the field, as used on the command line and in the properties file
        field: &'static str,
    },

    /// A port value from either source is not a valid port number
    #[error("Invalid port '{value}': {source}")]
    InvalidPort {
        /// The rejected text
        value: String,
        /// Why it did not parse
        #[source]
        source: std::num::ParseIntError,
    },

    /// A password prompt was requested but stdin is not a terminal
    #[error("Couldn't get console instance! A password prompt needs an interactive terminal")]
    TerminalUnavailable,

    /// Reading the masked password failed
    #[error("Failed to read password: {source}")]
    SecretPrompt {
        /// Underlying terminal error
        #[source]
        source: std::io::Error,
    },

    /// The password was already wiped with `forget_password`
    #[error("Password has already been cleared")]
    PasswordCleared,
}

impl ConfigError {
    /// Creates a missing-field error.
    pub const fn missing(field: &'static str) -> Self {
        Self::MissingConfiguration { field }
    }

    /// Returns true if the full usage text should accompany the message.
    pub const fn wants_usage(&self) -> bool {
        matches!(self, Self::ArgumentParse(_) | Self::InvalidPort { .. })
    }

    /// Returns true for `--help` and `--version`, which are not failures.
    pub fn is_informational(&self) -> bool {
        matches!(
            self,
            Self::ArgumentParse(e) if matches!(
                e.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            )
        )
    }

    /// Exit status the binary uses for this error.
    pub const fn exit_code(&self) -> i32 {
        FAILURE_EXIT_CODE
    }
}

/// First paragraph of a rendered clap error, without the `error:` label.
/// Drops clap's own usage line and `--help` hint; callers print full usage.
fn clap_reason(error: &clap::Error) -> String {
    let rendered = error.render().to_string();
    let first = rendered.split("\n\n").next().unwrap_or_default().trim();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}
