//! Connection configuration front end for the `preps` load tool.
//!
//! Resolves database, host, port, user and password from three sources in
//! fixed precedence: command-line options, an interactive masked prompt and a
//! fallback properties file. The `preps` binary feeds the result into
//! [`preps_core::BatchInserter`].
//!
//! # Security Guarantees
//! - The password is held in a zeroizing container from the moment it is read
//! - `-w` and `-W` are mutually exclusive
//! - The prompt refuses to run without an interactive terminal

pub mod cli;
pub mod error;
pub mod prompt;
pub mod resolver;
pub mod run;

pub use error::{ConfigError, FAILURE_EXIT_CODE};
pub use prompt::{NoTerminal, SecretSource, StaticSecret, TerminalPrompt};
pub use resolver::{ConfigResolver, ConfigResult, load_properties};
pub use run::run_synthetic;
