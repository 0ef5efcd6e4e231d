//! Command-line schema for `preps`.
//!
//! The six connection flags live in [`ConnectionArgs`] so the resolver can be
//! driven either by the full [`Cli`] or by [`ConnectionCli`] alone.

use clap::{Args, CommandFactory, Parser};
use std::path::PathBuf;

/// Note printed with every usage text.
pub const PROPERTIES_NOTE: &str = "Every option which is not defined with the CLI arguments will be filled with default values from the Property File";

/// Default location of the fallback properties file.
pub const DEFAULT_PROPERTIES_FILE: &str = "statements.properties";

/// Connection options. Each one may be omitted and filled from the
/// properties file instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct ConnectionArgs {
    /// Database name to connect to
    #[arg(short = 'd', long, value_name = "DATABASE-NAME")]
    pub database: Option<String>,

    /// Database server host
    #[arg(short = 'H', long, value_name = "HOSTNAME")]
    pub host: Option<String>,

    // Kept as text: a bad value is reported as an invalid port when queried,
    // the same way a bad value from the properties file is.
    /// Database server port
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<String>,

    /// Database user name
    #[arg(short = 'u', long, value_name = "USERNAME")]
    pub user: Option<String>,

    /// Pass password as command line argument
    #[arg(
        short = 'w',
        long,
        value_name = "PASSWORD",
        conflicts_with = "password_prompt"
    )]
    pub password: Option<String>,

    /// Force password prompt
    #[arg(short = 'W', long = "password-prompt")]
    pub password_prompt: bool,
}

/// Parser for the connection options alone.
#[derive(Debug, Parser)]
#[command(name = "preps")]
#[command(about = "Resolve database connection settings")]
#[command(after_help = PROPERTIES_NOTE)]
pub struct ConnectionCli {
    /// Connection options
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Full `preps` command line.
#[derive(Debug, Parser)]
#[command(name = "preps")]
#[command(about = "Insert synthetic people through a prepared statement")]
#[command(version)]
#[command(long_about = "
preps - prepared statement load generator

Resolves connection settings from the command line, an optional password
prompt and a fallback properties file, then inserts synthetic rows into the
`person` table through a single prepared statement.

EXAMPLES:
  preps -d shop -H db1 -u ann -W --count 1000 --start 1
  preps --properties conf/statements.properties -n 50
")]
#[command(after_help = PROPERTIES_NOTE)]
pub struct Cli {
    /// Connection options
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Synthetic run options
    #[command(flatten)]
    pub run: RunArgs,

    /// Logging options
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options controlling the synthetic insert run.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Number of synthetic people to insert
    #[arg(short = 'n', long, default_value_t = 100)]
    pub count: u32,

    /// Id of the first synthetic person
    #[arg(short = 's', long, default_value_t = 1, allow_negative_numbers = true)]
    pub start: i32,

    /// Stop at the first rejected row instead of continuing
    #[arg(long)]
    pub abort_on_error: bool,

    /// Fallback properties file
    #[arg(
        long,
        env = "PREPS_PROPERTIES",
        value_name = "FILE",
        default_value = DEFAULT_PROPERTIES_FILE
    )]
    pub properties: PathBuf,
}

/// Verbosity options shared by every command.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all output except errors")]
    pub quiet: bool,
}

/// Renders the full help of the `preps` binary, properties note included.
pub fn usage() -> String {
    Cli::command().render_help().to_string()
}
