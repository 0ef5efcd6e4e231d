//! Prepared statement load generator.
//!
//! Resolves connection settings, opens one PostgreSQL session, compiles the
//! person insert once and runs it for a range of synthetic ids.
//!
//! # Security Guarantees
//! - Passwords are never logged and are wiped once the session is open
//! - `-W` reads the password with echo disabled
//! - Statement logging is disabled on the connection
//!
//! # Exit status
//! `0` on completion (rejected rows included), `-1` on any configuration or
//! connection failure and when `--abort-on-error` stopped the run.

use anyhow::Context;
use clap::Parser;
use preps_core::{BatchReport, PgSession, init_logging};
use preps_load::{
    ConfigError, ConfigResolver, FAILURE_EXIT_CODE, TerminalPrompt, run_synthetic,
    cli::{Cli, RunArgs, usage},
};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let err = ConfigError::from(e);
            if err.is_informational() {
                if let ConfigError::ArgumentParse(e) = err {
                    e.exit();
                }
                std::process::exit(0);
            }
            fail(&err);
        }
    };

    if let Err(e) = init_logging(cli.global.verbose, cli.global.quiet) {
        eprintln!("{}", e);
        std::process::exit(FAILURE_EXIT_CODE);
    }

    let resolver = ConfigResolver::load(cli.connection, &cli.run.properties, &mut TerminalPrompt)
        .unwrap_or_else(|e| fail(&e));
    let config = resolver.into_config().unwrap_or_else(|e| fail(&e));
    info!("Target: {}", config);

    match run(config, &cli.run).await {
        Ok(report) => {
            println!(
                "Inserted {} of {} people ({} failed)",
                report.inserted(),
                report.len(),
                report.failed()
            );
            if report.aborted() {
                error!("Run aborted after the first rejected row");
                std::process::exit(FAILURE_EXIT_CODE);
            }
        }
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(FAILURE_EXIT_CODE);
        }
    }
}

/// Connects and runs the synthetic batch. The session is closed before
/// returning; a close failure is only logged.
async fn run(config: preps_core::ConnectionConfig, args: &RunArgs) -> anyhow::Result<BatchReport> {
    let session = PgSession::connect(config)
        .await
        .context("Failed to open database session")?;

    run_synthetic(session, args)
        .await
        .context("Failed to prepare the person insert")
}

/// Prints a configuration error (with usage where helpful) and exits.
fn fail(err: &ConfigError) -> ! {
    eprintln!("{}", err);
    if err.wants_usage() {
        eprintln!();
        eprintln!("{}", usage());
    }
    std::process::exit(err.exit_code());
}
