//! Synthetic insert run over an open session.

use crate::cli::RunArgs;
use preps_core::{BatchInserter, BatchReport, FailurePolicy, Result, Session};
use tracing::warn;

/// Prepares the insert on `session`, inserts `args.count` synthetic people
/// and closes the session.
///
/// A failure to close is logged and does not discard the report: the rows
/// are already written by then.
///
/// # Errors
/// Returns a statement error if the insert cannot be prepared.
pub async fn run_synthetic<S: Session>(session: S, args: &RunArgs) -> Result<BatchReport> {
    let mut inserter = BatchInserter::new(session).await?;

    let report = inserter
        .create_random_person_with_policy(args.count, args.start, failure_policy(args))
        .await;

    if let Err(e) = inserter.close().await {
        warn!("Closing the session failed after the run: {}", e.diagnostic());
    }

    Ok(report)
}

const fn failure_policy(args: &RunArgs) -> FailurePolicy {
    if args.abort_on_error {
        FailurePolicy::AbortOnError
    } else {
        FailurePolicy::ContinueOnError
    }
}
