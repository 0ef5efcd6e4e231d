//! Repeated single-row inserts through one prepared statement.
//!
//! `BatchInserter` compiles [`INSERT_PERSON_SQL`] once and reuses the handle
//! for every row, so parse and plan cost is paid a single time. Each row is
//! its own round trip; there is no grouped execution and no transaction, so
//! rows that succeed stay written even when a later row fails.
//!
//! # Failure policy
//! A failed row is logged and reported as [`RowOutcome::Failed`]; it never
//! aborts the caller. Callers that ignore the outcome get fire-and-forget
//! behavior. Synthetic runs continue past failures unless
//! [`FailurePolicy::AbortOnError`] is requested.
//!
//! # Module Structure
//! - `report`: per-row outcomes and the batch summary
//! - `token`: synthetic name tokens

mod report;
mod token;

pub use report::{BatchReport, FailurePolicy, RowOutcome};
pub use token::{TOKEN_LEN, random_token};

use crate::{
    Result,
    models::PersonRecord,
    session::{INSERT_PERSON_SQL, Session},
};
use tracing::{debug, error, info, warn};

/// Owns a session and the single statement compiled on it.
///
/// The statement is bound to this session for the inserter's lifetime and is
/// never recompiled or moved to another session.
pub struct BatchInserter<S: Session> {
    session: S,
    statement: S::Statement,
}

impl<S: Session> BatchInserter<S> {
    /// Prepares [`INSERT_PERSON_SQL`] on `session`.
    ///
    /// # Errors
    /// Returns a statement error if the store cannot compile the insert
    /// (for example when the `person` table does not exist).
    pub async fn new(mut session: S) -> Result<Self> {
        let statement = session.prepare(INSERT_PERSON_SQL).await?;
        debug!("Prepared insert statement: {}", INSERT_PERSON_SQL);
        Ok(Self { session, statement })
    }

    /// Inserts one person, binding (id, name, surname) in that order.
    ///
    /// Failures are logged with the full error chain and returned as
    /// [`RowOutcome::Failed`]; nothing is propagated.
    pub async fn insert_person(&mut self, id: i32, name: &str, surname: &str) -> RowOutcome {
        self.insert(&PersonRecord::new(id, name, surname)).await
    }

    /// Inserts an already built record. Same policy as [`Self::insert_person`].
    pub async fn insert(&mut self, person: &PersonRecord) -> RowOutcome {
        match self
            .session
            .execute_insert(&self.statement, person)
            .await
        {
            Ok(rows) => {
                debug!("Inserted person {} ({} row(s))", person.id, rows);
                RowOutcome::Inserted { id: person.id }
            }
            Err(err) => {
                error!(id = person.id, "Inserting a new person failed: {}", err.diagnostic());
                RowOutcome::Failed {
                    id: person.id,
                    error: err,
                }
            }
        }
    }

    /// Inserts `count` synthetic people with ids `start..start + count`,
    /// continuing past failed rows.
    ///
    /// Name and surname of each row are the same [`random_token`].
    pub async fn create_random_person(&mut self, count: u32, start: i32) -> BatchReport {
        self.create_random_person_with_policy(count, start, FailurePolicy::ContinueOnError)
            .await
    }

    /// Like [`Self::create_random_person`] but with an explicit failure policy.
    ///
    /// Ids that would exceed `i32::MAX` are not generated; the run stops
    /// early with a warning.
    pub async fn create_random_person_with_policy(
        &mut self,
        count: u32,
        start: i32,
        policy: FailurePolicy,
    ) -> BatchReport {
        let mut report = BatchReport::with_capacity(count);
        info!("Inserting {} synthetic people starting at id {}", count, start);

        for offset in 0..count {
            let Some(id) = i32::try_from(offset)
                .ok()
                .and_then(|offset| start.checked_add(offset))
            else {
                warn!(
                    "Stopping after {} rows: id {} + {} overflows",
                    offset, start, offset
                );
                break;
            };

            let token = random_token();
            let outcome = self.insert_person(id, &token, &token).await;
            let failed = outcome.is_failed();
            report.push(outcome);

            if failed && policy == FailurePolicy::AbortOnError {
                warn!("Aborting synthetic run after failure at id {}", id);
                report.mark_aborted();
                break;
            }
        }

        info!(
            "Synthetic run finished: {} inserted, {} failed",
            report.inserted(),
            report.failed()
        );
        report
    }

    /// Borrows the underlying session.
    pub fn session(&self) -> &S {
        &self.session
    }

    /// Releases the statement and returns the session.
    pub fn into_session(self) -> S {
        self.session
    }

    /// Releases the statement and closes the session.
    ///
    /// # Errors
    /// Returns the session's close error. Rows already inserted stay written.
    pub async fn close(self) -> Result<()> {
        let Self { session, statement } = self;
        drop(statement);
        session.close().await
    }
}
