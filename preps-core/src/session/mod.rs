//! Session seam between the inserter and the database driver.
//!
//! A session compiles a statement once and executes it many times. The
//! inserter only talks to this trait, so it can run against PostgreSQL or an
//! in-memory recorder in tests.
//!
//! # Module Structure
//! - `postgres`: single-connection PostgreSQL session (feature `postgresql`)

use crate::{Result, models::PersonRecord};
use async_trait::async_trait;

#[cfg(feature = "postgresql")]
pub mod postgres;

#[cfg(feature = "postgresql")]
pub use postgres::PgSession;

/// Insert statement compiled once per inserter. Parameter order is
/// fixed: (id, name, surname).
pub const INSERT_PERSON_SQL: &str = "INSERT INTO person VALUES ($1, $2, $3)";

/// An open connection able to prepare and execute statements.
///
/// # Concurrency
/// Methods take `&mut self`: a session executes one statement at a time and
/// is never shared between tasks.
#[async_trait]
pub trait Session: Send + Sized {
    /// Handle to a compiled statement, valid for this session only.
    type Statement: Send + Sync;

    /// Compiles `sql` on the server.
    ///
    /// # Errors
    /// Returns [`crate::PrepsError::Statement`] if the store rejects the SQL.
    async fn prepare(&mut self, sql: &'static str) -> Result<Self::Statement>;

    /// Binds `person` as (id, name, surname) to `statement` and executes it.
    ///
    /// # Returns
    /// Number of rows the store reports as affected.
    ///
    /// # Errors
    /// Returns [`crate::PrepsError::InsertExecution`] if the store rejects
    /// the row or the connection fails.
    async fn execute_insert(
        &mut self,
        statement: &Self::Statement,
        person: &PersonRecord,
    ) -> Result<u64>;

    /// Ends the session.
    ///
    /// # Errors
    /// Returns [`crate::PrepsError::Connection`] if the session cannot be
    /// shut down cleanly. Rows already executed stay written.
    async fn close(self) -> Result<()>;
}
