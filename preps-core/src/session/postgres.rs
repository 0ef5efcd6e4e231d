//! PostgreSQL session over a single connection.
//!
//! # Security Features
//! - The `ConnectionConfig` is consumed on connect, so its zeroizing copy of
//!   the password is wiped as soon as the connection is open. The connect
//!   options hold a plain copy for the duration of the handshake only; that
//!   copy is freed but not zeroed
//! - Statement logging is disabled so bound values never reach the logs
//! - Errors name the operation, never the credentials

use super::Session;
use crate::{PrepsError, Result, config::ConnectionConfig, models::PersonRecord};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgStatement};
use sqlx::{ConnectOptions, Connection, Executor, Statement};
use tracing::debug;

/// One PostgreSQL connection; no pool.
pub struct PgSession {
    conn: PgConnection,
}

impl PgSession {
    /// Opens a connection using `config`.
    ///
    /// # Security
    /// `config` is taken by value and dropped before this function returns,
    /// which zeroes the password it carried. `PgConnectOptions` keeps its own
    /// unzeroized copy; it is dropped right after the handshake.
    ///
    /// # Errors
    /// Returns error if the config is invalid or the server cannot be reached
    /// or refuses the login.
    pub async fn connect(config: ConnectionConfig) -> Result<Self> {
        config.validate()?;

        debug!("Connecting to {}", config);
        let conn = {
            let options = PgConnectOptions::new()
                .host(&config.host)
                .port(config.port)
                .username(&config.user)
                .password(config.password.expose())
                .database(&config.database)
                .disable_statement_logging();
            options.connect().await
        }
        .map_err(|e| PrepsError::connection_failed(format!("connecting to {}", config), e))?;

        drop(config);
        Ok(Self { conn })
    }
}

#[async_trait]
impl Session for PgSession {
    type Statement = PgStatement<'static>;

    async fn prepare(&mut self, sql: &'static str) -> Result<Self::Statement> {
        self.conn
            .prepare(sql)
            .await
            .map_err(|e| PrepsError::prepare_failed(sql, e))
    }

    async fn execute_insert(
        &mut self,
        statement: &Self::Statement,
        person: &PersonRecord,
    ) -> Result<u64> {
        let result = statement
            .query()
            .bind(person.id)
            .bind(person.name.clone())
            .bind(person.surname.clone())
            .execute(&mut self.conn)
            .await
            .map_err(|e| PrepsError::insert_failed(person.id, e))?;

        Ok(result.rows_affected())
    }

    async fn close(self) -> Result<()> {
        self.conn
            .close()
            .await
            .map_err(|e| PrepsError::connection_failed("closing session", e))
    }
}
