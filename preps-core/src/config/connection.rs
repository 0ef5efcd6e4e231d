//! Resolved database connection configuration.
//!
//! This module provides the `ConnectionConfig` struct handed from the
//! configuration resolver to the session.

use crate::security::Secret;

/// Port used when neither the command line nor the fallback store names one.
pub const DEFAULT_PORT: u16 = 5432;

/// Fully resolved connection settings.
///
/// Every field has been sourced from the command line, the interactive
/// prompt (password only) or the fallback store; `port` may also be
/// [`DEFAULT_PORT`].
///
/// # Security
/// The password is a [`Secret`], so it is zeroed when the config is dropped.
/// `Display` omits both user and password.
///
/// # Example
/// ```rust
/// use preps_core::config::ConnectionConfig;
///
/// let config = ConnectionConfig::new("shop", "db1", 5433, "ann", "p".into());
/// assert!(config.validate().is_ok());
/// assert_eq!(config.to_string(), "ConnectionConfig(db1:5433/shop)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Database name
    pub database: String,
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Login role
    pub user: String,
    /// Login password
    pub password: Secret,
}

impl std::fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Intentionally omit user and never include credentials
        write!(
            f,
            "ConnectionConfig({}:{}/{})",
            self.host, self.port, self.database
        )
    }
}

impl ConnectionConfig {
    /// Creates a config from already resolved values.
    pub fn new(
        database: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: Secret,
    ) -> Self {
        Self {
            database: database.into(),
            host: host.into(),
            port,
            user: user.into(),
            password,
        }
    }

    /// Validates connection configuration parameters.
    ///
    /// # Errors
    /// Returns error if the host, database or user is empty, or the port is 0
    pub fn validate(&self) -> crate::Result<()> {
        if self.host.is_empty() {
            return Err(crate::error::PrepsError::configuration(
                "host cannot be empty",
            ));
        }

        if self.database.is_empty() {
            return Err(crate::error::PrepsError::configuration(
                "database cannot be empty",
            ));
        }

        if self.user.is_empty() {
            return Err(crate::error::PrepsError::configuration(
                "user cannot be empty",
            ));
        }

        if self.port == 0 {
            return Err(crate::error::PrepsError::configuration(
                "port must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Wipes the password, leaving the rest of the config usable for display.
    pub fn forget_password(&mut self) {
        self.password.clear();
    }
}
