//! Error types with credential sanitization.
//!
//! Errors produced by this crate never carry passwords. Connection failures
//! keep the driver error as their source so the full diagnostic chain can be
//! logged, while the display message stays generic.

use thiserror::Error;

/// Main error type for preps-core operations.
///
/// # Security
/// Messages never include the password, and connection errors only name the
/// operation that failed.
#[derive(Debug, Error)]
pub enum PrepsError {
    /// Opening or closing the database session failed
    #[error("Database connection failed: {context}")]
    Connection {
        /// What was being attempted
        context: String,
        /// Driver error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The store refused to compile a statement
    #[error("Statement preparation failed: {context}")]
    Statement {
        /// What was being prepared
        context: String,
        /// Driver error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Executing the prepared insert for one row failed
    #[error("Inserting person {id} failed")]
    InsertExecution {
        /// Id of the row that was rejected
        id: i32,
        /// Driver error (constraint violation, lost connection, ...)
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Human readable cause
        message: String,
    },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        /// What was being read or written
        context: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results with [`PrepsError`]
pub type Result<T> = std::result::Result<T, PrepsError>;

impl PrepsError {
    /// Creates a connection error with sanitized context
    pub fn connection_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a statement preparation error
    pub fn prepare_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Statement {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates an insert execution error for the row with `id`
    pub fn insert_failed<E>(id: i32, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::InsertExecution {
            id,
            source: Box::new(error),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Renders the error followed by every `source` in its chain.
    ///
    /// Used when logging insert failures so the store's own diagnostic
    /// (constraint name, SQLSTATE, ...) is visible next to the row id.
    pub fn diagnostic(&self) -> String {
        let mut rendered = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            rendered.push_str(": ");
            rendered.push_str(&cause.to_string());
            source = cause.source();
        }
        rendered
    }
}
