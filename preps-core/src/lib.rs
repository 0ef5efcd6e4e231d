//! Core data structures and utilities for preps.
//!
//! This crate provides the connection model, secret handling and the
//! prepared-statement inserter used by the `preps` load tool.
//!
//! # Security Guarantees
//! - Passwords are held in zeroizing containers and never logged
//! - A session consumes its configuration, wiping the password once connected
//! - Statement logging is disabled on database connections
//!
//! # Architecture
//! - `Session` trait as the seam to the database driver
//! - `BatchInserter` compiles one statement and reuses it for every row
//! - Per-row outcomes instead of propagated insert errors

pub mod config;
pub mod error;
pub mod insert;
pub mod logging;
pub mod models;
pub mod security;
pub mod session;

// Re-export commonly used types
pub use config::{ConnectionConfig, DEFAULT_PORT, PropertiesStore};
pub use error::{PrepsError, Result};
pub use insert::{BatchInserter, BatchReport, FailurePolicy, RowOutcome};
pub use logging::init_logging;
pub use models::PersonRecord;
pub use security::Secret;
pub use session::{INSERT_PERSON_SQL, Session};

#[cfg(feature = "postgresql")]
pub use session::PgSession;
