//! Secret handling for database credentials.
//!
//! # Security Guarantees
//! - Passwords are stored in `Zeroizing` containers for automatic memory clearing
//! - Passwords are redacted from `Debug` output
//!
//! # Module Structure
//! - `secret`: Zeroizing password container

mod secret;

pub use secret::Secret;
