//! Connection configuration model and the fallback key-value store.
//!
//! # Module Structure
//! - `connection`: resolved `ConnectionConfig` and the default port
//! - `properties`: properties-file parser used as the fallback source

mod connection;
mod properties;

pub use connection::{ConnectionConfig, DEFAULT_PORT};
pub use properties::PropertiesStore;
