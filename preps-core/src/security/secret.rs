//! Zeroizing container for passwords.
//!
//! # Security
//! - The value lives in a `Zeroizing<String>` and is wiped on drop
//! - `clear` wipes it early, leaving an empty secret behind
//! - `Debug` never prints the value

use zeroize::{Zeroize, Zeroizing};

/// A password held in memory that is zeroed when released.
///
/// # Example
///
/// ```rust
/// use preps_core::security::Secret;
///
/// let mut secret = Secret::new("hunter2".to_string());
/// assert_eq!(secret.expose(), "hunter2");
/// assert_eq!(format!("{:?}", secret), "Secret(****)");
///
/// secret.clear();
/// assert!(secret.is_empty());
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret {
    value: Zeroizing<String>,
}

impl Secret {
    /// Takes ownership of `value`; the original allocation is the one zeroed later.
    pub fn new(value: String) -> Self {
        Self {
            value: Zeroizing::new(value),
        }
    }

    /// Borrows the plain text. Callers must not copy it into long-lived storage.
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// Returns true if no value is held (never set, or cleared).
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Overwrites the held value with zeros and empties it.
    pub fn clear(&mut self) {
        self.value.zeroize();
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(****)")
    }
}
