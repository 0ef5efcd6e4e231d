//! Synthetic name tokens for load generation.
//!
//! A token is the first [`TOKEN_LEN`] characters of a hyphenated v4 UUID. It
//! carries no meaning; collisions are possible and left to the store.

use uuid::Uuid;

/// Length of every generated token.
pub const TOKEN_LEN: usize = 20;

/// Returns a fresh token of exactly [`TOKEN_LEN`] ASCII characters.
pub fn random_token() -> String {
    let mut token = Uuid::new_v4().to_string();
    token.truncate(TOKEN_LEN);
    token
}
