//! Row shapes written by the inserter.

/// One row of the `person` table.
///
/// The id is chosen by the caller; the store decides whether it is a
/// duplicate. Records are transient and dropped after a single insert attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    /// Primary key value, bound as parameter `$1`
    pub id: i32,
    /// Bound as parameter `$2`
    pub name: String,
    /// Bound as parameter `$3`
    pub surname: String,
}

impl PersonRecord {
    /// Creates a record from borrowed name parts.
    pub fn new(id: i32, name: &str, surname: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            surname: surname.to_string(),
        }
    }
}
