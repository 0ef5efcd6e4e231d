//! Fallback key-value store read from a properties file.
//!
//! Syntax follows `java.util.Properties` line format:
//! - `key=value`, `key: value` or `key value`
//! - `#` and `!` comment lines, blank lines skipped
//! - a line ending in an odd number of backslashes continues on the next
//!   line, whose leading whitespace is dropped
//! - escapes `\t \n \r \f \uXXXX`; any other escaped character stands for
//!   itself, so `\\` is a backslash and `\=` a literal `=` in a key
//!
//! Trailing whitespace of a value is kept.

use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Keys the resolver consults.
const RECOGNIZED_KEYS: [&str; 5] = ["database", "host", "port", "user", "password"];

/// Parsed properties file.
///
/// # Example
/// ```rust
/// use preps_core::config::PropertiesStore;
///
/// let store = PropertiesStore::parse("# defaults\ndatabase=shop\nport: 5433\nhost db1\n");
/// assert_eq!(store.get("database"), Some("shop"));
/// assert_eq!(store.get("port"), Some("5433"));
/// assert_eq!(store.get("host"), Some("db1"));
/// assert_eq!(store.get("user"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertiesStore {
    entries: HashMap<String, String>,
}

impl PropertiesStore {
    /// Creates an empty store; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    /// Returns an I/O error if the file is missing or unreadable. Callers
    /// treat this as non-fatal and continue with [`PropertiesStore::empty`].
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|source| crate::error::PrepsError::Io {
                context: format!("Failed to read properties file {}", path.display()),
                source,
            })?;

        let store = Self::parse(&content);
        debug!(
            "Loaded {} properties from {}",
            store.entries.len(),
            path.display()
        );
        Ok(store)
    }

    /// Parses properties text. Later duplicates override earlier ones.
    ///
    /// An entry with a malformed `\uXXXX` escape is skipped with a warning.
    pub fn parse(content: &str) -> Self {
        let mut entries = HashMap::new();
        let mut lines = content.lines().enumerate();

        while let Some((idx, line)) = lines.next() {
            let s = line.trim_start_matches(is_blank);
            if s.is_empty() || s.starts_with(['#', '!']) {
                continue;
            }

            let mut logical = s.to_string();
            while continues(&logical) {
                logical.pop();
                match lines.next() {
                    Some((_, next)) => logical.push_str(next.trim_start_matches(is_blank)),
                    None => break,
                }
            }

            let Some((key, value)) = split_entry(&logical) else {
                warn!(
                    "Ignoring properties line {} with a malformed \\u escape",
                    idx.saturating_add(1)
                );
                continue;
            };

            if !RECOGNIZED_KEYS.contains(&key.as_str()) {
                warn!("Unrecognized property '{}' will not be used", key);
            }
            entries.insert(key, value);
        }

        Self { entries }
    }

    /// Builds a store from in-memory pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Looks up `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Removes `key` and returns its value, e.g. to move a password into a
    /// zeroizing container.
    pub fn take(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Returns true if `key` is present, even with an empty value.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whitespace as `java.util.Properties` defines it.
const fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// True if the line ends in an odd number of backslashes.
fn continues(line: &str) -> bool {
    !line
        .chars()
        .rev()
        .take_while(|&c| c == '\\')
        .count()
        .is_multiple_of(2)
}

/// Splits a logical line at the first unescaped `=`, `:` or whitespace and
/// unescapes both halves.
fn split_entry(line: &str) -> Option<(String, String)> {
    let mut end = line.len();
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                end = i;
                break;
            }
            c if is_blank(c) => {
                end = i;
                break;
            }
            _ => {}
        }
    }

    let (raw_key, rest) = line.split_at(end);
    let rest = rest.trim_start_matches(is_blank);
    let rest = rest
        .strip_prefix(['=', ':'])
        .unwrap_or(rest)
        .trim_start_matches(is_blank);

    Some((unescape(raw_key)?, unescape(rest)?))
}

fn unescape(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 || !hex.chars().all(|h| h.is_ascii_hexdigit()) {
                    return None;
                }
                let code = u32::from_str_radix(&hex, 16).ok()?;
                out.push(char::from_u32(code)?);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_basic_entries() {
        let store = PropertiesStore::parse(
            "database=shop\nhost = db1\nuser:a\npassword=p\nport=5433\n",
        );

        assert_eq!(store.len(), 5);
        assert_eq!(store.get("database"), Some("shop"));
        assert_eq!(store.get("host"), Some("db1"));
        assert_eq!(store.get("user"), Some("a"));
        assert_eq!(store.get("password"), Some("p"));
        assert_eq!(store.get("port"), Some("5433"));
        for key in RECOGNIZED_KEYS {
            assert!(store.contains(key));
        }
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let store = PropertiesStore::parse("# comment\n! also a comment\n\n   \nhost=db1\n");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("host"), Some("db1"));
    }

    #[test]
    fn test_parse_key_without_value() {
        let store = PropertiesStore::parse("database\nhost=db1\n");
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("database"), Some(""));
    }

    #[test]
    fn test_parse_whitespace_separator() {
        let store = PropertiesStore::parse("host db1\ndatabase\tshop\nuser   =  a\nport : 5433\n");
        assert_eq!(store.get("host"), Some("db1"));
        assert_eq!(store.get("database"), Some("shop"));
        assert_eq!(store.get("user"), Some("a"));
        assert_eq!(store.get("port"), Some("5433"));
    }

    #[test]
    fn test_parse_escaped_backslash_in_password() {
        let store = PropertiesStore::parse("password=p\\\\w\n");
        assert_eq!(store.get("password"), Some("p\\w"));
    }

    #[test]
    fn test_parse_escapes() {
        let store = PropertiesStore::parse(
            "password=tab\\there\\u0041\\q\nmy\\:key=v\nspaced\\ key=w\n",
        );
        assert_eq!(store.get("password"), Some("tab\thereAq"));
        assert_eq!(store.get("my:key"), Some("v"));
        assert_eq!(store.get("spaced key"), Some("w"));
    }

    #[test]
    fn test_parse_line_continuation() {
        let store = PropertiesStore::parse("password=first\\\n    second\nhost=db1\n");
        assert_eq!(store.get("password"), Some("firstsecond"));
        assert_eq!(store.get("host"), Some("db1"));
    }

    #[test]
    fn test_parse_continuation_line_is_not_a_comment() {
        let store = PropertiesStore::parse("host=db\\\n  #1\n");
        assert_eq!(store.get("host"), Some("db#1"));
    }

    #[test]
    fn test_parse_even_backslashes_do_not_continue() {
        let store = PropertiesStore::parse("password=p\\\\\nhost=db1\n");
        assert_eq!(store.get("password"), Some("p\\"));
        assert_eq!(store.get("host"), Some("db1"));
    }

    #[test]
    fn test_parse_malformed_unicode_escape_skips_entry() {
        let store = PropertiesStore::parse("password=\\u12\nhost=db1\n");
        assert!(!store.contains("password"));
        assert_eq!(store.get("host"), Some("db1"));
    }

    #[test]
    fn test_parse_keeps_trailing_value_whitespace() {
        let store = PropertiesStore::parse("password=p \n");
        assert_eq!(store.get("password"), Some("p "));
    }

    #[test]
    fn test_parse_unrecognized_key_is_kept() {
        let store = PropertiesStore::parse("schema=public\n");
        assert!(!RECOGNIZED_KEYS.contains(&"schema"));
        assert_eq!(store.get("schema"), Some("public"));
    }

    #[test]
    fn test_parse_value_keeps_inner_separators() {
        let store = PropertiesStore::parse("password=a=b:c\n");
        assert_eq!(store.get("password"), Some("a=b:c"));
    }

    #[test]
    fn test_parse_empty_value_is_present() {
        let store = PropertiesStore::parse("password=\n");
        assert!(store.contains("password"));
        assert_eq!(store.get("password"), Some(""));
    }

    #[test]
    fn test_parse_later_duplicate_wins() {
        let store = PropertiesStore::parse("host=first\nhost=second\n");
        assert_eq!(store.get("host"), Some("second"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "database=shop").unwrap();
        writeln!(file, "port=5433").unwrap();

        let store = PropertiesStore::load(file.path()).unwrap();
        assert_eq!(store.get("database"), Some("shop"));
        assert_eq!(store.get("port"), Some("5433"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = PropertiesStore::load(&dir.path().join("missing.properties"));
        assert!(matches!(
            result,
            Err(crate::error::PrepsError::Io { .. })
        ));
    }

    #[test]
    fn test_take_removes_entry() {
        let mut store = PropertiesStore::parse("password=p\nhost=db1\n");
        assert_eq!(store.take("password").as_deref(), Some("p"));
        assert!(!store.contains("password"));
        assert_eq!(store.take("password"), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_from_pairs() {
        let store = PropertiesStore::from_pairs([("host", "db1")]);
        assert_eq!(store.get("host"), Some("db1"));
        assert!(PropertiesStore::empty().is_empty());
    }
}
