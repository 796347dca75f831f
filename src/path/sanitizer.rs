//! Path sanitization
//!
//! Turns a raw user path into a filesystem-legal, slash-prefix-free
//! component. Illegal characters are deleted, never substituted, so two
//! raw paths differing only in illegal characters land on the same
//! sanitized path.

use std::fmt;

use crate::errors::{DepotError, DepotResult};

/// Characters that are unsafe in a file name on at least one supported
/// platform. `/` stays: it is the separator.
const ILLEGAL: &[char] = &['\\', '<', '>', '"', '|', '?', '*'];

/// A sanitized, slash-prefix-free relative path.
///
/// Remembers whether the original path carried a trailing separator,
/// which by convention addresses a folder rather than a single file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SanitizedPath {
    value: String,
}

impl SanitizedPath {
    /// The sanitized path as a string slice (no leading separator)
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// True when the path addresses a folder (trailing separator)
    pub fn denotes_folder(&self) -> bool {
        self.value.ends_with('/')
    }

    /// The path without any trailing separator
    pub fn trimmed(&self) -> &str {
        self.value.trim_end_matches('/')
    }
}

impl fmt::Display for SanitizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Sanitize a raw relative path.
///
/// Deletion order: `:`, newlines, platform-illegal characters, remaining
/// control characters. Then every leading `/` is stripped. Fails with
/// `InvalidPath` when nothing usable remains (empty or `.`).
pub fn sanitize(raw: &str) -> DepotResult<SanitizedPath> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ':')
        .filter(|c| *c != '\n' && *c != '\r')
        .filter(|c| !ILLEGAL.contains(c))
        .filter(|c| !c.is_control())
        .collect();

    let stripped = cleaned.trim_start_matches('/');

    if stripped.is_empty() || stripped == "." {
        return Err(DepotError::InvalidPath(raw.to_string()));
    }

    Ok(SanitizedPath {
        value: stripped.to_string(),
    })
}
