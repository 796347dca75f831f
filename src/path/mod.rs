//! Logical path handling
//!
//! User-supplied paths are relative to a storage area and may use `/` for
//! sub-folders. A trailing separator addresses "the whole folder" rather
//! than a single file. Sanitization is pure string work; nothing in this
//! module touches the filesystem.

mod sanitizer;

pub use sanitizer::{sanitize, SanitizedPath};
