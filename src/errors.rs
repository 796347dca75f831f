//! # Depot Errors
//!
//! One error type for the whole crate. Every public operation returns
//! `DepotResult<T>`; no operation retries internally. Each failure is
//! surfaced once, typed, and left to the caller.

use std::io;
use std::path::Path;

use thiserror::Error;

/// Result type for depot operations
pub type DepotResult<T> = Result<T, DepotError>;

/// Depot errors
#[derive(Debug, Error)]
pub enum DepotError {
    // Path errors
    #[error("Invalid path: {0:?} sanitizes to nothing usable")]
    InvalidPath(String),

    #[error("Invalid file name: {0:?} denotes a folder, but a record is always a single file")]
    InvalidFileName(String),

    // Area errors
    #[error("Storage area unavailable: {0}")]
    AreaUnavailable(String),

    // Location errors
    #[error("Nothing exists at: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    // Codec errors
    #[error("Existing content at {0} decodes as neither one value nor an array of the requested type")]
    DeserializationMismatch(String),

    #[error("Payload could not be encoded: {0}")]
    SerializationFailure(String),

    // Capacity errors
    #[error("No capacity provider configured for this client")]
    CapacityUnavailable,

    // I/O errors
    #[error("I/O failure at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl DepotError {
    /// Wrap an `io::Error` for `location`, mapping the kinds that carry
    /// storage semantics onto their typed variants.
    pub fn io(location: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => DepotError::NotFound(location.display().to_string()),
            io::ErrorKind::AlreadyExists => {
                DepotError::AlreadyExists(location.display().to_string())
            }
            _ => DepotError::Io {
                path: location.display().to_string(),
                source,
            },
        }
    }

    /// Create a not-found error for a location
    pub fn not_found(location: &Path) -> Self {
        DepotError::NotFound(location.display().to_string())
    }

    /// Create an already-exists error for a location
    pub fn already_exists(location: &Path) -> Self {
        DepotError::AlreadyExists(location.display().to_string())
    }

    /// Create a deserialization-mismatch error for a location
    pub fn mismatch(location: &Path) -> Self {
        DepotError::DeserializationMismatch(location.display().to_string())
    }

    /// Short failure reason, stable across message formatting changes
    pub fn reason(&self) -> &'static str {
        match self {
            DepotError::InvalidPath(_) => "path is empty or illegal after sanitization",
            DepotError::InvalidFileName(_) => "record paths must not end in a separator",
            DepotError::AreaUnavailable(_) => "storage area root could not be resolved",
            DepotError::NotFound(_) => "no file or folder at the resolved location",
            DepotError::AlreadyExists(_) => "a folder already occupies the target location",
            DepotError::DeserializationMismatch(_) => {
                "existing bytes do not decode as the requested type"
            }
            DepotError::SerializationFailure(_) => "payload could not be turned into bytes",
            DepotError::CapacityUnavailable => "client has no capacity provider",
            DepotError::Io { .. } => "underlying filesystem call failed",
        }
    }

    /// What a caller can do about it
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DepotError::InvalidPath(_) => {
                "supply a relative path with at least one legal character"
            }
            DepotError::InvalidFileName(_) => {
                "drop the trailing separator, or store the values as blobs"
            }
            DepotError::AreaUnavailable(_) => {
                "configure the area root (shared containers need a group mapping)"
            }
            DepotError::NotFound(_) => "save to the location before fetching from it",
            DepotError::AlreadyExists(_) => "remove the existing folder first, or append instead",
            DepotError::DeserializationMismatch(_) => {
                "fetch with the type the location was saved with"
            }
            DepotError::SerializationFailure(_) => "check the payload for corrupt content",
            DepotError::CapacityUnavailable => "construct the client with a capacity provider",
            DepotError::Io { .. } => "inspect the source error; the operation was not retried",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_io_kind_mapping() {
        let loc = PathBuf::from("/tmp/depot/missing");
        let err = DepotError::io(&loc, io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(matches!(err, DepotError::NotFound(_)));

        let err = DepotError::io(&loc, io::Error::new(io::ErrorKind::AlreadyExists, "there"));
        assert!(matches!(err, DepotError::AlreadyExists(_)));

        let err = DepotError::io(&loc, io::Error::new(io::ErrorKind::PermissionDenied, "no"));
        assert!(matches!(err, DepotError::Io { .. }));
    }

    #[test]
    fn test_display_carries_location() {
        let loc = PathBuf::from("/tmp/depot/messages.json");
        let err = DepotError::not_found(&loc);
        assert!(err.to_string().contains("messages.json"));
    }

    #[test]
    fn test_every_error_has_reason_and_suggestion() {
        let errors = vec![
            DepotError::InvalidPath("//".into()),
            DepotError::InvalidFileName("Folder/".into()),
            DepotError::AreaUnavailable("sharedContainer(team)".into()),
            DepotError::NotFound("x".into()),
            DepotError::AlreadyExists("x".into()),
            DepotError::DeserializationMismatch("x".into()),
            DepotError::SerializationFailure("x".into()),
            DepotError::CapacityUnavailable,
        ];
        for err in errors {
            assert!(!err.reason().is_empty());
            assert!(!err.recovery_suggestion().is_empty());
        }
    }
}
