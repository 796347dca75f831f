//! Storage area enumeration

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the fixed well-known roots paths are resolved against.
///
/// Areas are plain values; resolution to a directory happens through a
/// [`super::RootProvider`] at call time. Two areas are equal iff they are
/// the same variant and, for shared containers, name the same group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageArea {
    /// User-visible documents; survives until the user deletes them
    Documents,
    /// Cache content the host system may purge without notice
    Caches,
    /// App-internal support files
    ApplicationSupport,
    /// Scratch space; shortest retention of all areas
    Temporary,
    /// A container shared with other processes of the same group
    SharedContainer { group_id: String },
}

impl fmt::Display for StorageArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageArea::Documents => write!(f, "documents"),
            StorageArea::Caches => write!(f, "caches"),
            StorageArea::ApplicationSupport => write!(f, "application_support"),
            StorageArea::Temporary => write!(f, "temporary"),
            StorageArea::SharedContainer { group_id } => {
                write!(f, "shared_container({})", group_id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_variant_plus_group() {
        assert_eq!(StorageArea::Documents, StorageArea::Documents);
        assert_ne!(StorageArea::Documents, StorageArea::Caches);

        let a = StorageArea::SharedContainer {
            group_id: "team".into(),
        };
        let b = StorageArea::SharedContainer {
            group_id: "team".into(),
        };
        let c = StorageArea::SharedContainer {
            group_id: "other".into(),
        };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(StorageArea::Caches.to_string(), "caches");
        let shared = StorageArea::SharedContainer {
            group_id: "team".into(),
        };
        assert_eq!(shared.to_string(), "shared_container(team)");
    }
}
