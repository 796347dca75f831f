//! Client configuration
//!
//! Overrides for storage-area roots. Every field is optional: an empty
//! config means "use the platform defaults". Shared-container groups have
//! no platform default and must be mapped here to be usable.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Storage-area root overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepotConfig {
    /// Root for the documents area
    #[serde(default)]
    pub documents: Option<PathBuf>,

    /// Root for the caches area
    #[serde(default)]
    pub caches: Option<PathBuf>,

    /// Root for the application-support area
    #[serde(default)]
    pub application_support: Option<PathBuf>,

    /// Root for the temporary area
    #[serde(default)]
    pub temporary: Option<PathBuf>,

    /// Shared-container group id -> root directory
    #[serde(default)]
    pub shared_containers: HashMap<String, PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_deserializes_to_defaults() {
        let config: DepotConfig = serde_json::from_str("{}").unwrap();
        assert!(config.documents.is_none());
        assert!(config.shared_containers.is_empty());
    }

    #[test]
    fn test_partial_config() {
        let config: DepotConfig = serde_json::from_str(
            r#"{
                "caches": "/var/cache/app",
                "shared_containers": {"team": "/srv/shared/team"}
            }"#,
        )
        .unwrap();

        assert_eq!(config.caches, Some(PathBuf::from("/var/cache/app")));
        assert_eq!(
            config.shared_containers.get("team"),
            Some(&PathBuf::from("/srv/shared/team"))
        );
        assert!(config.documents.is_none());
    }
}
