//! Root directory providers
//!
//! The provider is the boundary between the path machinery and whatever
//! the host platform considers "the documents directory". Two
//! implementations ship with the crate: [`StandardRoots`] for real
//! processes and [`FixedRoots`] for hermetic tests.

use std::env;
use std::path::PathBuf;

use crate::area::StorageArea;
use crate::config::DepotConfig;
use crate::errors::{DepotError, DepotResult};

/// Supplies the absolute root directory for a storage area.
///
/// Called on every operation; implementations must not cache state that
/// could go stale if a root moves between calls.
pub trait RootProvider: Send {
    /// The root for `area`, or `AreaUnavailable` when none can be
    /// supplied (e.g. an unmapped shared-container group).
    fn root(&self, area: &StorageArea) -> DepotResult<PathBuf>;
}

/// Platform-default roots, derived per call from the environment, with
/// per-area overrides from [`DepotConfig`].
///
/// - documents: `$HOME/Documents`
/// - caches: `$XDG_CACHE_HOME` or `$HOME/.cache`, plus the app name
/// - application support: `$XDG_DATA_HOME` or `$HOME/.local/share`, plus
///   the app name
/// - temporary: the process temp dir plus the app name
/// - shared containers: config mapping only, no platform default
#[derive(Debug, Clone)]
pub struct StandardRoots {
    app_name: String,
    config: DepotConfig,
}

impl StandardRoots {
    /// Create a provider with platform defaults only
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            config: DepotConfig::default(),
        }
    }

    /// Create a provider whose config overrides the platform defaults
    pub fn with_config(app_name: impl Into<String>, config: DepotConfig) -> Self {
        Self {
            app_name: app_name.into(),
            config,
        }
    }

    fn home(&self) -> DepotResult<PathBuf> {
        env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or_else(|| DepotError::AreaUnavailable("HOME is not set".to_string()))
    }

    fn xdg_or(&self, var: &str, home_suffix: &str) -> DepotResult<PathBuf> {
        if let Some(dir) = env::var_os(var) {
            return Ok(PathBuf::from(dir));
        }
        Ok(self.home()?.join(home_suffix))
    }
}

impl RootProvider for StandardRoots {
    fn root(&self, area: &StorageArea) -> DepotResult<PathBuf> {
        match area {
            StorageArea::Documents => match &self.config.documents {
                Some(root) => Ok(root.clone()),
                None => Ok(self.home()?.join("Documents")),
            },
            StorageArea::Caches => match &self.config.caches {
                Some(root) => Ok(root.clone()),
                None => Ok(self
                    .xdg_or("XDG_CACHE_HOME", ".cache")?
                    .join(&self.app_name)),
            },
            StorageArea::ApplicationSupport => match &self.config.application_support {
                Some(root) => Ok(root.clone()),
                None => Ok(self
                    .xdg_or("XDG_DATA_HOME", ".local/share")?
                    .join(&self.app_name)),
            },
            StorageArea::Temporary => match &self.config.temporary {
                Some(root) => Ok(root.clone()),
                None => Ok(env::temp_dir().join(&self.app_name)),
            },
            StorageArea::SharedContainer { group_id } => self
                .config
                .shared_containers
                .get(group_id)
                .cloned()
                .ok_or_else(|| {
                    DepotError::AreaUnavailable(format!(
                        "no root mapped for shared_container({})",
                        group_id
                    ))
                }),
        }
    }
}

/// Every area rooted under one base directory. Intended for tests, where
/// the base is a scratch directory owned by the test.
#[derive(Debug, Clone)]
pub struct FixedRoots {
    base: PathBuf,
}

impl FixedRoots {
    /// Root every area under `base`
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl RootProvider for FixedRoots {
    fn root(&self, area: &StorageArea) -> DepotResult<PathBuf> {
        let dir = match area {
            StorageArea::Documents => self.base.join("documents"),
            StorageArea::Caches => self.base.join("caches"),
            StorageArea::ApplicationSupport => self.base.join("application_support"),
            StorageArea::Temporary => self.base.join("temporary"),
            StorageArea::SharedContainer { group_id } => {
                self.base.join("shared").join(group_id)
            }
        };
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_roots_separate_areas() {
        let roots = FixedRoots::new("/tmp/depot-test");
        let docs = roots.root(&StorageArea::Documents).unwrap();
        let caches = roots.root(&StorageArea::Caches).unwrap();
        assert_ne!(docs, caches);
        assert!(docs.starts_with("/tmp/depot-test"));
    }

    #[test]
    fn test_fixed_roots_shared_groups_distinct() {
        let roots = FixedRoots::new("/tmp/depot-test");
        let a = roots
            .root(&StorageArea::SharedContainer {
                group_id: "a".into(),
            })
            .unwrap();
        let b = roots
            .root(&StorageArea::SharedContainer {
                group_id: "b".into(),
            })
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_standard_roots_unmapped_group_unavailable() {
        let roots = StandardRoots::new("depot-test");
        let result = roots.root(&StorageArea::SharedContainer {
            group_id: "unmapped".into(),
        });
        assert!(matches!(result, Err(DepotError::AreaUnavailable(_))));
    }

    #[test]
    fn test_standard_roots_config_override_wins() {
        let config = DepotConfig {
            caches: Some(PathBuf::from("/custom/cache")),
            ..Default::default()
        };
        let roots = StandardRoots::with_config("depot-test", config);
        assert_eq!(
            roots.root(&StorageArea::Caches).unwrap(),
            PathBuf::from("/custom/cache")
        );
    }
}
