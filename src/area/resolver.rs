//! Location resolution
//!
//! (path, area) -> absolute location. Resolution happens on every call
//! and nothing is cached; a provider may legitimately answer with a
//! different root between two calls.

use std::fs;
use std::path::PathBuf;

use crate::area::{RootProvider, StorageArea};
use crate::errors::{DepotError, DepotResult};
use crate::path::sanitize;

/// Resolves logical paths against a root provider.
pub struct Resolver<P: RootProvider> {
    provider: P,
}

impl<P: RootProvider> Resolver<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The underlying provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Resolve a path against an area. `None` addresses the area root.
    ///
    /// Pure with respect to the filesystem: no existence check, nothing
    /// created.
    pub fn resolve(&self, path: Option<&str>, area: &StorageArea) -> DepotResult<PathBuf> {
        let root = self.provider.root(area)?;
        match path {
            None => Ok(root),
            Some(raw) => {
                let sanitized = sanitize(raw)?;
                Ok(root.join(sanitized.as_str()))
            }
        }
    }

    /// Resolve and require that something exists at the location.
    ///
    /// Used by fetch, remove, and the source side of move/copy/rename.
    pub fn resolve_existing(
        &self,
        path: Option<&str>,
        area: &StorageArea,
    ) -> DepotResult<PathBuf> {
        let location = self.resolve(path, area)?;
        if !location.exists() {
            return Err(DepotError::not_found(&location));
        }
        Ok(location)
    }

    /// Resolve a write destination, creating every missing intermediate
    /// parent folder. Idempotent; a no-op when the parent already exists.
    pub fn resolve_for_write(
        &self,
        path: Option<&str>,
        area: &StorageArea,
    ) -> DepotResult<PathBuf> {
        let location = self.resolve(path, area)?;
        if let Some(parent) = location.parent() {
            fs::create_dir_all(parent).map_err(|e| DepotError::io(parent, e))?;
        }
        Ok(location)
    }
}
