//! # Storage client
//!
//! [`Depot`] is the public facade: save/fetch/append for structured
//! records and blobs, plus housekeeping (exists, remove, clear, move,
//! copy, rename, info) and capacity pass-throughs. Dispatch is by
//! payload kind (record methods vs blob methods), never by file
//! extension.
//!
//! # Concurrency
//!
//! Operations against one `Depot` instance are serialized through an
//! internal mutex: no two operations from the same instance interleave
//! their filesystem effects, which makes the read-merge-write sequence
//! inside append safe within a process.
//!
//! Separate `Depot` instances, and separate processes, are NOT
//! coordinated. Two of them appending to the same location can
//! interleave read-decode-merge-encode-write and silently lose one
//! side's update. That is an accepted limitation of the design; callers
//! who need cross-process coordination must provide it themselves.
//!
//! Nothing is cached between calls: every operation re-resolves its
//! area root and re-reads from disk, so a root that moves between calls
//! is picked up immediately.

mod capacity;
mod engine;
mod payload;

pub use capacity::{CapacityProvider, VolumeStats};
pub use engine::FileInfo;
pub use payload::BlobPayload;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::area::{RootProvider, StandardRoots, StorageArea};
use crate::config::DepotConfig;
use crate::errors::DepotResult;
use engine::Engine;

/// Path-addressed persistence over well-known storage areas.
pub struct Depot<P: RootProvider = StandardRoots> {
    engine: Mutex<Engine<P>>,
}

impl Depot<StandardRoots> {
    /// A client over the platform-default roots for `app_name`
    pub fn new(app_name: impl Into<String>) -> Self {
        Self::with_provider(StandardRoots::new(app_name))
    }

    /// A client whose config overrides the platform-default roots
    pub fn with_config(app_name: impl Into<String>, config: DepotConfig) -> Self {
        Self::with_provider(StandardRoots::with_config(app_name, config))
    }
}

impl<P: RootProvider> Depot<P> {
    /// A client over an arbitrary root provider
    pub fn with_provider(provider: P) -> Self {
        Self {
            engine: Mutex::new(Engine::new(provider)),
        }
    }

    /// Attach a volume capacity provider (capacity queries fail with
    /// `CapacityUnavailable` without one)
    pub fn with_capacity_provider(self, provider: Box<dyn CapacityProvider>) -> Self {
        // not yet shared: the mutex cannot be contended here
        let mut engine = self.engine.into_inner().unwrap_or_else(|p| p.into_inner());
        engine.set_capacity_provider(provider);
        Self {
            engine: Mutex::new(engine),
        }
    }

    fn engine(&self) -> MutexGuard<'_, Engine<P>> {
        // The engine keeps no in-memory state a panicked operation could
        // corrupt, so a poisoned lock is safe to re-enter
        self.engine.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ------------------------------------------------------------------
    // Structured records
    // ------------------------------------------------------------------

    /// Save one record as a single file. A path ending in a separator is
    /// rejected with `InvalidFileName`.
    pub fn save<T: Serialize>(
        &self,
        value: &T,
        path: &str,
        area: &StorageArea,
    ) -> DepotResult<PathBuf> {
        self.engine().save_record(value, path, area)
    }

    /// Save a record array as a single file, same file-shape rule.
    pub fn save_all<T: Serialize>(
        &self,
        values: &[T],
        path: &str,
        area: &StorageArea,
    ) -> DepotResult<PathBuf> {
        self.engine().save_records(values, path, area)
    }

    /// Fetch one record.
    pub fn fetch<T: DeserializeOwned>(&self, path: &str, area: &StorageArea) -> DepotResult<T> {
        self.engine().fetch_record(path, area)
    }

    /// Fetch a record array.
    pub fn fetch_all<T: DeserializeOwned>(
        &self,
        path: &str,
        area: &StorageArea,
    ) -> DepotResult<Vec<T>> {
        self.engine().fetch_records(path, area)
    }

    /// Append one record, promoting a singleton file into an array.
    pub fn append<T>(&self, value: T, path: &str, area: &StorageArea) -> DepotResult<()>
    where
        T: Serialize + DeserializeOwned,
    {
        self.engine().append_record(value, path, area)
    }

    /// Append several records in order.
    pub fn append_all<T>(&self, values: Vec<T>, path: &str, area: &StorageArea) -> DepotResult<()>
    where
        T: Serialize + DeserializeOwned,
    {
        self.engine().append_records(values, path, area)
    }

    // ------------------------------------------------------------------
    // Blobs
    // ------------------------------------------------------------------

    /// Save one blob as a single file (silent overwrite). A
    /// folder-denoting path creates a one-member indexed folder instead.
    pub fn save_blob<B: BlobPayload>(
        &self,
        blob: B,
        path: &str,
        area: &StorageArea,
    ) -> DepotResult<PathBuf> {
        self.engine().save_blob(blob, path, area)
    }

    /// Save a blob sequence as an indexed folder. Fails with
    /// `AlreadyExists` when the folder is already there.
    pub fn save_blobs<B: BlobPayload>(
        &self,
        blobs: Vec<B>,
        path: &str,
        area: &StorageArea,
    ) -> DepotResult<Vec<PathBuf>> {
        self.engine().save_blobs(blobs, path, area)
    }

    /// Fetch one blob.
    pub fn fetch_blob<B: BlobPayload>(&self, path: &str, area: &StorageArea) -> DepotResult<B> {
        self.engine().fetch_blob(path, area)
    }

    /// Fetch a blob folder in ascending index order.
    pub fn fetch_blobs<B: BlobPayload>(
        &self,
        path: &str,
        area: &StorageArea,
    ) -> DepotResult<Vec<B>> {
        self.engine().fetch_blobs(path, area)
    }

    /// Append one blob at the next free index (folder created on first
    /// append).
    pub fn append_blob<B: BlobPayload>(
        &self,
        blob: B,
        path: &str,
        area: &StorageArea,
    ) -> DepotResult<()> {
        self.engine().append_blob(blob, path, area)
    }

    /// Append several blobs in order. Sequential, not atomic: a failure
    /// partway leaves the earlier members written.
    pub fn append_blobs<B: BlobPayload>(
        &self,
        blobs: Vec<B>,
        path: &str,
        area: &StorageArea,
    ) -> DepotResult<()> {
        self.engine().append_blobs(blobs, path, area)
    }

    // ------------------------------------------------------------------
    // Housekeeping
    // ------------------------------------------------------------------

    /// Resolve a location without requiring anything to exist there.
    /// `None` addresses the area root.
    pub fn location(&self, path: Option<&str>, area: &StorageArea) -> DepotResult<PathBuf> {
        self.engine().location(path, area)
    }

    /// Whether anything exists at the path. Unresolvable paths are
    /// simply absent, never errors.
    pub fn exists(&self, path: &str, area: &StorageArea) -> bool {
        self.engine().exists(path, area)
    }

    /// Whether anything exists at an already-resolved location.
    pub fn exists_at(&self, location: &Path) -> bool {
        self.engine().exists_at(location)
    }

    /// Remove the file or folder at the path. The target must exist.
    pub fn remove(&self, path: &str, area: &StorageArea) -> DepotResult<()> {
        self.engine().remove(path, area)
    }

    /// Remove whatever is at an already-resolved location; a no-op when
    /// nothing is.
    pub fn remove_at(&self, location: &Path) -> DepotResult<()> {
        self.engine().remove_at(location)
    }

    /// Best-effort delete of all direct children of the area root.
    pub fn clear(&self, area: &StorageArea) -> DepotResult<()> {
        self.engine().clear(area)
    }

    /// Move between locations, possibly across areas.
    pub fn move_item(
        &self,
        path: &str,
        from: &StorageArea,
        to_path: &str,
        to: &StorageArea,
    ) -> DepotResult<()> {
        self.engine().move_item(path, from, to_path, to)
    }

    /// Copy between locations, possibly across areas. Folders copy
    /// recursively.
    pub fn copy_item(
        &self,
        path: &str,
        from: &StorageArea,
        to_path: &str,
        to: &StorageArea,
    ) -> DepotResult<()> {
        self.engine().copy_item(path, from, to_path, to)
    }

    /// Rename within one area by path replacement, recreating
    /// destination parents.
    pub fn rename(&self, path: &str, area: &StorageArea, new_path: &str) -> DepotResult<()> {
        self.engine().rename(path, area, new_path)
    }

    /// Whether the location is a folder.
    pub fn is_folder(&self, location: &Path) -> bool {
        self.engine().is_folder(location)
    }

    /// Size, shape, and timestamps for the path.
    pub fn info(&self, path: &str, area: &StorageArea) -> DepotResult<FileInfo> {
        self.engine().info(path, area)
    }

    // ------------------------------------------------------------------
    // Capacity pass-throughs
    // ------------------------------------------------------------------

    pub fn total_capacity(&self, area: &StorageArea) -> DepotResult<u64> {
        self.engine().total_capacity(area)
    }

    pub fn available_capacity(&self, area: &StorageArea) -> DepotResult<u64> {
        self.engine().available_capacity(area)
    }

    pub fn available_capacity_for_important_usage(&self, area: &StorageArea) -> DepotResult<u64> {
        self.engine().available_capacity_for_important_usage(area)
    }

    pub fn available_capacity_for_opportunistic_usage(
        &self,
        area: &StorageArea,
    ) -> DepotResult<u64> {
        self.engine().available_capacity_for_opportunistic_usage(area)
    }
}
