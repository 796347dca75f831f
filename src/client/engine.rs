//! Operation engine
//!
//! Every public operation, implemented against the resolver, the two
//! byte stores, and the record merger. The engine holds no state beyond
//! its collaborators (no directory listings, no decoded records), so
//! every call re-resolves and re-reads from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::area::{Resolver, RootProvider, StorageArea};
use crate::client::capacity::{CapacityProvider, VolumeStats};
use crate::client::payload::BlobPayload;
use crate::errors::{DepotError, DepotResult};
use crate::observability::Logger;
use crate::path::sanitize;
use crate::record::{codec, merge};
use crate::store::{indexed, scalar};

/// Size, shape, and timestamps for a stored location.
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub location: PathBuf,
    pub size: u64,
    pub is_folder: bool,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

pub struct Engine<P: RootProvider> {
    resolver: Resolver<P>,
    capacity: Option<Box<dyn CapacityProvider>>,
}

impl<P: RootProvider> Engine<P> {
    pub fn new(provider: P) -> Self {
        Self {
            resolver: Resolver::new(provider),
            capacity: None,
        }
    }

    pub fn set_capacity_provider(&mut self, provider: Box<dyn CapacityProvider>) {
        self.capacity = Some(provider);
    }

    /// A record (or record array) is always exactly one file; a path
    /// that addresses a folder has no defined record decoding.
    fn reject_folder_path(&self, path: &str) -> DepotResult<()> {
        if sanitize(path)?.denotes_folder() {
            return Err(DepotError::InvalidFileName(path.to_string()));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Structured records
    // ------------------------------------------------------------------

    pub fn save_record<T: Serialize>(
        &self,
        value: &T,
        path: &str,
        area: &StorageArea,
    ) -> DepotResult<PathBuf> {
        self.reject_folder_path(path)?;
        let location = self.resolver.resolve_for_write(Some(path), area)?;
        let bytes = codec::encode(value)?;
        scalar::write_atomic(&location, &bytes)?;
        Logger::trace("RECORD_SAVED", &[("area", &area.to_string()), ("path", path)]);
        Ok(location)
    }

    pub fn save_records<T: Serialize>(
        &self,
        values: &[T],
        path: &str,
        area: &StorageArea,
    ) -> DepotResult<PathBuf> {
        self.reject_folder_path(path)?;
        let location = self.resolver.resolve_for_write(Some(path), area)?;
        let bytes = codec::encode_all(values)?;
        scalar::write_atomic(&location, &bytes)?;
        Logger::trace("RECORD_SAVED", &[("area", &area.to_string()), ("path", path)]);
        Ok(location)
    }

    pub fn fetch_record<T: DeserializeOwned>(
        &self,
        path: &str,
        area: &StorageArea,
    ) -> DepotResult<T> {
        let location = self.resolver.resolve_existing(Some(path), area)?;
        let bytes = scalar::read(&location)?;
        codec::decode(&bytes, &location)
    }

    pub fn fetch_records<T: DeserializeOwned>(
        &self,
        path: &str,
        area: &StorageArea,
    ) -> DepotResult<Vec<T>> {
        let location = self.resolver.resolve_existing(Some(path), area)?;
        let bytes = scalar::read(&location)?;
        codec::decode_all(&bytes, &location)
    }

    pub fn append_record<T>(&self, value: T, path: &str, area: &StorageArea) -> DepotResult<()>
    where
        T: Serialize + DeserializeOwned,
    {
        let location = self.resolver.resolve_for_write(Some(path), area)?;
        let existing = self.existing_record_bytes(&location)?;

        // An absent or empty target skips the merge: the result of any
        // append is array-shaped from the first value on
        let merged = if existing.is_empty() {
            codec::encode_all(&[value])?
        } else {
            merge::merge_one(&existing, value, &location)?
        };

        scalar::write_atomic(&location, &merged)?;
        Logger::trace(
            "RECORD_APPENDED",
            &[("area", &area.to_string()), ("path", path)],
        );
        Ok(())
    }

    pub fn append_records<T>(
        &self,
        values: Vec<T>,
        path: &str,
        area: &StorageArea,
    ) -> DepotResult<()>
    where
        T: Serialize + DeserializeOwned,
    {
        let location = self.resolver.resolve_for_write(Some(path), area)?;
        let existing = self.existing_record_bytes(&location)?;

        let merged = if existing.is_empty() {
            codec::encode_all(&values)?
        } else {
            merge::merge_many(&existing, values, &location)?
        };

        scalar::write_atomic(&location, &merged)?;
        Logger::trace(
            "RECORD_APPENDED",
            &[("area", &area.to_string()), ("path", path)],
        );
        Ok(())
    }

    fn existing_record_bytes(&self, location: &Path) -> DepotResult<Vec<u8>> {
        if !location.is_file() {
            return Ok(Vec::new());
        }
        scalar::read(location)
    }

    // ------------------------------------------------------------------
    // Blobs
    // ------------------------------------------------------------------

    pub fn save_blob<B: BlobPayload>(
        &self,
        blob: B,
        path: &str,
        area: &StorageArea,
    ) -> DepotResult<PathBuf> {
        let sanitized = sanitize(path)?;
        let location = self.resolver.resolve_for_write(Some(path), area)?;
        let bytes = blob.into_bytes()?;

        let written = if sanitized.denotes_folder() {
            // Folder-addressed scalar save is folder creation with one
            // member, and inherits folder creation's existence rejection
            let mut members = indexed::create_folder(&location, &[bytes], B::extension())?;
            members.remove(0)
        } else {
            scalar::write_atomic(&location, &bytes)?;
            location
        };

        Logger::trace("BLOB_SAVED", &[("area", &area.to_string()), ("path", path)]);
        Ok(written)
    }

    pub fn save_blobs<B: BlobPayload>(
        &self,
        blobs: Vec<B>,
        path: &str,
        area: &StorageArea,
    ) -> DepotResult<Vec<PathBuf>> {
        let location = self.resolver.resolve_for_write(Some(path), area)?;
        let items = blobs
            .into_iter()
            .map(BlobPayload::into_bytes)
            .collect::<DepotResult<Vec<_>>>()?;

        let written = indexed::create_folder(&location, &items, B::extension())?;
        Logger::trace(
            "FOLDER_CREATED",
            &[("area", &area.to_string()), ("path", path)],
        );
        Ok(written)
    }

    pub fn fetch_blob<B: BlobPayload>(&self, path: &str, area: &StorageArea) -> DepotResult<B> {
        let location = self.resolver.resolve_existing(Some(path), area)?;

        // A folder-addressed fetch answers with the first member, the
        // mirror of the folder-addressed save above
        if location.is_dir() {
            let members = indexed::list_sorted(&location)?;
            let first = members
                .first()
                .ok_or_else(|| DepotError::not_found(&location))?;
            return B::from_bytes(scalar::read(first)?);
        }

        B::from_bytes(scalar::read(&location)?)
    }

    pub fn fetch_blobs<B: BlobPayload>(
        &self,
        path: &str,
        area: &StorageArea,
    ) -> DepotResult<Vec<B>> {
        let location = self.resolver.resolve_existing(Some(path), area)?;
        let members = indexed::list_sorted(&location)?;
        members
            .iter()
            .map(|member| B::from_bytes(scalar::read(member)?))
            .collect()
    }

    pub fn append_blob<B: BlobPayload>(
        &self,
        blob: B,
        path: &str,
        area: &StorageArea,
    ) -> DepotResult<()> {
        let location = self.resolver.resolve_for_write(Some(path), area)?;
        let bytes = blob.into_bytes()?;
        let member = indexed::append_one(&location, &bytes, B::extension())?;
        Logger::trace(
            "BLOB_APPENDED",
            &[
                ("area", &area.to_string()),
                ("member", &member.display().to_string()),
            ],
        );
        Ok(())
    }

    pub fn append_blobs<B: BlobPayload>(
        &self,
        blobs: Vec<B>,
        path: &str,
        area: &StorageArea,
    ) -> DepotResult<()> {
        let location = self.resolver.resolve_for_write(Some(path), area)?;
        let items = blobs
            .into_iter()
            .map(BlobPayload::into_bytes)
            .collect::<DepotResult<Vec<_>>>()?;
        indexed::append_many(&location, &items, B::extension())?;
        Logger::trace(
            "BLOB_APPENDED",
            &[("area", &area.to_string()), ("path", path)],
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Housekeeping
    // ------------------------------------------------------------------

    pub fn location(&self, path: Option<&str>, area: &StorageArea) -> DepotResult<PathBuf> {
        self.resolver.resolve(path, area)
    }

    pub fn exists(&self, path: &str, area: &StorageArea) -> bool {
        self.resolver
            .resolve(Some(path), area)
            .map(|location| location.exists())
            .unwrap_or(false)
    }

    pub fn exists_at(&self, location: &Path) -> bool {
        location.exists()
    }

    pub fn remove(&self, path: &str, area: &StorageArea) -> DepotResult<()> {
        let location = self.resolver.resolve_existing(Some(path), area)?;
        self.remove_location(&location)?;
        Logger::trace(
            "ITEM_REMOVED",
            &[("area", &area.to_string()), ("path", path)],
        );
        Ok(())
    }

    pub fn remove_at(&self, location: &Path) -> DepotResult<()> {
        if !location.exists() {
            return Ok(());
        }
        self.remove_location(location)
    }

    fn remove_location(&self, location: &Path) -> DepotResult<()> {
        let result = if location.is_dir() {
            fs::remove_dir_all(location)
        } else {
            fs::remove_file(location)
        };
        result.map_err(|e| DepotError::io(location, e))
    }

    /// Delete all direct children of the area root, best-effort: a child
    /// that refuses to die is logged and skipped, never fatal to the rest.
    pub fn clear(&self, area: &StorageArea) -> DepotResult<()> {
        let root = self.resolver.resolve(None, area)?;

        let entries = match fs::read_dir(&root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(DepotError::io(&root, e)),
        };

        for entry in entries {
            let child = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    Logger::warn("CLEAR_CHILD_FAILED", &[("error", &e.to_string())]);
                    continue;
                }
            };
            if let Err(e) = self.remove_location(&child) {
                Logger::warn(
                    "CLEAR_CHILD_FAILED",
                    &[
                        ("child", &child.display().to_string()),
                        ("error", &e.to_string()),
                    ],
                );
            }
        }

        Logger::trace("AREA_CLEARED", &[("area", &area.to_string())]);
        Ok(())
    }

    pub fn move_item(
        &self,
        path: &str,
        from: &StorageArea,
        to_path: &str,
        to: &StorageArea,
    ) -> DepotResult<()> {
        let source = self.resolver.resolve_existing(Some(path), from)?;
        let dest = self.resolver.resolve_for_write(Some(to_path), to)?;
        fs::rename(&source, &dest).map_err(|e| DepotError::io(&dest, e))?;
        Logger::trace(
            "ITEM_MOVED",
            &[("from", &source.display().to_string()), ("to", &dest.display().to_string())],
        );
        Ok(())
    }

    pub fn copy_item(
        &self,
        path: &str,
        from: &StorageArea,
        to_path: &str,
        to: &StorageArea,
    ) -> DepotResult<()> {
        let source = self.resolver.resolve_existing(Some(path), from)?;
        let dest = self.resolver.resolve_for_write(Some(to_path), to)?;
        copy_recursive(&source, &dest).map_err(|e| DepotError::io(&dest, e))?;
        Logger::trace(
            "ITEM_COPIED",
            &[("from", &source.display().to_string()), ("to", &dest.display().to_string())],
        );
        Ok(())
    }

    /// Rename within one area: the destination is a path replacement,
    /// not a rename syscall against the old name, so missing destination
    /// parents are recreated. A folder source keeps the trailing
    /// separator convention on the destination path.
    pub fn rename(&self, path: &str, area: &StorageArea, new_path: &str) -> DepotResult<()> {
        let source = self.resolver.resolve_existing(Some(path), area)?;

        let mut target = new_path.to_string();
        if source.is_dir() && !target.ends_with('/') {
            target.push('/');
        }

        let dest = self.resolver.resolve_for_write(Some(&target), area)?;
        fs::rename(&source, &dest).map_err(|e| DepotError::io(&dest, e))?;
        Logger::trace(
            "ITEM_RENAMED",
            &[("area", &area.to_string()), ("from", path), ("to", new_path)],
        );
        Ok(())
    }

    pub fn is_folder(&self, location: &Path) -> bool {
        location.is_dir()
    }

    pub fn info(&self, path: &str, area: &StorageArea) -> DepotResult<FileInfo> {
        let location = self.resolver.resolve_existing(Some(path), area)?;
        let metadata = fs::metadata(&location).map_err(|e| DepotError::io(&location, e))?;
        Ok(FileInfo {
            size: metadata.len(),
            is_folder: metadata.is_dir(),
            created: metadata.created().ok().map(DateTime::from),
            modified: metadata.modified().ok().map(DateTime::from),
            location,
        })
    }

    // ------------------------------------------------------------------
    // Capacity pass-throughs
    // ------------------------------------------------------------------

    fn volume_stats(&self, area: &StorageArea) -> DepotResult<VolumeStats> {
        let provider = self
            .capacity
            .as_ref()
            .ok_or(DepotError::CapacityUnavailable)?;
        let root = self.resolver.resolve(None, area)?;
        provider.stats(&root)
    }

    pub fn total_capacity(&self, area: &StorageArea) -> DepotResult<u64> {
        Ok(self.volume_stats(area)?.total)
    }

    pub fn available_capacity(&self, area: &StorageArea) -> DepotResult<u64> {
        Ok(self.volume_stats(area)?.available)
    }

    pub fn available_capacity_for_important_usage(
        &self,
        area: &StorageArea,
    ) -> DepotResult<u64> {
        Ok(self.volume_stats(area)?.available_for_important_usage)
    }

    pub fn available_capacity_for_opportunistic_usage(
        &self,
        area: &StorageArea,
    ) -> DepotResult<u64> {
        Ok(self.volume_stats(area)?.available_for_opportunistic_usage)
    }
}

fn copy_recursive(source: &Path, dest: &Path) -> io::Result<()> {
    if source.is_dir() {
        fs::create_dir_all(dest)?;
        for entry in fs::read_dir(source)? {
            let entry = entry?;
            copy_recursive(&entry.path(), &dest.join(entry.file_name()))?;
        }
        Ok(())
    } else {
        fs::copy(source, dest).map(|_| ())
    }
}
