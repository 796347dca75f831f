//! Volume capacity boundary
//!
//! Capacity numbers come from the host OS; this crate only defines the
//! interface and passes the answers through. A client without an
//! injected provider answers every capacity query with
//! `CapacityUnavailable`.

use std::path::Path;

use crate::errors::DepotResult;

/// Capacity figures for the volume holding a storage area root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeStats {
    /// Total volume capacity in bytes
    pub total: u64,
    /// Bytes currently available
    pub available: u64,
    /// Bytes the host would free up for important usage
    pub available_for_important_usage: u64,
    /// Bytes available for opportunistic (evictable) usage
    pub available_for_opportunistic_usage: u64,
}

/// Supplies volume capacity for the volume containing `root`.
pub trait CapacityProvider: Send {
    fn stats(&self, root: &Path) -> DepotResult<VolumeStats>;
}
