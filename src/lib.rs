//! depot - path-addressed persistence for records and blobs
//!
//! Values live under named locations inside a small set of well-known
//! storage areas. Structured records (any serde type) are one file each,
//! holding either a single encoded value or an array; binary blobs live
//! as sequentially indexed files inside folders. Save, fetch, and append
//! work uniformly over both shapes.

pub mod area;
pub mod client;
pub mod config;
pub mod errors;
pub mod observability;
pub mod path;
pub mod record;
pub mod store;

pub use area::{FixedRoots, RootProvider, StandardRoots, StorageArea};
pub use client::{BlobPayload, CapacityProvider, Depot, FileInfo, VolumeStats};
pub use config::DepotConfig;
pub use errors::{DepotError, DepotResult};

/// Current version of depot
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
