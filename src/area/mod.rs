//! Storage areas and location resolution
//!
//! A [`StorageArea`] names one of the well-known roots every path is
//! resolved against. Root directories come from a [`RootProvider`], an
//! external collaborator from the core's point of view, and are resolved
//! lazily on every call, never cached, so a root may move between calls
//! without staleness.

mod area;
mod provider;
mod resolver;

pub use area::StorageArea;
pub use provider::{FixedRoots, RootProvider, StandardRoots};
pub use resolver::Resolver;
