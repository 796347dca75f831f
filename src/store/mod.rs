//! Byte-level stores
//!
//! Two shapes of durable state:
//!
//! - [`scalar`]: one payload, one file; writes are atomic and replace
//!   silently.
//! - [`indexed`]: one payload per file inside a folder, members named by
//!   a non-negative sequence index; folder creation rejects an existing
//!   folder instead of overwriting it.

pub mod indexed;
pub mod scalar;
