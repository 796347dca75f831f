//! Structured record handling
//!
//! Records are any `Serialize`/`DeserializeOwned` type. The on-disk
//! format lives entirely behind [`codec`]; [`merge`] implements the
//! append algorithm that promotes a singleton file into an array.

pub mod codec;
pub mod merge;

pub use merge::{merge_many, merge_one, try_decode, Decoded};
