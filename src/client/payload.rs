//! Blob payload boundary
//!
//! A blob codec contributes exactly two things to the core: bytes, and
//! an optional filename extension for members of an indexed folder. The
//! core never looks inside the bytes. Image types implement this trait
//! outside the crate; a failing image encoder surfaces as
//! `SerializationFailure`.

use crate::errors::DepotResult;

/// An opaque byte payload with an optional filename extension.
pub trait BlobPayload: Sized {
    /// Produce the bytes to store
    fn into_bytes(self) -> DepotResult<Vec<u8>>;

    /// Reconstruct the payload from stored bytes
    fn from_bytes(bytes: Vec<u8>) -> DepotResult<Self>;

    /// Extension appended to indexed member filenames ("png" -> "0.png")
    fn extension() -> Option<&'static str> {
        None
    }
}

/// Raw bytes pass through untouched and carry no extension.
impl BlobPayload for Vec<u8> {
    fn into_bytes(self) -> DepotResult<Vec<u8>> {
        Ok(self)
    }

    fn from_bytes(bytes: Vec<u8>) -> DepotResult<Self> {
        Ok(bytes)
    }
}
