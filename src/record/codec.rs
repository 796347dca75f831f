//! Record encode/decode seam
//!
//! The one place that knows records are JSON. Encoding failures are
//! `SerializationFailure`; decode failures are reported as
//! `DeserializationMismatch` against the location being read, because by
//! the time a decode runs the bytes themselves were read successfully.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{DepotError, DepotResult};

/// Encode one record
pub fn encode<T: Serialize>(value: &T) -> DepotResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| DepotError::SerializationFailure(e.to_string()))
}

/// Encode a record array
pub fn encode_all<T: Serialize>(values: &[T]) -> DepotResult<Vec<u8>> {
    serde_json::to_vec(values).map_err(|e| DepotError::SerializationFailure(e.to_string()))
}

/// Decode one record
pub fn decode<T: DeserializeOwned>(bytes: &[u8], location: &Path) -> DepotResult<T> {
    serde_json::from_slice(bytes).map_err(|_| DepotError::mismatch(location))
}

/// Decode a record array
pub fn decode_all<T: DeserializeOwned>(bytes: &[u8], location: &Path) -> DepotResult<Vec<T>> {
    serde_json::from_slice(bytes).map_err(|_| DepotError::mismatch(location))
}
