//! Record merge algorithm
//!
//! Appending to an existing single-record file first asks what shape the
//! existing bytes are. The answer is a value, not an error: failed
//! decode attempts are ordinary control flow here, and only the case
//! where neither interpretation fits becomes `DeserializationMismatch`.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{DepotError, DepotResult};
use crate::record::codec;

/// Outcome of interpreting existing bytes against a target type.
#[derive(Debug)]
pub enum Decoded<T> {
    /// Exactly one record of the target type
    Single(T),
    /// An array of the target type
    Many(Vec<T>),
    /// Neither interpretation fits
    Incompatible,
}

/// Try the single interpretation first, then the array interpretation.
///
/// The single-before-array order matters: a file written by a scalar
/// save decodes as `Single` and gets promoted to a two-element array on
/// its first append.
pub fn try_decode<T: DeserializeOwned>(bytes: &[u8]) -> Decoded<T> {
    if let Ok(value) = serde_json::from_slice::<T>(bytes) {
        return Decoded::Single(value);
    }
    if let Ok(values) = serde_json::from_slice::<Vec<T>>(bytes) {
        return Decoded::Many(values);
    }
    Decoded::Incompatible
}

/// Merge one new value into existing record bytes.
pub fn merge_one<T>(existing: &[u8], value: T, location: &Path) -> DepotResult<Vec<u8>>
where
    T: Serialize + DeserializeOwned,
{
    match try_decode::<T>(existing) {
        Decoded::Single(old) => codec::encode_all(&[old, value]),
        Decoded::Many(mut values) => {
            values.push(value);
            codec::encode_all(&values)
        }
        Decoded::Incompatible => Err(DepotError::mismatch(location)),
    }
}

/// Merge several new values, in order, into existing record bytes.
pub fn merge_many<T>(existing: &[u8], new_values: Vec<T>, location: &Path) -> DepotResult<Vec<u8>>
where
    T: Serialize + DeserializeOwned,
{
    match try_decode::<T>(existing) {
        Decoded::Single(old) => {
            let mut values = Vec::with_capacity(new_values.len() + 1);
            values.push(old);
            values.extend(new_values);
            codec::encode_all(&values)
        }
        Decoded::Many(mut values) => {
            values.extend(new_values);
            codec::encode_all(&values)
        }
        Decoded::Incompatible => Err(DepotError::mismatch(location)),
    }
}
