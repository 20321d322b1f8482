//! Utility functions for Grain.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::error::{GrainError, Result};

/// Maximum data or backup file size that can be read into memory (10 MB).
///
/// Years of daily logging stay well under this limit.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Read a file into a string, refusing files larger than `MAX_FILE_SIZE`.
pub fn read_to_string_limited(path: &Path) -> Result<String> {
    read_to_string_with_limit(path, MAX_FILE_SIZE)
}

/// Read a file into a string with a custom size limit.
///
/// # Errors
///
/// Returns an error if the file exceeds `max_size` or cannot be read.
pub fn read_to_string_with_limit(path: &Path, max_size: u64) -> Result<String> {
    let metadata = fs::metadata(path).map_err(|e| GrainError::storage(path, e))?;

    let size = metadata.len();
    if size > max_size {
        return Err(GrainError::validation(format!(
            "File {} is too large ({} bytes, max {} bytes)",
            path.display(),
            size,
            max_size
        )));
    }

    fs::read_to_string(path).map_err(|e| GrainError::storage(path, e))
}

/// Deserialize a field, treating an explicit `null` like an absent value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
