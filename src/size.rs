//! Human readable disk sizes.
//!
//! Sizes such as `"50 GiB"` or `"2TB"` are turned into a raw byte count
//! before they go into a request document. Binary suffixes (`KiB`, `MiB`,
//! `GiB`, ...) are powers of 1024, decimal ones (`KB`, `MB`, `GB`, ...)
//! powers of 1000. A bare number is a byte count.
use bytesize::ByteSize;

use crate::builder::BuilderError;

/// Parse a human readable size into bytes, rejecting empty and zero sizes.
pub fn parse_size(size: &str) -> Result<u64, BuilderError> {
    let invalid = |reason: String| BuilderError::InvalidField("size".to_string(), reason);

    let trimmed = size.trim();
    if trimmed.is_empty() {
        return Err(invalid("size is empty".to_string()));
    }

    let bytes = trimmed
        .parse::<ByteSize>()
        .map_err(|e| invalid(format!("{:?}: {}", size, e)))?
        .as_u64();
    if bytes == 0 {
        return Err(invalid(format!("{:?} is zero bytes", size)));
    }
    Ok(bytes)
}
