// src/engine/validator.rs
//
// Input validation: declared media type and byte size.
// Runs before any file body is read or decoded.

use crate::engine::{MAX_INPUT_BYTES, MAX_TARGET_DIMENSION};
use crate::error::{InlineImageError, Result};

/// Conversion limits. Defaults reproduce the documented constants
/// (5 MiB input cap, 1024 px output cap).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Inputs larger than this many bytes are rejected up front.
    pub max_input_bytes: u64,
    /// Cap on the larger axis of the re-encoded output.
    pub max_dimension: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_bytes: MAX_INPUT_BYTES,
            max_dimension: MAX_TARGET_DIMENSION,
        }
    }
}

impl Limits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_input_bytes(mut self, bytes: u64) -> Self {
        self.max_input_bytes = bytes;
        self
    }

    pub fn max_dimension(mut self, pixels: u32) -> Self {
        self.max_dimension = pixels;
        self
    }
}

/// Accept only declared media types under the `image/` prefix.
pub fn validate_media_type(media_type: &str) -> Result<()> {
    if !media_type.starts_with("image/") {
        return Err(InlineImageError::invalid_media_type(media_type.to_string()));
    }
    Ok(())
}

/// Accept only byte sizes within the configured cap.
pub fn validate_size(byte_len: u64, limits: &Limits) -> Result<()> {
    if byte_len > limits.max_input_bytes {
        return Err(InlineImageError::input_too_large(
            byte_len,
            limits.max_input_bytes,
        ));
    }
    Ok(())
}

/// Accept only inputs whose declared media type is an image type and whose
/// byte size is within the cap. The type check runs first so the size (which
/// may require a filesystem stat to learn) is never consulted for non-image
/// inputs. No side effects; the same input always produces the same verdict.
pub fn validate(media_type: &str, byte_len: u64, limits: &Limits) -> Result<()> {
    validate_media_type(media_type)?;
    validate_size(byte_len, limits)
}
