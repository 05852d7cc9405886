// src/engine.rs
//
// The core of inline-image. A linear conversion pipeline:
// 1. Validate the declared media type and byte size (synchronous, no I/O)
// 2. Load and decode the file into a bitmap
// 3. Plan target dimensions under the configured cap
// 4. Resample, re-encode, and wrap as a base64 data URI
//
// This file is a facade that delegates to the decomposed modules in engine/

// =============================================================================
// DEFAULT LIMITS
// =============================================================================

/// Default input size cap in bytes (5 MiB).
pub const MAX_INPUT_BYTES: u64 = 5 * 1024 * 1024;

/// Default cap on the larger axis of the re-encoded output, in pixels.
pub const MAX_TARGET_DIMENSION: u32 = 1024;

/// Default compression quality factor.
pub const DEFAULT_QUALITY: f64 = 0.8;

// =============================================================================
// SECURITY LIMITS
// =============================================================================

/// Maximum decoded dimension (width or height).
/// Images larger than 32768x32768 are rejected to prevent decompression bombs.
pub const MAX_DECODE_DIMENSION: u32 = 32768;

/// Maximum decoded pixel count (width * height).
/// 100 megapixels = 400MB uncompressed RGBA. Beyond this is likely malicious.
pub const MAX_DECODE_PIXELS: u64 = 100_000_000;

// =============================================================================
// MODULE DECOMPOSITION
// =============================================================================

mod api;
mod common;
mod decoder;
mod encoder;
mod io;
mod planner;
mod validator;

// Re-export commonly used types and functions
pub use api::{convert_to_base64, ConversionResult, Converter, InputFile};
pub use decoder::{check_dimensions, decode_image, detect_format, ensure_dimensions_safe};
pub use encoder::{encode_frame, resample, to_data_uri};
pub use io::{Source, SourceBytes};
pub use planner::plan_dimensions;
pub use validator::{validate, validate_media_type, validate_size, Limits};
