// lib.rs
//
// inline-image: validate, downsample, and re-encode images into base64
// data URIs
//
// Design goals:
// - One awaitable entry point, one result shape
// - Every failure mode lands in the result's error slot
// - Fixed caps (input bytes, output dimension) exposed as configuration
// - Codec work stays off the caller's async thread

pub mod engine;
pub mod error;
pub mod ops;

use error::InlineImageError;
use image::ImageReader;
use std::io::{BufRead, BufReader, Cursor, Seek};

pub use engine::{
    convert_to_base64, ConversionResult, Converter, InputFile, Limits, Source, DEFAULT_QUALITY,
    MAX_INPUT_BYTES, MAX_TARGET_DIMENSION,
};
pub use error::{ErrorCategory, InlineImageError as Error, Result};
pub use ops::{OutputFormat, Quality};

/// Image metadata available from header bytes alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectMetadata {
    pub width: u32,
    pub height: u32,
    pub format: Option<String>,
}

fn read_inspect_metadata<R: BufRead + Seek>(reader: R) -> Result<InspectMetadata> {
    let reader = ImageReader::new(reader)
        .with_guessed_format()
        .map_err(|e| InlineImageError::decode_failed(format!("failed to read image header: {e}")))?;

    let format = reader.format().map(|f| format!("{f:?}").to_lowercase());
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| InlineImageError::decode_failed(format!("failed to read dimensions: {e}")))?;

    Ok(InspectMetadata {
        width,
        height,
        format,
    })
}

/// Inspect image metadata WITHOUT decoding pixels.
/// This reads only the header bytes - extremely fast.
///
/// Use this to check dimensions before converting, or to reject images
/// without wasting CPU on a decode.
pub fn inspect_header_from_bytes(data: &[u8]) -> Result<InspectMetadata> {
    read_inspect_metadata(Cursor::new(data))
}

/// Inspect image metadata from a file path without loading the whole file.
pub fn inspect_header_from_path(path: &str) -> Result<InspectMetadata> {
    use std::fs::File;

    let file = File::open(path)
        .map_err(|e| InlineImageError::file_read_failed(path.to_string(), e))?;
    read_inspect_metadata(BufReader::new(file))
}
