// src/error.rs
//
// Unified error handling for inline-image
// Uses thiserror for simple, type-safe error handling
//
// Error Taxonomy:
// - UserError: Invalid input, recoverable
// - CodecError: Format/encoding issues
// - ResourceLimit: Memory/size/dimension limits
// - InternalBug: Library bugs (should not happen)

use std::borrow::Cow;
use thiserror::Error;

/// Coarse error classes for callers that branch on failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid input, recoverable by user
    UserError,
    /// Format/encoding issues
    CodecError,
    /// Memory/size/dimension limits
    ResourceLimit,
    /// Library bugs (should not happen)
    InternalBug,
}

/// inline-image error types
///
/// All errors are type-safe and provide clear, actionable messages.
/// `user_message()` collapses them onto the fixed strings the conversion
/// result reports, so callers matching on those strings keep working.
#[derive(Debug, Error)]
pub enum InlineImageError {
    // Input validation
    #[error("Declared media type '{media_type}' is not an image type")]
    InvalidMediaType { media_type: Cow<'static, str> },

    #[error("Input size {size} bytes exceeds maximum {max} bytes")]
    InputTooLarge { size: u64, max: u64 },

    // File I/O
    #[error("File not found: {path}")]
    FileNotFound { path: Cow<'static, str> },

    #[error("Failed to read file '{path}': {source}")]
    FileReadFailed {
        path: Cow<'static, str>,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to memory-map file '{path}': {source}")]
    MmapFailed {
        path: Cow<'static, str>,
        #[source]
        source: std::io::Error,
    },

    // Decode
    #[error("Unsupported image format: {format}")]
    UnsupportedFormat { format: Cow<'static, str> },

    #[error("Failed to decode image: {message}")]
    DecodeFailed { message: Cow<'static, str> },

    #[error("Corrupted image data")]
    CorruptedImage,

    // Decompression-bomb guard
    #[error("Image dimension {dimension} exceeds maximum {max}")]
    DimensionExceedsLimit { dimension: u32, max: u32 },

    #[error("Image pixel count {pixels} exceeds maximum {max}")]
    PixelCountExceedsLimit { pixels: u64, max: u64 },

    // Re-encode
    #[error("Resample failed ({source_width}x{source_height} -> {target_width}x{target_height}): {message}")]
    ResizeFailed {
        source_width: u32,
        source_height: u32,
        target_width: u32,
        target_height: u32,
        message: Cow<'static, str>,
    },

    #[error("Failed to encode as {format}: {message}")]
    EncodeFailed {
        format: Cow<'static, str>,
        message: Cow<'static, str>,
    },

    // Internal
    #[error("Internal error: {message}")]
    InternalPanic { message: Cow<'static, str> },

    #[error("{message}")]
    Generic { message: Cow<'static, str> },
}

impl Clone for InlineImageError {
    fn clone(&self) -> Self {
        match self {
            Self::InvalidMediaType { media_type } => Self::InvalidMediaType {
                media_type: media_type.clone(),
            },
            Self::InputTooLarge { size, max } => Self::InputTooLarge {
                size: *size,
                max: *max,
            },
            Self::FileNotFound { path } => Self::FileNotFound { path: path.clone() },
            Self::FileReadFailed { path, source } => Self::FileReadFailed {
                path: path.clone(),
                source: std::io::Error::new(source.kind(), source.to_string()),
            },
            Self::MmapFailed { path, source } => Self::MmapFailed {
                path: path.clone(),
                source: std::io::Error::new(source.kind(), source.to_string()),
            },
            Self::UnsupportedFormat { format } => Self::UnsupportedFormat {
                format: format.clone(),
            },
            Self::DecodeFailed { message } => Self::DecodeFailed {
                message: message.clone(),
            },
            Self::CorruptedImage => Self::CorruptedImage,
            Self::DimensionExceedsLimit { dimension, max } => Self::DimensionExceedsLimit {
                dimension: *dimension,
                max: *max,
            },
            Self::PixelCountExceedsLimit { pixels, max } => Self::PixelCountExceedsLimit {
                pixels: *pixels,
                max: *max,
            },
            Self::ResizeFailed {
                source_width,
                source_height,
                target_width,
                target_height,
                message,
            } => Self::ResizeFailed {
                source_width: *source_width,
                source_height: *source_height,
                target_width: *target_width,
                target_height: *target_height,
                message: message.clone(),
            },
            Self::EncodeFailed { format, message } => Self::EncodeFailed {
                format: format.clone(),
                message: message.clone(),
            },
            Self::InternalPanic { message } => Self::InternalPanic {
                message: message.clone(),
            },
            Self::Generic { message } => Self::Generic {
                message: message.clone(),
            },
        }
    }
}

// Constructor Helpers
impl InlineImageError {
    pub fn invalid_media_type(media_type: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidMediaType {
            media_type: media_type.into(),
        }
    }

    pub fn input_too_large(size: u64, max: u64) -> Self {
        Self::InputTooLarge { size, max }
    }

    pub fn file_not_found(path: impl Into<Cow<'static, str>>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn file_read_failed(path: impl Into<Cow<'static, str>>, source: std::io::Error) -> Self {
        Self::FileReadFailed {
            path: path.into(),
            source,
        }
    }

    pub fn mmap_failed(path: impl Into<Cow<'static, str>>, source: std::io::Error) -> Self {
        Self::MmapFailed {
            path: path.into(),
            source,
        }
    }

    pub fn unsupported_format(format: impl Into<Cow<'static, str>>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn decode_failed(message: impl Into<Cow<'static, str>>) -> Self {
        Self::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn corrupted_image() -> Self {
        Self::CorruptedImage
    }

    pub fn dimension_exceeds_limit(dimension: u32, max: u32) -> Self {
        Self::DimensionExceedsLimit { dimension, max }
    }

    pub fn pixel_count_exceeds_limit(pixels: u64, max: u64) -> Self {
        Self::PixelCountExceedsLimit { pixels, max }
    }

    pub fn resize_failed(
        source_dims: (u32, u32),
        target_dims: (u32, u32),
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::ResizeFailed {
            source_width: source_dims.0,
            source_height: source_dims.1,
            target_width: target_dims.0,
            target_height: target_dims.1,
            message: message.into(),
        }
    }

    pub fn encode_failed(
        format: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::EncodeFailed {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn internal_panic(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InternalPanic {
            message: message.into(),
        }
    }

    pub fn generic(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable (user can fix it)
    pub fn is_recoverable(&self) -> bool {
        match self.category() {
            ErrorCategory::UserError | ErrorCategory::ResourceLimit => true,
            ErrorCategory::CodecError | ErrorCategory::InternalBug => false,
        }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidMediaType { .. } | Self::FileNotFound { .. } => ErrorCategory::UserError,

            Self::UnsupportedFormat { .. }
            | Self::DecodeFailed { .. }
            | Self::CorruptedImage
            | Self::ResizeFailed { .. }
            | Self::EncodeFailed { .. } => ErrorCategory::CodecError,

            // FileReadFailed/MmapFailed often indicate resource pressure (disk
            // full, fd limits) and are recoverable, consistent with is_recoverable().
            Self::InputTooLarge { .. }
            | Self::DimensionExceedsLimit { .. }
            | Self::PixelCountExceedsLimit { .. }
            | Self::FileReadFailed { .. }
            | Self::MmapFailed { .. } => ErrorCategory::ResourceLimit,

            Self::InternalPanic { .. } | Self::Generic { .. } => ErrorCategory::InternalBug,
        }
    }

    /// The fixed, caller-visible message for this error.
    ///
    /// Conversion results carry these strings verbatim; downstream code matches
    /// on them, so the exact text is part of the public contract.
    pub fn user_message(&self) -> Cow<'static, str> {
        match self {
            Self::InvalidMediaType { .. } => {
                Cow::Borrowed("Invalid file type. Only images are allowed.")
            }
            Self::InputTooLarge { max, .. } => Cow::Owned(size_limit_message(*max)),
            Self::FileNotFound { .. }
            | Self::FileReadFailed { .. }
            | Self::MmapFailed { .. }
            | Self::UnsupportedFormat { .. }
            | Self::DecodeFailed { .. }
            | Self::CorruptedImage
            | Self::DimensionExceedsLimit { .. }
            | Self::PixelCountExceedsLimit { .. } => Cow::Borrowed("Error loading image."),
            Self::ResizeFailed { .. } | Self::EncodeFailed { .. } => {
                Cow::Borrowed("Error compressing image.")
            }
            Self::InternalPanic { .. } | Self::Generic { .. } => {
                Cow::Borrowed("An error occurred during conversion.")
            }
        }
    }
}

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Render the size-limit message for a configured byte cap.
/// The default 5 MiB cap produces exactly "File size exceeds 5 MB.".
fn size_limit_message(max_bytes: u64) -> String {
    if max_bytes % BYTES_PER_MB == 0 {
        format!("File size exceeds {} MB.", max_bytes / BYTES_PER_MB)
    } else {
        format!(
            "File size exceeds {:.1} MB.",
            max_bytes as f64 / BYTES_PER_MB as f64
        )
    }
}

// Result type alias
pub type Result<T> = std::result::Result<T, InlineImageError>;
