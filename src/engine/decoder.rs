// src/engine/decoder.rs
//
// Decoder operations: JPEG (mozjpeg), PNG (zune-png), WebP (libwebp),
// image crate fallback for everything else.

use crate::engine::common::run_with_panic_policy;
use crate::engine::{MAX_DECODE_DIMENSION, MAX_DECODE_PIXELS};
use crate::error::{InlineImageError, Result};
use image::{
    DynamicImage, GrayAlphaImage, GrayImage, ImageFormat, ImageReader, RgbImage, RgbaImage,
};
use mozjpeg::Decompress;
use std::io::Cursor;
use webp::{BitstreamFeatures, Decoder as WebPDecoder};
use zune_core::bytestream::ZCursor;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_png::PngDecoder;

/// Detect input format using magic bytes. Returns None if unknown.
pub fn detect_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok()
}

/// Unified decode entrypoint:
/// - Reject oversized headers before any pixel allocation
/// - Detect format once (magic bytes)
/// - Route JPEG to mozjpeg, PNG to zune-png, WebP to libwebp, rest to image crate
pub fn decode_image(bytes: &[u8]) -> Result<(DynamicImage, Option<ImageFormat>)> {
    ensure_dimensions_safe(bytes)?;
    let detected = detect_format(bytes);
    let img = match detected {
        Some(ImageFormat::Jpeg) => decode_jpeg_mozjpeg(bytes)?,
        Some(ImageFormat::Png) => decode_png_zune(bytes)?,
        Some(ImageFormat::WebP) => decode_webp_libwebp(bytes)?,
        _ => decode_with_image_crate(bytes)?,
    };
    Ok((img, detected))
}

/// Decode JPEG using mozjpeg (backed by libjpeg-turbo).
/// Significantly faster than the image crate's pure Rust decoder.
pub fn decode_jpeg_mozjpeg(data: &[u8]) -> Result<DynamicImage> {
    run_with_panic_policy("decode:jpeg", || {
        // Truncated files make libjpeg churn; require the EOI marker up front.
        if !data.windows(2).any(|pair| pair == [0xFF, 0xD9]) {
            return Err(InlineImageError::decode_failed(
                "jpeg: missing EOI marker",
            ));
        }

        let decompress = Decompress::new_mem(data).map_err(|e| {
            InlineImageError::decode_failed(format!("jpeg: decompress init failed: {e:?}"))
        })?;
        let mut decompress = decompress.rgb().map_err(|e| {
            InlineImageError::decode_failed(format!("jpeg: rgb conversion failed: {e:?}"))
        })?;

        let width = decompress.width() as u32;
        let height = decompress.height() as u32;
        check_dimensions(width, height)?;

        let pixels: Vec<[u8; 3]> = decompress.read_scanlines().map_err(|e| {
            InlineImageError::decode_failed(format!("jpeg: failed to read scanlines: {e:?}"))
        })?;
        let flat: Vec<u8> = pixels.into_iter().flatten().collect();

        RgbImage::from_raw(width, height, flat)
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(|| {
                InlineImageError::decode_failed("jpeg: failed to build image from raw data")
            })
    })
}

/// Decode PNG using zune-png. 16-bit input is downsampled to 8-bit.
pub fn decode_png_zune(data: &[u8]) -> Result<DynamicImage> {
    run_with_panic_policy("decode:png", || {
        let options = DecoderOptions::default().png_set_strip_to_8bit(true);
        let mut decoder = PngDecoder::new_with_options(ZCursor::new(data), options);
        let pixels = decoder
            .decode()
            .map_err(|e| InlineImageError::decode_failed(format!("png: decode failed: {e}")))?;

        let (width, height) = decoder
            .dimensions()
            .ok_or_else(|| InlineImageError::decode_failed("png: missing header info"))?;
        let width = width as u32;
        let height = height as u32;
        check_dimensions(width, height)?;

        let buf = match pixels {
            zune_core::result::DecodingResult::U8(v) => v,
            _ => {
                return Err(InlineImageError::decode_failed(
                    "png: unexpected non-U8 pixel buffer",
                ))
            }
        };

        let colorspace = decoder
            .colorspace()
            .ok_or_else(|| InlineImageError::decode_failed("png: missing colorspace"))?;

        let img = match colorspace {
            ColorSpace::RGB => RgbImage::from_raw(width, height, buf)
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(|| InlineImageError::decode_failed("png: failed to build RGB image"))?,
            ColorSpace::RGBA | ColorSpace::YCbCr | ColorSpace::BGRA | ColorSpace::ARGB => {
                RgbaImage::from_raw(width, height, buf)
                    .map(DynamicImage::ImageRgba8)
                    .ok_or_else(|| {
                        InlineImageError::decode_failed("png: failed to build RGBA image")
                    })?
            }
            ColorSpace::Luma => GrayImage::from_raw(width, height, buf)
                .map(DynamicImage::ImageLuma8)
                .ok_or_else(|| {
                    InlineImageError::decode_failed("png: failed to build Luma image")
                })?,
            ColorSpace::LumaA => GrayAlphaImage::from_raw(width, height, buf)
                .map(DynamicImage::ImageLumaA8)
                .ok_or_else(|| {
                    InlineImageError::decode_failed("png: failed to build LumaA image")
                })?,
            other => {
                return Err(InlineImageError::decode_failed(format!(
                    "png: unsupported colorspace {other:?}"
                )))
            }
        };

        Ok(img)
    })
}

/// Decode WebP using libwebp. Falls back to the image crate for animated WebP.
pub fn decode_webp_libwebp(data: &[u8]) -> Result<DynamicImage> {
    run_with_panic_policy("decode:webp", || {
        // Parse the header first to avoid allocating huge buffers on malformed files
        let features = BitstreamFeatures::new(data).ok_or_else(|| {
            InlineImageError::decode_failed("webp: failed to read bitstream features")
        })?;

        if features.has_animation() {
            // The simple libwebp decoder does not support animation
            return image::load_from_memory(data).map_err(|e| {
                InlineImageError::decode_failed(format!("webp (animated) decode failed: {e}"))
            });
        }

        check_dimensions(features.width(), features.height())?;

        let decoded = WebPDecoder::new(data)
            .decode()
            .ok_or_else(|| InlineImageError::decode_failed("webp: decode failed"))?;

        Ok(decoded.to_image())
    })
}

/// Decode remaining formats with the image crate.
pub fn decode_with_image_crate(data: &[u8]) -> Result<DynamicImage> {
    run_with_panic_policy("decode:image", || {
        image::load_from_memory(data)
            .map_err(|e| InlineImageError::decode_failed(format!("decode failed: {e}")))
    })
}

/// Check if image dimensions are within safe limits.
/// Returns an error if the image is too large (potential decompression bomb).
pub fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width > MAX_DECODE_DIMENSION || height > MAX_DECODE_DIMENSION {
        return Err(InlineImageError::dimension_exceeds_limit(
            width.max(height),
            MAX_DECODE_DIMENSION,
        ));
    }
    let pixels = width as u64 * height as u64;
    if pixels > MAX_DECODE_PIXELS {
        return Err(InlineImageError::pixel_count_exceeds_limit(
            pixels,
            MAX_DECODE_PIXELS,
        ));
    }
    Ok(())
}

/// Inspect encoded bytes and ensure the declared dimensions are safe before
/// decoding. Unreadable headers pass through; the decoder itself reports
/// those with a proper decode error.
pub fn ensure_dimensions_safe(bytes: &[u8]) -> Result<()> {
    let cursor = Cursor::new(bytes);
    if let Ok(reader) = ImageReader::new(cursor).with_guessed_format() {
        if let Ok((width, height)) = reader.into_dimensions() {
            return check_dimensions(width, height);
        }
    }
    Ok(())
}
