// src/engine/encoder.rs
//
// Re-encoder: resample to target dimensions, encode with the format's codec,
// wrap the payload as a base64 data URI.

use crate::engine::common::run_with_panic_policy;
use crate::error::{InlineImageError, Result};
use crate::ops::{OutputFormat, Quality};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use fast_image_resize::{self as fir, MulDiv, PixelType, ResizeOptions};
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use mozjpeg::{ColorSpace, Compress};
use std::borrow::Cow;
use std::io::Cursor;

/// Resample a bitmap to the given dimensions with Lanczos3.
///
/// Equal dimensions are a no-op; the pass-through path must not pay for a
/// pixel copy. RGBA sources are premultiplied around the resize so edge
/// pixels don't bleed through transparent neighbors.
pub fn resample(img: DynamicImage, target_width: u32, target_height: u32) -> Result<DynamicImage> {
    let source_width = img.width();
    let source_height = img.height();

    if (source_width, source_height) == (target_width, target_height) {
        return Ok(img);
    }
    if source_width == 0 || source_height == 0 || target_width == 0 || target_height == 0 {
        return Err(InlineImageError::resize_failed(
            (source_width, source_height),
            (target_width, target_height),
            "invalid dimensions for resample",
        ));
    }

    // Keep RGB sources three-channel; everything else goes through RGBA.
    let (pixel_type, pixels): (PixelType, Vec<u8>) = match img {
        DynamicImage::ImageRgb8(rgb) => (PixelType::U8x3, rgb.into_raw()),
        DynamicImage::ImageRgba8(rgba) => (PixelType::U8x4, rgba.into_raw()),
        other => (PixelType::U8x4, other.to_rgba8().into_raw()),
    };

    resample_buffer(
        source_width,
        source_height,
        pixels,
        pixel_type,
        target_width,
        target_height,
    )
    .map_err(|message| {
        InlineImageError::resize_failed(
            (source_width, source_height),
            (target_width, target_height),
            message,
        )
    })
}

fn resample_buffer(
    src_width: u32,
    src_height: u32,
    src_pixels: Vec<u8>,
    pixel_type: PixelType,
    dst_width: u32,
    dst_height: u32,
) -> std::result::Result<DynamicImage, String> {
    let expected = (src_width as usize)
        .checked_mul(src_height as usize)
        .and_then(|n| n.checked_mul(pixel_type.size()))
        .ok_or_else(|| "source buffer size overflow".to_string())?;
    if src_pixels.len() != expected {
        return Err(format!(
            "source buffer size mismatch: expected {expected} bytes, got {}",
            src_pixels.len()
        ));
    }

    // Copy into an owned fir image: always correctly aligned, unlike
    // borrowing the image crate's buffer via from_slice_u8.
    let mut src_image = fir::images::Image::new(src_width, src_height, pixel_type);
    src_image.buffer_mut().copy_from_slice(&src_pixels);
    let mut dst_image = fir::images::Image::new(dst_width, dst_height, pixel_type);

    let premultiply = pixel_type == PixelType::U8x4;
    let mul_div = MulDiv::default();
    if premultiply {
        mul_div
            .multiply_alpha_inplace(&mut src_image)
            .map_err(|e| format!("failed to premultiply alpha: {e}"))?;
    }

    let options =
        ResizeOptions::new().resize_alg(fir::ResizeAlg::Convolution(fir::FilterType::Lanczos3));
    let mut resizer = fir::Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| format!("fir resize error: {e:?}"))?;

    if premultiply {
        mul_div
            .divide_alpha_inplace(&mut dst_image)
            .map_err(|e| format!("failed to unpremultiply alpha: {e}"))?;
    }

    let dst_pixels = dst_image.into_vec();
    match pixel_type {
        PixelType::U8x3 => RgbImage::from_raw(dst_width, dst_height, dst_pixels)
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(|| "failed to rebuild rgb image after resample".to_string()),
        PixelType::U8x4 => RgbaImage::from_raw(dst_width, dst_height, dst_pixels)
            .map(DynamicImage::ImageRgba8)
            .ok_or_else(|| "failed to rebuild rgba image after resample".to_string()),
        _ => Err("unsupported pixel type after resample".to_string()),
    }
}

/// Encode a bitmap into the requested output format at the given quality.
pub fn encode_frame(img: &DynamicImage, format: OutputFormat, quality: Quality) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Jpeg => encode_jpeg(img, quality.percent()),
        OutputFormat::Png => encode_png(img),
        OutputFormat::WebP => encode_webp(img, quality.percent()),
    }
}

/// Encode to JPEG using mozjpeg with progressive, web-optimized settings.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    run_with_panic_policy("encode:jpeg", || {
        let rgb: Cow<'_, RgbImage> = match img {
            DynamicImage::ImageRgb8(rgb_img) => Cow::Borrowed(rgb_img),
            _ => Cow::Owned(img.to_rgb8()),
        };
        let (w, h) = rgb.dimensions();
        let pixels: &[u8] = rgb.as_raw();

        if w == 0 || h == 0 {
            return Err(InlineImageError::encode_failed(
                "jpeg",
                "zero-sized image cannot be encoded",
            ));
        }

        let mut comp = Compress::new(ColorSpace::JCS_RGB);
        comp.set_size(w as usize, h as usize);
        comp.set_color_space(ColorSpace::JCS_YCbCr);
        comp.set_quality(quality.min(100) as f32);
        comp.set_chroma_sampling_pixel_sizes((2, 2), (2, 2));
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let estimated = (w as usize * h as usize * 3 / 10).max(4096);
        let mut output = Vec::with_capacity(estimated);
        {
            let mut writer = comp.start_compress(&mut output).map_err(|e| {
                InlineImageError::encode_failed(
                    "jpeg",
                    format!("mozjpeg: failed to start compress: {e:?}"),
                )
            })?;

            let stride = w as usize * 3;
            for row in pixels.chunks(stride) {
                writer.write_scanlines(row).map_err(|e| {
                    InlineImageError::encode_failed(
                        "jpeg",
                        format!("mozjpeg: failed to write scanlines: {e:?}"),
                    )
                })?;
            }

            writer.finish().map_err(|e| {
                InlineImageError::encode_failed(
                    "jpeg",
                    format!("mozjpeg: failed to finish: {e:?}"),
                )
            })?;
        }

        Ok(output)
    })
}

/// Encode to PNG with the image crate, then recompress losslessly with oxipng.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    run_with_panic_policy("encode:png", || {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| {
                InlineImageError::encode_failed("png", format!("PNG encode failed: {e}"))
            })?;

        let options = oxipng::Options::from_preset(2);
        oxipng::optimize_from_memory(&buf, &options).map_err(|e| {
            InlineImageError::encode_failed("png", format!("oxipng optimization failed: {e}"))
        })
    })
}

/// Encode to WebP. Keeps the alpha channel only when the source carries one.
pub fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    run_with_panic_policy("encode:webp", || {
        let quality = quality.min(100) as f32;
        let encoded = if img.color().has_alpha() {
            let rgba: Cow<'_, RgbaImage> = match img {
                DynamicImage::ImageRgba8(rgba_img) => Cow::Borrowed(rgba_img),
                _ => Cow::Owned(img.to_rgba8()),
            };
            let (w, h) = rgba.dimensions();
            webp::Encoder::from_rgba(&rgba, w, h).encode(quality)
        } else {
            let rgb: Cow<'_, RgbImage> = match img {
                DynamicImage::ImageRgb8(rgb_img) => Cow::Borrowed(rgb_img),
                _ => Cow::Owned(img.to_rgb8()),
            };
            let (w, h) = rgb.dimensions();
            webp::Encoder::from_rgb(&rgb, w, h).encode(quality)
        };
        Ok(encoded.to_vec())
    })
}

/// Wrap encoded bytes as a `data:` URI with a base64 payload.
pub fn to_data_uri(format: OutputFormat, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        format.media_type(),
        STANDARD.encode(bytes)
    )
}
