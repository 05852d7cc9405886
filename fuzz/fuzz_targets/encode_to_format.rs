#![no_main]

//! Fuzz target for image encoding to the supported formats.
//! Tests JPEG (mozjpeg), PNG, and WebP encoding paths for crashes.

use arbitrary::{Arbitrary, Unstructured};
use image::{DynamicImage, RgbaImage};
use inline_image::engine::encode_frame;
use inline_image::{OutputFormat, Quality};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct EncodeSeed {
    format: u8,
    quality: u8,
    width: u8,
    height: u8,
}

fn build_image(data: &[u8], width: u8, height: u8) -> DynamicImage {
    // Limit dimensions to avoid OOM (max 128x128 = 64KB RGBA)
    let w = (width as u32 % 128).max(1);
    let h = (height as u32 % 128).max(1);
    let pixel_count = (w * h * 4) as usize;

    let mut buffer = vec![0u8; pixel_count];
    for (i, byte) in buffer.iter_mut().enumerate() {
        *byte = data.get(i % data.len().max(1)).copied().unwrap_or(128);
    }

    let rgba = RgbaImage::from_raw(w, h, buffer)
        .unwrap_or_else(|| RgbaImage::from_raw(1, 1, vec![0, 0, 0, 255]).unwrap());
    DynamicImage::ImageRgba8(rgba)
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let mut unstructured = Unstructured::new(data);
    let seed: EncodeSeed = match EncodeSeed::arbitrary(&mut unstructured) {
        Ok(s) => s,
        Err(_) => return,
    };

    let img = build_image(data, seed.width, seed.height);
    let quality = Quality::new(seed.quality as f64 / 255.0);

    let format = match seed.format % 3 {
        0 => OutputFormat::Jpeg,
        1 => OutputFormat::Png,
        _ => OutputFormat::WebP,
    };

    // We only care about panics/crashes, not encoding errors.
    let _ = encode_frame(&img, format, quality);
});
