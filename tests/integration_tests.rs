// tests/integration_tests.rs
//
// End-to-end conversion tests: real encoded inputs through the full
// validate -> decode -> plan -> re-encode -> data URI pipeline.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{DynamicImage, RgbImage};
use inline_image::engine::decode_image;
use inline_image::{convert_to_base64, Converter, InputFile, Limits};
use std::io::Cursor;

fn create_test_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }))
}

fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    create_test_image(width, height)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .unwrap();
    buf
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    create_test_image(width, height)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn webp_bytes(width: u32, height: u32) -> Vec<u8> {
    let rgb = create_test_image(width, height).to_rgb8();
    webp::Encoder::from_rgb(&rgb, width, height)
        .encode(80.0)
        .to_vec()
}

/// Strip the data-URI header for `mime`, base64-decode the payload, and
/// decode it back into pixels.
fn decode_payload(base64: &str, mime: &str) -> DynamicImage {
    let prefix = format!("data:{mime};base64,");
    let payload = base64
        .strip_prefix(&prefix)
        .unwrap_or_else(|| panic!("expected prefix {prefix}, got {}", &base64[..40.min(base64.len())]));
    let bytes = STANDARD.decode(payload).expect("valid base64 payload");
    let (img, _) = decode_image(&bytes).expect("payload decodes");
    img
}

#[tokio::test]
async fn small_image_keeps_dimensions() {
    let file = InputFile::from_bytes("image/jpeg", jpeg_bytes(800, 600));
    let result = convert_to_base64(&file, None).await;
    assert!(result.is_success(), "error: {:?}", result.error);

    let img = decode_payload(&result.base64, "image/jpeg");
    assert_eq!((img.width(), img.height()), (800, 600));
}

#[tokio::test]
async fn wide_image_is_bound_to_width() {
    let file = InputFile::from_bytes("image/jpeg", jpeg_bytes(2048, 1024));
    let result = convert_to_base64(&file, None).await;
    assert!(result.is_success(), "error: {:?}", result.error);

    let img = decode_payload(&result.base64, "image/jpeg");
    assert_eq!((img.width(), img.height()), (1024, 512));
}

#[tokio::test]
async fn tall_image_is_bound_to_height() {
    let file = InputFile::from_bytes("image/png", png_bytes(1024, 2048));
    let result = convert_to_base64(&file, None).await;
    assert!(result.is_success(), "error: {:?}", result.error);

    let img = decode_payload(&result.base64, "image/png");
    assert_eq!((img.width(), img.height()), (512, 1024));
}

#[tokio::test]
async fn oversized_square_is_emitted_at_full_resolution() {
    // Strict inequalities on both planner branches: a square image never
    // scales, even above the cap. Pinned here so nobody "fixes" it silently.
    let file = InputFile::from_bytes("image/jpeg", jpeg_bytes(2000, 2000));
    let result = convert_to_base64(&file, None).await;
    assert!(result.is_success(), "error: {:?}", result.error);

    let img = decode_payload(&result.base64, "image/jpeg");
    assert_eq!((img.width(), img.height()), (2000, 2000));
}

#[tokio::test]
async fn webp_round_trips_through_webp() {
    let file = InputFile::from_bytes("image/webp", webp_bytes(300, 200));
    let result = convert_to_base64(&file, None).await;
    assert!(result.is_success(), "error: {:?}", result.error);

    let img = decode_payload(&result.base64, "image/webp");
    assert_eq!((img.width(), img.height()), (300, 200));
}

#[tokio::test]
async fn unknown_image_subtype_falls_back_to_png() {
    // Decode trusts magic bytes, so the pixels come through; the output
    // format falls back to PNG and the data-URI header says so.
    let file = InputFile::from_bytes("image/x-foo", png_bytes(40, 30));
    let result = convert_to_base64(&file, None).await;
    assert!(result.is_success(), "error: {:?}", result.error);
    assert!(result.base64.starts_with("data:image/png;base64,"));

    let img = decode_payload(&result.base64, "image/png");
    assert_eq!((img.width(), img.height()), (40, 30));
}

#[tokio::test]
async fn lower_quality_never_produces_larger_jpeg() {
    let bytes = jpeg_bytes(512, 512);
    let file = InputFile::from_bytes("image/jpeg", bytes);

    let low = convert_to_base64(&file, Some(0.1)).await;
    let high = convert_to_base64(&file, Some(0.9)).await;
    assert!(low.is_success() && high.is_success());

    let low_len = STANDARD
        .decode(low.base64.strip_prefix("data:image/jpeg;base64,").unwrap())
        .unwrap()
        .len();
    let high_len = STANDARD
        .decode(high.base64.strip_prefix("data:image/jpeg;base64,").unwrap())
        .unwrap()
        .len();
    assert!(
        low_len <= high_len,
        "q=0.1 produced {low_len} bytes, q=0.9 produced {high_len}"
    );
}

#[tokio::test]
async fn invalid_media_type_reports_exact_message() {
    let file = InputFile::from_bytes("application/pdf", vec![0x25, 0x50, 0x44, 0x46]);
    let result = convert_to_base64(&file, None).await;
    assert_eq!(
        result.error.as_deref(),
        Some("Invalid file type. Only images are allowed.")
    );
    assert!(result.base64.is_empty());
}

#[tokio::test]
async fn oversized_file_error_is_idempotent() {
    let file = InputFile::from_bytes("image/png", vec![0u8; 5 * 1024 * 1024 + 1]);

    let first = convert_to_base64(&file, None).await;
    let second = convert_to_base64(&file, None).await;

    assert_eq!(first.error.as_deref(), Some("File size exceeds 5 MB."));
    assert_eq!(first.error, second.error);
    assert!(first.base64.is_empty() && second.base64.is_empty());
}

#[tokio::test]
async fn corrupt_image_reports_load_error() {
    let file = InputFile::from_bytes("image/png", b"\x89PNG\r\n\x1a\nbroken".to_vec());
    let result = convert_to_base64(&file, None).await;
    assert_eq!(result.error.as_deref(), Some("Error loading image."));
    assert!(result.base64.is_empty());
}

#[tokio::test]
async fn path_source_converts_lazily() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.jpg");
    std::fs::write(&path, jpeg_bytes(128, 64)).unwrap();

    let file = InputFile::from_path(&path);
    assert_eq!(file.media_type(), "image/jpeg");

    let result = convert_to_base64(&file, None).await;
    assert!(result.is_success(), "error: {:?}", result.error);
    let img = decode_payload(&result.base64, "image/jpeg");
    assert_eq!((img.width(), img.height()), (128, 64));
}

#[tokio::test]
async fn mapped_source_converts_zero_copy() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.png");
    std::fs::write(&path, png_bytes(64, 128)).unwrap();

    let file = InputFile::map_path(&path).unwrap();
    let result = convert_to_base64(&file, None).await;
    assert!(result.is_success(), "error: {:?}", result.error);
    let img = decode_payload(&result.base64, "image/png");
    assert_eq!((img.width(), img.height()), (64, 128));
}

#[tokio::test]
async fn custom_limits_change_the_output_cap() {
    let converter = Converter::new().with_limits(Limits::new().max_dimension(256));
    let file = InputFile::from_bytes("image/jpeg", jpeg_bytes(1024, 512));

    let result = converter.convert(&file, None).await;
    assert!(result.is_success(), "error: {:?}", result.error);
    let img = decode_payload(&result.base64, "image/jpeg");
    assert_eq!((img.width(), img.height()), (256, 128));
}

#[tokio::test]
async fn custom_size_cap_renders_in_message() {
    let converter = Converter::new().with_limits(Limits::new().max_input_bytes(1024 * 1024));
    let file = InputFile::from_bytes("image/jpeg", vec![0u8; 1024 * 1024 + 1]);

    let result = converter.convert(&file, None).await;
    assert_eq!(result.error.as_deref(), Some("File size exceeds 1 MB."));
}
