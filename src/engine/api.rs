// src/engine/api.rs
//
// Public conversion API: InputFile, Converter, ConversionResult.
//
// The pipeline is strictly sequential: validate -> load -> decode -> plan ->
// encode. Validation is synchronous and touches no file bytes; every later
// stage is awaited on the blocking pool and must complete before the next
// starts. Any failure short-circuits into an error result - nothing partial
// ever escapes, and no error unwinds across this boundary.

use crate::engine::io::{media_type_for_path, Source};
use crate::engine::validator::Limits;
use crate::engine::{decoder, encoder, planner, validator, DEFAULT_QUALITY};
use crate::error::{InlineImageError, Result};
use crate::ops::{OutputFormat, Quality};
use std::path::Path;
use tracing::debug;

/// Outcome of one conversion.
///
/// Exactly one slot is populated: `base64` is empty if and only if `error`
/// is present. Callers branch on the field, not on a result type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionResult {
    /// Base64 data URI of the re-encoded image, or empty on failure.
    pub base64: String,
    /// Human-readable error message, or None on success.
    pub error: Option<String>,
}

impl ConversionResult {
    fn success(base64: String) -> Self {
        Self {
            base64,
            error: None,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            base64: String::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// A caller-supplied image file: declared media type plus a byte source.
///
/// The declared media type drives validation and output format selection;
/// the actual decode trusts magic bytes, not the declaration.
#[derive(Clone, Debug)]
pub struct InputFile {
    media_type: String,
    source: Source,
}

impl InputFile {
    /// Wrap an in-memory buffer with an explicit media type.
    pub fn from_bytes(media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            source: Source::from_bytes(bytes),
        }
    }

    /// Reference a file lazily. The media type is guessed from the extension;
    /// the file body is not touched until the pipeline passes validation.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self {
            media_type: media_type_for_path(path).to_string(),
            source: Source::Path(path.to_path_buf()),
        }
    }

    /// Memory-map a file for zero-copy conversion.
    pub fn map_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Ok(Self {
            media_type: media_type_for_path(path).to_string(),
            source: Source::map_file(path)?,
        })
    }

    /// Override the declared media type (e.g. when the caller got it from a
    /// multipart upload rather than the filename).
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = media_type.into();
        self
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Byte length without reading the file body.
    pub fn byte_len(&self) -> Result<u64> {
        self.source.byte_len()
    }
}

/// Conversion configuration: limits plus the default quality factor.
#[derive(Clone, Copy, Debug)]
pub struct Converter {
    limits: Limits,
    default_quality: f64,
}

impl Default for Converter {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            default_quality: DEFAULT_QUALITY,
        }
    }
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_default_quality(mut self, quality: f64) -> Self {
        self.default_quality = quality;
        self
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Convert an image file into a compressed base64 data URI.
    ///
    /// `quality` is a factor in [0.0, 1.0]; `None` uses the configured
    /// default. This never panics and never returns a partial result: every
    /// failure mode lands in the error slot of the returned value.
    pub async fn convert(&self, file: &InputFile, quality: Option<f64>) -> ConversionResult {
        match self.try_convert(file, quality).await {
            Ok(base64) => ConversionResult::success(base64),
            Err(err) => {
                debug!(error = %err, "conversion failed");
                ConversionResult::failure(err.user_message().into_owned())
            }
        }
    }

    async fn try_convert(&self, file: &InputFile, quality: Option<f64>) -> Result<String> {
        let quality = Quality::new(quality.unwrap_or(self.default_quality));
        let format = OutputFormat::from_media_type(file.media_type());

        // Cheap checks first: declared type before the size lookup, so a
        // non-image input is rejected without even a stat; either rejection
        // keeps the file body unread.
        validator::validate_media_type(file.media_type())?;
        validator::validate_size(file.byte_len()?, &self.limits)?;

        let bytes = stage("load", {
            let source = file.source().clone();
            move || source.bytes()
        })
        .await?;

        let decoded = stage("decode", move || {
            decoder::decode_image(bytes.as_ref()).map(|(img, _)| img)
        })
        .await?;

        let (width, height) = (decoded.width(), decoded.height());
        let (target_width, target_height) =
            planner::plan_dimensions(width, height, self.limits.max_dimension);
        debug!(
            width,
            height,
            target_width,
            target_height,
            format = format.name(),
            "planned target dimensions"
        );

        stage("encode", move || {
            let resized = encoder::resample(decoded, target_width, target_height)?;
            let payload = encoder::encode_frame(&resized, format, quality)?;
            Ok(encoder::to_data_uri(format, &payload))
        })
        .await
    }
}

/// Run one pipeline stage on the blocking pool and await its completion.
async fn stage<T>(name: &'static str, f: impl FnOnce() -> Result<T> + Send + 'static) -> Result<T>
where
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result,
        // The closure itself confines codec panics; a join error means the
        // worker was torn down underneath us.
        Err(join_err) => Err(InlineImageError::internal_panic(format!(
            "{name} stage worker failed: {join_err}"
        ))),
    }
}

/// Convert with default limits and quality 0.8.
///
/// The single entry point most callers want: returns a populated
/// `ConversionResult`, never an `Err` and never a panic.
pub async fn convert_to_base64(file: &InputFile, quality: Option<f64>) -> ConversionResult {
    Converter::new().convert(file, quality).await
}
