// src/ops.rs
//
// Output format selection and quality mapping.
// These are cheap value types - the expensive work happens in the engine.

/// Output format for re-encoding.
///
/// Derived from the input's declared media type. Subtypes without a native
/// encoder fall back to PNG, and the data-URI header reflects the format that
/// was actually produced, not the one that was asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    /// Map a declared media type onto an encodable format.
    pub fn from_media_type(media_type: &str) -> Self {
        match media_type.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            "image/png" => Self::Png,
            "image/webp" => Self::WebP,
            _ => Self::Png,
        }
    }

    /// The MIME type emitted in the data-URI header.
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    /// Short name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }
}

/// Compression quality as a unit-interval factor.
///
/// Callers pass a float in [0.0, 1.0]; codecs want 0-100. Out-of-range values
/// are clamped, non-finite values fall back to the default.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quality(f64);

impl Quality {
    pub const DEFAULT: Quality = Quality(0.8);

    pub fn new(factor: f64) -> Self {
        if factor.is_finite() {
            Self(factor.clamp(0.0, 1.0))
        } else {
            Self::DEFAULT
        }
    }

    pub fn factor(&self) -> f64 {
        self.0
    }

    /// The 0-100 scale the codec crates use.
    pub fn percent(&self) -> u8 {
        (self.0 * 100.0).round() as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_media_type() {
        assert_eq!(OutputFormat::from_media_type("image/jpeg"), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_media_type("image/jpg"), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_media_type("IMAGE/PNG"), OutputFormat::Png);
        assert_eq!(OutputFormat::from_media_type("image/webp"), OutputFormat::WebP);
    }

    #[test]
    fn unknown_subtypes_fall_back_to_png() {
        assert_eq!(OutputFormat::from_media_type("image/gif"), OutputFormat::Png);
        assert_eq!(OutputFormat::from_media_type("image/x-foo"), OutputFormat::Png);
    }

    #[test]
    fn quality_clamps_and_converts() {
        assert_eq!(Quality::new(0.8).percent(), 80);
        assert_eq!(Quality::new(-1.0).percent(), 0);
        assert_eq!(Quality::new(2.0).percent(), 100);
        assert_eq!(Quality::new(0.123).percent(), 12);
    }

    #[test]
    fn quality_rejects_non_finite() {
        assert_eq!(Quality::new(f64::NAN), Quality::DEFAULT);
        assert_eq!(Quality::new(f64::INFINITY), Quality::DEFAULT);
    }
}
