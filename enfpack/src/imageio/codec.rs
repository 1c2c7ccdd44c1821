//! Output encoding settings.

use crate::bcn::Format;
use crate::imageio::ImageIoError;

/// Configures DDS/EDDS output encoding.
#[derive(Debug, Clone, Copy)]
pub struct EncodeSettings {
    /// Output pixel format.
    pub format: Format,
    /// BCn quality: 0 = encoder default, 1..10 = explicit levels.
    pub quality: i32,
    /// Mip levels written for EDDS: 0 = full chain, 1 = base only.
    pub mipmaps: u32,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        EncodeSettings {
            format: Format::Bgra8,
            quality: 0,
            mipmaps: 0,
        }
    }
}

/// Parse a textual output format alias. Empty input means the BGRA8 default.
pub fn parse_output_format(s: &str) -> Result<Format, ImageIoError> {
    let v = normalize_format_alias(s);
    if v.is_empty() {
        return Ok(Format::Bgra8);
    }

    match v.as_str() {
        "bgra8" | "b8g8r8a8unorm" => Ok(Format::Bgra8),
        "dxt1" | "bc1" => Ok(Format::BC1),
        "dxt5" | "bc3" => Ok(Format::BC3),
        _ => Err(ImageIoError::UnknownFormatAlias(s.to_string())),
    }
}

/// Validate a BCn quality level.
pub fn validate_quality_level(q: i32) -> Result<(), ImageIoError> {
    if !(0..=10).contains(&q) {
        return Err(ImageIoError::InvalidQuality(q));
    }
    Ok(())
}

fn normalize_format_alias(s: &str) -> String {
    let s = s.trim().to_lowercase().replace(['-', '_'], "");
    s.strip_prefix("dxgiformat").unwrap_or(&s).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("").unwrap(), Format::Bgra8);
        assert_eq!(parse_output_format("bgra8").unwrap(), Format::Bgra8);
        assert_eq!(
            parse_output_format("DXGI_FORMAT_B8G8R8A8_UNORM").unwrap(),
            Format::Bgra8
        );
        assert_eq!(parse_output_format("dxt1").unwrap(), Format::BC1);
        assert_eq!(parse_output_format("bc1").unwrap(), Format::BC1);
        assert_eq!(parse_output_format("dxt5").unwrap(), Format::BC3);
        assert_eq!(parse_output_format("bc3").unwrap(), Format::BC3);
    }

    #[test]
    fn test_parse_output_format_unknown() {
        assert!(matches!(
            parse_output_format("foo"),
            Err(ImageIoError::UnknownFormatAlias(_))
        ));
    }

    #[test]
    fn test_validate_quality_level() {
        for q in [0, 1, 6, 10] {
            assert!(validate_quality_level(q).is_ok(), "quality {q}");
        }
        for q in [-1, 11] {
            assert!(validate_quality_level(q).is_err(), "quality {q}");
        }
    }
}
