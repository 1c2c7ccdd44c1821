//! Packing configuration and result types.

use std::str::FromStr;

use image::RgbaImage;

use crate::packer::PackError;

/// Placement heuristic used by the MaxRects bin.
///
/// The rules differ only in how candidate free rectangles are scored; the
/// scoring itself is pure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rule {
    /// Minimize the smaller leftover side.
    #[default]
    BestShortSideFit,
    /// Minimize the larger leftover side.
    BestLongSideFit,
    /// Minimize leftover area.
    BestAreaFit,
    /// Lowest top edge, then leftmost.
    BottomLeft,
    /// Maximize edge contact with walls and placed rectangles.
    ContactPoint,
}

impl FromStr for Rule {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Rule, PackError> {
        match s.trim().to_lowercase().as_str() {
            "bssf" => Ok(Rule::BestShortSideFit),
            "blsf" => Ok(Rule::BestLongSideFit),
            "baf" => Ok(Rule::BestAreaFit),
            "bl" => Ok(Rule::BottomLeft),
            "cp" => Ok(Rule::ContactPoint),
            other => Err(PackError::InvalidConfig(format!(
                "unknown rule {other:?} (supported: bssf, blsf, baf, bl, cp)"
            ))),
        }
    }
}

/// Controls atlas packing behavior.
#[derive(Debug, Clone)]
pub struct Config {
    /// Minimum texture size (power of 2).
    pub min_size: i32,
    /// Maximum texture size (power of 2).
    pub max_size: i32,
    /// Gap around every image.
    pub gap: i32,
    /// 0..1 penalty applied to non-square candidates.
    pub aspect_penalty: f64,
    /// Placement heuristic.
    pub rule: Rule,
    /// Break size ties toward the taller atlas.
    pub prefer_height: bool,
    /// Only consider square atlases.
    pub force_square: bool,
    /// Allow 90° rotation; improves packing a lot for tall/wide sprites.
    pub allow_rotate: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            min_size: 256,
            max_size: 4096,
            gap: 0,
            aspect_penalty: 0.25,
            rule: Rule::default(),
            prefer_height: false,
            force_square: false,
            allow_rotate: false,
        }
    }
}

/// A source image to pack.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Globally unique name.
    pub name: String,
    pub width: i32,
    pub height: i32,
    /// Pixel source, blitted into the atlas at placement time.
    pub image: RgbaImage,
}

/// Where an image ended up in the atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub name: String,
    pub x: i32,
    pub y: i32,
    /// Source width (before any rotation).
    pub width: i32,
    /// Source height (before any rotation).
    pub height: i32,
    /// The placed rectangle has swapped dimensions when set.
    pub rotated: bool,
}

/// The packed atlas and its placements.
pub struct PackResult {
    pub image: RgbaImage,
    pub placements: Vec<Placement>,
    pub width: i32,
    pub height: i32,
}
