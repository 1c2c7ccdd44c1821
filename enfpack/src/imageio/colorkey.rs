//! Color-key transparency.

use image::RgbaImage;

use crate::imageio::ImageIoError;

/// An 8-bit per channel RGB color key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Parse a 6-digit hex RGB string, with or without a leading `#`.
pub fn parse_hex_rgb(s: &str) -> Result<Rgb, ImageIoError> {
    let trimmed = s.trim().to_lowercase();
    let trimmed = trimmed.strip_prefix('#').unwrap_or(&trimmed);
    if trimmed.len() != 6 {
        return Err(ImageIoError::InvalidColorKey(s.to_string()));
    }

    let v = u32::from_str_radix(trimmed, 16)
        .map_err(|_| ImageIoError::InvalidColorKey(s.to_string()))?;

    Ok(Rgb {
        r: ((v >> 16) & 0xff) as u8,
        g: ((v >> 8) & 0xff) as u8,
        b: (v & 0xff) as u8,
    })
}

/// Make every pixel matching the RGB key fully transparent.
pub fn apply_color_key(mut img: RgbaImage, key: Rgb) -> RgbaImage {
    for p in img.pixels_mut() {
        if p.0[0] == key.r && p.0[1] == key.g && p.0[2] == key.b {
            p.0[3] = 0;
        }
    }
    img
}
