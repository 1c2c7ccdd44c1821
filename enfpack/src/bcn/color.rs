//! Pixel-level utilities shared by the BCn codecs.
//!
//! Everything here operates on [`ColorRgba`] values or 4×4 blocks of them.
//! Reference-color generation always saturates alpha to 255; the only
//! transparent color a codec ever produces is BC1's alpha-mode index 3.

/// An 8-bit per channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorRgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ColorRgba {
    /// Fully transparent black, used as the BC1 alpha-mode reference.
    pub const TRANSPARENT: ColorRgba = ColorRgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Convert to packed RGB565.
    pub fn to_565(self) -> u16 {
        (u16::from(self.r & 0b1111_1000) << 8)
            | (u16::from(self.g & 0b1111_1100) << 3)
            | u16::from(self.b >> 3)
    }

    /// Luminance approximation `R + 2G + B`.
    pub fn luminance(self) -> i32 {
        i32::from(self.r) + i32::from(self.g) * 2 + i32::from(self.b)
    }

    /// Squared Euclidean distance over the RGB channels.
    pub fn sqr_distance(self, other: ColorRgba) -> i32 {
        let dr = i32::from(self.r) - i32::from(other.r);
        let dg = i32::from(self.g) - i32::from(other.g);
        let db = i32::from(self.b) - i32::from(other.b);
        dr * dr + dg * dg + db * db
    }

    /// Channel-wise `(2*self + other) / 3`, alpha saturated to 255.
    pub fn mix21(self, other: ColorRgba) -> ColorRgba {
        ColorRgba {
            r: mix21_channel(self.r, other.r),
            g: mix21_channel(self.g, other.g),
            b: mix21_channel(self.b, other.b),
            a: 255,
        }
    }

    /// Channel-wise `(self + 2*other) / 3`, alpha saturated to 255.
    pub fn mix12(self, other: ColorRgba) -> ColorRgba {
        ColorRgba {
            r: mix12_channel(self.r, other.r),
            g: mix12_channel(self.g, other.g),
            b: mix12_channel(self.b, other.b),
            a: 255,
        }
    }

    /// Channel-wise `(self + other) / 2`, alpha saturated to 255.
    pub fn mix11(self, other: ColorRgba) -> ColorRgba {
        ColorRgba {
            r: mix11_channel(self.r, other.r),
            g: mix11_channel(self.g, other.g),
            b: mix11_channel(self.b, other.b),
            a: 255,
        }
    }
}

/// Expand packed RGB565 back to [`ColorRgba`] with alpha 255.
///
/// Only the surviving top bits are restored; the dropped low bits stay zero,
/// so `to_565(from_565(v)) == v`.
pub fn from_565(v: u16) -> ColorRgba {
    ColorRgba {
        r: ((v >> 8) & 0b1111_1000) as u8,
        g: ((v >> 3) & 0b1111_1100) as u8,
        b: ((v << 3) & 0b1111_1000) as u8,
        a: 255,
    }
}

fn mix21_channel(x: u8, y: u8) -> u8 {
    ((2 * u16::from(x) + u16::from(y)) / 3) as u8
}

fn mix12_channel(x: u8, y: u8) -> u8 {
    ((u16::from(x) + 2 * u16::from(y)) / 3) as u8
}

fn mix11_channel(x: u8, y: u8) -> u8 {
    ((u16::from(x) + u16::from(y)) / 2) as u8
}

/// Find the minimum and maximum colors of a block by luminance.
///
/// Ties resolve to the first pixel seen. Returns `(min, max)`.
pub fn min_max_luminance(block: &[ColorRgba; 16]) -> (ColorRgba, ColorRgba) {
    let mut max_lum = -1i32;
    let mut min_lum = i32::MAX;
    let mut max_color = block[0];
    let mut min_color = block[0];

    for &p in block {
        let lum = p.luminance();
        if lum > max_lum {
            max_lum = lum;
            max_color = p;
        }
        if lum < min_lum {
            min_lum = lum;
            min_color = p;
        }
    }

    (min_color, max_color)
}

/// Extract a 4×4 block from a width×height RGBA buffer.
///
/// Pixels outside the buffer are transparent black.
pub fn fetch_block(rgba: &[u8], x: usize, y: usize, width: usize, height: usize) -> [ColorRgba; 16] {
    let mut block = [ColorRgba::default(); 16];
    for row in 0..4 {
        for col in 0..4 {
            let px = x + col;
            let py = y + row;
            if px < width && py < height {
                let idx = (py * width + px) * 4;
                if idx + 3 < rgba.len() {
                    block[row * 4 + col] = ColorRgba {
                        r: rgba[idx],
                        g: rgba[idx + 1],
                        b: rgba[idx + 2],
                        a: rgba[idx + 3],
                    };
                }
            }
        }
    }
    block
}

/// Encode the 16 2-bit color indices of a BC1/BC3 block.
///
/// With `has_alpha`, pixels below the 128 alpha threshold are forced onto
/// index 3 (the transparent reference).
pub(crate) fn encode_color_table(
    block: &[ColorRgba; 16],
    refs: &[ColorRgba; 4],
    has_alpha: bool,
) -> u32 {
    let mut table = 0u32;

    for (i, &p) in block.iter().enumerate() {
        let idx = if has_alpha && p.a < 128 {
            3u32
        } else {
            let mut min_distance = i32::MAX;
            let mut best = 0u32;
            for (j, &r) in refs.iter().enumerate() {
                let distance = p.sqr_distance(r);
                if distance < min_distance {
                    min_distance = distance;
                    best = j as u32;
                }
            }
            best
        };
        table |= idx << (i * 2);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(r: u8, g: u8, b: u8) -> ColorRgba {
        ColorRgba { r, g, b, a: 255 }
    }

    #[test]
    fn test_565_black_white() {
        assert_eq!(c(0, 0, 0).to_565(), 0);
        assert_eq!(c(255, 255, 255).to_565(), 0xFFFF);
    }

    #[test]
    fn test_565_primaries() {
        assert_eq!(c(255, 0, 0).to_565(), 0xF800);
        assert_eq!(c(0, 255, 0).to_565(), 0x07E0);
        assert_eq!(c(0, 0, 255).to_565(), 0x001F);
    }

    #[test]
    fn test_565_roundtrip_is_identity_on_packed_values() {
        // to_565(from_565(v)) must reproduce v exactly for every packed value.
        for v in [0u16, 0x0001, 0x07E0, 0xF800, 0x1234, 0xFFFF] {
            assert_eq!(from_565(v).to_565(), v, "565 roundtrip failed for {v:#06x}");
        }
    }

    #[test]
    fn test_from_565_alpha_is_opaque() {
        assert_eq!(from_565(0x1234).a, 255);
    }

    #[test]
    fn test_luminance_weights_green_double() {
        assert_eq!(c(10, 0, 0).luminance(), 10);
        assert_eq!(c(0, 10, 0).luminance(), 20);
        assert_eq!(c(0, 0, 10).luminance(), 10);
    }

    #[test]
    fn test_sqr_distance() {
        assert_eq!(c(1, 2, 3).sqr_distance(c(1, 2, 3)), 0);
        assert_eq!(c(0, 0, 0).sqr_distance(c(255, 255, 255)), 3 * 255 * 255);
    }

    #[test]
    fn test_mixes_are_unbiased_integer_division() {
        let a = c(100, 100, 100);
        let b = c(10, 10, 10);
        assert_eq!(a.mix21(b).r, (2 * 100 + 10) / 3);
        assert_eq!(a.mix12(b).r, (100 + 2 * 10) / 3);
        assert_eq!(a.mix11(b).r, (100 + 10) / 2);
    }

    #[test]
    fn test_mixes_saturate_alpha() {
        let a = ColorRgba {
            r: 1,
            g: 2,
            b: 3,
            a: 0,
        };
        let b = ColorRgba {
            r: 4,
            g: 5,
            b: 6,
            a: 7,
        };
        assert_eq!(a.mix21(b).a, 255);
        assert_eq!(a.mix12(b).a, 255);
        assert_eq!(a.mix11(b).a, 255);
    }

    #[test]
    fn test_min_max_luminance() {
        let mut block = [c(128, 128, 128); 16];
        block[3] = c(255, 255, 255);
        block[9] = c(0, 0, 0);

        let (min, max) = min_max_luminance(&block);
        assert_eq!(min, c(0, 0, 0));
        assert_eq!(max, c(255, 255, 255));
    }

    #[test]
    fn test_min_max_luminance_ties_take_first() {
        let mut block = [c(10, 10, 10); 16];
        block[0] = c(30, 0, 0); // same luminance as (0, 15, 0)
        block[1] = c(0, 15, 0);

        let (_, max) = min_max_luminance(&block);
        assert_eq!(max, c(30, 0, 0));
    }

    #[test]
    fn test_fetch_block_in_bounds() {
        // 8x8 buffer where each pixel encodes its coordinates.
        let mut rgba = vec![0u8; 8 * 8 * 4];
        for y in 0..8 {
            for x in 0..8 {
                let idx = (y * 8 + x) * 4;
                rgba[idx] = x as u8;
                rgba[idx + 1] = y as u8;
                rgba[idx + 3] = 255;
            }
        }

        let block = fetch_block(&rgba, 4, 4, 8, 8);
        assert_eq!(block[0].r, 4);
        assert_eq!(block[0].g, 4);
        assert_eq!(block[15].r, 7);
        assert_eq!(block[15].g, 7);
    }

    #[test]
    fn test_fetch_block_out_of_bounds_is_transparent_black() {
        let rgba = vec![255u8; 2 * 2 * 4];
        let block = fetch_block(&rgba, 0, 0, 2, 2);

        assert_eq!(block[0].a, 255);
        assert_eq!(block[1].a, 255);
        assert_eq!(block[2], ColorRgba::default()); // x=2 is outside
        assert_eq!(block[15], ColorRgba::default());
    }

    #[test]
    fn test_encode_color_table_forces_transparent_index() {
        let mut block = [c(255, 255, 255); 16];
        block[5].a = 0;
        let refs = [c(255, 255, 255), c(0, 0, 0), c(128, 128, 128), ColorRgba::TRANSPARENT];

        let table = encode_color_table(&block, &refs, true);
        assert_eq!((table >> (5 * 2)) & 0x3, 3);
        assert_eq!(table & 0x3, 0);
    }
}
