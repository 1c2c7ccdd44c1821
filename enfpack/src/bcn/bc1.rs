//! BC1 (DXT1) block compression.
//!
//! A BC1 block is 8 bytes:
//! - `color_0`: u16 RGB565 (little-endian)
//! - `color_1`: u16 RGB565 (little-endian)
//! - color table: u32, sixteen 2-bit indices in row-major order
//!
//! The block stores the luminance extrema as endpoints, `color_0` being the
//! luminance maximum. When the raw 565 ordering ends up `color_0 <= color_1`
//! the block is in alpha mode: the palette is `{c0, c1, (c0+c1)/2,
//! transparent}` and index 3 decodes with alpha 0.

use crate::bcn::color::{
    encode_color_table, fetch_block, from_565, min_max_luminance, ColorRgba,
};
use crate::bcn::BcnError;

pub(crate) const BC1_BLOCK_SIZE: usize = 8;

/// Encode a 4×4 block to BC1, selecting alpha mode from the 565 ordering.
pub(crate) fn encode_block_bc1(block: &[ColorRgba; 16]) -> [u8; 8] {
    encode_block_bc1_inner(block, true)
}

/// Encode a 4×4 block to BC1 forcing the opaque four-color palette.
///
/// Used for the color half of BC2/BC3 blocks, where alpha lives elsewhere.
pub(crate) fn encode_block_bc1_opaque(block: &[ColorRgba; 16]) -> [u8; 8] {
    encode_block_bc1_inner(block, false)
}

fn encode_block_bc1_inner(block: &[ColorRgba; 16], allow_alpha: bool) -> [u8; 8] {
    let (mut min_color, mut max_color) = min_max_luminance(block);
    let mut c0 = max_color.to_565();
    let mut c1 = min_color.to_565();

    let mut alpha_mode = c0 <= c1;
    if alpha_mode && !allow_alpha {
        // Force the opaque ordering; equal endpoints collapse the palette
        // to a single color either way.
        core::mem::swap(&mut c0, &mut c1);
        core::mem::swap(&mut max_color, &mut min_color);
        alpha_mode = c0 <= c1;
    }

    let (color2, color3) = if alpha_mode {
        (max_color.mix11(min_color), ColorRgba::TRANSPARENT)
    } else {
        (max_color.mix21(min_color), max_color.mix12(min_color))
    };

    let refs = [max_color, min_color, color2, color3];
    let table = encode_color_table(block, &refs, alpha_mode);

    let mut out = [0u8; 8];
    out[0..2].copy_from_slice(&c0.to_le_bytes());
    out[2..4].copy_from_slice(&c1.to_le_bytes());
    out[4..8].copy_from_slice(&table.to_le_bytes());
    out
}

/// Decode an 8-byte BC1 block to 4×4 RGBA.
pub(crate) fn decode_block_bc1(data: &[u8; 8]) -> [ColorRgba; 16] {
    let c0_565 = u16::from_le_bytes([data[0], data[1]]);
    let c1_565 = u16::from_le_bytes([data[2], data[3]]);
    let table = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);

    let color0 = from_565(c0_565);
    let color1 = from_565(c1_565);
    let alpha_mode = c0_565 <= c1_565;

    let (color2, color3) = if alpha_mode {
        (color0.mix11(color1), ColorRgba::TRANSPARENT)
    } else {
        (color0.mix21(color1), color0.mix12(color1))
    };

    let refs = [color0, color1, color2, color3];

    let mut block = [ColorRgba::default(); 16];
    for (i, slot) in block.iter_mut().enumerate() {
        let idx = ((table >> (i * 2)) & 0x3) as usize;
        *slot = refs[idx];
    }
    block
}

/// Encode an RGBA buffer to BC1.
pub fn encode_bc1(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    let blocks_w = width.div_ceil(4);
    let blocks_h = height.div_ceil(4);
    let mut out = vec![0u8; blocks_w * blocks_h * BC1_BLOCK_SIZE];

    for by in 0..blocks_h {
        for bx in 0..blocks_w {
            let block = fetch_block(rgba, bx * 4, by * 4, width, height);
            let encoded = encode_block_bc1(&block);
            let offset = (by * blocks_w + bx) * BC1_BLOCK_SIZE;
            out[offset..offset + BC1_BLOCK_SIZE].copy_from_slice(&encoded);
        }
    }

    out
}

/// Decode BC1 data to an RGBA buffer.
pub fn decode_bc1(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, BcnError> {
    let blocks_w = width.div_ceil(4);
    let blocks_h = height.div_ceil(4);
    let expected = blocks_w * blocks_h * BC1_BLOCK_SIZE;
    if data.len() < expected {
        return Err(BcnError::TruncatedPayload {
            expected,
            got: data.len(),
        });
    }

    let mut out = vec![0u8; width * height * 4];
    for by in 0..blocks_h {
        for bx in 0..blocks_w {
            let offset = (by * blocks_w + bx) * BC1_BLOCK_SIZE;
            let raw: [u8; 8] = data[offset..offset + 8].try_into().unwrap();
            let block = decode_block_bc1(&raw);
            write_block(&mut out, &block, bx, by, width, height);
        }
    }

    Ok(out)
}

/// Scatter a decoded 4×4 block into the output buffer, clipping at the edges.
pub(crate) fn write_block(
    out: &mut [u8],
    block: &[ColorRgba; 16],
    bx: usize,
    by: usize,
    width: usize,
    height: usize,
) {
    for row in 0..4 {
        for col in 0..4 {
            let px = bx * 4 + col;
            let py = by * 4 + row;
            if px < width && py < height {
                let idx = (py * width + px) * 4;
                let c = block[row * 4 + col];
                out[idx] = c.r;
                out[idx + 1] = c.g;
                out[idx + 2] = c.b;
                out[idx + 3] = c.a;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(r: u8, g: u8, b: u8, a: u8) -> [ColorRgba; 16] {
        [ColorRgba { r, g, b, a }; 16]
    }

    #[test]
    fn test_encode_solid_black() {
        let encoded = encode_block_bc1(&solid(0, 0, 0, 255));
        let c0 = u16::from_le_bytes([encoded[0], encoded[1]]);
        let c1 = u16::from_le_bytes([encoded[2], encoded[3]]);
        assert_eq!(c0, 0);
        assert_eq!(c1, 0);
    }

    #[test]
    fn test_encode_solid_white() {
        let encoded = encode_block_bc1(&solid(255, 255, 255, 255));
        let c0 = u16::from_le_bytes([encoded[0], encoded[1]]);
        let c1 = u16::from_le_bytes([encoded[2], encoded[3]]);
        assert_eq!(c0, 0xFFFF);
        assert_eq!(c1, 0xFFFF);
    }

    #[test]
    fn test_opaque_mode_orders_endpoints() {
        let mut block = solid(0, 0, 0, 255);
        for slot in block.iter_mut().take(8) {
            *slot = ColorRgba {
                r: 255,
                g: 255,
                b: 255,
                a: 255,
            };
        }

        let encoded = encode_block_bc1(&block);
        let c0 = u16::from_le_bytes([encoded[0], encoded[1]]);
        let c1 = u16::from_le_bytes([encoded[2], encoded[3]]);
        assert!(c0 > c1, "opaque block must store c0 > c1, got {c0:#06x} <= {c1:#06x}");
    }

    #[test]
    fn test_transparent_pixels_decode_transparent() {
        let mut block = solid(200, 200, 200, 255);
        block[7].a = 0;

        let decoded = decode_block_bc1(&encode_block_bc1(&block));
        assert_eq!(decoded[7].a, 0, "low-alpha pixel must decode to alpha 0");
        assert_eq!(decoded[0].a, 255);
    }

    #[test]
    fn test_alpha_mode_detected_from_565_ordering() {
        // Equal endpoints trip the c0 <= c1 ordering.
        let encoded = encode_block_bc1(&solid(128, 128, 128, 255));
        let c0 = u16::from_le_bytes([encoded[0], encoded[1]]);
        let c1 = u16::from_le_bytes([encoded[2], encoded[3]]);
        assert!(c0 <= c1);

        let decoded = decode_block_bc1(&encoded);
        // Index 0/1 both decode opaque; only index 3 is transparent.
        assert!(decoded.iter().all(|p| p.a == 255));
    }

    #[test]
    fn test_opaque_variant_never_stores_alpha_ordering_strictly() {
        let mut block = solid(10, 10, 10, 255);
        block[0] = ColorRgba {
            r: 250,
            g: 250,
            b: 250,
            a: 255,
        };
        let encoded = encode_block_bc1_opaque(&block);
        let c0 = u16::from_le_bytes([encoded[0], encoded[1]]);
        let c1 = u16::from_le_bytes([encoded[2], encoded[3]]);
        assert!(c0 > c1);
    }

    #[test]
    fn test_decode_reencode_is_idempotent() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        // Seeded so failures reproduce.
        let mut rng = StdRng::seed_from_u64(0x1234_5678);

        for _ in 0..200 {
            let mut block = [ColorRgba::default(); 16];
            for p in block.iter_mut() {
                *p = ColorRgba {
                    r: rng.gen(),
                    g: rng.gen(),
                    b: rng.gen(),
                    a: 255,
                };
            }

            let once = decode_block_bc1(&encode_block_bc1(&block));
            let twice = decode_block_bc1(&encode_block_bc1(&once));
            assert_eq!(once, twice, "decode(encode(x)) must be a fixed point");
        }
    }

    #[test]
    fn test_encode_bc1_output_size() {
        let rgba = vec![0u8; 16 * 16 * 4];
        assert_eq!(encode_bc1(&rgba, 16, 16).len(), 4 * 4 * 8);

        // Non-multiple-of-4 dimensions round the block count up.
        let rgba = vec![0u8; 10 * 6 * 4];
        assert_eq!(encode_bc1(&rgba, 10, 6).len(), 3 * 2 * 8);
    }

    #[test]
    fn test_decode_bc1_rejects_short_data() {
        let err = decode_bc1(&[0u8; 8], 8, 8).unwrap_err();
        match err {
            BcnError::TruncatedPayload { expected, got } => {
                assert_eq!(expected, 32);
                assert_eq!(got, 8);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_image_roundtrip_solid_color() {
        let mut rgba = vec![0u8; 8 * 8 * 4];
        for px in rgba.chunks_exact_mut(4) {
            px.copy_from_slice(&[96, 160, 224, 255]);
        }

        let decoded = decode_bc1(&encode_bc1(&rgba, 8, 8), 8, 8).unwrap();
        // Solid blocks survive up to 565 quantization.
        assert_eq!(decoded[0], 96 & 0xF8);
        assert_eq!(decoded[1], 160 & 0xFC);
        assert_eq!(decoded[2], 224 & 0xF8);
        assert_eq!(decoded[3], 255);
    }
}
