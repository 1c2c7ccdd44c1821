//! BC3 (DXT4/DXT5) block compression.
//!
//! A BC3 block is 16 bytes: a BC4 alpha block followed by a BC1 color
//! block. The color half always uses the opaque BC1 path; alpha is carried
//! entirely by the BC4 half and overwrites the color alpha on decode.

use crate::bcn::bc1::{decode_block_bc1, encode_block_bc1_opaque, write_block};
use crate::bcn::bc4::{decode_block_bc4, encode_block_bc4};
use crate::bcn::color::{fetch_block, ColorRgba};
use crate::bcn::BcnError;

pub(crate) const BC3_BLOCK_SIZE: usize = 16;

fn encode_block_bc3(block: &[ColorRgba; 16]) -> [u8; 16] {
    let alpha_block = encode_block_bc4(block);
    let color_block = encode_block_bc1_opaque(block);

    let mut out = [0u8; 16];
    out[0..8].copy_from_slice(&alpha_block);
    out[8..16].copy_from_slice(&color_block);
    out
}

fn decode_block_bc3(data: &[u8; 16]) -> [ColorRgba; 16] {
    let alpha_raw: [u8; 8] = data[0..8].try_into().unwrap();
    let color_raw: [u8; 8] = data[8..16].try_into().unwrap();

    let alphas = decode_block_bc4(&alpha_raw);
    let mut block = decode_block_bc1(&color_raw);
    for (p, &a) in block.iter_mut().zip(alphas.iter()) {
        p.a = a;
    }
    block
}

/// Encode an RGBA buffer to BC3.
pub fn encode_bc3(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    let blocks_w = width.div_ceil(4);
    let blocks_h = height.div_ceil(4);
    let mut out = vec![0u8; blocks_w * blocks_h * BC3_BLOCK_SIZE];

    for by in 0..blocks_h {
        for bx in 0..blocks_w {
            let block = fetch_block(rgba, bx * 4, by * 4, width, height);
            let encoded = encode_block_bc3(&block);
            let offset = (by * blocks_w + bx) * BC3_BLOCK_SIZE;
            out[offset..offset + BC3_BLOCK_SIZE].copy_from_slice(&encoded);
        }
    }

    out
}

/// Decode BC3 data to an RGBA buffer.
pub fn decode_bc3(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, BcnError> {
    let blocks_w = width.div_ceil(4);
    let blocks_h = height.div_ceil(4);
    let expected = blocks_w * blocks_h * BC3_BLOCK_SIZE;
    if data.len() < expected {
        return Err(BcnError::TruncatedPayload {
            expected,
            got: data.len(),
        });
    }

    let mut out = vec![0u8; width * height * 4];
    for by in 0..blocks_h {
        for bx in 0..blocks_w {
            let offset = (by * blocks_w + bx) * BC3_BLOCK_SIZE;
            let raw: [u8; 16] = data[offset..offset + 16].try_into().unwrap();
            let block = decode_block_bc3(&raw);
            write_block(&mut out, &block, bx, by, width, height);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_alpha_preserved() {
        // Uniform alpha at the endpoints and midpoint must survive exactly.
        for a in [0u8, 128, 255] {
            let mut rgba = vec![0u8; 4 * 4 * 4];
            for px in rgba.chunks_exact_mut(4) {
                px.copy_from_slice(&[200, 100, 50, a]);
            }

            let decoded = decode_bc3(&encode_bc3(&rgba, 4, 4), 4, 4).unwrap();
            for px in decoded.chunks_exact(4) {
                assert_eq!(px[3], a, "uniform alpha {a} was not preserved");
            }
        }
    }

    #[test]
    fn test_block_layout_alpha_then_color() {
        let mut rgba = vec![255u8; 4 * 4 * 4];
        for px in rgba.chunks_exact_mut(4) {
            px[3] = 77;
        }

        let encoded = encode_bc3(&rgba, 4, 4);
        assert_eq!(encoded.len(), 16);
        // BC4 endpoints lead the block.
        assert_eq!(encoded[0], 77);
        assert_eq!(encoded[1], 77);
    }

    #[test]
    fn test_color_half_is_opaque_mode() {
        // A flat color would trip BC1 alpha mode; the BC3 color half must not.
        let rgba = vec![128u8; 4 * 4 * 4];
        let encoded = encode_bc3(&rgba, 4, 4);
        let c0 = u16::from_le_bytes([encoded[8], encoded[9]]);
        let c1 = u16::from_le_bytes([encoded[10], encoded[11]]);
        // Equal endpoints are unavoidable for flat blocks; strict alpha
        // ordering (c0 < c1) must never appear.
        assert!(c0 >= c1);
    }

    #[test]
    fn test_decode_rejects_short_data() {
        assert!(decode_bc3(&[0u8; 15], 4, 4).is_err());
    }

    #[test]
    fn test_output_size_non_multiple_of_four() {
        let rgba = vec![0u8; 10 * 6 * 4];
        let encoded = encode_bc3(&rgba, 10, 6);
        assert_eq!(encoded.len(), 3 * 2 * 16);

        let decoded = decode_bc3(&encoded, 10, 6).unwrap();
        assert_eq!(decoded.len(), 10 * 6 * 4);
    }
}
