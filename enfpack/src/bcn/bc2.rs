//! BC2 (DXT2/DXT3) decoding.
//!
//! A BC2 block is 16 bytes: eight bytes of explicit 4-bit alpha (row-major,
//! low nibble first) followed by a BC1 color block. Nibbles promote to 8 bit
//! by multiplying with 17. Only decoding is supported; the writer never
//! emits BC2.

use crate::bcn::bc1::{decode_block_bc1, write_block};
use crate::bcn::BcnError;

pub(crate) const BC2_BLOCK_SIZE: usize = 16;

/// Decode BC2 data to an RGBA buffer.
pub fn decode_bc2(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, BcnError> {
    let blocks_w = width.div_ceil(4);
    let blocks_h = height.div_ceil(4);
    let expected = blocks_w * blocks_h * BC2_BLOCK_SIZE;
    if data.len() < expected {
        return Err(BcnError::TruncatedPayload {
            expected,
            got: data.len(),
        });
    }

    let mut out = vec![0u8; width * height * 4];
    for by in 0..blocks_h {
        for bx in 0..blocks_w {
            let offset = (by * blocks_w + bx) * BC2_BLOCK_SIZE;

            let mut alphas = [0u8; 16];
            for i in 0..8 {
                let byte = data[offset + i];
                alphas[i * 2] = (byte & 0x0F) * 17;
                alphas[i * 2 + 1] = (byte >> 4) * 17;
            }

            let color_raw: [u8; 8] = data[offset + 8..offset + 16].try_into().unwrap();
            let mut block = decode_block_bc1(&color_raw);
            for (p, &a) in block.iter_mut().zip(alphas.iter()) {
                p.a = a;
            }

            write_block(&mut out, &block, bx, by, width, height);
        }
    }

    Ok(out)
}
