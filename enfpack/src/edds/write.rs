//! EDDS writing.
//!
//! The writer generates the mip chain by repeated 2×2 box-average
//! downscale, converts each level into the target payload format, wraps
//! every level through the block codec and emits the table + bodies from
//! the smallest mip to the largest.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::RgbaImage;
use tracing::debug;

use crate::bcn::{encode_bc1, encode_bc3, Format};
use crate::dds::{write_header, write_magic, Header};
use crate::edds::block::{compress_block, write_block_data};
use crate::edds::EddsError;

/// Mip chains never exceed this many levels.
const MAX_MIP_LEVELS: u32 = 11;

/// Options for [`write_with_options`].
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// Payload format of every mip level.
    pub format: Format,
    /// Upper bound on written mip levels; 0 means the full chain.
    pub max_mip_maps: u32,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            format: Format::Bgra8,
            max_mip_maps: 0,
        }
    }
}

/// Write an image as EDDS with the default BGRA8 payload and full mip chain.
pub fn write(img: &RgbaImage, path: &Path) -> Result<(), EddsError> {
    write_with_options(img, path, WriteOptions::default())
}

/// Write an image as EDDS.
pub fn write_with_options(
    img: &RgbaImage,
    path: &Path,
    opts: WriteOptions,
) -> Result<(), EddsError> {
    let width = img.width();
    let height = img.height();

    let mut mip_count = calculate_mip_map_count(width, height);
    if opts.max_mip_maps > 0 && opts.max_mip_maps < mip_count {
        mip_count = opts.max_mip_maps;
    }

    let header = match opts.format {
        Format::Bgra8 => Header::rgba8(width, height, mip_count),
        Format::BC1 => Header::dxt(width, height, mip_count, *b"DXT1"),
        Format::BC3 => Header::dxt(width, height, mip_count, *b"DXT5"),
        other => return Err(EddsError::UnsupportedFormat(other)),
    };

    let mipmaps = generate_mipmaps(img, mip_count);

    let mut blocks = Vec::with_capacity(mipmaps.len());
    for (level, mip) in mipmaps.iter().enumerate() {
        let payload = match opts.format {
            Format::Bgra8 => {
                // Swap to BGRA byte order to match the canonical masks.
                let mut data = mip.data.clone();
                for px in data.chunks_exact_mut(4) {
                    px.swap(0, 2);
                }
                data
            }
            Format::BC1 => encode_bc1(&mip.data, mip.width, mip.height),
            Format::BC3 => encode_bc3(&mip.data, mip.width, mip.height),
            _ => unreachable!("format checked above"),
        };

        let block = compress_block(&payload)?;
        debug!(
            level,
            width = mip.width,
            height = mip.height,
            magic = ?block.magic,
            "compressed mip level"
        );
        blocks.push(block);
    }

    let file = File::create(path).map_err(|e| EddsError::file(path, e))?;
    let mut w = BufWriter::new(file);

    write_magic(&mut w)?;
    write_header(&mut w, &header)?;

    // Table and bodies run from the smallest mip to the largest.
    for block in blocks.iter().rev() {
        w.write_all(block.magic.as_bytes())?;
        w.write_all(&block.size.to_le_bytes())?;
    }
    for block in blocks.iter().rev() {
        write_block_data(&mut w, block)?;
    }

    w.flush()?;
    Ok(())
}

/// Number of mip levels for a full chain, capped at 11.
fn calculate_mip_map_count(width: u32, height: u32) -> u32 {
    let mut count = 1u32;
    let mut w = width;
    let mut h = height;
    while w > 1 || h > 1 {
        count += 1;
        if w > 1 {
            w /= 2;
        }
        if h > 1 {
            h /= 2;
        }
    }
    count.min(MAX_MIP_LEVELS)
}

struct MipLevel {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

/// Generate the mip chain, largest level first.
fn generate_mipmaps(img: &RgbaImage, max_levels: u32) -> Vec<MipLevel> {
    let width = img.width() as usize;
    let height = img.height() as usize;

    let mut result = vec![MipLevel {
        data: img.as_raw().clone(),
        width,
        height,
    }];

    let mut cur_w = width;
    let mut cur_h = height;
    while (result.len() as u32) < max_levels && (cur_w > 1 || cur_h > 1) {
        let new_w = (cur_w >> 1).max(1);
        let new_h = (cur_h >> 1).max(1);
        let prev = &result[result.len() - 1];
        let data = resize_to_half(&prev.data, cur_w, cur_h, new_w, new_h);
        result.push(MipLevel {
            data,
            width: new_w,
            height: new_h,
        });
        cur_w = new_w;
        cur_h = new_h;
    }

    result
}

/// 2×2 box-average downscale with edge clamping for odd dimensions.
fn resize_to_half(
    src: &[u8],
    src_w: usize,
    src_h: usize,
    dst_w: usize,
    dst_h: usize,
) -> Vec<u8> {
    let mut dst = vec![0u8; dst_w * dst_h * 4];

    let idx = |x: usize, y: usize| -> usize {
        let x = x.min(src_w - 1);
        let y = y.min(src_h - 1);
        (y * src_w + x) * 4
    };

    for y in 0..dst_h {
        for x in 0..dst_w {
            let sx = x * 2;
            let sy = y * 2;
            let i0 = idx(sx, sy);
            let i1 = idx(sx + 1, sy);
            let i2 = idx(sx, sy + 1);
            let i3 = idx(sx + 1, sy + 1);

            let di = (y * dst_w + x) * 4;
            for c in 0..4 {
                let sum = u32::from(src[i0 + c])
                    + u32::from(src[i1 + c])
                    + u32::from(src[i2 + c])
                    + u32::from(src[i3 + c]);
                dst[di + c] = (sum / 4) as u8;
            }
        }
    }

    dst
}
