//! EDDS reading.
//!
//! Only the base mip level is decoded: the block table runs smallest-first,
//! so the reader skips every body except the last one. A failure of the
//! per-mip parse falls back to a legacy single-block parse for
//! interoperability with historical writers.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use image::RgbaImage;
use tracing::debug;

use crate::bcn::{convert_to_rgba, detect_format, expected_data_length, Format};
use crate::dds::{read_header, read_header_dx10, Header, HeaderDx10, CAPS_MIPMAP, HEADER_SIZE};
use crate::edds::block::{decompress_block, read_block_body, read_block_table};
use crate::edds::{mip_dimension, EddsError};

/// Read EDDS dimensions without decoding image data.
pub fn read_config(path: &Path) -> Result<(u32, u32), EddsError> {
    let file = File::open(path).map_err(|e| EddsError::file(path, e))?;
    let mut r = BufReader::new(file);
    let (header, _) = read_edds_headers(&mut r)?;
    Ok((header.width, header.height))
}

/// Read and decode an EDDS file into its base-level RGBA image.
pub fn read(path: &Path) -> Result<RgbaImage, EddsError> {
    let file = File::open(path).map_err(|e| EddsError::file(path, e))?;
    let mut r = BufReader::new(file);

    let (header, dx10) = read_edds_headers(&mut r)?;
    let format = detect_format(&header, dx10.as_ref());

    let mip_count = if header.caps & CAPS_MIPMAP != 0 && header.mip_map_count > 0 {
        header.mip_map_count
    } else {
        1
    };

    let (data, width, height) =
        match read_largest_mip_from_blocks(&mut r, &header, format, mip_count) {
            Ok(result) => result,
            Err(err) => {
                debug!(%err, "per-mip parse failed, trying legacy single block");
                read_legacy_single_block(&mut r, &header, dx10.as_ref(), format)?
            }
        };

    let rgba = convert_to_rgba(&data, format, width, height)?;

    RgbaImage::from_raw(width as u32, height as u32, rgba).ok_or_else(|| {
        EddsError::TruncatedPayload(format!("decoded payload does not fill {width}x{height}"))
    })
}

fn read_edds_headers<R: Read>(r: &mut R) -> Result<(Header, Option<HeaderDx10>), EddsError> {
    let header = read_header(r)?;
    let dx10 = read_header_dx10(r, &header)?;
    Ok((header, dx10))
}

fn read_largest_mip_from_blocks<R: Read + Seek>(
    r: &mut R,
    header: &Header,
    format: Format,
    mip_count: u32,
) -> Result<(Vec<u8>, usize, usize), EddsError> {
    let mip_count = mip_count.max(1);
    let table = read_block_table(r, mip_count)?;

    for (i, entry) in table.iter().enumerate() {
        let mip_level = mip_count - i as u32 - 1;
        if mip_level != 0 {
            r.seek(SeekFrom::Current(i64::from(entry.size)))?;
            continue;
        }

        let block = read_block_body(r, *entry)?;

        let mip_w = mip_dimension(header.width as usize, mip_level);
        let mip_h = mip_dimension(header.height as usize, mip_level);

        let expected = expected_data_length(format, mip_w, mip_h)
            .ok_or(EddsError::UnsupportedFormat(format))?;

        let decompressed = decompress_block(&block, expected)?;
        if decompressed.len() != expected {
            return Err(EddsError::TruncatedPayload(format!(
                "largest mip size mismatch: expected {expected}, got {}",
                decompressed.len()
            )));
        }

        return Ok((decompressed, mip_w, mip_h));
    }

    Err(EddsError::TruncatedPayload(format!(
        "failed to pick largest mip: mipmaps={mip_count}"
    )))
}

/// Legacy parse: everything after the header is a single body, either an
/// LZ4 block of the expected size or the raw payload verbatim.
fn read_legacy_single_block<R: Read + Seek>(
    r: &mut R,
    header: &Header,
    dx10: Option<&HeaderDx10>,
    format: Format,
) -> Result<(Vec<u8>, usize, usize), EddsError> {
    let mut header_size = u64::from(4 + HEADER_SIZE);
    if dx10.is_some() {
        header_size += 20;
    }
    r.seek(SeekFrom::Start(header_size))?;

    let mut remaining = Vec::new();
    r.read_to_end(&mut remaining)?;

    let width = header.width as usize;
    let height = header.height as usize;
    let expected =
        expected_data_length(format, width, height).ok_or(EddsError::UnsupportedFormat(format))?;

    let mut decompressed = vec![0u8; expected];
    match lz4_flex::block::decompress_into(&remaining, &mut decompressed) {
        Ok(n) if n == expected => return Ok((decompressed, width, height)),
        Ok(_) | Err(_) => {}
    }

    if remaining.len() == expected {
        return Ok((remaining, width, height));
    }

    Err(EddsError::TruncatedPayload(format!(
        "failed to parse as single block: expected {expected} bytes, got {}",
        remaining.len()
    )))
}
