//! EDDS mipmap block packing.
//!
//! Each mipmap body is stored either raw ("COPY") or as an LZ4 chunk
//! stream ("LZ4 "): a `u32` uncompressed size followed by chunks of
//! `{u24 cSize, u8 flags, cSize bytes}`. Chunks decompress to 64 KiB each
//! (the final chunk to the remainder) against a rolling 64 KiB dictionary
//! seeded from previously decoded output. The terminal chunk carries flag
//! `0x80`; no other flag bits exist.

use std::io::{Read, Write};

use lz4_flex::block::{compress_into, decompress_into_with_dict, get_maximum_output_size};
use tracing::debug;

use crate::edds::{Block, BlockMagic, EddsError};

/// Uncompressed bytes per LZ4 chunk.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Bodies below this size are always stored as COPY.
const COPY_THRESHOLD: usize = 1024;

/// A chunk compressing to more than this fraction of its source aborts the
/// whole mip into COPY. Poorly compressed chunks are the main cause of
/// parser desync in third-party readers.
const MAX_CHUNK_RATIO: f64 = 0.85;

const LAST_CHUNK_FLAG: u8 = 0x80;

/// Compress one mipmap body into a [`Block`].
///
/// Small or poorly compressing bodies fall back to COPY for the whole mip.
pub fn compress_block(data: &[u8]) -> Result<Block, EddsError> {
    if data.len() > i32::MAX as usize {
        return Err(EddsError::Lz4Chunk(format!(
            "input data too large: {} bytes",
            data.len()
        )));
    }
    let uncompressed_size = data.len() as i32;

    let copy_block = || Block {
        magic: BlockMagic::Copy,
        size: uncompressed_size,
        uncompressed_size: 0,
        data: data.to_vec(),
    };

    if data.len() < COPY_THRESHOLD {
        return Ok(copy_block());
    }

    let mut chunk_stream: Vec<u8> = Vec::new();
    let mut compress_buf = vec![0u8; get_maximum_output_size(CHUNK_SIZE)];

    for (i, src_chunk) in data.chunks(CHUNK_SIZE).enumerate() {
        let is_last = (i + 1) * CHUNK_SIZE >= data.len();

        let cn = compress_into(src_chunk, &mut compress_buf)
            .map_err(|e| EddsError::Lz4Chunk(format!("LZ4 compression failed: {e}")))?;

        if cn == 0 || cn as f64 > src_chunk.len() as f64 * MAX_CHUNK_RATIO {
            debug!(chunk = i, "chunk compressed poorly, storing mip as COPY");
            return Ok(copy_block());
        }
        if cn > 0x7F_FFFF {
            return Err(EddsError::Lz4Chunk(format!(
                "compressed chunk too large: {cn}"
            )));
        }

        chunk_stream.push(cn as u8);
        chunk_stream.push((cn >> 8) as u8);
        chunk_stream.push((cn >> 16) as u8);
        chunk_stream.push(if is_last { LAST_CHUNK_FLAG } else { 0x00 });
        chunk_stream.extend_from_slice(&compress_buf[..cn]);
    }

    // The 4-byte uncompressed-size prefix counts toward the body size.
    let total = 4 + chunk_stream.len();
    if total as f64 > data.len() as f64 * MAX_CHUNK_RATIO {
        debug!("chunk stream saved less than 15%, storing mip as COPY");
        return Ok(copy_block());
    }

    Ok(Block {
        magic: BlockMagic::Lz4,
        size: total as i32,
        uncompressed_size,
        data: chunk_stream,
    })
}

/// Decompress a [`Block`] into its mipmap payload.
///
/// `expected` is the payload length the format dispatch predicts for this
/// mip level; COPY bodies must match it exactly and LZ4 streams must decode
/// to it with nothing left over.
pub fn decompress_block(block: &Block, expected: usize) -> Result<Vec<u8>, EddsError> {
    match block.magic {
        BlockMagic::Copy => {
            if block.data.len() != expected {
                return Err(EddsError::TruncatedPayload(format!(
                    "COPY block size mismatch: expected {expected}, got {}",
                    block.data.len()
                )));
            }
            Ok(block.data.clone())
        }
        BlockMagic::Lz4 => decompress_lz4_stream(block, expected),
    }
}

fn decompress_lz4_stream(block: &Block, expected: usize) -> Result<Vec<u8>, EddsError> {
    let mut target_size = if block.uncompressed_size > 0 {
        block.uncompressed_size as usize
    } else {
        expected
    };
    if target_size == 0 {
        return Err(EddsError::TruncatedPayload(
            "invalid target size: 0".to_string(),
        ));
    }

    let mut data: &[u8] = &block.data;

    // Some writers embed the target size ahead of the chunk stream. Strip it
    // when the leading u32 matches the expected payload length and the next
    // three bytes parse as a plausible chunk size.
    if data.len() >= 8 {
        let peek = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
        let c0 =
            usize::from(data[4]) | (usize::from(data[5]) << 8) | (usize::from(data[6]) << 16);
        if (peek == expected || peek == target_size) && c0 > 0 && c0 < (1 << 20) {
            target_size = peek;
            data = &data[4..];
        }
    }

    let mut dict = [0u8; CHUNK_SIZE];
    let mut dict_size = 0usize;

    let mut target = vec![0u8; target_size];
    let mut out_idx = 0usize;
    let mut pos = 0usize;

    loop {
        if data.len() - pos < 4 {
            return Err(EddsError::Lz4Chunk(format!(
                "chunk stream truncated (need 4 header bytes, have {})",
                data.len() - pos
            )));
        }

        let c_size = usize::from(data[pos])
            | (usize::from(data[pos + 1]) << 8)
            | (usize::from(data[pos + 2]) << 16);
        let flags = data[pos + 3];
        pos += 4;

        if flags & !LAST_CHUNK_FLAG != 0 {
            return Err(EddsError::Lz4Chunk(format!("unknown flags: {flags:#04x}")));
        }
        if c_size == 0 || c_size > data.len() - pos {
            return Err(EddsError::Lz4Chunk(format!(
                "invalid compressed chunk size: {c_size} (remaining {})",
                data.len() - pos
            )));
        }

        let compressed = &data[pos..pos + c_size];
        pos += c_size;

        let remaining = target_size - out_idx;
        if remaining == 0 {
            return Err(EddsError::Lz4Chunk(
                "decoded data overruns target buffer".to_string(),
            ));
        }
        let want = CHUNK_SIZE.min(remaining);

        let n = decompress_into_with_dict(
            compressed,
            &mut target[out_idx..out_idx + want],
            &dict[..dict_size],
        )
        .map_err(|e| EddsError::Lz4Chunk(format!("chunk decode failed: {e}")))?;
        out_idx += n;

        // The dictionary always holds the most recently decoded bytes.
        let decoded = &target[out_idx - n..out_idx];
        if decoded.len() >= CHUNK_SIZE {
            dict.copy_from_slice(&decoded[decoded.len() - CHUNK_SIZE..]);
            dict_size = CHUNK_SIZE;
        } else {
            let avail = CHUNK_SIZE - dict_size;
            if decoded.len() <= avail {
                dict[dict_size..dict_size + decoded.len()].copy_from_slice(decoded);
                dict_size += decoded.len();
            } else {
                let shift = decoded.len() - avail;
                dict.copy_within(shift..dict_size, 0);
                dict[CHUNK_SIZE - decoded.len()..].copy_from_slice(decoded);
                dict_size = CHUNK_SIZE;
            }
        }

        if flags & LAST_CHUNK_FLAG != 0 {
            break;
        }
    }

    if out_idx != target_size {
        return Err(EddsError::TruncatedPayload(format!(
            "decoded size mismatch: expected {target_size}, got {out_idx}"
        )));
    }
    if pos != data.len() {
        return Err(EddsError::Lz4Chunk(format!(
            "{} bytes left after terminal chunk",
            data.len() - pos
        )));
    }

    Ok(target)
}

/// Write a block body (not its table entry).
pub(crate) fn write_block_data<W: Write>(w: &mut W, block: &Block) -> Result<(), EddsError> {
    if block.magic == BlockMagic::Lz4 {
        w.write_all(&block.uncompressed_size.to_le_bytes())?;
    }
    w.write_all(&block.data)?;
    Ok(())
}

/// One entry of the per-mip block table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockHeader {
    pub magic: BlockMagic,
    pub size: i32,
}

/// Read `mip_count` table entries of `{magic[4], size[i32]}`.
pub(crate) fn read_block_table<R: Read>(
    r: &mut R,
    mip_count: u32,
) -> Result<Vec<BlockHeader>, EddsError> {
    let mut headers = Vec::with_capacity(mip_count as usize);

    for i in 0..mip_count {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        let magic = BlockMagic::from_bytes(&magic).ok_or_else(|| {
            EddsError::TruncatedPayload(format!("unknown block magic in table entry {i}: {magic:?}"))
        })?;

        let mut size = [0u8; 4];
        r.read_exact(&mut size)?;
        let size = i32::from_le_bytes(size);
        if size < 0 {
            return Err(EddsError::TruncatedPayload(format!(
                "invalid block size in table entry {i}: {size}"
            )));
        }

        headers.push(BlockHeader { magic, size });
    }

    Ok(headers)
}

/// Read one block body described by a table entry.
pub(crate) fn read_block_body<R: Read>(r: &mut R, h: BlockHeader) -> Result<Block, EddsError> {
    let mut data = vec![0u8; h.size as usize];
    r.read_exact(&mut data)?;

    Ok(Block {
        magic: h.magic,
        size: h.size,
        uncompressed_size: 0, // recovered by the decoder when embedded
        data,
    })
}
