//! EDDS container codec.
//!
//! EDDS is a DDS-shaped container: the usual magic + 124-byte header
//! (+ optional DX10 extension), then a per-mip block table of
//! `{magic[4], size[i32]}` entries and the block bodies, both ordered from
//! the smallest mip to the largest. Bodies are raw ("COPY") or LZ4
//! chunk-streams ("LZ4 "); see [`block`] for the wire format.

mod block;
mod convert;
mod read;
mod write;

use std::io;
use std::path::Path;

use thiserror::Error;

pub use block::{compress_block, decompress_block, CHUNK_SIZE};
pub use convert::to_dds;
pub use read::{read, read_config};
pub use write::{write, write_with_options, WriteOptions};

use crate::bcn::{BcnError, Format};
use crate::dds::DdsError;

/// Magic of a single mipmap block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockMagic {
    /// Raw uncompressed body.
    Copy,
    /// LZ4 chunk-stream body.
    Lz4,
}

impl BlockMagic {
    pub fn as_bytes(self) -> &'static [u8; 4] {
        match self {
            BlockMagic::Copy => b"COPY",
            BlockMagic::Lz4 => b"LZ4 ",
        }
    }

    pub fn from_bytes(bytes: &[u8; 4]) -> Option<BlockMagic> {
        match bytes {
            b"COPY" => Some(BlockMagic::Copy),
            b"LZ4 " => Some(BlockMagic::Lz4),
            _ => None,
        }
    }
}

/// One mipmap body together with its table entry data.
#[derive(Debug, Clone)]
pub struct Block {
    pub magic: BlockMagic,
    /// Total body size as recorded in the block table.
    pub size: i32,
    /// Uncompressed payload size; zero on blocks read back from disk until
    /// the decoder recovers it.
    pub uncompressed_size: i32,
    /// Body bytes. For LZ4 this is the chunk stream without the leading
    /// uncompressed-size word.
    pub data: Vec<u8>,
}

/// Errors surfaced by the EDDS codec.
#[derive(Debug, Error)]
pub enum EddsError {
    #[error(transparent)]
    Dds(#[from] DdsError),

    #[error(transparent)]
    Bcn(#[from] BcnError),

    /// The header maps to a format this codec cannot carry or decode.
    #[error("unsupported format {0}")]
    UnsupportedFormat(Format),

    /// Block table or body shorter than required, or size mismatch after
    /// decompression.
    #[error("truncated payload: {0}")]
    TruncatedPayload(String),

    /// Malformed LZ4 chunk stream.
    #[error("LZ4 chunk error: {0}")]
    Lz4Chunk(String),

    /// File-level I/O failure with the offending path.
    #[error("{path}: {source}")]
    File {
        path: String,
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl EddsError {
    pub(crate) fn file(path: &Path, source: io::Error) -> EddsError {
        EddsError::File {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Dimension of a mip level: each axis halves per level, never below 1.
pub(crate) fn mip_dimension(base: usize, level: u32) -> usize {
    (base >> level).max(1)
}
