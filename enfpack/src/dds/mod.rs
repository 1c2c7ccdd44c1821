//! DDS (DirectDraw Surface) container handling.
//!
//! Reads and writes the 128-byte DDS header (magic + 124-byte structure)
//! and the optional DX10 extension. Payload interpretation lives in
//! [`crate::bcn`]; the EDDS block wrapping lives in [`crate::edds`].

mod read;
mod types;
mod write;

use std::io;

use thiserror::Error;

pub use read::{read_header, read_header_dx10};
pub use types::{
    Header, HeaderDx10, PixelFormat, CAPS_COMPLEX, CAPS_MIPMAP, CAPS_TEXTURE, DDSD_LINEARSIZE,
    DDSD_MIPMAPCOUNT, DDSD_PITCH, ENF1_MARKER, FOUR_CC_DX10, HEADER_FLAGS_TEXTURE, HEADER_SIZE,
    MAGIC, PF_ALPHA_PIXELS, PF_FOURCC, PF_RGB, PIXEL_FORMAT_SIZE,
};
pub use write::{write_header, write_header_dx10, write_magic};

/// Errors surfaced by the DDS header codec.
#[derive(Debug, Error)]
pub enum DdsError {
    /// Magic, structure sizes, flags or reserved fields are invalid.
    #[error("malformed DDS header: {0}")]
    MalformedHeader(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}
