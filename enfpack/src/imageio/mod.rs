//! Extension-dispatched image reading and writing.
//!
//! PNG, TGA, TIFF and BMP go through the `image` crate; DDS and EDDS use
//! the codecs in this crate. Writing DDS/EDDS takes [`EncodeSettings`] for
//! the payload format, BCn quality and mip limit.

mod codec;
mod colorkey;
mod dds_file;
mod read;
mod write;

use std::io;

use thiserror::Error;

pub use codec::{parse_output_format, validate_quality_level, EncodeSettings};
pub use colorkey::{apply_color_key, parse_hex_rgb, Rgb};
pub use read::{image_size, read};
pub use write::{write, write_with_options};

use crate::bcn::{BcnError, Format};
use crate::dds::DdsError;
use crate::edds::EddsError;

/// Errors surfaced by the image I/O layer.
#[derive(Debug, Error)]
pub enum ImageIoError {
    #[error("unsupported input format {0:?}")]
    UnsupportedInput(String),

    #[error("unsupported output format {0:?}")]
    UnsupportedOutput(String),

    #[error("unknown format {0:?} (supported: bgra8, dxt1, dxt5)")]
    UnknownFormatAlias(String),

    #[error("quality must be in range 0..10, got {0}")]
    InvalidQuality(i32),

    #[error("unsupported format {0}")]
    UnsupportedFormat(Format),

    #[error("expected 6 hex chars, got {0:?}")]
    InvalidColorKey(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Dds(#[from] DdsError),

    #[error(transparent)]
    Edds(#[from] EddsError),

    #[error(transparent)]
    Bcn(#[from] BcnError),

    /// File-level I/O failure with the offending path.
    #[error("{path}: {source}")]
    File {
        path: String,
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Lowercased file extension without the dot.
pub(crate) fn extension_of(path: &std::path::Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
