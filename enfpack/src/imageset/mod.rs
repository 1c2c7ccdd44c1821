//! Imageset text descriptor codec.
//!
//! The imageset file names every sub-image of an atlas and records its
//! position, size and tiling flags. The format is a tab-indented,
//! UTF-8 class document rooted at `ImageSetClass { ... }`.

mod names;
mod read;
mod types;
mod write;

use std::io;

use thiserror::Error;

pub use names::normalize_name;
pub use read::{parse, parse_flags, read_file};
pub use types::{ImageDef, ImageGroup, ImageSet, TextureRef, IS_HORIZONTAL_TILE, IS_VERTICAL_TILE};
pub use write::write;

/// Errors surfaced by the imageset codec.
#[derive(Debug, Error)]
pub enum ImageSetError {
    /// Structurally invalid line.
    #[error("line {line}: {msg}")]
    Parse { line: usize, msg: String },

    /// A `Flags` token that is neither a known name nor a number.
    #[error("invalid Flags value {0:?}")]
    InvalidFlagsToken(String),

    /// File-level I/O failure with the offending path.
    #[error("{path}: {source}")]
    File {
        path: String,
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}
