//! Block Compression (BCn/DXT) codecs.
//!
//! Implements the BC1/BC2/BC3/BC4 block schemes used by DDS and EDDS
//! payloads, plus format detection from DDS headers.
//!
//! # Encoding
//!
//! The encoders quantize each 4×4 block against its luminance extrema:
//! fast, deterministic, and bit-exact under decode/re-encode. BC1 carries
//! 1-bit alpha through its palette ordering; BC3 composes a BC4 alpha block
//! with an opaque BC1 color block.
//!
//! # Decoding
//!
//! [`convert_to_rgba`] lifts BC1/BC2/BC3 and the two straight 32-bit
//! layouts back to RGBA. BC6 and BC7 are detected but not decodable.

mod bc1;
mod bc2;
mod bc3;
mod bc4;
mod color;
mod format;

use thiserror::Error;

pub use bc1::{decode_bc1, encode_bc1};
pub use bc2::decode_bc2;
pub use bc3::{decode_bc3, encode_bc3};
pub use color::{fetch_block, from_565, min_max_luminance, ColorRgba};
pub use format::{convert_to_rgba, detect_format, expected_data_length, Format};

/// Errors surfaced by the BCn codecs.
#[derive(Debug, Error)]
pub enum BcnError {
    /// Payload shorter than the format requires at these dimensions.
    #[error("payload too short: expected {expected} bytes, got {got}")]
    TruncatedPayload { expected: usize, got: usize },

    /// No decoder exists for this format.
    #[error("no RGBA conversion for format {0}")]
    UnsupportedFormat(Format),
}
