//! Texture atlas packing.
//!
//! A MaxRects bin with five selectable placement heuristics, a power-of-two
//! size search, and a driver that sorts inputs, probes candidate sizes and
//! blits every image into the final atlas.
//!
//! Packing one atlas is a single-threaded, deterministic computation:
//! stable sort, pure scoring, deterministic tie-breaks.

mod maxrects;
mod pack;
mod size;
mod sort;
mod types;

use thiserror::Error;

pub use pack::pack;
pub use types::{Config, ImageInfo, PackResult, Placement, Rule};

/// Errors surfaced by the packer.
#[derive(Debug, Error)]
pub enum PackError {
    /// Size ordering or gap constraints violated.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// No candidate size up to `max_size` can hold the inputs.
    #[error("required texture size ({width}x{height}) exceeds MaxSize={max_size}")]
    Infeasible {
        width: i32,
        height: i32,
        max_size: i32,
    },

    /// The final placement pass could not place an input.
    #[error("failed to place {name:?} into {width}x{height}")]
    PlacementFailed {
        name: String,
        width: i32,
        height: i32,
    },
}
