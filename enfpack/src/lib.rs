//! enfpack - Enfusion imageset/EDDS texture atlas toolkit.
//!
//! This library builds game-engine texture atlases from directories of
//! source images and reads them back:
//!
//! - [`packer`] places sized rectangles into a power-of-two atlas with the
//!   MaxRects heuristic,
//! - [`bcn`] encodes and decodes BC1/BC2/BC3/BC4 blocks,
//! - [`dds`] and [`edds`] carry the container formats (EDDS being DDS with
//!   per-mip LZ4 chunk-stream bodies),
//! - [`imageset`] reads and writes the text descriptor naming every
//!   sub-image,
//! - [`imageio`] dispatches reads and writes over all supported formats.
//!
//! # Example
//!
//! ```no_run
//! use enfpack::packer::{pack, Config, ImageInfo};
//! use image::RgbaImage;
//!
//! let images = vec![ImageInfo {
//!     name: "icon".to_string(),
//!     width: 64,
//!     height: 64,
//!     image: RgbaImage::new(64, 64),
//! }];
//!
//! let result = pack(&images, &Config::default())?;
//! enfpack::edds::write(&result.image, std::path::Path::new("atlas.edds"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bcn;
pub mod dds;
pub mod edds;
pub mod imageio;
pub mod imageset;
pub mod logging;
pub mod packer;

/// Version of the enfpack library and CLI, synchronized across the
/// workspace and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
