//! Imageset entity structures.
//!
//! Class names mirror the engine's own (`ImageSetClass`,
//! `ImageSetDefClass`, ...) as they appear in the text format; the Rust
//! types drop the suffix.

/// `1 << 0`: the image tiles horizontally.
pub const IS_HORIZONTAL_TILE: i32 = 1;
/// `1 << 1`: the image tiles vertically.
pub const IS_VERTICAL_TILE: i32 = 2;

/// Root record of an imageset file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageSet {
    pub name: String,
    /// Reference atlas width and height.
    pub ref_size: [i32; 2],
    pub textures: Vec<TextureRef>,
    /// Root image definitions, in document order.
    pub images: Vec<ImageDef>,
    /// Groups, in document order.
    pub groups: Vec<ImageGroup>,
}

/// A texture reference (`ImageSetTextureClass`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextureRef {
    pub path: String,
    /// Pixels per meter.
    pub mpix: i32,
}

/// An image definition (`ImageSetDefClass`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageDef {
    pub name: String,
    pub pos: [i32; 2],
    pub size: [i32; 2],
    /// Bitfield of `IS_HORIZONTAL_TILE` / `IS_VERTICAL_TILE`.
    pub flags: i32,
}

/// A named group of image definitions (`ImageSetGroupClass`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageGroup {
    pub name: String,
    pub images: Vec<ImageDef>,
}
