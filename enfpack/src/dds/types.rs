//! DDS header structures and format constants.
//!
//! Field layout follows the Microsoft DDS specification:
//! https://docs.microsoft.com/en-us/windows/win32/direct3ddds/dds-header

/// File magic, the first four bytes of every DDS/EDDS file.
pub const MAGIC: &[u8; 4] = b"DDS ";

/// Size of the DDS_HEADER structure (excluding magic).
pub const HEADER_SIZE: u32 = 124;
/// Size of the DDS_PIXELFORMAT structure.
pub const PIXEL_FORMAT_SIZE: u32 = 32;

// DDS_HEADER flags (DDSD_*)
pub const DDSD_CAPS: u32 = 0x1;
pub const DDSD_HEIGHT: u32 = 0x2;
pub const DDSD_WIDTH: u32 = 0x4;
pub const DDSD_PITCH: u32 = 0x8;
pub const DDSD_PIXELFORMAT: u32 = 0x1000;
pub const DDSD_MIPMAPCOUNT: u32 = 0x20000;
pub const DDSD_LINEARSIZE: u32 = 0x80000;

// DDS_PIXELFORMAT flags (DDPF_*)
pub const PF_ALPHA_PIXELS: u32 = 0x1;
pub const PF_FOURCC: u32 = 0x4;
pub const PF_RGB: u32 = 0x40;

// DDS_CAPS flags (DDSCAPS_*)
pub const CAPS_COMPLEX: u32 = 0x8;
pub const CAPS_TEXTURE: u32 = 0x1000;
pub const CAPS_MIPMAP: u32 = 0x400000;

/// Required flags on every texture header.
pub const HEADER_FLAGS_TEXTURE: u32 = DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT;

/// "DX10" fourCC, announcing the extended header.
pub const FOUR_CC_DX10: u32 = 0x3031_5844;

/// "ENF1" marker stored at `reserved1[1]` by the Enfusion Workbench.
pub const ENF1_MARKER: u32 = 0x3146_4E45;

/// DDS_PIXELFORMAT structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelFormat {
    pub size: u32,
    pub flags: u32,
    pub four_cc: u32,
    pub rgb_bit_count: u32,
    pub r_bit_mask: u32,
    pub g_bit_mask: u32,
    pub b_bit_mask: u32,
    pub a_bit_mask: u32,
}

/// DDS_HEADER structure (124 bytes on disk, magic excluded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub size: u32,
    pub flags: u32,
    pub height: u32,
    pub width: u32,
    pub pitch_or_linear_size: u32,
    pub depth: u32,
    pub mip_map_count: u32,
    pub reserved1: [u32; 11],
    pub pixel_format: PixelFormat,
    pub caps: u32,
    pub caps2: u32,
    pub caps3: u32,
    pub caps4: u32,
    pub reserved2: u32,
}

/// DDS_HEADER_DXT10 extension (20 bytes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderDx10 {
    pub dxgi_format: u32,
    pub resource_dimension: u32,
    pub misc_flag: u32,
    pub array_size: u32,
    pub misc_flags2: u32,
}

impl Header {
    /// Canonical 32-bit RGBA header as written by the Enfusion Workbench.
    ///
    /// Masks are R=0x00ff0000 G=0x0000ff00 B=0x000000ff A=0xff000000, so the
    /// payload byte order is BGRA. `reserved1[1]` carries the ENF1 marker.
    pub fn rgba8(width: u32, height: u32, mip_map_count: u32) -> Header {
        let mut flags = HEADER_FLAGS_TEXTURE | DDSD_PITCH;
        if mip_map_count > 0 {
            flags |= DDSD_MIPMAPCOUNT;
        }

        let mut caps = CAPS_TEXTURE;
        if mip_map_count > 0 {
            caps |= CAPS_COMPLEX | CAPS_MIPMAP;
        }

        let mut reserved1 = [0u32; 11];
        reserved1[1] = ENF1_MARKER;

        Header {
            size: HEADER_SIZE,
            flags,
            height,
            width,
            pitch_or_linear_size: width * 4,
            depth: 0,
            mip_map_count,
            reserved1,
            pixel_format: PixelFormat {
                size: PIXEL_FORMAT_SIZE,
                flags: PF_ALPHA_PIXELS | PF_RGB,
                four_cc: 0,
                rgb_bit_count: 32,
                r_bit_mask: 0x00ff_0000,
                g_bit_mask: 0x0000_ff00,
                b_bit_mask: 0x0000_00ff,
                a_bit_mask: 0xff00_0000,
            },
            caps,
            caps2: 0,
            caps3: 0,
            caps4: 0,
            reserved2: 0,
        }
    }

    /// Block-compressed header carrying a DXT fourCC.
    ///
    /// Linear size counts whole 4×4 blocks: 8 bytes each for DXT1, 16 for
    /// everything else.
    pub fn dxt(width: u32, height: u32, mip_map_count: u32, four_cc: [u8; 4]) -> Header {
        let block_size: u32 = if &four_cc == b"DXT1" { 8 } else { 16 };
        let linear_size = width.div_ceil(4) * height.div_ceil(4) * block_size;

        let mut flags = HEADER_FLAGS_TEXTURE | DDSD_LINEARSIZE;
        if mip_map_count > 0 {
            flags |= DDSD_MIPMAPCOUNT;
        }

        let mut caps = CAPS_TEXTURE;
        if mip_map_count > 0 {
            caps |= CAPS_COMPLEX | CAPS_MIPMAP;
        }

        let mut reserved1 = [0u32; 11];
        reserved1[1] = ENF1_MARKER;

        Header {
            size: HEADER_SIZE,
            flags,
            height,
            width,
            pitch_or_linear_size: linear_size,
            depth: 0,
            mip_map_count,
            reserved1,
            pixel_format: PixelFormat {
                size: PIXEL_FORMAT_SIZE,
                flags: PF_FOURCC,
                four_cc: u32::from_le_bytes(four_cc),
                rgb_bit_count: 0,
                r_bit_mask: 0,
                g_bit_mask: 0,
                b_bit_mask: 0,
                a_bit_mask: 0,
            },
            caps,
            caps2: 0,
            caps3: 0,
            caps4: 0,
            reserved2: 0,
        }
    }

    /// Whether the caps announce a DX10 extended header.
    pub fn has_dx10_header(&self) -> bool {
        self.pixel_format.flags & PF_FOURCC != 0 && self.pixel_format.four_cc == FOUR_CC_DX10
    }
}
