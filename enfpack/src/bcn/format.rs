//! Pixel-format detection and conversion.
//!
//! Maps a DDS header (optionally with DX10 extension) to a [`Format`] tag,
//! computes expected payload sizes, and lifts compressed payloads back to
//! straight RGBA buffers.

use std::fmt;

use crate::bcn::bc1::decode_bc1;
use crate::bcn::bc2::decode_bc2;
use crate::bcn::bc3::decode_bc3;
use crate::bcn::BcnError;
use crate::dds::{Header, HeaderDx10, PF_ALPHA_PIXELS, PF_FOURCC, PF_RGB};

/// Pixel format of a DDS/EDDS payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    BC1,
    BC2,
    BC3,
    BC4,
    BC5,
    BC6,
    BC7,
    /// 32-bit straight pixels, R in the low byte.
    Rgba8,
    /// 32-bit straight pixels, B in the low byte.
    Bgra8,
    Unknown,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::BC1 => "BC1",
            Format::BC2 => "BC2",
            Format::BC3 => "BC3",
            Format::BC4 => "BC4",
            Format::BC5 => "BC5",
            Format::BC6 => "BC6",
            Format::BC7 => "BC7",
            Format::Rgba8 => "RGBA8",
            Format::Bgra8 => "BGRA8",
            Format::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Detect the payload format from a DDS header and optional DX10 extension.
pub fn detect_format(header: &Header, dx10: Option<&HeaderDx10>) -> Format {
    if let Some(dx10) = dx10 {
        return map_dxgi_format(dx10.dxgi_format);
    }

    let pf = &header.pixel_format;
    if pf.flags & PF_FOURCC != 0 {
        return match &four_cc_bytes(pf.four_cc) {
            b"DXT1" => Format::BC1,
            b"DXT2" | b"DXT3" => Format::BC2,
            b"DXT4" | b"DXT5" => Format::BC3,
            b"ATI1" | b"BC4U" | b"BC4S" => Format::BC4,
            b"ATI2" | b"BC5U" | b"BC5S" => Format::BC5,
            _ => Format::Unknown,
        };
    }

    if pf.flags & PF_RGB != 0 && pf.flags & PF_ALPHA_PIXELS != 0 && pf.rgb_bit_count == 32 {
        if pf.r_bit_mask == 0x0000_00ff
            && pf.g_bit_mask == 0x0000_ff00
            && pf.b_bit_mask == 0x00ff_0000
            && pf.a_bit_mask == 0xff00_0000
        {
            return Format::Rgba8;
        }
        if pf.r_bit_mask == 0x00ff_0000
            && pf.g_bit_mask == 0x0000_ff00
            && pf.b_bit_mask == 0x0000_00ff
            && pf.a_bit_mask == 0xff00_0000
        {
            return Format::Bgra8;
        }
    }

    Format::Unknown
}

fn map_dxgi_format(dxgi_format: u32) -> Format {
    match dxgi_format {
        71 => Format::BC1,   // DXGI_FORMAT_BC1_UNORM
        74 => Format::BC2,   // DXGI_FORMAT_BC2_UNORM
        77 => Format::BC3,   // DXGI_FORMAT_BC3_UNORM
        80 => Format::BC4,   // DXGI_FORMAT_BC4_UNORM
        83 => Format::BC5,   // DXGI_FORMAT_BC5_UNORM
        95 => Format::BC6,   // DXGI_FORMAT_BC6H_UF16
        98 => Format::BC7,   // DXGI_FORMAT_BC7_UNORM
        87 => Format::Bgra8, // DXGI_FORMAT_B8G8R8A8_UNORM
        28 => Format::Rgba8, // DXGI_FORMAT_R8G8B8A8_UNORM
        _ => Format::Unknown,
    }
}

fn four_cc_bytes(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

/// Expected payload size for a format at the given dimensions.
///
/// Only the block count rounds up for non-multiple-of-4 dimensions. Returns
/// `None` for [`Format::Unknown`]; callers treat that as a hard error.
pub fn expected_data_length(format: Format, width: usize, height: usize) -> Option<usize> {
    let blocks_w = width.div_ceil(4);
    let blocks_h = height.div_ceil(4);

    match format {
        Format::BC1 | Format::BC4 => Some(blocks_w * blocks_h * 8),
        Format::BC2 | Format::BC3 | Format::BC5 | Format::BC6 | Format::BC7 => {
            Some(blocks_w * blocks_h * 16)
        }
        Format::Rgba8 | Format::Bgra8 => Some(width * height * 4),
        Format::Unknown => None,
    }
}

/// Convert a payload in the given format to a straight RGBA buffer.
pub fn convert_to_rgba(
    data: &[u8],
    format: Format,
    width: usize,
    height: usize,
) -> Result<Vec<u8>, BcnError> {
    match format {
        Format::BC1 => decode_bc1(data, width, height),
        Format::BC2 => decode_bc2(data, width, height),
        Format::BC3 => decode_bc3(data, width, height),
        Format::Rgba8 => Ok(data.to_vec()),
        Format::Bgra8 => {
            let mut out = data.to_vec();
            for px in out.chunks_exact_mut(4) {
                px.swap(0, 2);
            }
            Ok(out)
        }
        // BC6/BC7 decoders are deliberately unimplemented; BC4/BC5 payloads
        // have no standalone RGBA lift either.
        other => Err(BcnError::UnsupportedFormat(other)),
    }
}
