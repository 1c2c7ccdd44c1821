//! DDS header writing.

use std::io::Write;

use crate::dds::types::{Header, HeaderDx10, MAGIC};
use crate::dds::DdsError;

fn write_u32<W: Write>(w: &mut W, v: u32) -> Result<(), DdsError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write the four-byte DDS magic.
pub fn write_magic<W: Write>(w: &mut W) -> Result<(), DdsError> {
    w.write_all(MAGIC)?;
    Ok(())
}

/// Write a 124-byte DDS header (magic not included).
pub fn write_header<W: Write>(w: &mut W, h: &Header) -> Result<(), DdsError> {
    write_u32(w, h.size)?;
    write_u32(w, h.flags)?;
    write_u32(w, h.height)?;
    write_u32(w, h.width)?;
    write_u32(w, h.pitch_or_linear_size)?;
    write_u32(w, h.depth)?;
    write_u32(w, h.mip_map_count)?;

    for &v in &h.reserved1 {
        write_u32(w, v)?;
    }

    write_u32(w, h.pixel_format.size)?;
    write_u32(w, h.pixel_format.flags)?;
    write_u32(w, h.pixel_format.four_cc)?;
    write_u32(w, h.pixel_format.rgb_bit_count)?;
    write_u32(w, h.pixel_format.r_bit_mask)?;
    write_u32(w, h.pixel_format.g_bit_mask)?;
    write_u32(w, h.pixel_format.b_bit_mask)?;
    write_u32(w, h.pixel_format.a_bit_mask)?;

    write_u32(w, h.caps)?;
    write_u32(w, h.caps2)?;
    write_u32(w, h.caps3)?;
    write_u32(w, h.caps4)?;
    write_u32(w, h.reserved2)?;

    Ok(())
}

/// Write a 20-byte DX10 extension header.
pub fn write_header_dx10<W: Write>(w: &mut W, dx10: &HeaderDx10) -> Result<(), DdsError> {
    write_u32(w, dx10.dxgi_format)?;
    write_u32(w, dx10.resource_dimension)?;
    write_u32(w, dx10.misc_flag)?;
    write_u32(w, dx10.array_size)?;
    write_u32(w, dx10.misc_flags2)?;
    Ok(())
}
