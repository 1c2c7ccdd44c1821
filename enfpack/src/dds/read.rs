//! DDS header reading and validation.

use std::io::Read;

use crate::dds::types::{
    Header, HeaderDx10, PixelFormat, HEADER_FLAGS_TEXTURE, HEADER_SIZE, MAGIC, PIXEL_FORMAT_SIZE,
};
use crate::dds::DdsError;

pub(crate) fn read_u32<R: Read>(r: &mut R) -> Result<u32, DdsError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read and validate a DDS header (including the magic).
///
/// Rejects files with a wrong magic, wrong structure sizes, a nonzero
/// `reserved2`, or missing texture flags.
pub fn read_header<R: Read>(r: &mut R) -> Result<Header, DdsError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(DdsError::MalformedHeader(format!(
            "invalid magic: expected {MAGIC:?}, got {magic:?}"
        )));
    }

    let size = read_u32(r)?;
    if size != HEADER_SIZE {
        return Err(DdsError::MalformedHeader(format!(
            "invalid header size: expected {HEADER_SIZE}, got {size}"
        )));
    }

    let flags = read_u32(r)?;
    let height = read_u32(r)?;
    let width = read_u32(r)?;
    let pitch_or_linear_size = read_u32(r)?;
    let depth = read_u32(r)?;
    let mip_map_count = read_u32(r)?;

    let mut reserved1 = [0u32; 11];
    for slot in reserved1.iter_mut() {
        *slot = read_u32(r)?;
    }

    let pf_size = read_u32(r)?;
    if pf_size != PIXEL_FORMAT_SIZE {
        return Err(DdsError::MalformedHeader(format!(
            "invalid pixel format size: expected {PIXEL_FORMAT_SIZE}, got {pf_size}"
        )));
    }

    let pixel_format = PixelFormat {
        size: pf_size,
        flags: read_u32(r)?,
        four_cc: read_u32(r)?,
        rgb_bit_count: read_u32(r)?,
        r_bit_mask: read_u32(r)?,
        g_bit_mask: read_u32(r)?,
        b_bit_mask: read_u32(r)?,
        a_bit_mask: read_u32(r)?,
    };

    let caps = read_u32(r)?;
    let caps2 = read_u32(r)?;
    let caps3 = read_u32(r)?;
    let caps4 = read_u32(r)?;
    let reserved2 = read_u32(r)?;

    if reserved2 != 0 {
        return Err(DdsError::MalformedHeader(
            "reserved2 is not zero".to_string(),
        ));
    }
    if flags & HEADER_FLAGS_TEXTURE != HEADER_FLAGS_TEXTURE {
        return Err(DdsError::MalformedHeader(format!(
            "required texture flags not set (flags: {flags:#x})"
        )));
    }

    Ok(Header {
        size,
        flags,
        height,
        width,
        pitch_or_linear_size,
        depth,
        mip_map_count,
        reserved1,
        pixel_format,
        caps,
        caps2,
        caps3,
        caps4,
        reserved2,
    })
}

/// Read the DX10 extension when the header announces one.
pub fn read_header_dx10<R: Read>(
    r: &mut R,
    header: &Header,
) -> Result<Option<HeaderDx10>, DdsError> {
    if !header.has_dx10_header() {
        return Ok(None);
    }

    Ok(Some(HeaderDx10 {
        dxgi_format: read_u32(r)?,
        resource_dimension: read_u32(r)?,
        misc_flag: read_u32(r)?,
        array_size: read_u32(r)?,
        misc_flags2: read_u32(r)?,
    }))
}
