//! EDDS to plain DDS conversion.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::bcn::{detect_format, expected_data_length};
use crate::dds::{
    read_header, read_header_dx10, write_header, write_header_dx10, write_magic, CAPS_MIPMAP,
};
use crate::edds::block::{decompress_block, read_block_body, read_block_table};
use crate::edds::{mip_dimension, EddsError};

/// Convert an EDDS file to an uncompressed DDS file.
///
/// Every mip body is decompressed and re-emitted under the unchanged
/// header, preserving the container's stored block order.
pub fn to_dds(edds_path: &Path, dds_path: &Path) -> Result<(), EddsError> {
    let file = File::open(edds_path).map_err(|e| EddsError::file(edds_path, e))?;
    let mut r = BufReader::new(file);

    let header = read_header(&mut r)?;
    let dx10 = read_header_dx10(&mut r, &header)?;

    let mip_count = if header.caps & CAPS_MIPMAP != 0 && header.mip_map_count > 0 {
        header.mip_map_count
    } else {
        1
    };

    let format = detect_format(&header, dx10.as_ref());

    let table = read_block_table(&mut r, mip_count)?;

    let mut all_data = Vec::new();
    for (i, entry) in table.iter().enumerate() {
        let block = read_block_body(&mut r, *entry)?;

        let mip_level = mip_count - i as u32 - 1;
        let mip_w = mip_dimension(header.width as usize, mip_level);
        let mip_h = mip_dimension(header.height as usize, mip_level);

        let expected = expected_data_length(format, mip_w, mip_h)
            .ok_or(EddsError::UnsupportedFormat(format))?;

        let decompressed = decompress_block(&block, expected)?;
        all_data.extend_from_slice(&decompressed);
    }

    let out = File::create(dds_path).map_err(|e| EddsError::file(dds_path, e))?;
    let mut w = BufWriter::new(out);

    write_magic(&mut w)?;
    write_header(&mut w, &header)?;
    if let Some(dx10) = &dx10 {
        write_header_dx10(&mut w, dx10)?;
    }
    w.write_all(&all_data)?;
    w.flush()?;

    Ok(())
}
