//! Plain (non-EDDS) DDS file reading and writing.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use image::RgbaImage;

use crate::bcn::{
    convert_to_rgba, detect_format, encode_bc1, encode_bc3, expected_data_length, BcnError, Format,
};
use crate::dds::{read_header, read_header_dx10, write_header, write_magic, Header};
use crate::imageio::ImageIoError;

fn open(path: &Path) -> Result<BufReader<File>, ImageIoError> {
    let file = File::open(path).map_err(|e| ImageIoError::File {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(BufReader::new(file))
}

/// Read a DDS file into its base-level RGBA image.
pub(crate) fn read_dds(path: &Path) -> Result<RgbaImage, ImageIoError> {
    let mut r = open(path)?;

    let header = read_header(&mut r)?;
    let dx10 = read_header_dx10(&mut r, &header)?;
    let format = detect_format(&header, dx10.as_ref());

    let mut data = Vec::new();
    r.read_to_end(&mut data)?;

    let width = header.width as usize;
    let height = header.height as usize;
    let expected = expected_data_length(format, width, height)
        .ok_or(ImageIoError::UnsupportedFormat(format))?;
    if data.len() < expected {
        return Err(BcnError::TruncatedPayload {
            expected,
            got: data.len(),
        }
        .into());
    }

    let rgba = convert_to_rgba(&data[..expected], format, width, height)?;

    RgbaImage::from_raw(header.width, header.height, rgba).ok_or_else(|| {
        ImageIoError::Bcn(BcnError::TruncatedPayload {
            expected,
            got: 0,
        })
    })
}

/// Read only the dimensions of a DDS file.
pub(crate) fn read_dds_size(path: &Path) -> Result<(u32, u32), ImageIoError> {
    let mut r = open(path)?;
    let header = read_header(&mut r)?;
    Ok((header.width, header.height))
}

/// Write a single-level DDS file in the given payload format.
pub(crate) fn write_dds(path: &Path, img: &RgbaImage, format: Format) -> Result<(), ImageIoError> {
    let width = img.width();
    let height = img.height();

    let (header, payload) = match format {
        Format::Bgra8 => {
            let mut payload = img.as_raw().clone();
            for px in payload.chunks_exact_mut(4) {
                px.swap(0, 2);
            }
            (Header::rgba8(width, height, 1), payload)
        }
        Format::BC1 => (
            Header::dxt(width, height, 1, *b"DXT1"),
            encode_bc1(img.as_raw(), width as usize, height as usize),
        ),
        Format::BC3 => (
            Header::dxt(width, height, 1, *b"DXT5"),
            encode_bc3(img.as_raw(), width as usize, height as usize),
        ),
        other => return Err(ImageIoError::UnsupportedFormat(other)),
    };

    let file = File::create(path).map_err(|e| ImageIoError::File {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut w = BufWriter::new(file);

    write_magic(&mut w)?;
    write_header(&mut w, &header)?;
    w.write_all(&payload)?;
    w.flush()?;

    Ok(())
}
