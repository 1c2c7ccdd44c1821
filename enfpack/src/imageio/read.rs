//! Extension-dispatched image reading.

use std::path::Path;

use image::{ImageReader, RgbaImage};

use crate::edds;
use crate::imageio::dds_file::{read_dds, read_dds_size};
use crate::imageio::{extension_of, ImageIoError};

/// Load an image from any supported file format.
pub fn read(path: &Path) -> Result<RgbaImage, ImageIoError> {
    match extension_of(path).as_str() {
        "png" | "bmp" | "tga" | "tiff" => Ok(image::open(path)?.to_rgba8()),
        "dds" => read_dds(path),
        "edds" => Ok(edds::read(path)?),
        other => Err(ImageIoError::UnsupportedInput(other.to_string())),
    }
}

/// Read image dimensions without decoding full pixel data.
pub fn image_size(path: &Path) -> Result<(u32, u32), ImageIoError> {
    match extension_of(path).as_str() {
        "png" | "bmp" | "tga" | "tiff" => Ok(ImageReader::open(path)?.into_dimensions()?),
        "dds" => read_dds_size(path),
        "edds" => Ok(edds::read_config(path)?),
        other => Err(ImageIoError::UnsupportedInput(other.to_string())),
    }
}
