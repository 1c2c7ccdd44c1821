//! Extension-dispatched image writing.

use std::path::Path;

use image::RgbaImage;

use crate::edds;
use crate::imageio::codec::{validate_quality_level, EncodeSettings};
use crate::imageio::dds_file::write_dds;
use crate::imageio::{extension_of, ImageIoError};

/// Save an image to the given path based on its extension, with defaults.
pub fn write(path: &Path, img: &RgbaImage) -> Result<(), ImageIoError> {
    write_with_options(path, img, EncodeSettings::default())
}

/// Save an image using the given DDS/EDDS encoding settings.
pub fn write_with_options(
    path: &Path,
    img: &RgbaImage,
    opts: EncodeSettings,
) -> Result<(), ImageIoError> {
    match extension_of(path).as_str() {
        "png" | "bmp" | "tga" | "tiff" => {
            img.save(path)?;
            Ok(())
        }
        "dds" => {
            validate_quality_level(opts.quality)?;
            write_dds(path, img, opts.format)
        }
        "edds" => {
            validate_quality_level(opts.quality)?;
            edds::write_with_options(
                img,
                path,
                edds::WriteOptions {
                    format: opts.format,
                    max_mip_maps: opts.mipmaps,
                },
            )?;
            Ok(())
        }
        other => Err(ImageIoError::UnsupportedOutput(other.to_string())),
    }
}
