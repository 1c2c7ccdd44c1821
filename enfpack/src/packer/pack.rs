//! Atlas packing driver.

use image::imageops;
use image::RgbaImage;
use tracing::debug;

use crate::packer::maxrects::MaxRects;
use crate::packer::size::find_optimal_size;
use crate::packer::sort::sort_for_packing;
use crate::packer::{Config, ImageInfo, PackError, PackResult, Placement};

/// Pack the input images into a single atlas using MaxRects.
///
/// The inputs are sorted, a power-of-two size is searched with feasibility
/// probes, and the final placement re-runs the bin in the same order. Empty
/// input yields a `min_size` square atlas with no placements.
pub fn pack(images: &[ImageInfo], cfg: &Config) -> Result<PackResult, PackError> {
    validate_config(cfg)?;

    if images.is_empty() {
        let size = cfg.min_size;
        return Ok(PackResult {
            image: RgbaImage::new(size as u32, size as u32),
            placements: Vec::new(),
            width: size,
            height: size,
        });
    }

    let mut sorted: Vec<&ImageInfo> = images.iter().collect();
    sort_for_packing(&mut sorted, cfg);

    let (w, h) = find_optimal_size(&sorted, cfg);
    if w > cfg.max_size || h > cfg.max_size {
        return Err(PackError::Infeasible {
            width: w,
            height: h,
            max_size: cfg.max_size,
        });
    }
    debug!(width = w, height = h, images = images.len(), "packing atlas");

    let mut bin = MaxRects::new(w, h, cfg.allow_rotate);
    let mut atlas = RgbaImage::new(w as u32, h as u32);
    let mut placements = Vec::with_capacity(sorted.len());

    for im in &sorted {
        let pw = im.width + 2 * cfg.gap;
        let ph = im.height + 2 * cfg.gap;

        let rect = bin
            .insert(pw, ph, cfg.rule)
            .ok_or_else(|| PackError::PlacementFailed {
                name: im.name.clone(),
                width: w,
                height: h,
            })?;

        let x = rect.x + cfg.gap;
        let y = rect.y + cfg.gap;

        placements.push(Placement {
            name: im.name.clone(),
            x,
            y,
            width: im.width,
            height: im.height,
            rotated: rect.rotated,
        });

        if rect.rotated {
            let rotated = imageops::rotate90(&im.image);
            imageops::replace(&mut atlas, &rotated, i64::from(x), i64::from(y));
        } else {
            imageops::replace(&mut atlas, &im.image, i64::from(x), i64::from(y));
        }
    }

    Ok(PackResult {
        image: atlas,
        placements,
        width: w,
        height: h,
    })
}

fn validate_config(cfg: &Config) -> Result<(), PackError> {
    if cfg.min_size <= 0 || cfg.max_size <= 0 || cfg.min_size > cfg.max_size {
        return Err(PackError::InvalidConfig(format!(
            "MinSize={} MaxSize={}",
            cfg.min_size, cfg.max_size
        )));
    }
    if cfg.gap < 0 {
        return Err(PackError::InvalidConfig(format!("Gap={}", cfg.gap)));
    }
    Ok(())
}
