//! The `unpack` subcommand: .imageset + .edds pair -> individual images.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use image::imageops;
use image::RgbaImage;

use enfpack::edds;
use enfpack::imageio;
use enfpack::imageset::{self, ImageDef};

use crate::error::CliError;

/// Extract images from an imageset + edds pair.
#[derive(Debug, Args)]
pub struct UnpackArgs {
    /// Path to the .imageset file
    #[arg(value_name = "imageset")]
    pub imageset: String,

    /// Path to the .edds atlas
    #[arg(value_name = "edds")]
    pub edds: String,

    /// Output format: png, tga, tiff, bmp, dds
    #[arg(short = 'o', long = "out-format", default_value = "png")]
    pub out_format: String,

    /// Output directory (default: current directory)
    #[arg(short = 'O', long = "output-dir")]
    pub output_dir: Option<String>,

    /// Overwrite existing files
    #[arg(short = 'f', long = "force")]
    pub force: bool,

    /// Write groups into subdirectories
    #[arg(short = 'g', long = "groups")]
    pub keep_groups: bool,

    /// Drop duplicate entries with identical Pos/Size
    #[arg(short = 'd', long = "deduplicate")]
    pub dedup: bool,
}

/// Run the unpack command.
pub fn run(args: &UnpackArgs) -> Result<(), CliError> {
    let set = imageset::read_file(Path::new(&args.imageset))?;
    let atlas = edds::read(Path::new(&args.edds))?;

    // The atlas on disk may be a scaled-up variant of the RefSize the
    // imageset was authored against; positions scale when the ratio is
    // integral.
    let (sx, sy) = ref_scale(&set, &atlas);

    let out_dir = match &args.output_dir {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&out_dir).map_err(|e| CliError::file(&out_dir, e))?;

    let format = args.out_format.trim_start_matches('.').to_lowercase();
    let format = if format.is_empty() { "png".to_string() } else { format };

    let root_images = maybe_dedup(&set.images, args.dedup);
    for def in &root_images {
        write_one(&atlas, def, sx, sy, &out_dir, "", &format, args.force)?;
    }

    for group in &set.groups {
        let group_images = maybe_dedup(&group.images, args.dedup);
        let group_dir = if args.keep_groups {
            sanitize_name(&group.name)
        } else {
            String::new()
        };
        for def in &group_images {
            write_one(&atlas, def, sx, sy, &out_dir, &group_dir, &format, args.force)?;
        }
    }

    Ok(())
}

fn ref_scale(set: &imageset::ImageSet, atlas: &RgbaImage) -> (i32, i32) {
    let ref_w = set.ref_size[0];
    let ref_h = set.ref_size[1];
    let atlas_w = atlas.width() as i32;
    let atlas_h = atlas.height() as i32;

    let mut sx = 1;
    let mut sy = 1;
    if ref_w > 0 && ref_h > 0 {
        if atlas_w % ref_w == 0 {
            sx = atlas_w / ref_w;
        }
        if atlas_h % ref_h == 0 {
            sy = atlas_h / ref_h;
        }
    }
    (sx.max(1), sy.max(1))
}

#[allow(clippy::too_many_arguments)]
fn write_one(
    atlas: &RgbaImage,
    def: &ImageDef,
    sx: i32,
    sy: i32,
    base_dir: &Path,
    group_dir: &str,
    format: &str,
    overwrite: bool,
) -> Result<(), CliError> {
    let sub = crop(atlas, def.pos[0] * sx, def.pos[1] * sy, def.size[0] * sx, def.size[1] * sy)
        .map_err(|msg| CliError::Config(format!("crop {:?}: {msg}", def.name)))?;

    let dir = if group_dir.is_empty() {
        base_dir.to_path_buf()
    } else {
        let dir = base_dir.join(group_dir);
        fs::create_dir_all(&dir).map_err(|e| CliError::file(&dir, e))?;
        dir
    };

    let out_path = dir.join(format!("{}.{format}", def.name));
    if !overwrite && out_path.exists() {
        return Err(CliError::OutputExists(out_path.display().to_string()));
    }

    imageio::write(&out_path, &sub)?;
    Ok(())
}

fn crop(src: &RgbaImage, x: i32, y: i32, w: i32, h: i32) -> Result<RgbaImage, String> {
    if w <= 0 || h <= 0 {
        return Err(format!("invalid crop size: {w}x{h}"));
    }
    if x < 0
        || y < 0
        || x + w > src.width() as i32
        || y + h > src.height() as i32
    {
        return Err(format!(
            "crop out of bounds: rect=[{x},{y}..{},{}] atlas={}x{}",
            x + w,
            y + h,
            src.width(),
            src.height()
        ));
    }

    Ok(imageops::crop_imm(src, x as u32, y as u32, w as u32, h as u32).to_image())
}

fn sanitize_name(s: &str) -> String {
    let s = s.trim().replace(' ', "_").replace("..", ".");
    if s.is_empty() {
        "group".to_string()
    } else {
        s
    }
}

fn maybe_dedup(defs: &[ImageDef], dedup: bool) -> Vec<ImageDef> {
    if !dedup || defs.len() <= 1 {
        return defs.to_vec();
    }

    let mut seen = HashSet::new();
    defs.iter()
        .filter(|def| seen.insert((def.pos, def.size)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use enfpack::imageset::{ImageGroup, ImageSet};

    fn write_pair(dir: &Path) -> (PathBuf, PathBuf) {
        // 8x8 atlas with two 4x4 quadrants of distinct colors.
        let mut atlas = RgbaImage::from_pixel(8, 8, image::Rgba([0, 0, 0, 255]));
        for y in 0..4 {
            for x in 0..4 {
                atlas.put_pixel(x, y, image::Rgba([255, 0, 0, 255]));
                atlas.put_pixel(x + 4, y, image::Rgba([0, 255, 0, 255]));
            }
        }

        let edds_path = dir.join("ui.edds");
        edds::write(&atlas, &edds_path).unwrap();

        let set = ImageSet {
            name: "ui".to_string(),
            ref_size: [8, 8],
            images: vec![ImageDef {
                name: "red".to_string(),
                pos: [0, 0],
                size: [4, 4],
                flags: 0,
            }],
            groups: vec![ImageGroup {
                name: "grp".to_string(),
                images: vec![ImageDef {
                    name: "green".to_string(),
                    pos: [4, 0],
                    size: [4, 4],
                    flags: 0,
                }],
            }],
            ..ImageSet::default()
        };

        let imageset_path = dir.join("ui.imageset");
        let mut buf = Vec::new();
        imageset::write(&mut buf, &set, false).unwrap();
        fs::write(&imageset_path, &buf).unwrap();

        (imageset_path, edds_path)
    }

    #[test]
    fn test_unpack_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let (imageset_path, edds_path) = write_pair(dir.path());
        let out = dir.path().join("out");

        let args = UnpackArgs {
            imageset: imageset_path.display().to_string(),
            edds: edds_path.display().to_string(),
            out_format: "png".to_string(),
            output_dir: Some(out.display().to_string()),
            force: false,
            keep_groups: true,
            dedup: false,
        };
        run(&args).unwrap();

        let red = imageio::read(&out.join("red.png")).unwrap();
        assert_eq!(red.dimensions(), (4, 4));
        assert_eq!(red.get_pixel(0, 0).0, [255, 0, 0, 255]);

        let green = imageio::read(&out.join("grp/green.png")).unwrap();
        assert_eq!(green.get_pixel(0, 0).0, [0, 255, 0, 255]);
    }

    #[test]
    fn test_unpack_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let (imageset_path, edds_path) = write_pair(dir.path());
        let out = dir.path().join("out");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("red.png"), "stale").unwrap();

        let args = UnpackArgs {
            imageset: imageset_path.display().to_string(),
            edds: edds_path.display().to_string(),
            out_format: "png".to_string(),
            output_dir: Some(out.display().to_string()),
            force: false,
            keep_groups: false,
            dedup: false,
        };
        assert!(matches!(run(&args), Err(CliError::OutputExists(_))));
    }

    #[test]
    fn test_crop_bounds() {
        let atlas = RgbaImage::new(8, 8);
        assert!(crop(&atlas, 0, 0, 8, 8).is_ok());
        assert!(crop(&atlas, 4, 4, 8, 8).is_err());
        assert!(crop(&atlas, 0, 0, 0, 4).is_err());
        assert!(crop(&atlas, -1, 0, 4, 4).is_err());
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("main hud"), "main_hud");
        assert_eq!(sanitize_name(""), "group");
        assert_eq!(sanitize_name("a..b"), "a.b");
    }

    #[test]
    fn test_maybe_dedup() {
        let defs = vec![
            ImageDef {
                name: "a".to_string(),
                pos: [0, 0],
                size: [4, 4],
                flags: 0,
            },
            ImageDef {
                name: "b".to_string(),
                pos: [0, 0],
                size: [4, 4],
                flags: 0,
            },
        ];
        assert_eq!(maybe_dedup(&defs, false).len(), 2);
        let deduped = maybe_dedup(&defs, true);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].name, "a");
    }
}
