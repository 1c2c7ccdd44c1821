//! The `pack` subcommand: directory of images -> .imageset + .edds pair.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use serde::Deserialize;
use tracing::info;

use enfpack::imageio::{self, parse_output_format, validate_quality_level, EncodeSettings, Rgb};
use enfpack::imageset::{self, ImageDef, ImageGroup, ImageSet, TextureRef};
use enfpack::packer::{self, Config, ImageInfo, Rule};

use crate::cache::{compute_inputs_hash, should_skip_pack, write_cache_hash};
use crate::error::CliError;

/// Pack a directory of images into an EDDS atlas and imageset file.
///
/// The same struct doubles as one project entry of the YAML build file,
/// with field names matching the long flags in snake_case.
#[derive(Debug, Clone, Args, Deserialize)]
#[serde(default)]
pub struct PackArgs {
    /// Input directory with images
    #[arg(value_name = "input")]
    pub input: String,

    /// Output directory (default: input directory)
    #[arg(value_name = "output")]
    pub output: Option<String>,

    /// ImageSet name (default: input directory name)
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Overwrite existing output files
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Use CamelCase names in imageset output (default: snake_case)
    #[arg(short = 'c', long = "camel-case")]
    pub camel_case: bool,

    /// Prefix path for the imageset texture reference (e.g. mod/data/images)
    #[arg(short = 'P', long = "edds-path")]
    pub edds_path: Option<String>,

    /// Skip writing when inputs are unchanged
    #[arg(short = 'u', long = "skip-unchanged")]
    pub skip_unchanged: bool,

    /// Packing rule: bssf, blsf, baf, bl, cp
    #[arg(short = 'r', long, default_value = "bl")]
    pub rule: String,

    /// Output format for the EDDS atlas: bgra8, dxt1, dxt5
    #[arg(short = 'F', long = "out-format", default_value = "bgra8")]
    pub out_format: String,

    /// Minimum texture size (power of 2)
    #[arg(short = 'm', long = "min-size", default_value_t = 256)]
    pub min_size: i32,

    /// Maximum texture size (power of 2)
    #[arg(short = 'M', long = "max-size", default_value_t = 4096)]
    pub max_size: i32,

    /// Gap between images
    #[arg(short = 'g', long, default_value_t = 0)]
    pub gap: i32,

    /// DXT1/DXT5 quality level 1..10, 0=default
    #[arg(short = 'q', long, default_value_t = 0)]
    pub quality: i32,

    /// Mipmap levels for EDDS output, 0=full chain
    #[arg(short = 'x', long, default_value_t = 0)]
    pub mipmaps: u32,

    /// Aspect penalty for non-square textures
    #[arg(short = 'a', long = "aspect-penalty", default_value_t = 0.25)]
    pub aspect_penalty: f64,

    /// Prefer height over width for aspect ratio
    #[arg(short = 'p', long = "prefer-height")]
    pub prefer_height: bool,

    /// Force square texture
    #[arg(short = 'S', long = "force-square")]
    pub force_square: bool,

    /// Allow 90-degree rotation for better packing
    #[arg(short = 'R', long = "rotate")]
    pub rotate: bool,

    /// Separator for group name in filename (e.g. '_' for 'Group_Image.png')
    #[arg(short = 's', long = "group-separator")]
    pub group_separator: Option<String>,

    /// Treat subdirectories as groups
    #[arg(short = 'd', long = "group-dirs")]
    pub group_dirs: bool,

    /// Allowed input formats: png, tga, tiff, bmp (repeatable)
    #[arg(short = 'i', long = "in-format")]
    pub in_format: Vec<String>,

    /// Downscale inputs so the longest side is at most N pixels (0=off)
    #[arg(short = 'D', long = "max-input-side", default_value_t = 0)]
    pub max_input_side: u32,

    /// Color key as RRGGBB -> alpha=0 for bmp/tga/tiff by default
    #[arg(long = "alpha-key", default_value = "ff00ff")]
    pub alpha_key: String,

    /// Disable color key transparency processing
    #[arg(long = "alpha-key-off")]
    pub alpha_key_off: bool,

    /// Apply color key to all formats, including png
    #[arg(long = "alpha-key-all")]
    pub alpha_key_all: bool,
}

impl Default for PackArgs {
    fn default() -> Self {
        PackArgs {
            input: String::new(),
            output: None,
            name: None,
            force: false,
            camel_case: false,
            edds_path: None,
            skip_unchanged: false,
            rule: "bl".to_string(),
            out_format: "bgra8".to_string(),
            min_size: 256,
            max_size: 4096,
            gap: 0,
            quality: 0,
            mipmaps: 0,
            aspect_penalty: 0.25,
            prefer_height: false,
            force_square: false,
            rotate: false,
            group_separator: None,
            group_dirs: false,
            in_format: Vec::new(),
            max_input_side: 0,
            alpha_key: "ff00ff".to_string(),
            alpha_key_off: false,
            alpha_key_all: false,
        }
    }
}

struct ImageFile {
    image: RgbaImage,
    path: PathBuf,
    name: String,
    group_name: String,
    width: i32,
    height: i32,
}

/// Run the pack command.
pub fn run(args: &PackArgs) -> Result<(), CliError> {
    let input_dir = Path::new(&args.input);
    let output_dir = match &args.output {
        Some(out) if !out.is_empty() => PathBuf::from(out),
        _ => input_dir.to_path_buf(),
    };

    validate_quality_level(args.quality)?;
    let out_format = parse_output_format(&args.out_format)?;
    let rule: Rule = args.rule.parse()?;

    let name = match &args.name {
        Some(name) if !name.is_empty() => name.clone(),
        _ => input_dir
            .canonicalize()
            .map_err(|e| CliError::file(input_dir, e))?
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "imageset".to_string()),
    };

    let imageset_path = output_dir.join(format!("{name}.imageset"));
    let edds_path = output_dir.join(format!("{name}.edds"));

    let allowed = normalize_formats(&args.in_format);
    let alpha_key = imageio::parse_hex_rgb(&args.alpha_key)?;

    let image_files = collect_image_files(args, input_dir, &allowed, alpha_key)?;
    if image_files.is_empty() {
        return Err(CliError::Config(format!(
            "no input images found in {:?}",
            args.input
        )));
    }

    // Names are globally unique across root and groups.
    let mut seen: BTreeMap<&str, &Path> = BTreeMap::new();
    for file in &image_files {
        if let Some(prev) = seen.insert(&file.name, &file.path) {
            return Err(CliError::NameCollision {
                name: file.name.clone(),
                first: prev.display().to_string(),
                second: file.path.display().to_string(),
            });
        }
    }

    let cache_path = output_dir.join(format!("{name}.imagehash"));
    let mut inputs_hash = 0u64;
    if args.skip_unchanged {
        let paths: Vec<PathBuf> = image_files.iter().map(|f| f.path.clone()).collect();
        inputs_hash = compute_inputs_hash(input_dir, &paths)?;
        if should_skip_pack(&cache_path, &imageset_path, &edds_path, inputs_hash) {
            println!("Inputs unchanged; skipping write for {}", imageset_path.display());
            return Ok(());
        }
    }

    if !args.force {
        if imageset_path.exists() {
            return Err(CliError::OutputExists(imageset_path.display().to_string()));
        }
        if edds_path.exists() {
            return Err(CliError::OutputExists(edds_path.display().to_string()));
        }
    }

    let image_infos: Vec<ImageInfo> = image_files
        .iter()
        .map(|f| ImageInfo {
            name: f.name.clone(),
            width: f.width,
            height: f.height,
            image: f.image.clone(),
        })
        .collect();

    let cfg = Config {
        min_size: args.min_size,
        max_size: args.max_size,
        gap: args.gap,
        aspect_penalty: args.aspect_penalty,
        rule,
        prefer_height: args.prefer_height,
        force_square: args.force_square,
        allow_rotate: args.rotate,
    };

    let result = packer::pack(&image_infos, &cfg)?;
    info!(
        width = result.width,
        height = result.height,
        images = image_infos.len(),
        "packed atlas"
    );

    fs::create_dir_all(&output_dir).map_err(|e| CliError::file(&output_dir, e))?;

    let imageset_data = build_imageset(&name, args, &result, &image_files)?;

    let mut buf = Vec::new();
    imageset::write(&mut buf, &imageset_data, args.camel_case)
        .map_err(|e| CliError::file(&imageset_path, e))?;
    fs::write(&imageset_path, &buf).map_err(|e| CliError::file(&imageset_path, e))?;

    imageio::write_with_options(
        &edds_path,
        &result.image,
        EncodeSettings {
            format: out_format,
            quality: args.quality,
            mipmaps: args.mipmaps,
        },
    )?;

    if args.skip_unchanged && inputs_hash != 0 {
        write_cache_hash(&cache_path, inputs_hash)?;
    }

    println!(
        "Packed {} images from {} as {} into {}x{}",
        image_infos.len(),
        args.input,
        name,
        result.width,
        result.height
    );
    println!(
        "Outputs: {}, {}",
        imageset_path.display(),
        edds_path.display()
    );

    Ok(())
}

/// Assemble the imageset entity from the placements. Groups are emitted in
/// sorted name order; images keep discovery order within root and groups.
fn build_imageset(
    name: &str,
    args: &PackArgs,
    result: &packer::PackResult,
    image_files: &[ImageFile],
) -> Result<ImageSet, CliError> {
    let mut placement_map = BTreeMap::new();
    for placement in &result.placements {
        placement_map.insert(placement.name.as_str(), placement);
    }

    let mut root_images = Vec::new();
    let mut groups_map: BTreeMap<String, Vec<ImageDef>> = BTreeMap::new();

    for file in image_files {
        let placement = placement_map.get(file.name.as_str()).ok_or_else(|| {
            CliError::Config(format!("placement not found for image {:?}", file.name))
        })?;

        let def = ImageDef {
            name: file.name.clone(),
            pos: [placement.x, placement.y],
            size: [placement.width, placement.height],
            flags: 0,
        };

        if file.group_name.is_empty() {
            root_images.push(def);
        } else {
            groups_map.entry(file.group_name.clone()).or_default().push(def);
        }
    }

    let groups = groups_map
        .into_iter()
        .map(|(name, images)| ImageGroup { name, images })
        .collect();

    Ok(ImageSet {
        name: name.to_string(),
        ref_size: [result.width, result.height],
        textures: vec![TextureRef {
            mpix: 1,
            path: format_edds_ref_path(args.edds_path.as_deref(), name),
        }],
        images: root_images,
        groups,
    })
}

/// Discover, decode and preprocess the input images.
fn collect_image_files(
    args: &PackArgs,
    input_dir: &Path,
    allowed: &[String],
    alpha_key: Rgb,
) -> Result<Vec<ImageFile>, CliError> {
    let mut files = Vec::new();

    let mut load = |path: PathBuf, name: String, group_name: String| -> Result<(), CliError> {
        let img = imageio::read(&path)?;
        let img = apply_color_key_if_needed(img, &path, args, alpha_key);
        let (img, width, height) = downscale_if_needed(img, args.max_input_side);

        files.push(ImageFile {
            image: img,
            path,
            name,
            group_name,
            width,
            height,
        });
        Ok(())
    };

    if args.group_dirs {
        for (group_name, group_files) in read_image_files_from_dirs(input_dir, allowed)? {
            for path in group_files {
                let name = base_name(&path);
                load(path, name, group_name.clone())?;
            }
        }
        for path in read_image_files(input_dir, allowed)? {
            let name = base_name(&path);
            load(path, name, String::new())?;
        }
    } else if let Some(sep) = args.group_separator.as_deref().filter(|s| !s.is_empty()) {
        for path in read_image_files(input_dir, allowed)? {
            let base = base_name(&path);
            let (group_name, name) = split_group_name(&base, sep);
            load(path, name, group_name)?;
        }
    } else {
        for path in read_image_files(input_dir, allowed)? {
            let name = base_name(&path);
            load(path, name, String::new())?;
        }
    }

    Ok(files)
}

fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn apply_color_key_if_needed(
    img: RgbaImage,
    path: &Path,
    args: &PackArgs,
    key: Rgb,
) -> RgbaImage {
    if args.alpha_key_off {
        return img;
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if args.alpha_key_all || matches!(ext.as_str(), "bmp" | "tga" | "tiff") {
        return imageio::apply_color_key(img, key);
    }

    img
}

/// Downscale so the longest side is at most `max_side` pixels (0 = off).
fn downscale_if_needed(img: RgbaImage, max_side: u32) -> (RgbaImage, i32, i32) {
    let width = img.width();
    let height = img.height();

    if max_side == 0 || (width <= max_side && height <= max_side) {
        return (img, width as i32, height as i32);
    }

    let long_side = width.max(height);
    let scale = f64::from(max_side) / f64::from(long_side);
    let new_width = ((f64::from(width) * scale).round() as u32).max(1);
    let new_height = ((f64::from(height) * scale).round() as u32).max(1);

    let scaled = imageops::resize(&img, new_width, new_height, FilterType::CatmullRom);
    (scaled, new_width as i32, new_height as i32)
}

fn normalize_formats(formats: &[String]) -> Vec<String> {
    let mut out: Vec<String> = formats
        .iter()
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    if out.is_empty() {
        out = vec!["png", "tga", "tiff", "bmp"]
            .into_iter()
            .map(String::from)
            .collect();
    }

    out
}

/// Non-recursive listing of image files with an allowed extension, sorted.
fn read_image_files(dir: &Path, allowed: &[String]) -> Result<Vec<PathBuf>, CliError> {
    let entries = fs::read_dir(dir).map_err(|e| CliError::file(dir, e))?;

    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CliError::file(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if allowed.iter().any(|a| a == &ext) {
            out.push(path);
        }
    }

    out.sort();
    Ok(out)
}

/// Subdirectories as groups, in sorted group-name order.
fn read_image_files_from_dirs(
    root: &Path,
    allowed: &[String],
) -> Result<BTreeMap<String, Vec<PathBuf>>, CliError> {
    let entries = fs::read_dir(root).map_err(|e| CliError::file(root, e))?;

    let mut groups = BTreeMap::new();
    for entry in entries {
        let entry = entry.map_err(|e| CliError::file(root, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let files = read_image_files(&path, allowed)?;
        if !files.is_empty() {
            let group_name = entry.file_name().to_string_lossy().into_owned();
            groups.insert(group_name, files);
        }
    }

    Ok(groups)
}

/// Split `Group_Image` on the first separator occurrence.
fn split_group_name(filename: &str, separator: &str) -> (String, String) {
    match filename.find(separator) {
        Some(idx) => (
            filename[..idx].to_string(),
            filename[idx + separator.len()..].to_string(),
        ),
        None => (String::new(), filename.to_string()),
    }
}

/// Texture reference path: `<prefix>/<name>.edds`, slashes normalized.
fn format_edds_ref_path(prefix: Option<&str>, name: &str) -> String {
    let p = prefix.unwrap_or("").trim();
    if p.is_empty() {
        return format!("{name}.edds");
    }

    let p = p.replace('\\', "/");
    let p = p.trim_matches('/');
    if p.is_empty() {
        return format!("{name}.edds");
    }

    format!("{p}/{name}.edds")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_edds_ref_path() {
        assert_eq!(format_edds_ref_path(None, "ui"), "ui.edds");
        assert_eq!(format_edds_ref_path(Some(""), "ui"), "ui.edds");
        assert_eq!(format_edds_ref_path(Some("mod/data"), "ui"), "mod/data/ui.edds");
        assert_eq!(
            format_edds_ref_path(Some("\\mod\\data\\"), "ui"),
            "mod/data/ui.edds"
        );
        assert_eq!(format_edds_ref_path(Some("///"), "ui"), "ui.edds");
    }

    #[test]
    fn test_split_group_name() {
        assert_eq!(
            split_group_name("Group_Image", "_"),
            ("Group".to_string(), "Image".to_string())
        );
        assert_eq!(
            split_group_name("NoSeparator", "_"),
            (String::new(), "NoSeparator".to_string())
        );
        assert_eq!(
            split_group_name("A__B", "__"),
            ("A".to_string(), "B".to_string())
        );
    }

    #[test]
    fn test_normalize_formats() {
        assert_eq!(normalize_formats(&[]), ["png", "tga", "tiff", "bmp"]);
        assert_eq!(
            normalize_formats(&[".PNG".to_string(), " tga ".to_string()]),
            ["png", "tga"]
        );
    }

    #[test]
    fn test_downscale_if_needed() {
        let img = RgbaImage::new(100, 50);
        let (_, w, h) = downscale_if_needed(img.clone(), 0);
        assert_eq!((w, h), (100, 50));

        let (_, w, h) = downscale_if_needed(img, 50);
        assert_eq!((w, h), (50, 25));
    }

    #[test]
    fn test_pack_directory_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("icons");
        fs::create_dir(&input).unwrap();

        for (name, w, h) in [("a", 10u32, 12u32), ("b", 8, 8), ("c", 5, 14)] {
            RgbaImage::from_pixel(w, h, image::Rgba([200, 100, 50, 255]))
                .save(input.join(format!("{name}.png")))
                .unwrap();
        }

        let args = PackArgs {
            input: input.display().to_string(),
            min_size: 32,
            max_size: 64,
            gap: 1,
            ..PackArgs::default()
        };
        run(&args).unwrap();

        let set = imageset::read_file(&input.join("icons.imageset")).unwrap();
        assert_eq!(set.name, "icons");
        assert_eq!(set.images.len(), 3);

        let atlas = enfpack::edds::read(&input.join("icons.edds")).unwrap();
        assert_eq!(
            (atlas.width() as i32, atlas.height() as i32),
            (set.ref_size[0], set.ref_size[1])
        );
    }

    #[test]
    fn test_pack_name_collision() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("icons");
        let sub = input.join("grp");
        fs::create_dir_all(&sub).unwrap();

        RgbaImage::new(4, 4).save(input.join("same.png")).unwrap();
        RgbaImage::new(4, 4).save(sub.join("same.png")).unwrap();

        let args = PackArgs {
            input: input.display().to_string(),
            group_dirs: true,
            min_size: 16,
            max_size: 64,
            ..PackArgs::default()
        };
        let err = run(&args).unwrap_err();
        assert!(matches!(err, CliError::NameCollision { .. }));
    }

    #[test]
    fn test_pack_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("icons");
        fs::create_dir(&input).unwrap();
        RgbaImage::new(4, 4).save(input.join("a.png")).unwrap();
        fs::write(input.join("icons.imageset"), "stale").unwrap();

        let args = PackArgs {
            input: input.display().to_string(),
            min_size: 16,
            max_size: 64,
            ..PackArgs::default()
        };
        assert!(matches!(run(&args), Err(CliError::OutputExists(_))));

        let args = PackArgs { force: true, ..args };
        run(&args).unwrap();
    }

    #[test]
    fn test_pack_group_dirs_sorted_groups() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ui");
        fs::create_dir_all(input.join("zeta")).unwrap();
        fs::create_dir_all(input.join("alpha")).unwrap();

        RgbaImage::new(4, 4).save(input.join("zeta/z.png")).unwrap();
        RgbaImage::new(4, 4).save(input.join("alpha/a.png")).unwrap();

        let args = PackArgs {
            input: input.display().to_string(),
            group_dirs: true,
            min_size: 16,
            max_size: 64,
            ..PackArgs::default()
        };
        run(&args).unwrap();

        let set = imageset::read_file(&input.join("ui.imageset")).unwrap();
        let group_names: Vec<&str> = set.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(group_names, ["alpha", "zeta"]);
    }

    #[test]
    fn test_skip_unchanged_second_run() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("icons");
        fs::create_dir(&input).unwrap();
        RgbaImage::new(4, 4).save(input.join("a.png")).unwrap();

        let args = PackArgs {
            input: input.display().to_string(),
            skip_unchanged: true,
            force: true,
            min_size: 16,
            max_size: 64,
            ..PackArgs::default()
        };
        run(&args).unwrap();

        let edds = input.join("icons.edds");
        let before = fs::metadata(&edds).unwrap().modified().unwrap();
        run(&args).unwrap();
        let after = fs::metadata(&edds).unwrap().modified().unwrap();
        assert_eq!(before, after, "unchanged inputs must skip the rewrite");
    }
}
