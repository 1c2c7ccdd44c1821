//! End-to-end pipeline tests: pack -> EDDS + imageset -> read back.

use enfpack::edds;
use enfpack::imageset::{self, ImageDef, ImageSet, TextureRef};
use enfpack::packer::{pack, Config, ImageInfo, Rule};
use image::RgbaImage;

fn solid(name: &str, width: i32, height: i32, color: [u8; 4]) -> ImageInfo {
    ImageInfo {
        name: name.to_string(),
        width,
        height,
        image: RgbaImage::from_pixel(width as u32, height as u32, image::Rgba(color)),
    }
}

fn pack_cfg() -> Config {
    Config {
        min_size: 32,
        max_size: 64,
        gap: 0,
        rule: Rule::BottomLeft,
        ..Config::default()
    }
}

fn imageset_for(result: &enfpack::packer::PackResult, name: &str) -> ImageSet {
    ImageSet {
        name: name.to_string(),
        ref_size: [result.width, result.height],
        textures: vec![TextureRef {
            mpix: 1,
            path: format!("{name}.edds"),
        }],
        images: result
            .placements
            .iter()
            .map(|p| ImageDef {
                name: p.name.clone(),
                pos: [p.x, p.y],
                size: [p.width, p.height],
                flags: 0,
            })
            .collect(),
        groups: Vec::new(),
    }
}

#[test]
fn test_pack_write_read_pipeline() {
    let images = vec![
        solid("a", 10, 12, [255, 0, 0, 255]),
        solid("b", 8, 8, [0, 255, 0, 255]),
        solid("c", 5, 14, [0, 0, 255, 255]),
    ];

    let result = pack(&images, &pack_cfg()).unwrap();
    assert_eq!(result.placements.len(), 3);

    let dir = tempfile::tempdir().unwrap();
    let edds_path = dir.path().join("ui.edds");
    edds::write(&result.image, &edds_path).unwrap();

    let mut imageset_buf = Vec::new();
    imageset::write(&mut imageset_buf, &imageset_for(&result, "ui"), false).unwrap();

    // Read both halves back and cross-check them.
    let atlas = edds::read(&edds_path).unwrap();
    let set = imageset::parse(imageset_buf.as_slice()).unwrap();

    assert_eq!(atlas.width() as i32, set.ref_size[0]);
    assert_eq!(atlas.height() as i32, set.ref_size[1]);
    assert_eq!(set.images.len(), 3);

    // Every definition's rectangle holds exactly the source image's pixels.
    for (def, src) in [("a", [255u8, 0, 0, 255]), ("b", [0, 255, 0, 255]), ("c", [0, 0, 255, 255])]
    {
        let entry = set.images.iter().find(|d| d.name == def).unwrap();
        for dy in 0..entry.size[1] {
            for dx in 0..entry.size[0] {
                let px = atlas.get_pixel((entry.pos[0] + dx) as u32, (entry.pos[1] + dy) as u32);
                assert_eq!(px.0, src, "wrong pixel for {def} at +({dx},{dy})");
            }
        }
    }
}

#[test]
fn test_outputs_are_deterministic() {
    let images = vec![
        solid("a", 10, 12, [1, 2, 3, 255]),
        solid("b", 8, 8, [4, 5, 6, 255]),
        solid("c", 5, 14, [7, 8, 9, 255]),
    ];

    let dir = tempfile::tempdir().unwrap();
    let mut edds_bytes = Vec::new();
    let mut imageset_bytes = Vec::new();

    for i in 0..2 {
        let result = pack(&images, &pack_cfg()).unwrap();

        let edds_path = dir.path().join(format!("run{i}.edds"));
        edds::write(&result.image, &edds_path).unwrap();
        edds_bytes.push(std::fs::read(&edds_path).unwrap());

        let mut buf = Vec::new();
        imageset::write(&mut buf, &imageset_for(&result, "ui"), false).unwrap();
        imageset_bytes.push(buf);
    }

    assert_eq!(edds_bytes[0], edds_bytes[1], ".edds outputs differ between runs");
    assert_eq!(
        imageset_bytes[0], imageset_bytes[1],
        ".imageset outputs differ between runs"
    );
}

#[test]
fn test_imageset_roundtrip_of_pack_output() {
    let images = vec![solid("icon", 16, 16, [9, 9, 9, 255])];
    let result = pack(&images, &pack_cfg()).unwrap();
    let set = imageset_for(&result, "single");

    let mut buf = Vec::new();
    imageset::write(&mut buf, &set, false).unwrap();
    let parsed = imageset::parse(buf.as_slice()).unwrap();

    assert_eq!(parsed.name, set.name);
    assert_eq!(parsed.ref_size, set.ref_size);
    assert_eq!(parsed.images, set.images);
    assert_eq!(parsed.groups, set.groups);
}
