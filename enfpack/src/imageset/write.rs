//! Imageset text writing.
//!
//! Emits the tab-indented `ImageSetClass { ... }` document. All identifiers
//! pass through [`normalize_name`]; an image or group whose name normalizes
//! to nothing falls back to the literal `default` class identifier (and is
//! not deduplicated against siblings).

use std::io::{self, Write};

use crate::imageset::names::normalize_name;
use crate::imageset::types::{ImageDef, ImageGroup, ImageSet, TextureRef};

/// Write an [`ImageSet`] in imageset text format.
pub fn write<W: Write>(w: &mut W, set: &ImageSet, camel: bool) -> io::Result<()> {
    write_image_set(w, set, 0, camel)
}

fn write_image_set<W: Write>(
    w: &mut W,
    set: &ImageSet,
    indent: usize,
    camel: bool,
) -> io::Result<()> {
    let tabs = "\t".repeat(indent);

    writeln!(w, "{tabs}ImageSetClass {{")?;

    let class_name = normalize_name(&set.name, camel);
    writeln!(w, "{tabs}\tName {class_name:?}")?;
    writeln!(w, "{tabs}\tRefSize {} {}", set.ref_size[0], set.ref_size[1])?;

    if !set.textures.is_empty() {
        writeln!(w, "{tabs}\tTextures {{")?;
        for tex in &set.textures {
            write_texture(w, tex, indent + 2)?;
        }
        writeln!(w, "{tabs}\t}}")?;
    }

    if !set.images.is_empty() {
        writeln!(w, "{tabs}\tImages {{")?;
        for img in &set.images {
            write_image_def(w, img, indent + 2, camel)?;
        }
        writeln!(w, "{tabs}\t}}")?;
    }

    if !set.groups.is_empty() {
        writeln!(w, "{tabs}\tGroups {{")?;
        for group in &set.groups {
            write_group(w, group, indent + 2, camel)?;
        }
        writeln!(w, "{tabs}\t}}")?;
    }

    writeln!(w, "{tabs}}}")?;
    Ok(())
}

fn write_texture<W: Write>(w: &mut W, tex: &TextureRef, indent: usize) -> io::Result<()> {
    let tabs = "\t".repeat(indent);
    writeln!(w, "{tabs}ImageSetTextureClass {{")?;
    writeln!(w, "{tabs}\tmpix {}", tex.mpix)?;
    writeln!(w, "{tabs}\tpath {:?}", tex.path)?;
    writeln!(w, "{tabs}}}")?;
    Ok(())
}

fn write_image_def<W: Write>(
    w: &mut W,
    img: &ImageDef,
    indent: usize,
    camel: bool,
) -> io::Result<()> {
    let tabs = "\t".repeat(indent);

    let name = normalize_name(&img.name, camel);
    let class_name = if name.is_empty() { "default" } else { &name };
    writeln!(w, "{tabs}ImageSetDefClass {class_name} {{")?;
    writeln!(w, "{tabs}\tName {name:?}")?;
    writeln!(w, "{tabs}\tPos {} {}", img.pos[0], img.pos[1])?;
    writeln!(w, "{tabs}\tSize {} {}", img.size[0], img.size[1])?;
    writeln!(w, "{tabs}\tFlags {}", img.flags)?;
    writeln!(w, "{tabs}}}")?;
    Ok(())
}

fn write_group<W: Write>(
    w: &mut W,
    group: &ImageGroup,
    indent: usize,
    camel: bool,
) -> io::Result<()> {
    let tabs = "\t".repeat(indent);

    let name = normalize_name(&group.name, camel);
    let class_name = if name.is_empty() { "default" } else { &name };
    writeln!(w, "{tabs}ImageSetGroupClass {class_name} {{")?;
    writeln!(w, "{tabs}\tName {name:?}")?;

    if !group.images.is_empty() {
        writeln!(w, "{tabs}\tImages {{")?;
        for img in &group.images {
            write_image_def(w, img, indent + 2, camel)?;
        }
        writeln!(w, "{tabs}\t}}")?;
    }

    writeln!(w, "{tabs}}}")?;
    Ok(())
}
