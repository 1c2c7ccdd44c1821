//! Imageset text parsing.
//!
//! Line-oriented: block openings are recognized by prefix plus a trailing
//! `{`, blocks close with `}` on a line of its own, and everything else is
//! a key-value line. `Textures { ... }` sub-blocks are tolerated but their
//! contents are not surfaced. Document ordering is preserved.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::imageset::types::{ImageDef, ImageGroup, ImageSet, IS_HORIZONTAL_TILE, IS_VERTICAL_TILE};
use crate::imageset::ImageSetError;

/// Parse an imageset file from disk.
pub fn read_file(path: &Path) -> Result<ImageSet, ImageSetError> {
    let file = File::open(path).map_err(|e| ImageSetError::File {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(BufReader::new(file))
}

/// Parse an imageset document from a reader.
pub fn parse<R: BufRead>(r: R) -> Result<ImageSet, ImageSetError> {
    let mut set = ImageSet::default();

    let mut in_images = false;
    let mut in_groups = false;
    let mut in_group_images = false;
    let mut cur_group: Option<ImageGroup> = None;
    let mut cur_def: Option<ImageDef> = None;

    for (idx, line) in r.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // section opens
        if cur_group.is_some() && line.starts_with("Images") && line.ends_with('{') {
            in_group_images = true;
            continue;
        }
        if line.starts_with("Textures") {
            continue;
        }
        if line.starts_with("Images") && line.ends_with('{') {
            in_images = true;
            continue;
        }
        if line.starts_with("Groups") && line.ends_with('{') {
            in_groups = true;
            continue;
        }
        if line.starts_with("ImageSetGroupClass") {
            let mut group = ImageGroup::default();
            if let Some(name) = parse_class_name(line) {
                group.name = name;
            }
            cur_group = Some(group);
            in_group_images = false;
            continue;
        }
        if line.starts_with("ImageSetDefClass") {
            cur_def = Some(ImageDef::default());
            continue;
        }

        // block close
        if line == "}" {
            if let Some(def) = cur_def.take() {
                if in_group_images {
                    if let Some(group) = cur_group.as_mut() {
                        group.images.push(def);
                        continue;
                    }
                }
                set.images.push(def);
                continue;
            }
            if in_group_images {
                in_group_images = false;
                continue;
            }
            if in_groups {
                if let Some(group) = cur_group.take() {
                    set.groups.push(group);
                    continue;
                }
                in_groups = false;
                continue;
            }
            if in_images {
                in_images = false;
            }
            continue;
        }

        // key-value lines
        let fields: Vec<&str> = line.split_whitespace().collect();
        let Some(&key) = fields.first() else {
            continue;
        };

        match key {
            "Name" => {
                let val = line["Name".len()..].trim().trim_matches('"').to_string();
                if let Some(def) = cur_def.as_mut() {
                    def.name = val;
                } else if let Some(group) = cur_group.as_mut() {
                    group.name = val;
                } else {
                    set.name = val;
                }
            }
            "RefSize" => {
                set.ref_size = parse_pair(&fields, line_no, "RefSize")?;
            }
            "Pos" => {
                let def = cur_def.as_mut().ok_or_else(|| ImageSetError::Parse {
                    line: line_no,
                    msg: "Pos outside of an image definition".to_string(),
                })?;
                def.pos = parse_pair(&fields, line_no, "Pos")?;
            }
            "Size" => {
                let def = cur_def.as_mut().ok_or_else(|| ImageSetError::Parse {
                    line: line_no,
                    msg: "Size outside of an image definition".to_string(),
                })?;
                def.size = parse_pair(&fields, line_no, "Size")?;
            }
            "Flags" => {
                let def = cur_def.as_mut().ok_or_else(|| ImageSetError::Parse {
                    line: line_no,
                    msg: "Flags outside of an image definition".to_string(),
                })?;
                if fields.len() < 2 {
                    return Err(ImageSetError::Parse {
                        line: line_no,
                        msg: "invalid Flags".to_string(),
                    });
                }
                def.flags = parse_flags(&fields[1..])?;
            }
            _ => {}
        }
    }

    Ok(set)
}

fn parse_pair(fields: &[&str], line_no: usize, key: &str) -> Result<[i32; 2], ImageSetError> {
    if fields.len() < 3 {
        return Err(ImageSetError::Parse {
            line: line_no,
            msg: format!("invalid {key}"),
        });
    }
    let a = fields[1].parse::<i32>();
    let b = fields[2].parse::<i32>();
    match (a, b) {
        (Ok(a), Ok(b)) => Ok([a, b]),
        _ => Err(ImageSetError::Parse {
            line: line_no,
            msg: format!("invalid {key} values"),
        }),
    }
}

/// Parse a `Flags` value: a decimal integer, or `ISHorizontalTile` /
/// `ISVerticalTile` tokens separated by whitespace, `+` or `|`, or a mix.
pub fn parse_flags(tokens: &[&str]) -> Result<i32, ImageSetError> {
    if tokens.is_empty() {
        return Ok(0);
    }

    // numeric fast-path
    if tokens.len() == 1 {
        if let Ok(v) = tokens[0].parse::<i32>() {
            return Ok(v);
        }
    }

    let mut flags = 0;
    for token in tokens {
        let token = token.trim().trim_matches(|c| c == '|' || c == '+');
        if token.is_empty() {
            continue;
        }
        match token {
            "ISHorizontalTile" => flags |= IS_HORIZONTAL_TILE,
            "ISVerticalTile" => flags |= IS_VERTICAL_TILE,
            other => {
                if let Ok(v) = other.parse::<i32>() {
                    flags |= v;
                } else {
                    return Err(ImageSetError::InvalidFlagsToken(other.to_string()));
                }
            }
        }
    }

    Ok(flags)
}

/// Extract the identifier from a `ImageSetGroupClass <id> {` line.
fn parse_class_name(line: &str) -> Option<String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 2 {
        return None;
    }
    let mut name = fields[1].trim_matches('{');
    if name.is_empty() && fields.len() >= 3 {
        name = fields[2].trim_matches('{');
    }
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
