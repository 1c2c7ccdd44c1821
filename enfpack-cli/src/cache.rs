//! Input-hash skip cache.
//!
//! `--skip-unchanged` hashes every input file (relative path, content
//! hash, size) into a single xxh64 value stored as 8 little-endian bytes
//! in `<name>.imagehash`. When the stored hash matches and both outputs
//! exist, the whole pack is skipped. The cache is advisory: any read
//! failure just disables the skip.

use std::fs;
use std::path::{Path, PathBuf};

use xxhash_rust::xxh64::{xxh64, Xxh64};

use crate::error::CliError;

/// Hash the input file set. Entries are sorted by relative path so the
/// result is independent of discovery order.
pub fn compute_inputs_hash(input_root: &Path, files: &[PathBuf]) -> Result<u64, CliError> {
    let root = input_root
        .canonicalize()
        .map_err(|e| CliError::file(input_root, e))?;

    let mut entries = Vec::with_capacity(files.len());
    for file in files {
        let abs = file.canonicalize().map_err(|e| CliError::file(file, e))?;
        let rel = abs
            .strip_prefix(&root)
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|_| abs.clone());

        let data = fs::read(&abs).map_err(|e| CliError::file(&abs, e))?;
        let content_hash = xxh64(&data, 0);

        let rel = rel.to_string_lossy().replace('\\', "/");
        entries.push((rel, content_hash, data.len() as u64));
    }

    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut hasher = Xxh64::new(0);
    for (rel, content_hash, size) in &entries {
        hasher.update(rel.as_bytes());
        hasher.update(&[0]);
        hasher.update(format!("{content_hash:016x}").as_bytes());
        hasher.update(&[0]);
        hasher.update(size.to_string().as_bytes());
        hasher.update(b"\n");
    }

    Ok(hasher.digest())
}

/// Whether a pack can be skipped: stored hash matches and both outputs
/// still exist.
pub fn should_skip_pack(
    cache_path: &Path,
    imageset_path: &Path,
    edds_path: &Path,
    next_hash: u64,
) -> bool {
    let Some(prev_hash) = read_cache_hash(cache_path) else {
        return false;
    };
    prev_hash == next_hash && imageset_path.exists() && edds_path.exists()
}

fn read_cache_hash(path: &Path) -> Option<u64> {
    let data = fs::read(path).ok()?;
    let bytes: [u8; 8] = data.try_into().ok()?;
    Some(u64::from_le_bytes(bytes))
}

/// Store the hash for the next run.
pub fn write_cache_hash(path: &Path, hash: u64) -> Result<(), CliError> {
    fs::write(path, hash.to_le_bytes()).map_err(|e| CliError::file(path, e))
}
