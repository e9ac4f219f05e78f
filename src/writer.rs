//! Library archive writer.
//!
//! Packs an unpacked library directory into a `.mlib` file: a GNU `ar`
//! archive with one member per library entry.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::layout::{self, ARCHIVE_MAGIC, MANIFEST, METADATA};
use crate::library::Manifest;
use crate::utils::align_up;

/// Longest member name that fits the short-name header field with its `/`.
const MAX_MEMBER_NAME: usize = 15;

/// Serializes `entries` as an `ar` archive.
pub fn write_archive(entries: &[(&str, &[u8])]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer.extend_from_slice(ARCHIVE_MAGIC);

    for (name, data) in entries {
        if name.is_empty() || name.len() > MAX_MEMBER_NAME || name.contains('/') {
            bail!("invalid archive member name '{}'", name);
        }
        let header = format!(
            "{:<16}{:<12}{:<6}{:<6}{:<8}{:<10}`\n",
            format!("{}/", name),
            0,
            0,
            0,
            644,
            data.len()
        );
        debug_assert_eq!(header.len(), 60);
        buffer.extend_from_slice(header.as_bytes());
        buffer.extend_from_slice(data);

        // Members start on even offsets
        let padded = align_up(buffer.len() as u64, 2) as usize;
        buffer.resize(padded, b'\n');
    }

    Ok(buffer)
}

/// Packs the unpacked library at `dir` and returns the archive bytes.
pub fn pack_library(dir: &Path) -> Result<Vec<u8>> {
    let manifest = std::fs::read(dir.join(MANIFEST))
        .with_context(|| format!("failed to read manifest of {}", dir.display()))?;
    Manifest::parse(&manifest)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("refusing to pack {}", dir.display()))?;
    let metadata = std::fs::read(dir.join(METADATA))
        .with_context(|| format!("failed to read metadata of {}", dir.display()))?;

    write_archive(&[(MANIFEST, manifest.as_slice()), (METADATA, metadata.as_slice())])
}

/// Default output path for packing `dir`: a sibling `.mlib` file.
pub fn default_output(dir: &Path) -> Result<PathBuf> {
    let name = dir
        .file_name()
        .with_context(|| format!("cannot derive a library name from {}", dir.display()))?;
    Ok(dir.with_file_name(layout::with_extension(&name.to_string_lossy())))
}

/// Packs `dir` and writes the archive to `output_path`.
pub fn write_library(dir: &Path, output_path: &Path) -> Result<()> {
    let buffer = pack_library(dir)?;
    std::fs::write(output_path, &buffer)
        .with_context(|| format!("failed to write {}", output_path.display()))?;
    tracing::info!("packed {} into {}", dir.display(), output_path.display());
    Ok(())
}
