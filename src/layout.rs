//! Library layout.
//!
//! A library exists on disk in one of two forms: a packed `.mlib` archive or
//! an unpacked directory. Both carry the same entries under the same names.

use std::path::{Path, PathBuf};

/// File extension of packed libraries.
pub const LIBRARY_EXTENSION: &str = "mlib";

/// TOML entry describing the library (name, ABI version, targets).
pub const MANIFEST: &str = "manifest";

/// JSON entry holding the serialized module metadata.
pub const METADATA: &str = "module.json";

/// Magic bytes at the start of a packed library.
pub const ARCHIVE_MAGIC: &[u8; 8] = b"!<arch>\n";

/// Where the entries of a library live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryLayout {
    /// An `ar` archive whose members are the entries.
    Packed(PathBuf),
    /// A directory whose files are the entries.
    Unpacked(PathBuf),
}

impl LibraryLayout {
    /// Classifies an existing path. Returns `None` when the path is neither a
    /// regular file nor a directory containing a manifest.
    pub fn detect(path: &Path) -> Option<Self> {
        if path.is_file() {
            Some(LibraryLayout::Packed(path.to_path_buf()))
        } else if path.is_dir() && path.join(MANIFEST).is_file() {
            Some(LibraryLayout::Unpacked(path.to_path_buf()))
        } else {
            None
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            LibraryLayout::Packed(path) | LibraryLayout::Unpacked(path) => path,
        }
    }
}

/// Appends the library extension unless `name` already carries it.
pub fn with_extension(name: &str) -> String {
    if has_extension(name) {
        name.to_string()
    } else {
        format!("{}.{}", name, LIBRARY_EXTENSION)
    }
}

fn has_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext == LIBRARY_EXTENSION)
}
