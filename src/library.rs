//! Artifact loading.
//!
//! `ReadableLibrary::open` validates a resolved artifact against the current
//! target and ABI version by reading only its manifest. Metadata is extracted
//! later, on demand. Each read opens the container, maps it, and drops both
//! before returning, so no file handle outlives a single call.

use memmap2::Mmap;
use object::read::archive::ArchiveFile;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs::{self, File};
use std::path::Path;

use crate::error::{Incompatibility, LoadError, LoadResult};
use crate::layout::{LibraryLayout, ARCHIVE_MAGIC, MANIFEST, METADATA};
use crate::metadata::{self, ModuleDescriptor, Specifics};
use crate::resolver::ResolvedArtifact;
use crate::target::Target;

/// Library properties stored in the `manifest` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub unique_name: String,
    pub abi_version: u32,
    pub targets: Vec<String>,
}

impl Manifest {
    pub fn parse(bytes: &[u8]) -> Result<Self, String> {
        let text = std::str::from_utf8(bytes).map_err(|e| format!("manifest is not UTF-8: {}", e))?;
        toml::from_str(text).map_err(|e| format!("invalid manifest: {}", e))
    }

    pub fn supports(&self, target: Target) -> bool {
        self.targets.iter().any(|t| t == target.name())
    }
}

/// A resolved artifact whose manifest matched the current target and ABI.
#[derive(Debug, Clone)]
pub struct ReadableLibrary {
    artifact: ResolvedArtifact,
    manifest: Manifest,
}

impl ReadableLibrary {
    pub fn open(artifact: ResolvedArtifact, target: Target, abi_version: u32) -> LoadResult<Self> {
        let path = artifact.path();
        let manifest = with_container(&artifact.layout, |container| {
            let bytes = container.entry(MANIFEST)?;
            Manifest::parse(&bytes).map_err(|reason| LoadError::corrupt(path, reason))
        })?;

        if manifest.abi_version != abi_version {
            return Err(LoadError::IncompatibleArtifact {
                path: path.to_path_buf(),
                reason: Incompatibility::Abi {
                    expected: abi_version,
                    found: manifest.abi_version,
                },
            });
        }
        if !manifest.supports(target) {
            return Err(LoadError::IncompatibleArtifact {
                path: path.to_path_buf(),
                reason: Incompatibility::Target {
                    expected: target.name().to_string(),
                    available: manifest.targets.clone(),
                },
            });
        }

        tracing::debug!(
            "opened library '{}' from {}",
            manifest.unique_name,
            path.display()
        );
        Ok(Self { artifact, manifest })
    }

    /// The name the library declares for itself.
    pub fn library_name(&self) -> &str {
        &self.manifest.unique_name
    }

    /// The identifier the library was requested under.
    pub fn identifier(&self) -> &str {
        &self.artifact.identifier
    }

    pub fn path(&self) -> &Path {
        self.artifact.path()
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Deserializes the library's module metadata.
    pub fn module_descriptor(&self, specifics: &Specifics) -> LoadResult<ModuleDescriptor> {
        with_container(&self.artifact.layout, |container| {
            let bytes = container.entry(METADATA)?;
            metadata::parse_module(&bytes, self, specifics)
        })
    }
}

/// An opened library, valid only inside `with_container`.
enum Container<'a> {
    Archive {
        path: &'a Path,
        data: &'a [u8],
        archive: ArchiveFile<'a>,
    },
    Directory(&'a Path),
}

impl<'a> Container<'a> {
    fn entry(&self, name: &str) -> LoadResult<Cow<'a, [u8]>> {
        match self {
            Container::Archive {
                path,
                data,
                archive,
            } => {
                for member in archive.members() {
                    let member = member.map_err(|e| LoadError::corrupt(path, e))?;
                    if member_name(member.name()) == name.as_bytes() {
                        let bytes = member.data(*data).map_err(|e| LoadError::corrupt(path, e))?;
                        return Ok(Cow::Borrowed(bytes));
                    }
                }
                Err(LoadError::corrupt(path, format!("missing entry '{}'", name)))
            }
            Container::Directory(dir) => fs::read(dir.join(name))
                .map(Cow::Owned)
                .map_err(|e| LoadError::corrupt(dir, format!("cannot read '{}': {}", name, e))),
        }
    }
}

/// Opens the container behind `layout`, hands it to `f`, and releases it.
fn with_container<T>(
    layout: &LibraryLayout,
    f: impl FnOnce(&Container<'_>) -> LoadResult<T>,
) -> LoadResult<T> {
    match layout {
        LibraryLayout::Unpacked(dir) => f(&Container::Directory(dir)),
        LibraryLayout::Packed(path) => {
            let file = File::open(path).map_err(|e| LoadError::corrupt(path, e))?;
            let len = file.metadata().map_err(|e| LoadError::corrupt(path, e))?.len();
            if len < ARCHIVE_MAGIC.len() as u64 {
                return Err(LoadError::corrupt(path, "file too short"));
            }
            let mmap = unsafe { Mmap::map(&file) }.map_err(|e| LoadError::corrupt(path, e))?;
            if !mmap.starts_with(ARCHIVE_MAGIC) {
                return Err(LoadError::corrupt(path, "not a library archive"));
            }
            let archive = ArchiveFile::parse(&*mmap).map_err(|e| LoadError::corrupt(path, e))?;
            f(&Container::Archive {
                path,
                data: &mmap,
                archive,
            })
        }
    }
}

/// Strips the GNU `/` terminator and space padding from a member name.
fn member_name(raw: &[u8]) -> &[u8] {
    let end = raw
        .iter()
        .rposition(|&b| b != b' ' && b != b'/')
        .map_or(0, |i| i + 1);
    &raw[..end]
}
