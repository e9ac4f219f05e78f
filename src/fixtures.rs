//! Test libraries written to temporary repositories.

use std::fs;
use std::path::Path;

use crate::config::CURRENT_ABI_VERSION;
use crate::layout::{self, LibraryLayout, MANIFEST, METADATA};
use crate::library::{Manifest, ReadableLibrary};
use crate::resolver::ResolvedArtifact;
use crate::symbol::{Declaration, DeclarationKind};
use crate::target::Target;
use crate::writer::write_archive;

pub const TARGET: Target = Target::LinuxX64;

pub struct LibraryFixture {
    manifest: Manifest,
    language_version: String,
    declarations: Vec<Declaration>,
    metadata: Option<String>,
}

impl LibraryFixture {
    pub fn new(name: &str) -> Self {
        Self {
            manifest: Manifest {
                unique_name: name.to_string(),
                abi_version: CURRENT_ABI_VERSION,
                targets: vec![TARGET.name().to_string()],
            },
            language_version: "1.0".to_string(),
            declarations: Vec::new(),
            metadata: None,
        }
    }

    pub fn abi_version(mut self, abi_version: u32) -> Self {
        self.manifest.abi_version = abi_version;
        self
    }

    pub fn targets(mut self, targets: &[&str]) -> Self {
        self.manifest.targets = targets.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn language_version(mut self, version: &str) -> Self {
        self.language_version = version.to_string();
        self
    }

    pub fn declaration(mut self, name: &str, kind: DeclarationKind) -> Self {
        self.declarations.push(Declaration::new(name, kind));
        self
    }

    /// Replaces the generated metadata entry with raw text.
    pub fn metadata(mut self, raw: &str) -> Self {
        self.metadata = Some(raw.to_string());
        self
    }

    fn entries(&self) -> (String, String) {
        let manifest = toml::to_string(&self.manifest).unwrap();
        let metadata = self.metadata.clone().unwrap_or_else(|| {
            serde_json::json!({
                "name": self.manifest.unique_name,
                "language_version": self.language_version,
                "declarations": self.declarations,
            })
            .to_string()
        });
        (manifest, metadata)
    }

    /// Writes `<dir>/<name>.mlib`.
    pub fn write_packed(&self, dir: &Path) -> LibraryLayout {
        let (manifest, metadata) = self.entries();
        let bytes = write_archive(&[
            (MANIFEST, manifest.as_bytes()),
            (METADATA, metadata.as_bytes()),
        ])
        .unwrap();
        fs::create_dir_all(dir).unwrap();
        let path = dir.join(layout::with_extension(&self.manifest.unique_name));
        fs::write(&path, bytes).unwrap();
        LibraryLayout::Packed(path)
    }

    /// Writes the directory `<dir>/<name>`.
    pub fn write_unpacked(&self, dir: &Path) -> LibraryLayout {
        let (manifest, metadata) = self.entries();
        let path = dir.join(&self.manifest.unique_name);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join(MANIFEST), manifest).unwrap();
        fs::write(path.join(METADATA), metadata).unwrap();
        LibraryLayout::Unpacked(path)
    }
}

/// Opens a fixture for the test target and current ABI.
pub fn open(layout: LibraryLayout) -> ReadableLibrary {
    let identifier = layout
        .path()
        .file_stem()
        .unwrap()
        .to_string_lossy()
        .into_owned();
    ReadableLibrary::open(
        ResolvedArtifact { identifier, layout },
        TARGET,
        CURRENT_ABI_VERSION,
    )
    .unwrap()
}
