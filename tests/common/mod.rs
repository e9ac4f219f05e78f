#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use modlink::config::{Config, CURRENT_ABI_VERSION};
use modlink::layout::{MANIFEST, METADATA};
use modlink::library::Manifest;
use modlink::metadata::{LanguageVersion, ModuleMetadata};
use modlink::symbol::{Declaration, DeclarationKind};
use modlink::target::{Distribution, Target};
use modlink::writer::write_archive;

pub const TARGET: Target = Target::LinuxX64;

fn manifest(name: &str, target: &str) -> String {
    toml::to_string(&Manifest {
        unique_name: name.to_string(),
        abi_version: CURRENT_ABI_VERSION,
        targets: vec![target.to_string()],
    })
    .unwrap()
}

fn metadata(name: &str) -> String {
    serde_json::to_string(&ModuleMetadata {
        name: name.to_string(),
        language_version: LanguageVersion::new(1, 0),
        declarations: vec![Declaration::new(
            &format!("{}_main", name),
            DeclarationKind::Function,
        )],
    })
    .unwrap()
}

/// Writes a packed library `<dir>/<name>.mlib` built for `target`.
pub fn packed_for(dir: &Path, name: &str, target: &str) -> PathBuf {
    let manifest = manifest(name, target);
    let metadata = metadata(name);
    let bytes = write_archive(&[
        (MANIFEST, manifest.as_bytes()),
        (METADATA, metadata.as_bytes()),
    ])
    .unwrap();
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(format!("{}.mlib", name));
    fs::write(&path, bytes).unwrap();
    path
}

pub fn packed(dir: &Path, name: &str) -> PathBuf {
    packed_for(dir, name, TARGET.name())
}

/// Writes an unpacked library directory `<dir>/<name>`.
pub fn unpacked(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::create_dir_all(&path).unwrap();
    fs::write(path.join(MANIFEST), manifest(name, TARGET.name())).unwrap();
    fs::write(path.join(METADATA), metadata(name)).unwrap();
    path
}

/// A configuration searching `repos`, with distribution directories under `root`.
pub fn config(root: &Path, libraries: &[&str], repos: &[PathBuf]) -> Config {
    let mut config = Config::new(
        "main",
        TARGET,
        Distribution::new(root.join("dist"), root.join("local")),
    );
    config.libraries = libraries.iter().map(|s| s.to_string()).collect();
    config.repositories = repos.to_vec();
    config
}
