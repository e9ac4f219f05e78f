//! Module metadata loading.
//!
//! Each readable library yields one `ModuleDescriptor`. Descriptors start out
//! unlinked; the linker assigns their dependencies once every library of the
//! configuration has been loaded.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cell::OnceCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{LoadError, LoadResult};
use crate::library::ReadableLibrary;
use crate::symbol::Declaration;
use crate::utils::profile;

/// A `major.minor` language version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LanguageVersion {
    pub major: u32,
    pub minor: u32,
}

impl LanguageVersion {
    pub const LATEST: LanguageVersion = LanguageVersion { major: 2, minor: 0 };

    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for LanguageVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s
            .split_once('.')
            .ok_or_else(|| format!("invalid language version '{}', expected MAJOR.MINOR", s))?;
        let parse = |part: &str| {
            part.parse::<u32>()
                .map_err(|_| format!("invalid language version '{}', expected MAJOR.MINOR", s))
        };
        Ok(Self::new(parse(major)?, parse(minor)?))
    }
}

impl Serialize for LanguageVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LanguageVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Language settings shared by every library loaded in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Specifics {
    pub language_version: LanguageVersion,
}

impl Default for Specifics {
    fn default() -> Self {
        Self {
            language_version: LanguageVersion::LATEST,
        }
    }
}

/// On-disk schema of the metadata entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleMetadata {
    pub name: String,
    pub language_version: LanguageVersion,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

/// Index of a module inside its `ModuleGraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(pub usize);

/// In-memory view of one library's exported metadata.
#[derive(Debug)]
pub struct ModuleDescriptor {
    name: String,
    library_path: PathBuf,
    declarations: Vec<Declaration>,
    dependencies: OnceCell<Vec<ModuleId>>,
}

impl ModuleDescriptor {
    pub fn new(
        name: &str,
        library_path: &Path,
        declarations: Vec<Declaration>,
    ) -> Self {
        Self {
            name: name.to_string(),
            library_path: library_path.to_path_buf(),
            declarations,
            dependencies: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn library_path(&self) -> &Path {
        &self.library_path
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Dependencies assigned by the linker; empty until then.
    pub fn dependencies(&self) -> &[ModuleId] {
        self.dependencies.get().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_linked(&self) -> bool {
        self.dependencies.get().is_some()
    }

    /// Records the dependency set. Only the first assignment sticks.
    pub(crate) fn set_dependencies(&self, dependencies: impl FnOnce() -> Vec<ModuleId>) -> &[ModuleId] {
        self.dependencies.get_or_init(dependencies)
    }
}

/// Deserializes a metadata entry read from `library`.
pub fn parse_module(
    bytes: &[u8],
    library: &ReadableLibrary,
    specifics: &Specifics,
) -> LoadResult<ModuleDescriptor> {
    let fail = |reason: String| LoadError::MetadataDeserialization {
        library: library.library_name().to_string(),
        path: library.path().to_path_buf(),
        reason,
    };

    let metadata: ModuleMetadata = serde_json::from_slice(bytes).map_err(|e| fail(e.to_string()))?;
    if metadata.name != library.library_name() {
        return Err(fail(format!(
            "metadata describes module '{}'",
            metadata.name
        )));
    }
    if metadata.language_version > specifics.language_version {
        return Err(fail(format!(
            "compiled with language version {}, newer than {}",
            metadata.language_version, specifics.language_version
        )));
    }

    Ok(ModuleDescriptor::new(
        &metadata.name,
        library.path(),
        metadata.declarations,
    ))
}

/// Loads every library's metadata in order. The first failure aborts the
/// whole batch.
pub fn load_modules(
    libraries: &[ReadableLibrary],
    specifics: &Specifics,
) -> LoadResult<Vec<ModuleDescriptor>> {
    libraries.iter().try_fold(Vec::new(), |mut modules, library| {
        let label = format!("Loading {}", library.library_name());
        modules.push(profile(&label, || library.module_descriptor(specifics))?);
        Ok(modules)
    })
}
