//! Error types for library loading.
//!
//! Every failure is fatal to the configuration that produced it. Errors are
//! `Clone` so a cached failure can be handed out again on later accesses.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for the loading pipeline.
pub type LoadResult<T> = Result<T, LoadError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// No search root holds the requested library.
    #[error("library '{identifier}' not found in {}", SearchRoots(.searched))]
    Resolution {
        identifier: String,
        searched: Vec<PathBuf>,
    },

    /// The artifact was built for another target or ABI.
    #[error("incompatible library {}: {reason}", .path.display())]
    IncompatibleArtifact {
        path: PathBuf,
        reason: Incompatibility,
    },

    /// The container or its manifest cannot be read.
    #[error("corrupt library {}: {reason}", .path.display())]
    CorruptArtifact { path: PathBuf, reason: String },

    /// The metadata entry does not match the expected schema.
    #[error("failed to load metadata of '{library}' ({}): {reason}", .path.display())]
    MetadataDeserialization {
        library: String,
        path: PathBuf,
        reason: String,
    },
}

impl LoadError {
    pub(crate) fn corrupt(path: &Path, reason: impl fmt::Display) -> Self {
        LoadError::CorruptArtifact {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Incompatibility {
    #[error("ABI version {found} does not match required {expected}")]
    Abi { expected: u32, found: u32 },

    #[error("target '{expected}' not among [{}]", .available.join(", "))]
    Target {
        expected: String,
        available: Vec<String>,
    },
}

struct SearchRoots<'a>(&'a [PathBuf]);

impl fmt::Display for SearchRoots<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, root) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", root.display())?;
        }
        write!(f, "]")
    }
}
