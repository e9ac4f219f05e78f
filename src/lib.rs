//! Library resolution, loading and linking.
//!
//! This library resolves the libraries a compilation asks for, loads their
//! metadata and links the resulting modules before compilation proceeds.
//! It is organized into several modules:
//! - `config`: Configuration inputs and CLI.
//! - `target`: Compilation targets and distribution directories.
//! - `resolver`: Library identifiers and search path resolution.
//! - `library`: Opening and validating library artifacts.
//! - `metadata`: Module metadata deserialization.
//! - `linker`: Dependency assignment and the module graph.
//! - `pipeline`: The lazily evaluated library configuration.
//! - `writer`: Packing libraries into archives.

pub mod config;
pub mod error;
pub mod layout;
pub mod library;
pub mod linker;
pub mod metadata;
pub mod pipeline;
pub mod resolver;
pub mod symbol;
pub mod target;
pub mod utils;
pub mod writer;

#[cfg(test)]
mod fixtures;

pub use error::{Incompatibility, LoadError, LoadResult};
pub use pipeline::LibraryConfig;
