//! Lazy library configuration.
//!
//! `LibraryConfig` drives the whole pipeline: identifiers, resolved
//! artifacts, readable libraries, then the linked module graph. Each stage is
//! computed on first access and cached for the lifetime of the instance,
//! failures included. There is no way to invalidate a stage.

use std::cell::OnceCell;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::{LoadError, LoadResult};
use crate::library::ReadableLibrary;
use crate::linker::ModuleGraph;
use crate::metadata::{self, ModuleDescriptor};
use crate::resolver::{self, ResolvedArtifact, SearchPathResolver};
use crate::target::Target;

pub struct LibraryConfig {
    config: Config,
    resolver: SearchPathResolver,
    identifiers: OnceCell<Vec<String>>,
    artifacts: OnceCell<LoadResult<Vec<ResolvedArtifact>>>,
    libraries: OnceCell<LoadResult<Vec<ReadableLibrary>>>,
    graph: OnceCell<LoadResult<ModuleGraph>>,
}

impl LibraryConfig {
    pub fn new(config: Config) -> Self {
        let resolver = SearchPathResolver::new(&config.repositories, &config.distribution);
        Self {
            config,
            resolver,
            identifiers: OnceCell::new(),
            artifacts: OnceCell::new(),
            libraries: OnceCell::new(),
            graph: OnceCell::new(),
        }
    }

    pub fn module_name(&self) -> &str {
        &self.config.module_name
    }

    pub fn target(&self) -> Target {
        self.config.target
    }

    pub fn native_libraries(&self) -> &[String] {
        &self.config.native_libraries
    }

    pub fn search_roots(&self) -> &[PathBuf] {
        self.resolver.search_roots()
    }

    /// Requested identifiers, with the standard library appended unless
    /// disabled.
    pub fn library_identifiers(&self) -> &[String] {
        self.identifiers
            .get_or_init(|| resolver::library_names(&self.config.libraries, self.config.no_stdlib))
    }

    pub fn resolved_artifacts(&self) -> LoadResult<&[ResolvedArtifact]> {
        self.artifacts
            .get_or_init(|| self.resolver.resolve_all(self.library_identifiers()))
            .as_deref()
            .map_err(LoadError::clone)
    }

    /// Libraries opened and checked against the target and ABI version.
    ///
    /// Each identifier is resolved and opened before the next one is looked
    /// at, so the first bad identifier decides the error no matter which
    /// accessor ran first. Already resolved artifacts are reused.
    pub fn readable_libraries(&self) -> LoadResult<&[ReadableLibrary]> {
        self.libraries
            .get_or_init(|| self.resolve_and_open())
            .as_deref()
            .map_err(LoadError::clone)
    }

    /// Loaded modules, linked to each other.
    pub fn module_descriptors(&self) -> LoadResult<&[ModuleDescriptor]> {
        self.module_graph().map(ModuleGraph::modules)
    }

    pub fn module_graph(&self) -> LoadResult<&ModuleGraph> {
        self.graph
            .get_or_init(|| {
                let libraries = self.readable_libraries()?;
                let modules = metadata::load_modules(libraries, &self.config.specifics)?;
                Ok(ModuleGraph::link(modules))
            })
            .as_ref()
            .map_err(LoadError::clone)
    }

    fn open(&self, artifact: ResolvedArtifact) -> LoadResult<ReadableLibrary> {
        ReadableLibrary::open(artifact, self.config.target, self.config.abi_version)
    }

    fn resolve_and_open(&self) -> LoadResult<Vec<ReadableLibrary>> {
        let cached = self.artifacts.get().and_then(|found| found.as_ref().ok());
        let mut artifacts = Vec::new();
        let mut libraries = Vec::new();
        for (index, identifier) in self.library_identifiers().iter().enumerate() {
            let artifact = match cached {
                Some(found) => found[index].clone(),
                None => self.resolver.resolve(identifier)?,
            };
            artifacts.push(artifact.clone());
            libraries.push(self.open(artifact)?);
        }
        // Every identifier resolved, so the artifact stage is known too.
        self.artifacts.get_or_init(|| Ok(artifacts));
        Ok(libraries)
    }
}
