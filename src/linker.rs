//! Dependency linking.
//!
//! Once every library of a configuration has been loaded, each module gets
//! the whole loaded set as its dependencies: every module sees every other
//! module, itself included. There is no per-library dependency computation;
//! the loaded set is treated as a closed world.

use crate::metadata::{ModuleDescriptor, ModuleId};

/// Assigns every module the full loaded set as its dependencies.
///
/// Calling this again on the same set changes nothing: a descriptor keeps the
/// first dependency set it was given.
pub fn link_dependencies(modules: &[ModuleDescriptor]) {
    let all: Vec<ModuleId> = (0..modules.len()).map(ModuleId).collect();
    for module in modules {
        module.set_dependencies(|| all.clone());
    }
    tracing::debug!("linked {} modules", modules.len());
}

/// The loaded modules of a configuration with their dependencies assigned.
#[derive(Debug)]
pub struct ModuleGraph {
    modules: Vec<ModuleDescriptor>,
}

impl ModuleGraph {
    /// Takes ownership of a fully loaded module set and links it.
    pub fn link(modules: Vec<ModuleDescriptor>) -> Self {
        link_dependencies(&modules);
        Self { modules }
    }

    pub fn modules(&self) -> &[ModuleDescriptor] {
        &self.modules
    }

    pub fn module(&self, id: ModuleId) -> Option<&ModuleDescriptor> {
        self.modules.get(id.0)
    }

    pub fn find(&self, name: &str) -> Option<ModuleId> {
        self.modules.iter().position(|m| m.name() == name).map(ModuleId)
    }

    /// The modules `id` depends on, in load order.
    pub fn dependencies_of(&self, id: ModuleId) -> impl Iterator<Item = &ModuleDescriptor> {
        self.module(id)
            .map(ModuleDescriptor::dependencies)
            .unwrap_or_default()
            .iter()
            .filter_map(|dep| self.module(*dep))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
