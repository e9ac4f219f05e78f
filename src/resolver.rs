//! Library name and search path resolution.
//!
//! Turns the requested library identifiers into concrete artifact locations by
//! probing an ordered list of search roots: user repositories first, then the
//! distribution's bundled libraries, then the local cache.

use std::path::{Path, PathBuf};

use crate::error::{LoadError, LoadResult};
use crate::layout::{self, LibraryLayout};
use crate::target::Distribution;

/// Identifier of the implicitly linked standard library.
pub const STDLIB: &str = "stdlib";

/// Builds the effective identifier list: `explicit`, followed by the standard
/// library unless `no_stdlib` is set.
pub fn library_names(explicit: &[String], no_stdlib: bool) -> Vec<String> {
    let mut names = explicit.to_vec();
    if !no_stdlib {
        names.push(STDLIB.to_string());
    }
    names
}

/// A library identifier bound to the location it was found at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    pub identifier: String,
    pub layout: LibraryLayout,
}

impl ResolvedArtifact {
    pub fn path(&self) -> &Path {
        self.layout.path()
    }
}

pub struct SearchPathResolver {
    search_roots: Vec<PathBuf>,
}

impl SearchPathResolver {
    pub fn new(repositories: &[PathBuf], distribution: &Distribution) -> Self {
        let mut search_roots = repositories.to_vec();
        search_roots.push(distribution.library_dir());
        search_roots.push(distribution.local_library_dir());
        Self { search_roots }
    }

    /// Search roots in probe order.
    pub fn search_roots(&self) -> &[PathBuf] {
        &self.search_roots
    }

    /// Resolves one identifier to the first matching artifact.
    ///
    /// Absolute identifiers are checked as given. Relative ones are tried
    /// against every root in order; within a root the packed form wins over
    /// an unpacked directory of the same name.
    pub fn resolve(&self, identifier: &str) -> LoadResult<ResolvedArtifact> {
        let given = Path::new(identifier);
        // "", "." and ".." name no library; joined to a root they would
        // point at the root itself or its parent.
        if given.file_name().is_none() {
            return Err(LoadError::Resolution {
                identifier: identifier.to_string(),
                searched: Vec::new(),
            });
        }
        let found = if given.is_absolute() {
            probe(given)
        } else {
            self.search_roots.iter().find_map(|root| {
                tracing::trace!("probing {} for '{}'", root.display(), identifier);
                probe(&root.join(identifier))
            })
        };

        match found {
            Some(layout) => {
                tracing::debug!("resolved '{}' to {}", identifier, layout.path().display());
                Ok(ResolvedArtifact {
                    identifier: identifier.to_string(),
                    layout,
                })
            }
            None => Err(LoadError::Resolution {
                identifier: identifier.to_string(),
                searched: if given.is_absolute() {
                    vec![given.to_path_buf()]
                } else {
                    self.search_roots.clone()
                },
            }),
        }
    }

    /// Resolves every identifier in order, stopping at the first failure.
    pub fn resolve_all(&self, identifiers: &[String]) -> LoadResult<Vec<ResolvedArtifact>> {
        identifiers.iter().try_fold(Vec::new(), |mut found, identifier| {
            found.push(self.resolve(identifier)?);
            Ok(found)
        })
    }
}

/// Checks the packed and unpacked spellings of `candidate`.
fn probe(candidate: &Path) -> Option<LibraryLayout> {
    let name = candidate.file_name()?.to_string_lossy();
    let packed = candidate.with_file_name(layout::with_extension(&name));
    LibraryLayout::detect(&packed)
        .filter(|layout| matches!(layout, LibraryLayout::Packed(_)))
        .or_else(|| LibraryLayout::detect(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::MANIFEST;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"!<arch>\n").unwrap();
    }

    fn unpacked(path: &Path) {
        fs::create_dir_all(path).unwrap();
        fs::write(path.join(MANIFEST), "").unwrap();
    }

    #[test]
    fn test_library_names_appends_stdlib_once() {
        let explicit = vec!["foo".to_string(), "bar".to_string()];
        assert_eq!(library_names(&explicit, false), ["foo", "bar", "stdlib"]);
        assert_eq!(library_names(&[], false), ["stdlib"]);
    }

    #[test]
    fn test_library_names_without_stdlib() {
        let explicit = vec!["foo".to_string(), "foo".to_string()];
        assert_eq!(library_names(&explicit, true), explicit);
    }

    #[test]
    fn test_search_roots_order() {
        let dist = Distribution::new("/dist", "/local");
        let resolver = SearchPathResolver::new(&[PathBuf::from("/a"), PathBuf::from("/b")], &dist);
        assert_eq!(
            resolver.search_roots(),
            [
                PathBuf::from("/a"),
                PathBuf::from("/b"),
                PathBuf::from("/dist/lib"),
                PathBuf::from("/local/lib"),
            ]
        );
    }

    #[test]
    fn test_earliest_repository_wins() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        let empty = dir.path().join("empty");
        touch(&first.join("foo.mlib"));
        touch(&second.join("foo.mlib"));
        fs::create_dir_all(&empty).unwrap();
        let dist = Distribution::new(dir.path().join("dist"), dir.path().join("local"));

        let orders = [
            vec![first.clone(), second.clone(), empty.clone()],
            vec![empty.clone(), first.clone(), second.clone()],
            vec![first.clone(), empty.clone(), second.clone()],
        ];
        for repos in orders {
            let resolver = SearchPathResolver::new(&repos, &dist);
            let artifact = resolver.resolve("foo").unwrap();
            assert_eq!(artifact.path(), first.join("foo.mlib"));
        }
    }

    #[test]
    fn test_repositories_shadow_distribution() {
        let dir = tempdir().unwrap();
        let repo = dir.path().join("repo");
        let dist = Distribution::new(dir.path().join("dist"), dir.path().join("local"));
        touch(&dist.library_dir().join("stdlib.mlib"));
        touch(&dist.local_library_dir().join("stdlib.mlib"));

        let resolver = SearchPathResolver::new(&[repo.clone()], &dist);
        assert_eq!(
            resolver.resolve(STDLIB).unwrap().path(),
            dist.library_dir().join("stdlib.mlib")
        );

        touch(&repo.join("stdlib.mlib"));
        assert_eq!(
            resolver.resolve(STDLIB).unwrap().path(),
            repo.join("stdlib.mlib")
        );
    }

    #[test]
    fn test_packed_preferred_over_unpacked() {
        let dir = tempdir().unwrap();
        let dist = Distribution::new(dir.path().join("dist"), dir.path().join("local"));
        unpacked(&dir.path().join("foo"));
        let resolver = SearchPathResolver::new(&[dir.path().to_path_buf()], &dist);
        assert_eq!(
            resolver.resolve("foo").unwrap().layout,
            LibraryLayout::Unpacked(dir.path().join("foo"))
        );

        touch(&dir.path().join("foo.mlib"));
        assert_eq!(
            resolver.resolve("foo").unwrap().layout,
            LibraryLayout::Packed(dir.path().join("foo.mlib"))
        );
        assert_eq!(
            resolver.resolve("foo.mlib").unwrap().layout,
            LibraryLayout::Packed(dir.path().join("foo.mlib"))
        );
    }

    #[test]
    fn test_absolute_identifier_is_not_searched() {
        let dir = tempdir().unwrap();
        let lib = dir.path().join("elsewhere").join("bar.mlib");
        touch(&lib);
        let dist = Distribution::new(dir.path().join("dist"), dir.path().join("local"));
        let resolver = SearchPathResolver::new(&[], &dist);

        let artifact = resolver.resolve(lib.to_str().unwrap()).unwrap();
        assert_eq!(artifact.path(), lib);

        let missing = dir.path().join("nope");
        let err = resolver.resolve(missing.to_str().unwrap()).unwrap_err();
        assert_eq!(
            err,
            LoadError::Resolution {
                identifier: missing.to_str().unwrap().to_string(),
                searched: vec![missing.clone()],
            }
        );
    }

    #[test]
    fn test_degenerate_identifiers_are_rejected() {
        let dir = tempdir().unwrap();
        let repo = dir.path().join("repo");
        unpacked(&repo);
        touch(&dir.path().join("repo.mlib"));
        let dist = Distribution::new(dir.path().join("dist"), dir.path().join("local"));
        let resolver = SearchPathResolver::new(&[repo], &dist);

        for identifier in ["", ".", "..", "foo/.."] {
            assert_eq!(
                resolver.resolve(identifier),
                Err(LoadError::Resolution {
                    identifier: identifier.to_string(),
                    searched: Vec::new(),
                }),
                "'{}' should not resolve",
                identifier
            );
        }
    }

    #[test]
    fn test_resolve_all_fails_on_first_missing() {
        let dir = tempdir().unwrap();
        let dist = Distribution::new(dir.path().join("dist"), dir.path().join("local"));
        touch(&dir.path().join("foo.mlib"));
        let resolver = SearchPathResolver::new(&[dir.path().to_path_buf()], &dist);

        let names = vec!["foo".to_string(), "missing".to_string(), "other".to_string()];
        match resolver.resolve_all(&names) {
            Err(LoadError::Resolution { identifier, searched }) => {
                assert_eq!(identifier, "missing");
                assert_eq!(searched, resolver.search_roots());
            }
            other => panic!("expected resolution error, got {:?}", other),
        }

        let resolved = resolver
            .resolve_all(&["foo".to_string(), "foo".to_string()])
            .unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0], resolved[1]);
    }
}
