//! Exported declarations.
//!
//! The loader does not interpret declarations beyond their name, kind and
//! visibility; they are handed to semantic analysis as-is.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Function,
    Class,
    Property,
    TypeAlias,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Internal,
}

/// A declaration exported by a library module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    #[serde(default)]
    pub visibility: Visibility,
}

impl Declaration {
    pub fn new(name: &str, kind: DeclarationKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            visibility: Visibility::Public,
        }
    }

    /// Whether other modules may refer to this declaration.
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}
