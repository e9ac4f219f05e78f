//! Compilation target and distribution layout.
//!
//! A library is only usable when it was built for the target being compiled,
//! so the target name is carried through the whole loading pipeline.
//! `Distribution` describes where the toolchain keeps its bundled libraries.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// The targets the toolchain knows how to compile for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    LinuxX64,
    LinuxArm64,
    MacosX64,
    MacosArm64,
    MingwX64,
    Wasm32,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown target '{0}'")]
pub struct UnknownTargetError(pub String);

impl Target {
    pub const ALL: [Target; 6] = [
        Target::LinuxX64,
        Target::LinuxArm64,
        Target::MacosX64,
        Target::MacosArm64,
        Target::MingwX64,
        Target::Wasm32,
    ];

    /// The name recorded in library manifests.
    pub fn name(self) -> &'static str {
        match self {
            Target::LinuxX64 => "linux_x64",
            Target::LinuxArm64 => "linux_arm64",
            Target::MacosX64 => "macos_x64",
            Target::MacosArm64 => "macos_arm64",
            Target::MingwX64 => "mingw_x64",
            Target::Wasm32 => "wasm32",
        }
    }

    /// The target matching the machine we are running on, if any.
    pub fn host() -> Option<Target> {
        match (std::env::consts::OS, std::env::consts::ARCH) {
            ("linux", "x86_64") => Some(Target::LinuxX64),
            ("linux", "aarch64") => Some(Target::LinuxArm64),
            ("macos", "x86_64") => Some(Target::MacosX64),
            ("macos", "aarch64") => Some(Target::MacosArm64),
            ("windows", "x86_64") => Some(Target::MingwX64),
            _ => None,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Target {
    type Err = UnknownTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| UnknownTargetError(s.to_string()))
    }
}

/// Toolchain installation directories searched after user repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    home: PathBuf,
    local_dir: PathBuf,
}

impl Distribution {
    pub fn new(home: impl Into<PathBuf>, local_dir: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            local_dir: local_dir.into(),
        }
    }

    /// Libraries shipped with the toolchain, `stdlib` among them.
    pub fn library_dir(&self) -> PathBuf {
        self.home.join("lib")
    }

    /// Per-user cache of downloaded libraries.
    pub fn local_library_dir(&self) -> PathBuf {
        self.local_dir.join("lib")
    }
}
