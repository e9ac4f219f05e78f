//! Configuration module.
//!
//! `Config` holds the inputs of one library configuration. The command-line
//! interface, built with `clap`, fills it in and supplies defaults for the
//! target and distribution directories.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::metadata::{LanguageVersion, Specifics};
use crate::target::{Distribution, Target};

/// ABI version produced and accepted by this toolchain.
pub const CURRENT_ABI_VERSION: u32 = 1;

/// Inputs of one library configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the module being compiled.
    pub module_name: String,
    /// Requested library identifiers, in priority order.
    pub libraries: Vec<String>,
    /// Skip the implicit standard library.
    pub no_stdlib: bool,
    /// User repositories, searched before the distribution.
    pub repositories: Vec<PathBuf>,
    pub target: Target,
    pub abi_version: u32,
    pub specifics: Specifics,
    pub distribution: Distribution,
    /// Native libraries passed through to the backend untouched.
    pub native_libraries: Vec<String>,
}

impl Config {
    pub fn new(module_name: &str, target: Target, distribution: Distribution) -> Self {
        Self {
            module_name: module_name.to_string(),
            libraries: Vec::new(),
            no_stdlib: false,
            repositories: Vec::new(),
            target,
            abi_version: CURRENT_ABI_VERSION,
            specifics: Specifics::default(),
            distribution,
            native_libraries: Vec::new(),
        }
    }
}

/// Library resolution and packing for the compiler front-end.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true, help = "Set the logging level")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve, load and link libraries, then print the module graph
    Load(LoadArgs),
    /// Pack an unpacked library directory into a .mlib archive
    Pack(PackArgs),
}

#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Library to link against (repeatable)
    #[arg(short = 'l', long = "library")]
    pub libraries: Vec<String>,

    /// Repository to search before the distribution (repeatable)
    #[arg(short = 'r', long = "repo")]
    pub repositories: Vec<PathBuf>,

    /// Do not link the standard library
    #[arg(long)]
    pub nostdlib: bool,

    /// Compilation target (defaults to the host)
    #[arg(long)]
    pub target: Option<Target>,

    #[arg(long, default_value_t = CURRENT_ABI_VERSION)]
    pub abi_version: u32,

    /// Language version as MAJOR.MINOR
    #[arg(long)]
    pub language_version: Option<LanguageVersion>,

    #[arg(long, default_value = "main")]
    pub module_name: String,

    /// Native library passed through to the backend (repeatable)
    #[arg(long = "native-library")]
    pub native_libraries: Vec<String>,

    /// Toolchain installation directory
    #[arg(long, env = "MODLINK_HOME")]
    pub home: Option<PathBuf>,

    /// Per-user data directory
    #[arg(long, env = "MODLINK_LOCAL_DIR")]
    pub local_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct PackArgs {
    /// Unpacked library directory
    pub dir: PathBuf,

    /// Output file
    #[arg(short, long, help = "Path to the packed library (defaults to <DIR>.mlib)")]
    pub output: Option<PathBuf>,
}

impl LoadArgs {
    pub fn into_config(self) -> Result<Config> {
        let target = match self.target {
            Some(target) => target,
            None => Target::host().context("host is not a supported target, pass --target")?,
        };
        let home = match self.home {
            Some(home) => home,
            None => default_home()?,
        };
        let local_dir = match self.local_dir {
            Some(dir) => dir,
            None => dirs::home_dir()
                .context("cannot determine the home directory, pass --local-dir")?
                .join(".modlink"),
        };

        let mut config = Config::new(&self.module_name, target, Distribution::new(home, local_dir));
        config.libraries = self.libraries;
        config.no_stdlib = self.nostdlib;
        config.repositories = self.repositories;
        config.abi_version = self.abi_version;
        if let Some(language_version) = self.language_version {
            config.specifics.language_version = language_version;
        }
        config.native_libraries = self.native_libraries;
        Ok(config)
    }
}

/// The installation root: the directory above the one holding the executable.
fn default_home() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("cannot locate the running executable")?;
    exe.parent()
        .and_then(|bin| bin.parent())
        .map(PathBuf::from)
        .with_context(|| format!("cannot derive an installation root from {}", exe.display()))
}
