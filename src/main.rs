//! Entry point for modlink.
//!
//! This file handles high-level application flow:
//! 1. Parse command-line arguments using `clap`.
//! 2. Set up logging from `--log-level`.
//! 3. Either resolve, load and link the requested libraries and print the
//!    module graph, or pack a library directory.
//!
//! Error handling is done via `anyhow`.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use modlink::config::{Cli, Command, LoadArgs, PackArgs};
use modlink::writer;
use modlink::LibraryConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log_level).context("invalid --log-level")?)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Load(args) => load(args),
        Command::Pack(args) => pack(args),
    }
}

fn load(args: LoadArgs) -> Result<()> {
    let libs = LibraryConfig::new(args.into_config()?);
    tracing::info!(
        "configuring '{}' for {}",
        libs.module_name(),
        libs.target()
    );

    // 1. Resolve and open every library
    let libraries = libs.readable_libraries().context("failed to open libraries")?;

    // 2. Load metadata and link modules
    let graph = libs.module_graph().context("failed to load module metadata")?;

    for library in libraries {
        println!(
            "library {} ({}) -> {}",
            library.identifier(),
            library.library_name(),
            library.path().display()
        );
    }
    for module in graph.modules() {
        let deps: Vec<&str> = module
            .dependencies()
            .iter()
            .filter_map(|id| graph.module(*id))
            .map(|dep| dep.name())
            .collect();
        println!(
            "module {} [{} declarations] depends on: {}",
            module.name(),
            module.declarations().len(),
            deps.join(", ")
        );
    }
    for native in libs.native_libraries() {
        println!("native {}", native);
    }

    println!("Linked {} modules", graph.len());
    Ok(())
}

fn pack(args: PackArgs) -> Result<()> {
    let output = match args.output {
        Some(output) => output,
        None => writer::default_output(&args.dir)?,
    };
    writer::write_library(&args.dir, &output)?;
    println!("Packed library to {}", output.display());
    Ok(())
}
