//! Logging setup.
//!
//! The terminal is owned by the editor while it runs, so log records go to
//! a file. The default filter is `warn`, with `info` for the tilepaint
//! crates; `RUST_LOG` overrides both.

use std::fs::File;
use std::path::Path;

use env_logger::{Builder, Target};
use log::LevelFilter;

/// Install the global logger, appending to `path`.
pub fn init(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::options().create(true).append(true).open(path)?;
    Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module("tilepaint", LevelFilter::Info)
        .filter_module("tilepaint_core", LevelFilter::Info)
        .filter_module("tilepaint_term", LevelFilter::Info)
        .parse_default_env()
        .target(Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}
