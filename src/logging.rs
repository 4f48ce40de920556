use std::fs::{self, File};
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

use color_eyre::eyre::{Result, eyre};
use tracing::Level;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::config::LoggingConfig;

/// Installs the global subscriber. With the terminal UI active, logs only go
/// to a file; without a file configured they are dropped. Headless runs log
/// to stderr.
pub fn init_logging(config: &LoggingConfig, headless: bool) -> Result<()> {
    let writer = match &config.file {
        Some(path) => {
            ensure_parent_dir(path)?;
            BoxMakeWriter::new(Mutex::new(File::create(path)?))
        }
        None if headless => BoxMakeWriter::new(std::io::stderr),
        None => return Ok(()),
    };

    let level = parse_level(&config.level);
    let builder = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(level)
        .with_writer(writer);

    let installed = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    installed.map_err(|e| eyre!("failed to set tracing subscriber: {e}"))
}

fn parse_level(raw: &str) -> Level {
    Level::from_str(raw.trim()).unwrap_or(Level::INFO)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
