use std::fs::{self, File};
use std::path::Path;
use std::str::FromStr;

use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

/// Where tracing output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    /// JSON lines appended to a file, safe while the terminal UI owns the screen.
    File(&'a Path),
    /// Human-readable lines on stderr, for the headless modes.
    Stderr,
    Off,
}

pub fn parse_level(level: &str) -> Result<Level> {
    Level::from_str(level.trim()).map_err(|_| eyre!("unknown log level `{level}`"))
}

pub fn init_tracing(target: LogTarget<'_>, level: Level) -> Result<()> {
    match target {
        LogTarget::Off => Ok(()),
        LogTarget::Stderr => {
            let subscriber = tracing_subscriber::fmt()
                .with_max_level(level)
                .with_target(false)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))
        }
        LogTarget::File(path) => {
            ensure_parent_dir(path)?;
            let file = File::create(path)
                .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
            let make_writer = move || {
                file.try_clone()
                    .expect("failed to clone tracing output file")
            };

            let subscriber = tracing_subscriber::fmt()
                .with_ansi(false)
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_max_level(level)
                .with_writer(make_writer)
                .finish();

            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))
        }
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}
