//! Logging setup.
//!
//! `RUST_LOG` overrides the default `info` filter. The terminal editor owns
//! the screen, so its logs go to a file instead of stderr.

use anyhow::{Context, Result, anyhow};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init(target: LogTarget) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_target(true)
        .with_line_number(true);

    match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = open_log_file(&path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
    }
    .map_err(|err| anyhow!("failed to initialize logging: {}", err))
}

/// Default log file for the terminal editor.
pub fn default_log_path() -> Option<PathBuf> {
    let mut path = crate::config::project_dirs()?.data_dir().to_path_buf();
    path.push("shiftgrid.log");
    Some(path)
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}
