// SPDX-License-Identifier: MIT
//
// Logging — `tracing` output to a file.
//
// The terminal belongs to the editor while it runs, so log records never go
// to stdout or stderr. They are written by a background appender to
// `<data_local_dir>/kilo/logs/kilo.log` unless `--log-file` says otherwise.
//
// Filter priority: `KILO_LOG`, then `RUST_LOG`, then `info`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Environment variable that takes precedence over `RUST_LOG`.
pub const LOG_ENV: &str = "KILO_LOG";

const DEFAULT_FILTER: &str = "info";
const LOG_FILE_NAME: &str = "kilo.log";

/// Keeps the background writer alive. Dropping it flushes pending records.
pub struct LogGuard {
    _guard: WorkerGuard,
    pub path: PathBuf,
}

/// Install the global subscriber writing to `override_path` or the default
/// log file.
///
/// # Errors
///
/// The log directory could not be created, or a subscriber is already set.
pub fn init(override_path: Option<&Path>) -> Result<LogGuard> {
    let path = override_path.map_or_else(default_log_path, Path::to_path_buf);
    let (dir, name) = split_log_path(&path);

    fs::create_dir_all(&dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, &name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    Registry::default()
        .with(filter())
        .with(layer)
        .try_init()
        .context("installing the tracing subscriber")?;

    Ok(LogGuard {
        _guard: guard,
        path,
    })
}

fn filter() -> EnvFilter {
    env::var(LOG_ENV)
        .or_else(|_| env::var("RUST_LOG"))
        .map_or_else(|_| EnvFilter::new(DEFAULT_FILTER), EnvFilter::new)
}

fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kilo")
        .join("logs")
        .join(LOG_FILE_NAME)
}

/// Directory and file name for the appender.
fn split_log_path(path: &Path) -> (PathBuf, String) {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let name = path
        .file_name()
        .map_or_else(|| LOG_FILE_NAME.to_owned(), |n| n.to_string_lossy().into_owned());
    (dir, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_path_ends_with_kilo_log() {
        let path = default_log_path();
        assert!(path.ends_with("kilo/logs/kilo.log"));
    }

    #[test]
    fn split_nested_path() {
        let (dir, name) = split_log_path(Path::new("/var/tmp/k/debug.log"));
        assert_eq!(dir, PathBuf::from("/var/tmp/k"));
        assert_eq!(name, "debug.log");
    }

    #[test]
    fn split_bare_file_name() {
        let (dir, name) = split_log_path(Path::new("trace.log"));
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, "trace.log");
    }
}
