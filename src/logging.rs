//! File logging.
//!
//! The terminal belongs to the UI, so logs only ever go to a file.
//!
//! Filter priority: `MDPAD_LOG` > `RUST_LOG` > `warn,mdpad=info`.
//!
//! Default file: `<data_local_dir>/mdpad/logs/mdpad-<pid>.log`, overridable with `--log-file`.
//! A path with an extension is used as the file itself, anything else as the directory.

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

const DEFAULT_FILTER: &str = "warn,mdpad=info";

/// Must be held for the program lifetime; dropping it flushes the background writer.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

pub fn init(log_file: Option<PathBuf>) -> Result<LogGuard> {
    let (dir, name) = resolve_log_path(log_file);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, &name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(create_filter());

    Registry::default()
        .with(layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(LogGuard { _file_guard: guard, log_file: dir.join(name) })
}

fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("mdpad-{}.log", std::process::id());

    if let Some(path) = override_path {
        if path.extension().is_some() {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf();
            let name = path.file_name().map_or(filename, |n| n.to_string_lossy().into_owned());
            return (dir, name);
        }
        return (path, filename);
    }

    (crate::config::data_dir().join("logs"), filename)
}

fn create_filter() -> EnvFilter {
    let spec = env::var("MDPAD_LOG")
        .or_else(|_| env::var("RUST_LOG"))
        .unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    EnvFilter::try_new(&spec).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_file_path_is_split() {
        let (dir, name) = resolve_log_path(Some(PathBuf::from("/tmp/x/run.log")));
        assert_eq!(dir, PathBuf::from("/tmp/x"));
        assert_eq!(name, "run.log");
    }

    #[test]
    fn explicit_dir_gets_pid_file() {
        let (dir, name) = resolve_log_path(Some(PathBuf::from("/tmp/logs")));
        assert_eq!(dir, PathBuf::from("/tmp/logs"));
        assert_eq!(name, format!("mdpad-{}.log", std::process::id()));
    }

    #[test]
    fn bare_file_name_lands_in_cwd() {
        let (dir, name) = resolve_log_path(Some(PathBuf::from("mdpad.log")));
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, "mdpad.log");
    }
}
